//! The ELF file header. Only the fields needed to find the program header table (and
//! to decide whether the file is PIE) are kept.
use super::{Reader, Stream};
use crate::error::ScanError;
use std::fmt;

const ET_EXEC: u16 = 2;
const ET_DYN: u16 = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ObjectType {
    /// ET_EXEC, loaded at the addresses in its program headers.
    Executable,

    /// ET_DYN, a shared library or a PIE executable.
    SharedObject,

    /// Relocatable files, core files, and anything else.
    Other(u16),
}

impl ObjectType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            ET_EXEC => ObjectType::Executable,
            ET_DYN => ObjectType::SharedObject,
            _ => ObjectType::Other(value),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ObjectType::Executable => f.write_str("executable"),
            ObjectType::SharedObject => f.write_str("shared object"),
            ObjectType::Other(1) => f.write_str("relocatable"),
            ObjectType::Other(4) => f.write_str("core"),
            ObjectType::Other(n) => write!(f, "other ({n})"),
        }
    }
}

pub struct ElfHeader {
    // Elf64_Ehdr or Elf32_Ehdr, see https://llvm.org/doxygen/BinaryFormat_2ELF_8h_source.html
    pub otype: ObjectType,
    pub machine: u16,
    pub flags: u32,

    /// Offset in the ELF file to the program header table.
    pub ph_offset: u64,
    pub ph_entry_size: u16,
    pub num_ph_entries: u16,
}

impl ElfHeader {
    pub fn new(reader: &Reader) -> Result<Self, ScanError> {
        // Everything after e_ident has the same order for 32 and 64 bits, only the
        // widths of the address and offset fields change.
        let mut s = Stream::new(reader, super::IDENT_SIZE);
        let e_type = s.read_half()?;
        let e_machine = s.read_half()?;
        let _e_version = s.read_word()?;
        let _e_entry = s.read_addr()?;
        let e_phoff = s.read_offset()?;
        let _e_shoff = s.read_offset()?;
        let e_flags = s.read_word()?;
        let _e_ehsize = s.read_half()?;
        let e_phentsize = s.read_half()?;
        let e_phnum = s.read_half()?;
        Ok(ElfHeader {
            otype: ObjectType::from_u16(e_type),
            machine: e_machine,
            flags: e_flags,
            ph_offset: e_phoff,
            ph_entry_size: e_phentsize,
            num_ph_entries: e_phnum,
        })
    }

    pub fn machine(&self) -> &'static str {
        match self.machine {
            0x03 => "x86",
            0x08 => "MIPS",
            0x14 => "PowerPC",
            0x15 => "PowerPC64",
            0x28 => "ARM",
            0x3e => "x86-64",
            0xb7 => "AArch64",
            0xf3 => "RISC-V",
            _ => "unknown",
        }
    }
}
