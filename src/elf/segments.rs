//! Used by the run-time loader. Only load segments matter here: they're what maps file
//! offsets to virtual addresses.
use super::{Reader, Stream};
use crate::elf::{Bytes, ElfOffset, VirtualAddr};
use crate::error::ScanError;

const EXECUTE_FLAG: u32 = 0x1;
const WRITE_FLAG: u32 = 0x2;
const READ_FLAG: u32 = 0x4;

/// Describes a segment. Usually LoadSegment will be used instead of this.
pub struct ProgramHeader {
    // Elf64_Phdr or Elf32_Phdr, see https://llvm.org/doxygen/BinaryFormat_2ELF_8h_source.html
    pub stype: SegmentType,

    /// Offset to the first byte of the segment.
    pub offset: u64,

    /// Virtual address of the first byte in the segment.
    pub vaddr: u64,

    /// Number of bytes in the segment in the file.
    pub file_size: u64,

    /// Number of bytes in the segment in memory.
    pub mem_size: u64,

    /// Read/Write/Execute flags.
    pub flags: u32,
}

#[derive(Debug, Eq, PartialEq)]
pub enum SegmentType {
    /// Unused entry.
    Null,

    /// A loadable segment, described by p_filesz and p_memsz.
    Load,

    /// Specifies dynamic linking information.
    Dynamic,

    /// Location and size of a null-terminated path name to invoke as an interpreter.
    Interpreter,

    /// The location and size of auxiliary information.
    Note,

    /// The location and size of the program header table itself.
    Phdr,

    // The Thread-Local Storage template.
    Tls,

    /// Reserved, OS-specific (e.g. GNU_STACK), or processor-specific.
    Other(u32),
}

impl SegmentType {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => SegmentType::Null,
            1 => SegmentType::Load,
            2 => SegmentType::Dynamic,
            3 => SegmentType::Interpreter,
            4 => SegmentType::Note,
            6 => SegmentType::Phdr,
            7 => SegmentType::Tls,
            _ => SegmentType::Other(value),
        }
    }
}

/// One PT_LOAD entry: the bytes at obytes are mapped starting at vbytes.start.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadSegment {
    /// Addressing for the bytes in the segment using offsets from the start of the ELF file.
    pub obytes: Bytes<ElfOffset>,

    /// Addressing for the bytes in the segment using virtual addresses. Note that this
    /// uses the memory size which may be larger than the file size (e.g. for bss).
    pub vbytes: Bytes<VirtualAddr>,

    /// Readable, writeable, and/or executable.
    pub flags: u32,
}

impl LoadSegment {
    #[cfg(test)]
    pub fn new(offset: u64, file_size: u64, vaddr: u64) -> Self {
        LoadSegment {
            obytes: Bytes::new(ElfOffset(offset), file_size),
            vbytes: Bytes::new(VirtualAddr(vaddr), file_size),
            flags: READ_FLAG,
        }
    }

    pub fn file_offset(&self) -> ElfOffset {
        self.obytes.start
    }

    pub fn file_size(&self) -> u64 {
        self.obytes.size
    }

    pub fn vaddr(&self) -> VirtualAddr {
        self.vbytes.start
    }

    pub fn flags(&self) -> String {
        ProgramHeader::flags(self.flags)
    }
}

impl From<&ProgramHeader> for LoadSegment {
    fn from(ph: &ProgramHeader) -> Self {
        LoadSegment {
            obytes: Bytes::new(ElfOffset(ph.offset), ph.file_size),
            vbytes: Bytes::new(VirtualAddr(ph.vaddr), ph.mem_size),
            flags: ph.flags,
        }
    }
}

impl ProgramHeader {
    pub fn new(reader: &Reader, offset: usize) -> Result<Self, ScanError> {
        // Field sizes and order differ between 32-bit and 64-bit ELF files,
        // see https://llvm.org/doxygen/BinaryFormat_2ELF_8h_source.html.
        let mut s = Stream::new(reader, offset);
        if reader.sixty_four_bit {
            let p_type = SegmentType::from_u32(s.read_word()?);
            let p_flags = s.read_word()?;
            let p_offset = s.read_offset()?;
            let p_vaddr = s.read_addr()?;
            let _p_paddr = s.read_addr()?;
            let p_filesz = s.read_xword()?;
            let p_memsz = s.read_xword()?;
            let _p_align = s.read_xword()?;
            Ok(ProgramHeader {
                stype: p_type,
                flags: p_flags,
                offset: p_offset,
                vaddr: p_vaddr,
                file_size: p_filesz,
                mem_size: p_memsz,
            })
        } else {
            let p_type = SegmentType::from_u32(s.read_word()?);
            let p_offset = s.read_offset()?;
            let p_vaddr = s.read_addr()?;
            let _p_paddr = s.read_addr()?;
            let p_filesz = s.read_size()?;
            let p_memsz = s.read_size()?;
            let p_flags = s.read_word()?;
            let _p_align = s.read_size()?;
            Ok(ProgramHeader {
                stype: p_type,
                flags: p_flags,
                offset: p_offset,
                vaddr: p_vaddr,
                file_size: p_filesz,
                mem_size: p_memsz,
            })
        }
    }

    /// Size of Elf64_Phdr or Elf32_Phdr.
    pub fn entry_size(reader: &Reader) -> usize {
        if reader.sixty_four_bit { 56 } else { 32 }
    }

    pub fn flags(flags: u32) -> String {
        let mut result = String::new();
        if flags & READ_FLAG != 0 {
            result.push('r');
        } else {
            result.push('-');
        }
        if flags & WRITE_FLAG != 0 {
            result.push('w');
        } else {
            result.push('-');
        }
        if flags & EXECUTE_FLAG != 0 {
            result.push('x');
        } else {
            result.push('-');
        }
        result
    }
}
