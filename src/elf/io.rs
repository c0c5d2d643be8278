use crate::error::ScanError;
use crate::repl::HexdumpLabels;
use crate::utils::{self, Styling, write_styled};
use memmap2::Mmap;
use std::io::Write;
use std::ops::Deref;

/// Size of e_ident, the part of the header that doesn't depend on the class.
pub const IDENT_SIZE: usize = 16;

/// Raw bytes of an ELF file. Files on disk are mapped but tests (and empty files,
/// which can't be mapped) use an ordinary vector.
pub enum Contents {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Contents {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Contents::Mapped(map) => &map[..],
            Contents::Owned(bytes) => bytes.as_slice(),
        }
    }
}

/// Reads multi-byte values using the byte order and word size declared in e_ident.
pub struct Reader {
    pub little_endian: bool,
    pub sixty_four_bit: bool,
    bytes: Contents,
}

impl Reader {
    pub fn new(bytes: Contents) -> Result<Self, ScanError> {
        // see https://en.wikipedia.org/wiki/Executable_and_Linkable_Format
        utils::require(
            bytes.len() >= IDENT_SIZE,
            &format!("file is only {} bytes", bytes.len()),
        )?;
        utils::require(&bytes[0..4] == b"\x7fELF", "not an ELF file (bad magic)")?;

        let ei_class = bytes[0x04];
        let ei_data = bytes[0x05];
        utils::require(
            ei_class == 1 || ei_class == 2,
            &format!("unsupported ELF class: {ei_class}"),
        )?;
        utils::require(
            ei_data == 1 || ei_data == 2,
            &format!("unsupported byte order: {ei_data}"),
        )?;

        let reader = Reader {
            bytes,
            sixty_four_bit: ei_class == 2,
            little_endian: ei_data == 1,
        };
        utils::require(
            reader.len() >= reader.header_size(),
            &format!(
                "file is only {} bytes but the ELF header needs {}",
                reader.len(),
                reader.header_size()
            ),
        )?;
        Ok(reader)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of Elf32_Ehdr or Elf64_Ehdr.
    pub fn header_size(&self) -> usize {
        if self.sixty_four_bit { 64 } else { 52 }
    }

    pub fn slice(&self, offset: usize, size: usize) -> Result<&[u8], ScanError> {
        offset
            .checked_add(size)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or_else(|| {
                ScanError::MalformedInput(format!(
                    "read of {size} bytes at offset {offset:#x} is past the end of the file"
                ))
            })
    }

    #[cfg(test)]
    pub fn read_byte(&self, offset: usize) -> Result<u8, ScanError> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn read_half(&self, offset: usize) -> Result<u16, ScanError> {
        let bytes = self.array::<2>(offset)?;
        if self.little_endian {
            Ok(u16::from_le_bytes(bytes))
        } else {
            Ok(u16::from_be_bytes(bytes))
        }
    }

    pub fn read_word(&self, offset: usize) -> Result<u32, ScanError> {
        let bytes = self.array::<4>(offset)?;
        if self.little_endian {
            Ok(u32::from_le_bytes(bytes))
        } else {
            Ok(u32::from_be_bytes(bytes))
        }
    }

    pub fn read_xword(&self, offset: usize) -> Result<u64, ScanError> {
        let bytes = self.array::<8>(offset)?;
        if self.little_endian {
            Ok(u64::from_le_bytes(bytes))
        } else {
            Ok(u64::from_be_bytes(bytes))
        }
    }

    /// Read either a u32 or u64 word depending on whether the file is 64-bit.
    /// But, for sanity, always return the result as 64 bits.
    pub fn read_addr(&self, offset: usize) -> Result<u64, ScanError> {
        if self.sixty_four_bit {
            self.read_xword(offset)
        } else {
            Ok(self.read_word(offset)? as u64)
        }
    }

    pub fn hex_dump(
        &self,
        mut out: impl Write,
        addr: Option<u64>,
        offset: usize,
        size: usize,
        labels: HexdumpLabels,
    ) {
        let end = offset.saturating_add(size).min(self.len());
        let mut i = offset;
        while i < end {
            match labels {
                HexdumpLabels::None => (),
                HexdumpLabels::Offset => {
                    write_styled!(out, "{:08x}: ", hex_offset, i);
                }
                HexdumpLabels::Addr => match addr {
                    Some(addr) => {
                        let addr = addr.wrapping_add((i - offset) as u64);
                        write_styled!(out, "{:012x}: ", hex_offset, addr);
                    }
                    None => {
                        write_styled!(out, "{:>12}: ", hex_offset, "?");
                    }
                },
            }

            let row = &self.bytes[i..end.min(i + 16)];
            for (j, byte) in row.iter().enumerate() {
                if j == 8 {
                    write!(out, " ").unwrap();
                }
                write_styled!(out, "{:02x} ", hex_hex, byte);
            }
            write!(out, "   ").unwrap();
            for byte in row {
                let ch = *byte as char;
                if ch.is_ascii_graphic() {
                    write_styled!(out, "{}", hex_ascii, ch);
                } else {
                    write_styled!(out, ".", hex_ascii);
                }
            }
            writeln!(out).unwrap();
            i += 16;
        }
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ScanError> {
        let mut result = [0; N];
        result.copy_from_slice(self.slice(offset, N)?);
        Ok(result)
    }
}

/// Sequential reads starting at an offset.
pub struct Stream<'a> {
    pub reader: &'a Reader,
    pub offset: usize,
}

impl<'a> Stream<'a> {
    pub fn new(reader: &'a Reader, offset: usize) -> Self {
        Stream { reader, offset }
    }

    pub fn read_half(&mut self) -> Result<u16, ScanError> {
        let half = self.reader.read_half(self.offset)?;
        self.offset += 2;
        Ok(half)
    }

    pub fn read_word(&mut self) -> Result<u32, ScanError> {
        let word = self.reader.read_word(self.offset)?;
        self.offset += 4;
        Ok(word)
    }

    pub fn read_xword(&mut self) -> Result<u64, ScanError> {
        let xword = self.reader.read_xword(self.offset)?;
        self.offset += 8;
        Ok(xword)
    }

    pub fn read_addr(&mut self) -> Result<u64, ScanError> {
        let addr = self.reader.read_addr(self.offset)?;
        self.offset += if self.reader.sixty_four_bit { 8 } else { 4 };
        Ok(addr)
    }

    /// Offsets have the same size as addresses.
    pub fn read_offset(&mut self) -> Result<u64, ScanError> {
        self.read_addr()
    }

    /// Sizes are words for 32-bit files and xwords for 64-bit files.
    pub fn read_size(&mut self) -> Result<u64, ScanError> {
        self.read_addr()
    }
}
