//! An ELF file on disk along with the parts of its structure needed to map file offsets
//! to virtual addresses.
use super::{Contents, ElfHeader, LoadSegment, ObjectType, ProgramHeader, Reader, SegmentType};
use crate::error::ScanError;
use crate::utils;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Immutable snapshot of the structure that matters for translating offsets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElfLayout {
    pub otype: ObjectType,

    /// e_flags
    pub flags: u32,

    /// PT_LOAD entries in program header table order.
    pub loads: Vec<LoadSegment>,
}

impl ElfLayout {
    #[cfg(test)]
    pub fn new(otype: ObjectType, flags: u32, loads: Vec<LoadSegment>) -> Self {
        ElfLayout {
            otype,
            flags,
            loads,
        }
    }

    pub fn parse(reader: &Reader, header: &ElfHeader) -> Result<Self, ScanError> {
        let count = header.num_ph_entries as u64;
        let entry_size = header.ph_entry_size as u64;
        if count > 0 {
            utils::require(
                entry_size >= ProgramHeader::entry_size(reader) as u64,
                &format!("program header entries are only {entry_size} bytes"),
            )?;
            let table_end = count
                .checked_mul(entry_size)
                .and_then(|size| size.checked_add(header.ph_offset));
            utils::require(
                table_end.is_some_and(|end| end <= reader.len() as u64),
                &format!(
                    "program header table at {:#x} with {count} entries is past the end of the file",
                    header.ph_offset
                ),
            )?;
        }

        // The table is in bounds so these casts can't truncate.
        let mut loads = Vec::new();
        let mut offset = header.ph_offset as usize;
        for _ in 0..count {
            let ph = ProgramHeader::new(reader, offset)?;
            if ph.stype == SegmentType::Load {
                loads.push(LoadSegment::from(&ph));
            }
            offset += entry_size as usize;
        }

        Ok(ElfLayout {
            otype: header.otype,
            flags: header.flags,
            loads,
        })
    }
}

pub struct ElfFile {
    pub path: PathBuf,
    pub header: ElfHeader,
    pub reader: Reader,
    pub layout: ElfLayout,
}

impl ElfFile {
    /// Opens and parses path. If max_size is set larger files are rejected before
    /// they're mapped.
    pub fn open(path: &Path, max_size: Option<u64>) -> Result<Self, ScanError> {
        let not_found = |source| ScanError::NotFound {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(not_found)?;
        let size = file.metadata().map_err(not_found)?.len();
        if let Some(max) = max_size {
            if size > max {
                return Err(ScanError::InputTooLarge {
                    path: path.to_path_buf(),
                    size,
                    max,
                });
            }
        }

        let contents = if size == 0 {
            // mmap refuses zero length mappings
            Contents::Owned(Vec::new())
        } else {
            // This is unsafe because it has undefined behavior if the underlying file is
            // modified while the memory map is in use.
            Contents::Mapped(unsafe { Mmap::map(&file) }.map_err(not_found)?)
        };
        ElfFile::from_contents(path, contents)
    }

    pub fn from_contents(path: &Path, contents: Contents) -> Result<Self, ScanError> {
        let reader = Reader::new(contents)?;
        let header = ElfHeader::new(&reader)?;
        let layout = ElfLayout::parse(&reader, &header)?;
        Ok(ElfFile {
            path: path.to_path_buf(),
            header,
            reader,
            layout,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.reader.bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_elf::TestElf;

    fn parse(bytes: Vec<u8>) -> Result<ElfFile, ScanError> {
        ElfFile::from_contents(Path::new("test"), Contents::Owned(bytes))
    }

    #[test]
    fn loads_in_table_order() {
        let bytes = TestElf::new(true, true)
            .segment(6, 0x40, 0x70, 0x400040) // PHDR
            .load(0x1000, 0x200, 0x401000)
            .segment(0x6474e551, 0, 0, 0) // GNU_STACK
            .load(0, 0x1000, 0x400000)
            .build();
        let file = parse(bytes).unwrap();
        let loads = &file.layout.loads;
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[0].file_offset().0, 0x1000);
        assert_eq!(loads[0].file_size(), 0x200);
        assert_eq!(loads[0].vaddr().0, 0x401000);
        assert_eq!(loads[1].file_offset().0, 0);
        assert_eq!(loads[1].vaddr().0, 0x400000);
        assert_eq!(file.layout.otype, ObjectType::Executable);
    }

    #[test]
    fn big_endian_32_bit() {
        let bytes = TestElf::new(false, false)
            .otype(3)
            .flags(0x00040000)
            .load(0, 0x800, 0x10000)
            .build();
        let file = parse(bytes).unwrap();
        assert_eq!(file.layout.otype, ObjectType::SharedObject);
        assert_eq!(file.layout.flags, 0x00040000);
        assert_eq!(
            file.layout.loads,
            vec![LoadSegment {
                flags: 0x5,
                ..LoadSegment::new(0, 0x800, 0x10000)
            }]
        );
    }

    #[test]
    fn no_program_headers() {
        let file = parse(TestElf::new(true, true).build()).unwrap();
        assert!(file.layout.loads.is_empty());
    }

    #[test]
    fn truncated_header() {
        let bytes = TestElf::new(true, true).build();
        let result = parse(bytes[..40].to_vec());
        assert!(matches!(result, Err(ScanError::MalformedInput(_))));
    }

    #[test]
    fn truncated_program_headers() {
        let elf = TestElf::new(true, true).load(0, 0, 0x400000).load(0, 0, 0x401000);
        let mut bytes = elf.build();
        bytes.truncate(elf.header_size() + elf.natural_entry_size() + 8);
        let result = parse(bytes);
        assert!(matches!(result, Err(ScanError::MalformedInput(_))));
    }

    #[test]
    fn short_program_header_entries() {
        let bytes = TestElf::new(true, true)
            .ph_entry_size(16)
            .load(0, 0x100, 0x400000)
            .build();
        let result = parse(bytes);
        assert!(matches!(result, Err(ScanError::MalformedInput(_))));
    }

    #[test]
    fn missing_file() {
        let result = ElfFile::open(Path::new("/no/such/dir/a.out"), None);
        assert!(matches!(result, Err(ScanError::NotFound { .. })));
    }

    // The test binary is itself an ELF file.
    #[test]
    fn own_exe() {
        let path = std::env::current_exe().unwrap();
        let file = ElfFile::open(&path, None).unwrap();
        assert!(!file.layout.loads.is_empty());

        let result = ElfFile::open(&path, Some(1));
        assert!(matches!(result, Err(ScanError::InputTooLarge { max: 1, .. })));
    }
}
