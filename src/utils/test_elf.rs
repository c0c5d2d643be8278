//! Builds small ELF images in memory so tests don't need binaries checked in.
//! Program headers immediately follow the ELF header.

struct Phdr {
    ptype: u32,
    offset: u64,
    file_size: u64,
    vaddr: u64,
}

pub struct TestElf {
    sixty_four_bit: bool,
    little_endian: bool,
    otype: u16,
    flags: u32,
    ph_entry_size: Option<u16>,
    phdrs: Vec<Phdr>,
    payloads: Vec<(usize, Vec<u8>)>,
    min_size: usize,
}

impl TestElf {
    /// An x86 (or x86-64) executable with no program headers.
    pub fn new(sixty_four_bit: bool, little_endian: bool) -> Self {
        TestElf {
            sixty_four_bit,
            little_endian,
            otype: 2,
            flags: 0,
            ph_entry_size: None,
            phdrs: Vec::new(),
            payloads: Vec::new(),
            min_size: 0,
        }
    }

    pub fn otype(mut self, otype: u16) -> Self {
        self.otype = otype;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Override e_phentsize (the entries are still written at their natural size).
    pub fn ph_entry_size(mut self, size: u16) -> Self {
        self.ph_entry_size = Some(size);
        self
    }

    /// Add a PT_LOAD program header.
    pub fn load(self, offset: u64, file_size: u64, vaddr: u64) -> Self {
        self.segment(1, offset, file_size, vaddr)
    }

    pub fn segment(mut self, ptype: u32, offset: u64, file_size: u64, vaddr: u64) -> Self {
        self.phdrs.push(Phdr {
            ptype,
            offset,
            file_size,
            vaddr,
        });
        self
    }

    /// Write bytes at an offset, growing the file if needed.
    pub fn place(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.payloads.push((offset, bytes.to_vec()));
        self
    }

    pub fn min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self
    }

    pub fn header_size(&self) -> usize {
        if self.sixty_four_bit { 64 } else { 52 }
    }

    pub fn natural_entry_size(&self) -> usize {
        if self.sixty_four_bit { 56 } else { 32 }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"\x7fELF");
        bytes.push(if self.sixty_four_bit { 2 } else { 1 });
        bytes.push(if self.little_endian { 1 } else { 2 });
        bytes.push(1); // EI_VERSION
        bytes.resize(16, 0);

        let ph_offset = self.header_size() as u64;
        let ph_entry_size = self
            .ph_entry_size
            .unwrap_or(self.natural_entry_size() as u16);
        self.half(&mut bytes, self.otype);
        self.half(&mut bytes, if self.sixty_four_bit { 0x3e } else { 0x03 });
        self.word(&mut bytes, 1);
        self.addr(&mut bytes, 0); // e_entry
        self.addr(&mut bytes, ph_offset);
        self.addr(&mut bytes, 0); // e_shoff
        self.word(&mut bytes, self.flags);
        self.half(&mut bytes, self.header_size() as u16);
        self.half(&mut bytes, ph_entry_size);
        self.half(&mut bytes, self.phdrs.len() as u16);
        self.half(&mut bytes, 0); // e_shentsize
        self.half(&mut bytes, 0); // e_shnum
        self.half(&mut bytes, 0); // e_shstrndx
        assert_eq!(bytes.len(), self.header_size());

        for ph in self.phdrs.iter() {
            if self.sixty_four_bit {
                self.word(&mut bytes, ph.ptype);
                self.word(&mut bytes, 0x5); // r-x
                self.addr(&mut bytes, ph.offset);
                self.addr(&mut bytes, ph.vaddr);
                self.addr(&mut bytes, ph.vaddr);
                self.addr(&mut bytes, ph.file_size);
                self.addr(&mut bytes, ph.file_size);
                self.addr(&mut bytes, 0x1000);
            } else {
                self.word(&mut bytes, ph.ptype);
                self.addr(&mut bytes, ph.offset);
                self.addr(&mut bytes, ph.vaddr);
                self.addr(&mut bytes, ph.vaddr);
                self.addr(&mut bytes, ph.file_size);
                self.addr(&mut bytes, ph.file_size);
                self.word(&mut bytes, 0x5);
                self.addr(&mut bytes, 0x1000);
            }
        }

        let mut size = bytes.len().max(self.min_size);
        for ph in self.phdrs.iter() {
            size = size.max((ph.offset + ph.file_size) as usize);
        }
        for (offset, payload) in self.payloads.iter() {
            size = size.max(offset + payload.len());
        }
        bytes.resize(size, 0);
        for (offset, payload) in self.payloads.iter() {
            bytes[*offset..offset + payload.len()].copy_from_slice(payload);
        }
        bytes
    }

    fn half(&self, bytes: &mut Vec<u8>, value: u16) {
        if self.little_endian {
            bytes.extend_from_slice(&value.to_le_bytes());
        } else {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn word(&self, bytes: &mut Vec<u8>, value: u32) {
        if self.little_endian {
            bytes.extend_from_slice(&value.to_le_bytes());
        } else {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn addr(&self, bytes: &mut Vec<u8>, value: u64) {
        if !self.sixty_four_bit {
            self.word(bytes, value as u32);
        } else if self.little_endian {
            bytes.extend_from_slice(&value.to_le_bytes());
        } else {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
    }
}
