use std::fmt;
use std::ops::Sub;

/// An index into a byte within an ELF file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ElfOffset(pub u64);

/// The address of a byte in the running process. These are normally associated with
/// one of the load segments in the ELF file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct VirtualAddr(pub u64);

/// Offsets and addresses are both plain u64s underneath.
pub trait Raw: Copy + Ord {
    fn raw(self) -> u64;
}

impl Raw for ElfOffset {
    fn raw(self) -> u64 {
        self.0
    }
}

impl Raw for VirtualAddr {
    fn raw(self) -> u64 {
        self.0
    }
}

/// A range of bytes that can be addressed using either offsets into an ELF file or
/// virtual addresses. In general bytes can always be addressed using offsets and bytes
/// within load segments can also be addressed using virtual addresses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bytes<A: Raw> {
    pub start: A,
    pub size: u64,
}

impl<A: Raw> Bytes<A> {
    pub fn new(start: A, size: u64) -> Self {
        Bytes { start, size }
    }

    /// Half open so the byte at end() isn't included.
    pub fn contains(&self, addr: A) -> bool {
        // Sizes come straight from the file so they may be garbage: avoid computing
        // end() here because it could saturate.
        addr >= self.start && addr.raw() - self.start.raw() < self.size
    }

    #[cfg(test)]
    pub fn end(&self) -> u64 {
        self.start.raw().saturating_add(self.size)
    }
}

/// Distance from rhs to self. Callers are expected to ensure that self >= rhs.
impl Sub<ElfOffset> for ElfOffset {
    type Output = u64;

    fn sub(self, rhs: ElfOffset) -> Self::Output {
        self.0 - rhs.0
    }
}

impl VirtualAddr {
    /// Addresses wrap like they do on the CPU.
    pub fn offset_by(self, delta: u64) -> VirtualAddr {
        VirtualAddr(self.0.wrapping_add(delta))
    }
}

impl fmt::Display for ElfOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl fmt::Display for VirtualAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
