//! Searches the raw bytes of an ELF file for a catalogue of targets and works out
//! where each match will be in memory.
pub mod targets;

pub use targets::*;

use crate::elf::{ElfLayout, ElfOffset, VirtualAddr};
use std::fmt;

/// Where a match lives in memory.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// The match is in a load segment of a fixed-address file.
    Located(VirtualAddr),

    /// The match isn't in any load segment (e.g. it's in the section header string
    /// table) so it won't be mapped.
    NotApplicable,

    /// The file is PIE so the address depends on where the loader put it.
    RequiresRuntimeBase,
}

impl Resolution {
    pub fn virtual_address(&self) -> Option<VirtualAddr> {
        match self {
            Resolution::Located(addr) => Some(*addr),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolution::Located(addr) => write!(f, "{addr}"),
            Resolution::NotApplicable => f.write_str("not applicable"),
            Resolution::RequiresRuntimeBase => f.write_str("requires runtime base"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchRecord {
    pub target: Target,
    pub file_offset: ElfOffset,
    pub resolution: Resolution,
}

impl MatchRecord {
    pub fn virtual_address(&self) -> Option<VirtualAddr> {
        self.resolution.virtual_address()
    }
}

#[derive(Debug)]
pub struct ScanReport {
    /// Grouped by target in catalogue order, ascending offsets within a group.
    pub matches: Vec<MatchRecord>,
    pub pie: bool,

    /// None for PIE files.
    pub base: Option<VirtualAddr>,
}

/// Exhaustive search of bytes for each target. Overlapping matches are all reported,
/// e.g. "sh\0" is found inside every "/bin/sh\0".
pub fn scan(bytes: &[u8], layout: &ElfLayout, targets: &TargetCatalogue) -> ScanReport {
    let pie = layout.is_pie();
    let base = if pie {
        None
    } else {
        Some(layout.base_address())
    };

    let mut matches = Vec::new();
    for target in targets.iter() {
        for offset in find_all(bytes, target.as_bytes()) {
            let file_offset = ElfOffset(offset as u64);
            let resolution = match base {
                None => Resolution::RequiresRuntimeBase,
                Some(base) => match layout.translate(file_offset, base) {
                    Some(addr) => Resolution::Located(addr),
                    None => Resolution::NotApplicable,
                },
            };
            matches.push(MatchRecord {
                target: target.clone(),
                file_offset,
                resolution,
            });
        }
    }

    ScanReport { matches, pie, base }
}

/// Brute force: compares needle against the window at every offset.
fn find_all<'a>(haystack: &'a [u8], needle: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    // windows panics for a zero size
    let size = needle.len().max(1);
    haystack
        .windows(size)
        .enumerate()
        .filter(move |(_, window)| !needle.is_empty() && *window == needle)
        .map(|(offset, _)| offset)
}
