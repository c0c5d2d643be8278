//! Maps file offsets to the virtual addresses they'll have once the loader has mapped
//! the file. Fixed-address executables can be resolved statically, PIE executables
//! need a base address from the running process.
use crate::elf::{ElfLayout, ElfOffset, LoadSegment, ObjectType, VirtualAddr};

/// e_flags bit used as a PIE marker.
pub const EF_PIE: u32 = 0x00040000;

impl ElfLayout {
    /// Best effort: true for shared objects with the EF_PIE flag set. Plenty of PIE
    /// executables don't set the flag so this can report false negatives.
    pub fn is_pie(&self) -> bool {
        self.otype == ObjectType::SharedObject && self.flags & EF_PIE != 0
    }

    /// The vaddr of the first load segment, zero if there are none. This is only
    /// meaningful when is_pie is false.
    pub fn base_address(&self) -> VirtualAddr {
        self.loads
            .first()
            .map(|s| s.vaddr())
            .unwrap_or(VirtualAddr(0))
    }

    /// Returns the first load segment (in table order) whose file bytes include offset.
    pub fn find_load(&self, offset: ElfOffset) -> Option<&LoadSegment> {
        self.loads.iter().find(|s| s.obytes.contains(offset))
    }

    /// Returns base plus the distance of offset from the start of the load segment that
    /// contains it. None if offset isn't within any load segment's file bytes.
    pub fn translate(&self, offset: ElfOffset, base: VirtualAddr) -> Option<VirtualAddr> {
        self.find_load(offset)
            .map(|s| base.offset_by(offset - s.file_offset()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(otype: ObjectType, flags: u32, loads: &[(u64, u64, u64)]) -> ElfLayout {
        let loads = loads
            .iter()
            .map(|&(offset, size, vaddr)| LoadSegment::new(offset, size, vaddr))
            .collect();
        ElfLayout::new(otype, flags, loads)
    }

    #[test]
    fn translates_within_segment() {
        let layout = layout(ObjectType::Executable, 0, &[(0, 0x1000, 0x400000)]);
        let base = layout.base_address();
        assert_eq!(base, VirtualAddr(0x400000));
        assert_eq!(
            layout.translate(ElfOffset(0x10), base),
            Some(VirtualAddr(0x400010))
        );
        assert_eq!(layout.translate(ElfOffset(0), base), Some(base));
        assert_eq!(
            layout.translate(ElfOffset(0xfff), base),
            Some(VirtualAddr(0x400fff))
        );
    }

    #[test]
    fn segment_end_is_excluded() {
        let layout = layout(ObjectType::Executable, 0, &[(0, 0x1000, 0x400000)]);
        assert_eq!(layout.translate(ElfOffset(0x1000), VirtualAddr(0x400000)), None);
    }

    #[test]
    fn outside_all_segments() {
        let layout = layout(
            ObjectType::Executable,
            0,
            &[(0x1000, 0x100, 0x401000), (0x3000, 0x100, 0x403000)],
        );
        let base = layout.base_address();
        assert_eq!(layout.translate(ElfOffset(0x10), base), None);
        assert_eq!(layout.translate(ElfOffset(0x2000), base), None);
        assert_eq!(layout.translate(ElfOffset(u64::MAX), base), None);
    }

    #[test]
    fn pie_detection() {
        let pie = layout(ObjectType::SharedObject, EF_PIE, &[]);
        assert!(pie.is_pie());

        let more_flags = layout(ObjectType::SharedObject, EF_PIE | 0x1, &[]);
        assert!(more_flags.is_pie());

        let no_flag = layout(ObjectType::SharedObject, 0, &[]);
        assert!(!no_flag.is_pie());

        let exe = layout(ObjectType::Executable, EF_PIE, &[]);
        assert!(!exe.is_pie());

        let other = layout(ObjectType::Other(1), EF_PIE, &[]);
        assert!(!other.is_pie());
    }

    #[test]
    fn base_of_nothing_is_zero() {
        let layout = layout(ObjectType::Executable, 0, &[]);
        assert_eq!(layout.base_address(), VirtualAddr(0));
        assert_eq!(layout.translate(ElfOffset(0), VirtualAddr(0)), None);
    }

    #[test]
    fn base_is_first_in_table_order() {
        let layout = layout(
            ObjectType::Executable,
            0,
            &[(0x1000, 0x100, 0x601000), (0, 0x100, 0x400000)],
        );
        assert_eq!(layout.base_address(), VirtualAddr(0x601000));
    }

    // Every offset within a segment keeps its distance from the segment start.
    #[test]
    fn displacement_is_preserved() {
        let segments = [(0, 0x40, 0x400000), (0x40, 0x30, 0x600000), (0x100, 0x10, 0x700000)];
        let layout = layout(ObjectType::Executable, 0, &segments);
        let base = VirtualAddr(0x12345000);
        for &(start, size, _) in segments.iter() {
            for o in start..start + size {
                let addr = layout.translate(ElfOffset(o), base).unwrap();
                assert_eq!(addr.0 - base.0, o - start);
            }
        }
    }

    #[test]
    fn overlapping_segments_use_the_first() {
        let layout = layout(
            ObjectType::Executable,
            0,
            &[(0x100, 0x100, 0x400000), (0x80, 0x200, 0x500000)],
        );
        let base = VirtualAddr(0x400000);
        let segment = layout.find_load(ElfOffset(0x180)).unwrap();
        assert_eq!(segment.vaddr(), VirtualAddr(0x400000));
        assert_eq!(
            layout.translate(ElfOffset(0x180), base),
            Some(VirtualAddr(0x400080))
        );

        // only the second contains 0x90
        assert_eq!(
            layout.translate(ElfOffset(0x90), base),
            Some(VirtualAddr(0x400010))
        );
    }

    #[test]
    fn runtime_base_for_pie() {
        let layout = layout(ObjectType::SharedObject, EF_PIE, &[(0, 0x2000, 0)]);
        let runtime = VirtualAddr(0x55aabbcc0000);
        assert_eq!(
            layout.translate(ElfOffset(0x1234), runtime),
            Some(VirtualAddr(0x55aabbcc1234))
        );
    }
}
