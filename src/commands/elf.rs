use super::tables::{SimpleTableBuilder, TableBuilder, add_simple, field};
use crate::elf::ElfFile;
use crate::scan::ScanReport;
use crate::utils::Styling;
use std::io::Write;

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn header(out: impl Write, file: &ElfFile, explain: bool) {
    let mut b = SimpleTableBuilder::new();
    let layout = &file.layout;

    add_simple!(b, "path", file.path.display(), "the file being inspected");
    add_simple!(b, "type", layout.otype, "type of ELF file");
    if file.reader.sixty_four_bit {
        add_simple!(b, "64-bit", "yes", "addresses and offsets are eight bytes");
    } else {
        add_simple!(b, "64-bit", "no", "addresses and offsets are four bytes");
    }
    if file.reader.little_endian {
        add_simple!(
            b,
            "little endian",
            "yes",
            "words are laid out in memory with the most significant byte last"
        );
    } else {
        add_simple!(
            b,
            "little endian",
            "no",
            "words are laid out in memory with the most significant byte first"
        );
    }
    add_simple!(b, "machine", file.header.machine(), "CPU architecture");
    add_simple!(b, "flags", "0x{:08x}", layout.flags, "e_flags from the ELF header");
    add_simple!(
        b,
        "loads",
        layout.loads.len(),
        "number of load segments in the program header table"
    );
    add_simple!(
        b,
        "pie",
        yes_no(layout.is_pie()),
        "shared object with the EF_PIE flag: loaded at a randomized base (best effort)"
    );
    if layout.is_pie() {
        add_simple!(
            b,
            "base",
            "randomized",
            "get the base from the running process"
        );
    } else {
        add_simple!(
            b,
            "base",
            layout.base_address(),
            "vaddr of the first load segment"
        );
    }
    b.writeln(out, explain);
}

pub fn loads(mut out: impl Write, file: &ElfFile, titles: bool, explain: bool) {
    if file.layout.loads.is_empty() {
        writeln!(out, "No load segments.").unwrap();
        return;
    }

    let mut builder = TableBuilder::new();
    builder.add_col_r("offset", "the offset into the ELF file at which the segment starts");
    builder.add_col_r("file size", "the number of bytes in the file");
    builder.add_col_r("vaddr", "the virtual address the segment is mapped to");
    builder.add_col_r(
        "mem size",
        "the number of bytes in memory, extra bytes are zero filled",
    );
    builder.add_col_l("flags", "read, write, and execute");

    for load in file.layout.loads.iter() {
        builder.add_row(vec![
            field(format!("{:x}", load.file_offset().0)),
            field(format!("{:x}", load.file_size())),
            field(format!("{:x}", load.vaddr().0)),
            field(format!("{:x}", load.vbytes.size)),
            field(load.flags()),
        ]);
    }
    builder.writeln(out, titles, explain);
}

pub fn matches(out: impl Write, report: &ScanReport, titles: bool, explain: bool) {
    let mut builder = TableBuilder::new();
    builder.add_col_l("string", "the target that was found, NUL is shown as \\0");
    builder.add_col_r(
        "offset (hex)",
        "the offset into the ELF file at which the target starts",
    );
    builder.add_col_r("offset (dec)", "the same offset in decimal");
    builder.add_col_l(
        "vaddr",
        "where the target is in memory: not applicable if it isn't in a load segment",
    );

    for m in report.matches.iter() {
        let vaddr = if m.virtual_address().is_some() {
            field(m.resolution)
        } else {
            m.resolution.to_string().unresolved().to_string()
        };
        builder.add_row(vec![
            field(&m.target),
            field(m.file_offset),
            field(m.file_offset.0),
            vaddr,
        ]);
    }
    builder.writeln(out, titles, explain);
}
