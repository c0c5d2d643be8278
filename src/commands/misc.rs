use crate::elf::{ElfFile, ElfOffset, VirtualAddr};
use crate::repl::{HexdumpArgs, TranslateArgs};
use crate::utils::Styling;
use std::io::Write;

/// The base used to translate offsets: the one the user gave us, otherwise the fixed
/// base for non-PIE files.
fn find_base(file: &ElfFile, base: Option<u64>) -> Option<VirtualAddr> {
    match base {
        Some(base) => Some(VirtualAddr(base)),
        None if file.layout.is_pie() => None,
        None => Some(file.layout.base_address()),
    }
}

pub fn translate(mut out: impl Write, file: &ElfFile, args: &TranslateArgs) {
    let offset = ElfOffset(args.offset);
    let Some(base) = find_base(file, args.base) else {
        writeln!(
            out,
            "{}",
            "PIE files need a runtime base, e.g. `translate 0x1234 --base 0x555555554000`"
                .unresolved()
        )
        .unwrap();
        return;
    };

    match file.layout.find_load(offset) {
        Some(load) => {
            // find_load and translate agree so this is always Some
            if let Some(addr) = file.layout.translate(offset, base) {
                writeln!(
                    out,
                    "{addr} (base {base} + {:#x} into the load segment at offset {:#x})",
                    offset - load.file_offset(),
                    load.file_offset().0
                )
                .unwrap();
            }
        }
        None => writeln!(
            out,
            "{}",
            format!("not applicable: {offset} isn't in a load segment").unresolved()
        )
        .unwrap(),
    }
}

pub fn hexdump(out: impl Write, file: &ElfFile, args: &HexdumpArgs) {
    let offset = args.offset as usize;
    if args.offset >= file.reader.len() as u64 {
        crate::utils::warn(&format!(
            "offset {:#x} is past the end of the file ({:#x} bytes)",
            args.offset,
            file.reader.len()
        ));
        return;
    }

    let addr = find_base(file, None)
        .and_then(|base| file.layout.translate(ElfOffset(args.offset), base))
        .map(|addr| addr.0);
    file.reader
        .hex_dump(out, addr, offset, args.count, args.labels);
}
