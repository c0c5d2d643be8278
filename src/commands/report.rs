//! The report printed when elfscan starts.
use super::{matches, yes_no};
use crate::scan::ScanReport;
use crate::utils::{Styling, uwriteln};
use std::io::Write;
use std::path::Path;

const RULE_WIDTH: usize = 60;

pub fn report(mut out: impl Write, path: &Path, report: &ScanReport, explain: bool) {
    let rule = "=".repeat(RULE_WIDTH);
    uwriteln!(out, "{rule}");
    uwriteln!(out, "{}", format!("ELF file: {}", path.display()).report_title());
    uwriteln!(out, "PIE: {}", yes_no(report.pie));
    match report.base {
        Some(base) => uwriteln!(out, "fixed base: {base} (usable as-is)"),
        None => uwriteln!(
            out,
            "note: PIE base addresses are randomized at runtime, get the base from a debugger"
        ),
    }
    uwriteln!(out, "{rule}");
    uwriteln!(out);

    if report.matches.is_empty() {
        uwriteln!(out, "No matches found.");
        return;
    }

    match report.matches.len() {
        1 => uwriteln!(out, "Found 1 match:"),
        n => uwriteln!(out, "Found {n} matches:"),
    }
    matches(&mut out, report, true, explain);

    if report.pie {
        uwriteln!(out);
        uwriteln!(out, "{}", "-".repeat(RULE_WIDTH));
        uwriteln!(out, "PIE addresses: actual address = runtime base + file offset");
        uwriteln!(
            out,
            "  e.g. runtime base 0x55aabbcc and file offset 0x1234 => 0x55aabbcc + 0x1234 = 0x55aace00"
        );
        uwriteln!(
            out,
            "  use `info proc map` in gdb to find the runtime base and `translate <offset> --base <addr>`"
        );
        uwriteln!(out, "  in interactive mode for matches outside the first load segment");
    }
}
