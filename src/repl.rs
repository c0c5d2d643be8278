//! Definitions for the commands that are used interactively, e.g.
//! `translate 0x200` and `loads`.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;

#[derive(Parser)]
#[command(infer_subcommands(true))] // allow abreviations
pub struct Repl {
    #[command(subcommand)]
    pub command: MainCommand,
}

#[derive(Subcommand)]
pub enum MainCommand {
    /// Show the ELF header fields that matter for address translation
    Header(ExplainArgs),

    /// Print raw file bytes as hex and ascii
    Hexdump(HexdumpArgs),

    /// Show ELF load segments
    Loads(TableArgs),

    /// Show the targets that were found
    Matches(TableArgs),

    /// Convert a file offset into a virtual address
    Translate(TranslateArgs),

    /// Exit elfscan
    Quit,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Explain columns, fields, etc.
    #[arg(short, long)]
    pub explain: bool,
}

#[derive(Args)]
pub struct TableArgs {
    /// Explain columns, fields, etc.
    #[arg(short, long)]
    pub explain: bool,

    /// Add column headers
    #[arg(short, long)]
    pub titles: bool,
}

#[derive(Args)]
pub struct TranslateArgs {
    /// Base address, required for PIE files (use `info proc map` in gdb to find it)
    #[arg(short, long, value_parser = parse_u64_expr)]
    pub base: Option<u64>,

    /// An offset into the ELF file
    #[arg(value_parser = parse_u64_expr)]
    pub offset: u64,
}

#[derive(Args)]
pub struct HexdumpArgs {
    /// Number of bytes to dump
    #[arg(short, long)]
    #[arg(default_value_t = 16)]
    pub count: usize,

    /// How to display the start of each row
    #[arg(short, long, name = "TYPE")]
    #[arg(default_value_t = HexdumpLabels::Offset)]
    pub labels: HexdumpLabels,

    /// An offset into the ELF file
    #[arg(value_parser = parse_u64_expr)]
    pub offset: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum HexdumpLabels {
    /// Show nothing at the start of lines
    None,

    /// Show the file offset for the first byte on each line
    Offset,

    /// Show the virtual address for the first byte on each line
    Addr,
}

impl fmt::Display for HexdumpLabels {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HexdumpLabels::None => fmt.write_str("none")?,
            HexdumpLabels::Offset => fmt.write_str("offset")?,
            HexdumpLabels::Addr => fmt.write_str("addr")?,
        }
        Ok(())
    }
}

pub fn parse_u64_expr(s: &str) -> Result<u64, String> {
    if let Some(t) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(t, 16).map_err(|_| format!("`{s}` isn't a hex or decimal number"))
    } else {
        s.parse()
            .map_err(|_| format!("`{s}` isn't a hex or decimal number"))
    }
}
