mod address;
mod commands;
mod elf;
mod error;
mod repl;
mod scan;
mod utils;
use clap::Parser;
use clap_repl::ClapEditor;
use clap_repl::reedline::{
    DefaultPrompt, FileBackedHistory, Highlighter, Prompt, PromptEditMode, PromptHistorySearch,
    StyledText,
};
use elf::ElfFile;
use nu_ansi_term::{Color, Style};
use repl::Repl;
use scan::{ScanReport, TargetCatalogue};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use crate::utils::warn;

const MIB: u64 = 1024 * 1024;

/// Find shell strings in an ELF file and the addresses they'll be loaded at
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// path to the ELF file
    path: PathBuf,

    /// Additional string to search for, e.g. "/bin/zsh\0" (may be repeated)
    #[arg(long)]
    target: Vec<String>,

    /// Only search for --target strings
    #[arg(long)]
    no_defaults: bool,

    /// Refuse files larger than this many MiB, 0 for no limit
    #[arg(long, default_value_t = 512)]
    max_size: u64,

    /// Explain columns, fields, etc.
    #[arg(short, long)]
    explain: bool,

    /// Start an interactive session after the report
    #[arg(short, long)]
    interactive: bool,
}

/// Highlights what the user types.
pub struct CommandHighlighter {
    color: Color,
}

impl Highlighter for CommandHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();

        styled_text.push((Style::new().fg(self.color), line.to_string()));

        styled_text
    }
}

impl CommandHighlighter {
    pub fn new() -> CommandHighlighter {
        CommandHighlighter { color: Color::Blue }
    }
}

pub struct ScanPrompt {
    color: clap_repl::reedline::Color,
    default: DefaultPrompt,
}

impl Prompt for ScanPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed("elfscan")
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        self.default.render_prompt_multiline_indicator()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        self.default
            .render_prompt_history_search_indicator(history_search)
    }

    // the text that appears in the prompt
    fn get_prompt_color(&self) -> clap_repl::reedline::Color {
        self.color
    }
}

impl ScanPrompt {
    fn new() -> ScanPrompt {
        ScanPrompt {
            color: clap_repl::reedline::Color::DarkBlue,
            default: DefaultPrompt::default(),
        }
    }
}

fn load_file(path: &Path, max_size: Option<u64>) -> ElfFile {
    match ElfFile::open(path, max_size) {
        Ok(file) => file,
        Err(e) => {
            warn(&format!("Couldn't load {}: {e}", path.display()));
            process::exit(1);
        }
    }
}

fn history_path() -> PathBuf {
    match dirs::home_dir() {
        Some(mut path) => {
            path.push(".elfscan");
            path.push("history");
            path
        }
        None => PathBuf::from("/tmp/elfscan-history"),
    }
}

fn interact(file: &ElfFile, report: &ScanReport) {
    let rl = ClapEditor::<Repl>::builder()
        .with_prompt(Box::new(ScanPrompt::new()))
        .with_editor_hook(|reed| {
            let reed = reed.with_highlighter(Box::new(CommandHighlighter::new()));
            match FileBackedHistory::with_file(10000, history_path()) {
                Ok(history) => reed.with_history(Box::new(history)),
                Err(err) => {
                    warn(&format!("couldn't open history file: {err}"));
                    reed
                }
            }
        })
        .build();

    use repl::MainCommand::*;
    rl.repl(|repl: Repl| match repl.command {
        Header(args) => commands::header(io::stdout(), file, args.explain),
        Hexdump(args) => commands::hexdump(io::stdout(), file, &args),
        Loads(args) => commands::loads(io::stdout(), file, args.titles, args.explain),
        Matches(args) => commands::matches(io::stdout(), report, args.titles, args.explain),
        Translate(args) => commands::translate(io::stdout(), file, &args),
        Quit => process::exit(0),
    });
}

fn main() {
    let cli = Cli::parse();
    let max_size = match cli.max_size {
        0 => None,
        n => Some(n.saturating_mul(MIB)),
    };
    let file = load_file(&cli.path, max_size);

    let targets = TargetCatalogue::from_args(cli.no_defaults, &cli.target);
    if targets.is_empty() {
        warn("there are no targets to search for");
    }
    let report = scan::scan(file.bytes(), &file.layout, &targets);
    commands::report(io::stdout(), &file.path, &report, cli.explain);

    if cli.interactive {
        interact(&file, &report);
    }
}
