//! Used to color and otherwise style various bits of output. Users can override the
//! styles with a ~/.elfscan/styles.tcss file, nothing is written there.
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use termio::prelude::*;
use termio::{StyledString, Termio};

macro_rules! write_styled {
    ($out:expr, $format:expr, $style:ident) => {
        let s = format!($format).$style();
        write!($out, "{s}").unwrap();
    };
    ($out:expr, $format:expr, $style:ident, $arg1:expr) => {
        let s = format!($format, $arg1).$style();
        write!($out, "{s}").unwrap();
    };
}
pub(crate) use write_styled;

pub trait Styling {
    fn explain_title(self) -> StyledString;
    fn explain_text(self) -> StyledString;
    fn hex_offset(self) -> StyledString;
    fn hex_hex(self) -> StyledString;
    fn hex_ascii(self) -> StyledString;
    fn report_title(self) -> StyledString;
    fn table_header(self) -> StyledString;
    fn table_sep(self) -> StyledString;
    fn table_field(self) -> StyledString;
    fn unresolved(self) -> StyledString;
    fn warn(self) -> StyledString;
}

impl<T: AsRef<str>> Styling for T {
    fn explain_title(self) -> StyledString {
        self.as_ref().style("explain title", &TCSS)
    }

    fn explain_text(self) -> StyledString {
        self.as_ref().style("explain text", &TCSS)
    }

    fn hex_offset(self) -> StyledString {
        self.as_ref().style("hex offset", &TCSS)
    }

    fn hex_hex(self) -> StyledString {
        self.as_ref().style("hex hex", &TCSS)
    }

    fn hex_ascii(self) -> StyledString {
        self.as_ref().style("hex ascii", &TCSS)
    }

    fn report_title(self) -> StyledString {
        self.as_ref().style("report title", &TCSS)
    }

    fn table_header(self) -> StyledString {
        self.as_ref().style("table header", &TCSS)
    }

    fn table_sep(self) -> StyledString {
        self.as_ref().style("table separator", &TCSS)
    }

    fn table_field(self) -> StyledString {
        self.as_ref().style("table field", &TCSS)
    }

    fn unresolved(self) -> StyledString {
        self.as_ref().style("unresolved", &TCSS)
    }

    fn warn(self) -> StyledString {
        self.as_ref().style("warn", &TCSS)
    }
}

static TCSS: LazyLock<Termio> = LazyLock::new(|| load_styles(style_path().as_deref()));

fn style_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".elfscan").join("styles.tcss"))
}

/// Plain output unless path names a style file that parses.
fn load_styles(path: Option<&Path>) -> Termio {
    let Some(path) = path.filter(|p| p.is_file()) else {
        return Termio::new();
    };
    let Some(os_path) = path.to_str() else {
        return Termio::new();
    };
    match Termio::from_file(os_path) {
        Ok(tcss) => tcss,
        Err(err) => {
            eprintln!("couldn't parse file at {os_path}: {err}"); // don't use warn() here
            Termio::new()
        }
    }
}
