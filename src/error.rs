//! Errors that end an invocation. Offsets that can't be translated are not errors,
//! see `scan::Resolution`.
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ScanError {
    /// The path doesn't exist or couldn't be opened (or mapped).
    NotFound { path: PathBuf, source: io::Error },

    /// The ELF header or program header table is truncated or inconsistent. This
    /// includes unsupported classes and byte orders.
    MalformedInput(String),

    /// The file is larger than the --max-size safeguard.
    InputTooLarge { path: PathBuf, size: u64, max: u64 },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanError::NotFound { path, source } => {
                write!(f, "couldn't open {}: {source}", path.display())
            }
            ScanError::MalformedInput(mesg) => write!(f, "malformed ELF file: {mesg}"),
            ScanError::InputTooLarge { path, size, max } => write!(
                f,
                "{} is {size} bytes which is over the {max} byte limit (see --max-size)",
                path.display()
            ),
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScanError::NotFound { source, .. } => Some(source),
            _ => None,
        }
    }
}
