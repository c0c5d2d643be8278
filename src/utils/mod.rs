pub mod styles;
#[cfg(test)]
pub mod test_elf;

pub use styles::*;

use crate::error::ScanError;

pub fn require(predicate: bool, err: &str) -> Result<(), ScanError> {
    if predicate {
        Ok(())
    } else {
        Err(ScanError::MalformedInput(err.to_string()))
    }
}

pub fn warn(mesg: &str) {
    eprintln!("{}", mesg.warn());
}

/// Render bytes so that they can be shown on one line: printable ASCII is left
/// alone, NUL becomes \0 and everything else is hex escaped.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            0 => result.push_str("\\0"),
            b'\n' => result.push_str("\\n"),
            b'\t' => result.push_str("\\t"),
            b'\\' => result.push_str("\\\\"),
            b' '..=b'~' => result.push(byte as char),
            _ => result.push_str(&format!("\\x{byte:02x}")),
        }
    }
    result
}

/// The inverse of escape_bytes. Used for targets typed on the command line.
pub fn unescape_bytes(s: &str) -> Result<Vec<u8>, String> {
    let mut result = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0; 4];
            result.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('0') => result.push(0),
            Some('n') => result.push(b'\n'),
            Some('t') => result.push(b'\t'),
            Some('\\') => result.push(b'\\'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 2)
                    .ok_or_else(|| format!("bad \\x escape in `{s}`"))?;
                result.push(byte);
            }
            Some(other) => return Err(format!("unknown escape \\{other} in `{s}`")),
            None => return Err(format!("trailing backslash in `{s}`")),
        }
    }
    Ok(result)
}

/// writeln! for output that has nowhere to go if it fails, e.g. stdout.
macro_rules! uwriteln {
    ($out:expr) => {
        writeln!($out).unwrap()
    };
    ($out:expr, $($arg:tt)*) => {
        writeln!($out, $($arg)*).unwrap()
    };
}
pub(crate) use uwriteln;

/// Remove escape sequences from the string (e.g. for colors).
#[cfg(test)]
pub fn strip_escapes(s: &str) -> String {
    // Even with Style::empty() the tabled crate will add escape sequences to the end
    // of lines so it's simpler to strip them all here.
    let mut result = String::with_capacity(s.len());
    let mut escaping = false;

    // See https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797
    for c in s.chars() {
        if c == '\x1b' {
            escaping = true;
        } else if escaping {
            if c == 'm' {
                escaping = false;
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_nul() {
        assert_eq!(escape_bytes(b"/bin/sh\0"), "/bin/sh\\0");
        assert_eq!(escape_bytes(b"a\x01"), "a\\x01");
    }

    #[test]
    fn unescapes() {
        assert_eq!(unescape_bytes("sh\\0").unwrap(), b"sh\0");
        assert_eq!(unescape_bytes("\\x7fELF").unwrap(), b"\x7fELF");
        assert_eq!(unescape_bytes("a\\\\b").unwrap(), b"a\\b");
        assert!(unescape_bytes("bad\\q").is_err());
        assert!(unescape_bytes("bad\\x4").is_err());
        assert!(unescape_bytes("bad\\").is_err());
    }

    #[test]
    fn strips() {
        assert_eq!(strip_escapes("\x1b[1;34mhello\x1b[0m"), "hello");
    }

    #[test]
    fn require_is_malformed() {
        assert!(require(true, "ok").is_ok());
        match require(false, "too small") {
            Err(ScanError::MalformedInput(mesg)) => assert_eq!(mesg, "too small"),
            _ => panic!("expected MalformedInput"),
        }
    }
}
