//! The byte sequences to search for.
use crate::utils;
use std::fmt;

/// Shell paths and shell invocation fragments. Each includes the terminating NUL so
/// that only complete C strings match.
pub const DEFAULT_TARGETS: [&[u8]; 13] = [
    b"/bin/sh\0",
    b"sh\0",
    b"$0\0",
    b"/bin/bash\0",
    b"bash\0",
    b"$SHELL\0",
    b"/usr/bin/sh\0",
    b"/bin/dash\0",
    b"dash\0",
    b"/usr/bin/bash\0",
    b"$BASH\0",
    b"exec sh\0",
    b"sh -c sh\0",
];

/// A non-empty byte sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target(Vec<u8>);

impl Target {
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Target(bytes.to_vec()))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Shows NUL as \0 (and other unprintable bytes as escapes).
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&utils::escape_bytes(&self.0))
    }
}

/// Ordered list of targets, matches are reported in this order.
#[derive(Clone, Debug)]
pub struct TargetCatalogue {
    targets: Vec<Target>,
}

impl TargetCatalogue {
    pub fn empty() -> Self {
        TargetCatalogue {
            targets: Vec::new(),
        }
    }

    pub fn defaults() -> Self {
        let mut catalogue = TargetCatalogue::empty();
        for bytes in DEFAULT_TARGETS {
            catalogue.push(bytes);
        }
        catalogue
    }

    /// The defaults (unless no_defaults) followed by escaped strings from the command
    /// line. Bad or empty strings are skipped with a warning.
    pub fn from_args(no_defaults: bool, extra: &[String]) -> Self {
        let mut catalogue = if no_defaults {
            TargetCatalogue::empty()
        } else {
            TargetCatalogue::defaults()
        };
        for s in extra {
            match utils::unescape_bytes(s) {
                Ok(bytes) => {
                    if !catalogue.push(&bytes) {
                        utils::warn("ignoring empty target");
                    }
                }
                Err(err) => utils::warn(&format!("ignoring target: {err}")),
            }
        }
        catalogue
    }

    /// Returns false (and does nothing) if bytes is empty.
    pub fn push(&mut self, bytes: &[u8]) -> bool {
        match Target::new(bytes) {
            Some(target) => {
                self.targets.push(target);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
