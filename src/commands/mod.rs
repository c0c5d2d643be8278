//! Handlers for the report and for the commands users type, e.g. `translate`.
pub mod elf;
pub mod misc;
pub mod report;
pub mod tables;

pub use elf::*;
pub use misc::*;
pub use report::*;
