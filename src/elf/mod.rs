//! Minimal ELF support: just enough to find the load segments of an executable or
//! shared object.
//! Quick ELF reference: https://gist.github.com/x0nu11byt3/bcb35c3de461e5fb66173071a2379779
//!
//! ELF files start with an ELF header which includes:
//! * A magic number to identify the file as an ELF file.
//! * The word size and byte order used by the rest of the file.
//! * The object type, e.g. executable or shared object.
//! * The offset to and number of program headers.
//!
//! Program headers identify segments. Segments are used by the OS to load an exe into
//! memory. A program header has type, vaddr, offset, etc. Load segments are the ones
//! that are mapped into the process: the file_size bytes at offset appear at vaddr.
//! Section headers are not read.
pub mod elf_file;
pub mod header;
pub mod io;
pub mod primitives;
pub mod segments;

pub use elf_file::*;
pub use header::*;
pub use io::*;
pub use primitives::*;
pub use segments::*;
