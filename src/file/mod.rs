//! Raw input handling for resource fork images.
//!
//! The decoder works on a borrowed byte slice. Forks handed over in memory are decoded in
//! place; files on disk are mapped for the duration of the decode through [`MappedFile`].
//!
//! # Key Components
//!
//! - [`parser::Parser`] - Bounds-checked cursor used by the decoder
//! - [`io`] - Big-endian primitive reads and writes
//! - [`MappedFile`] - Read-only memory map of an open handle

pub mod io;
pub mod parser;

mod physical;

pub(crate) use physical::MappedFile;
