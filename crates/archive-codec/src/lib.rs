//! # archive-codec
//!
//! Byte-level archive operations. This is the only crate that touches the
//! zip container format directly.
//!
//! - [`compress`] writes selected files from a directory into a new archive
//! - [`list_entries`] reads an archive's entry table
//! - [`decompress`] writes selected entries onto disk, refusing any entry
//!   whose path escapes the destination directory
//!
//! All functions are blocking; async callers run them on the blocking pool.

pub mod error;
pub mod path;
pub mod reader;
pub mod writer;

pub use error::CodecError;
pub use reader::{ArchiveEntry, decompress, list_entries};
pub use writer::compress;
