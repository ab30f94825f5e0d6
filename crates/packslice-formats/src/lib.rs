//! Parsers for game-package container formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format tags don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate decodes the binary layout of two container families and turns
//! them into plain lists of named byte ranges. It never writes containers and
//! never touches the filesystem beyond opening the inputs it is given.
//!
//! # Supported Formats
//!
//! - **PFS0**: Self-describing indexed archive (header, file table, string
//!   table, inline data)
//! - **TRPFD**: Name index listing pack names; pack hashes are derived from
//!   the names with FNV-1a
//! - **TRPFS**: `ONEPACK` data file whose embedded map joins pack hashes to
//!   absolute offsets
//!
//! # Pipeline
//!
//! ```text
//! PFS0 bytes ─────────────────────────────────────► Vec<ArchiveEntry>
//! TRPFD ─► NameIndex ─┐
//!                     ├─► pack_map::join ─► pack_map::derive_sizes ─► Vec<ArchiveEntry>
//! TRPFS ─► DataMap ───┘
//! ```
//!
//! Sizes of TRPFS packs are not stored anywhere. They are derived by sorting
//! the joined offsets and taking the gap to the next pack (or to end of file).
//!
//! # Example
//!
//! ```
//! use packslice_formats::fnv::fnv1a_64;
//!
//! assert_eq!(fnv1a_64(b""), 0xcbf29ce484222645);
//! ```

#![warn(missing_docs)]

mod entry;
pub mod fnv;
/// Joining TRPFD names to TRPFS offsets and deriving pack sizes
///
/// The join and the sort are separate stages so each can be inspected and
/// tested on its own.
pub mod pack_map;
/// PFS0 indexed archive format
///
/// A 16-byte header is followed by a table of 24-byte file entries, a string
/// table of NUL-terminated names and finally the data section. Entry offsets
/// are relative to the start of the data section.
pub mod pfs0;
pub mod reader;
/// TRPFD name index format
pub mod trpfd;
/// TRPFS `ONEPACK` data map format
pub mod trpfs;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use entry::ArchiveEntry;
pub use fnv::{Fnv1a64, fnv1a_64};
pub use pack_map::{JoinResult, PackMapEntry, PackMapError};
pub use pfs0::{Pfs0Archive, Pfs0Error};
pub use reader::{ByteReader, ReadError, ReadMode};
pub use trpfd::{NameIndex, PackInfo, TrpfdError};
pub use trpfs::{DataMap, TrpfsError};
