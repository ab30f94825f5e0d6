//! Error types for PFS0 parsing

use thiserror::Error;

/// Errors that can occur when parsing a PFS0 archive
///
/// Every variant is fatal: the archive is rejected before anything is
/// extracted. Entries whose data lies outside the file are not errors here;
/// they are reported per entry by the extractor.
#[derive(Error, Debug)]
pub enum Pfs0Error {
    /// Input shorter than the fixed header
    #[error("File is too small to be a valid PFS0 container: {len} bytes, need at least {min}")]
    TooSmall {
        /// Input length in bytes
        len: u64,
        /// Minimum length in bytes
        min: u64,
    },

    /// Magic tag mismatch
    #[error("Invalid PFS0 file. Expected 'PFS0', found: '{found}'")]
    InvalidMagic {
        /// Found tag, decoded permissively for display
        found: String,
        /// Raw tag bytes
        raw: [u8; 4],
    },

    /// File entry table extends past end of input
    #[error("PFS0 file table truncated: {file_count} entries end at offset {table_end}, input is {len} bytes")]
    TruncatedFileTable {
        /// Declared entry count
        file_count: u32,
        /// Offset where the table would end
        table_end: u64,
        /// Input length in bytes
        len: u64,
    },

    /// String table extends past end of input
    #[error("PFS0 string table truncated: table ends at offset {table_end}, input is {len} bytes")]
    TruncatedStringTable {
        /// Offset where the string table would end
        table_end: u64,
        /// Input length in bytes
        len: u64,
    },

    /// `BinRw` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for PFS0 operation results
pub type Result<T> = std::result::Result<T, Pfs0Error>;
