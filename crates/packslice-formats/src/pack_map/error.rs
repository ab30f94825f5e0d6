//! Error types for pack map size derivation

use thiserror::Error;

/// Inconsistencies that make derived pack sizes unreliable
///
/// Both variants are fatal for a run: a zero or negative size would mean the
/// offsets don't describe disjoint packs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackMapError {
    /// Two packs share an offset after sorting
    #[error("Packs '{first}' and '{second}' share offset {offset:#x}; offsets must be strictly ascending")]
    DuplicateOffset {
        /// Shared offset
        offset: u64,
        /// Pack sorted first
        first: String,
        /// Pack sorted second
        second: String,
    },

    /// The last pack starts at or beyond the end of the data file
    #[error("Pack '{name}' starts at {offset:#x}, at or beyond end of data file ({data_len:#x} bytes)")]
    OffsetBeyondEnd {
        /// Pack name
        name: String,
        /// Pack offset
        offset: u64,
        /// Data file length
        data_len: u64,
    },
}

/// Type alias for pack map results
pub type Result<T> = std::result::Result<T, PackMapError>;
