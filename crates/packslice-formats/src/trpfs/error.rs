//! Error types for TRPFS data map parsing

use crate::reader::ReadError;
use thiserror::Error;

/// Errors that can occur when parsing a TRPFS data map
#[derive(Error, Debug)]
pub enum TrpfsError {
    /// File does not start with `ONEPACK\0`
    #[error("Invalid TRPFS signature: expected \"ONEPACK\\0\", found {found:?}")]
    InvalidSignature {
        /// Bytes found at the start of the file, decoded permissively
        found: String,
    },

    /// Read failure (I/O, or a short read in strict mode)
    #[error("Failed to read data map: {0}")]
    Read(#[from] ReadError),

    /// Opening the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for TRPFS operation results
pub type Result<T> = std::result::Result<T, TrpfsError>;
