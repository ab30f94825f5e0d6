//! Error types for TRPFD name index parsing

use crate::reader::ReadError;
use thiserror::Error;

/// Errors that can occur when parsing a TRPFD name index
///
/// In lenient mode only I/O failures surface here; short reads are absorbed
/// by the reader.
#[derive(Error, Debug)]
pub enum TrpfdError {
    /// Read failure (I/O, or a short read in strict mode)
    #[error("Failed to read name index: {0}")]
    Read(#[from] ReadError),

    /// Opening the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for TRPFD operation results
pub type Result<T> = std::result::Result<T, TrpfdError>;
