//! Errors from running the external RomFS unpacker

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::RomfsHint;

/// Failures of an unpacker run
#[derive(Error, Debug)]
pub enum RomfsError {
    /// An input file does not exist
    #[error("input file not found: {}", .path.display())]
    MissingInput {
        /// Missing path
        path: PathBuf,
    },

    /// The unpacker binary could not be found
    #[error("unpacker '{}' not found; install hactool or pass its path", .tool.display())]
    ToolNotFound {
        /// Binary that was looked up
        tool: PathBuf,
    },

    /// The unpacker could not be started
    #[error("failed to start '{}': {source}", .tool.display())]
    Spawn {
        /// Binary that was started
        tool: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The unpacker ran and reported failure
    #[error("'{}' failed ({status})", .tool.display())]
    ToolFailed {
        /// Binary that ran
        tool: PathBuf,
        /// Exit status as reported by the OS
        status: String,
        /// Likely cause, recognised from the tool's error output
        hint: Option<RomfsHint>,
    },
}

/// Type alias for unpacker results
pub type Result<T> = std::result::Result<T, RomfsError>;
