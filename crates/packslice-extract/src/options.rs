//! Per-run options

use packslice_formats::ReadMode;
use serde::{Deserialize, Serialize};

/// Options controlling how a run reads inputs and prepares its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// How short reads in TRPFD/TRPFS metadata are handled
    pub read_mode: ReadMode,
    /// Create the output directory if it doesn't exist
    pub create_output_dir: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::Lenient,
            create_output_dir: true,
        }
    }
}

impl ExtractOptions {
    /// Set the read mode
    #[must_use]
    pub const fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Set whether a missing output directory is created
    #[must_use]
    pub const fn with_create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }
}
