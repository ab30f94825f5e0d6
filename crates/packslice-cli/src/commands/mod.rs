//! Subcommand handlers
//!
//! Each handler returns the process exit code; errors that end a command
//! early are returned as `anyhow::Error` and reported by `main`.

pub mod extract;
pub mod list;
pub mod romfs;
