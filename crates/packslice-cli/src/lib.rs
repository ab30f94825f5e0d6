//! Command-line front end for packslice
//!
//! The binary is a thin wrapper: argument parsing lives in [`config`],
//! logging setup in [`logging`] and each subcommand in [`commands`].

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

pub use config::{Cli, Command};
