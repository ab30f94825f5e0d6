//! Command-line arguments
//!
//! Every path option can also come from the environment:
//!
//! | Option        | Variable            |
//! |---------------|---------------------|
//! | `--output`    | `PACKSLICE_OUTPUT`  |
//! | `--strict`    | `PACKSLICE_STRICT`  |
//! | `--keys`      | `PACKSLICE_KEYS`    |
//! | `--hactool`   | `PACKSLICE_HACTOOL` |

use clap::{ArgAction, Args, Parser, Subcommand};
use packslice_extract::romfs::DEFAULT_TOOL;
use packslice_extract::{ExtractOptions, ExtractRequest, RomfsRequest};
use packslice_formats::ReadMode;
use std::path::PathBuf;

/// Top-level arguments
#[derive(Debug, Parser)]
#[command(
    name = "packslice",
    about = "Extract files from PFS0 archives and TRPFD/TRPFS pack pairs",
    version
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract every entry of a container
    Extract(ExtractArgs),
    /// List entries without extracting
    List(ListArgs),
    /// Unpack the RomFS of an NCA with hactool
    Romfs(RomfsArgs),
}

/// Input selection shared by `extract` and `list`
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// PFS0 archive (.nsp), or TRPFD name index when --data is given
    pub primary: PathBuf,

    /// TRPFS data file paired with the TRPFD name index
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Fail on short reads in TRPFD/TRPFS metadata instead of zero-filling
    #[arg(long, env = "PACKSLICE_STRICT")]
    pub strict: bool,
}

impl SourceArgs {
    /// Read mode selected by `--strict`
    pub const fn read_mode(&self) -> ReadMode {
        if self.strict {
            ReadMode::Strict
        } else {
            ReadMode::Lenient
        }
    }

    /// Request writing below `output_dir`
    pub fn request(&self, output_dir: PathBuf) -> ExtractRequest {
        ExtractRequest {
            primary: self.primary.clone(),
            secondary: self.data.clone(),
            output_dir,
            options: ExtractOptions::default().with_read_mode(self.read_mode()),
        }
    }
}

/// `extract` arguments
#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory to extract into
    #[arg(short, long, env = "PACKSLICE_OUTPUT")]
    pub output: PathBuf,

    /// Fail instead of creating a missing output directory
    #[arg(long)]
    pub no_create: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl ExtractArgs {
    /// Pipeline request for these arguments
    pub fn request(&self) -> ExtractRequest {
        let mut request = self.source.request(self.output.clone());
        request.options = request.options.with_create_output_dir(!self.no_create);
        request
    }
}

/// `list` arguments
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the listing as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// `romfs` arguments
#[derive(Debug, Args)]
pub struct RomfsArgs {
    /// NCA file to unpack
    pub nca: PathBuf,

    /// Keys file (prod.keys)
    #[arg(short, long, env = "PACKSLICE_KEYS")]
    pub keys: PathBuf,

    /// Base output directory; the RomFS goes into <nca stem>_romfs below it
    #[arg(short, long, env = "PACKSLICE_OUTPUT")]
    pub output: PathBuf,

    /// hactool binary
    #[arg(long, env = "PACKSLICE_HACTOOL", default_value = DEFAULT_TOOL)]
    pub hactool: PathBuf,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl RomfsArgs {
    /// Runner request for these arguments
    pub fn request(&self) -> RomfsRequest {
        RomfsRequest::new(&self.nca, &self.keys, &self.output).with_tool(&self.hactool)
    }
}
