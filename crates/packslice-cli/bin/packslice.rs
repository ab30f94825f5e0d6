//! packslice binary entry point
//!
//! Parses arguments, installs logging and dispatches to a subcommand.

use anyhow::Result;
use clap::Parser;
use packslice_cli::{Cli, Command, commands, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Extract(args) => commands::extract::handle(args).await,
        Command::List(args) => commands::list::handle(&args),
        Command::Romfs(args) => commands::romfs::handle(&args),
    }
}
