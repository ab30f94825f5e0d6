use crate::config::RomfsArgs;
use crate::output::render_romfs;
use anyhow::Result;
use packslice_extract::{TracingSink, unpack_romfs};
use std::process::ExitCode;

/// Run hactool against one NCA
pub fn handle(args: &RomfsArgs) -> Result<ExitCode> {
    let outcome = unpack_romfs(&args.request(), &mut TracingSink)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_romfs(&outcome));
    }
    Ok(ExitCode::SUCCESS)
}
