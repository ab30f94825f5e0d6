use crate::config::ListArgs;
use crate::output::render_listing;
use anyhow::Result;
use packslice_extract::list;
use std::path::PathBuf;
use std::process::ExitCode;

/// Print the entries a run would extract
pub fn handle(args: &ListArgs) -> Result<ExitCode> {
    let listing = list(&args.source.request(PathBuf::new()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", render_listing(&listing));
    }
    Ok(ExitCode::SUCCESS)
}
