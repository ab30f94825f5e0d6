use crate::config::ExtractArgs;
use crate::output::render_report;
use anyhow::{Context, Result};
use packslice_extract::{ExtractionReport, ProgressSink, TracingSink, spawn};
use std::path::Path;
use std::process::ExitCode;
use tracing::warn;

/// Run an extraction in the background, relaying its events to the log
///
/// Ctrl-C stops the run before its next entry.
pub async fn handle(args: ExtractArgs) -> Result<ExitCode> {
    let request = args.request();
    let output_dir = request.output_dir.clone();
    let mut task = spawn(request);

    let cancel = task.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current entry");
            cancel.cancel();
        }
    });

    let mut sink = TracingSink;
    while let Some(event) = task.events.recv().await {
        sink.event(event);
    }

    let report = match task.handle.await.context("extraction task panicked")? {
        Ok(report) => report,
        Err(err) => {
            // Show what was written before the abort, then fail with the cause
            if let Some(partial) = err.partial_report() {
                print_report(partial, &output_dir, args.json)?;
            }
            return Err(err.into());
        }
    };

    print_report(&report, &output_dir, args.json)?;

    Ok(if report.has_failures() || report.cancelled {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_report(report: &ExtractionReport, output_dir: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_report(report, output_dir));
    }
    Ok(())
}
