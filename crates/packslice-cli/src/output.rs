//! Human-readable rendering of reports and listings

use packslice_extract::{ExtractionReport, Listing, RomfsOutcome, format_size};
use std::fmt::Write as _;
use std::path::Path;

/// Summary of an extraction run
pub fn render_report(report: &ExtractionReport, output_dir: &Path) -> String {
    let mut out = format!(
        "Extracted {} of {} files to {}",
        report.written,
        report.total,
        output_dir.display()
    );
    if report.cancelled {
        out.push_str(" (cancelled)");
    }
    out.push('\n');

    if report.has_failures() {
        let _ = writeln!(out, "Skipped {}:", report.skipped);
        for failure in &report.failures {
            let _ = writeln!(out, "  {failure}");
        }
    }
    out
}

/// One line per entry: offset, size, name, and a marker for out-of-bounds ranges
pub fn render_listing(listing: &Listing) -> String {
    let mut out = String::new();
    for entry in &listing.entries {
        let _ = write!(
            out,
            "{:#012x}  {:>10}  {}",
            entry.data_offset(),
            format_size(entry.size()),
            entry.name()
        );
        if !listing.is_in_bounds(entry) {
            out.push_str("  [out of bounds]");
        }
        out.push('\n');
    }
    for pack in &listing.unmapped {
        let _ = writeln!(out, "{:>12}  {:>10}  {}  [unmapped]", "-", "-", pack.name());
    }
    let _ = writeln!(
        out,
        "{} entries, {} unmapped, source {}",
        listing.entries.len(),
        listing.unmapped.len(),
        format_size(listing.source_len)
    );
    out
}

/// Result of a hactool run
pub fn render_romfs(outcome: &RomfsOutcome) -> String {
    if outcome.produced {
        format!("RomFS extracted to {}\n", outcome.romfs_dir.display())
    } else {
        "hactool finished but no RomFS section was found\n".to_string()
    }
}
