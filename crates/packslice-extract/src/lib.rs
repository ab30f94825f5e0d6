//! Extraction pipeline for PFS0 and TRPFD/TRPFS containers
//!
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::doc_markdown)] // Format tags don't need backticks
//! Takes the entry lists produced by `packslice-formats`, slices each entry
//! out of its source and writes it below an output root.
//!
//! # Components
//!
//! - [`path`]: turns untrusted entry names into safe relative paths
//! - [`Extractor`]: bounds-checked slicing and writing, one entry at a time
//! - [`policy`]: the single table deciding which failures skip an entry and
//!   which abort the run
//! - [`progress`]: events and sinks for log lines and per-entry progress
//! - [`pipeline`]: parse-then-extract entry point, blocking or as a tokio task
//! - [`romfs`]: runner for the external `hactool` unpacker
//!
//! # Example
//!
//! ```no_run
//! use packslice_extract::{CancelFlag, ExtractRequest, TracingSink, run};
//!
//! let request = ExtractRequest::split_pack("data.trpfd", "data.trpfs", "out");
//! let report = run(&request, &mut TracingSink, &CancelFlag::new())?;
//! println!("{} of {} files written", report.written, report.total);
//! # Ok::<(), packslice_extract::PipelineError>(())
//! ```

#![warn(missing_docs)]

mod cancel;
mod extractor;
mod options;
pub mod path;
pub mod pipeline;
pub mod policy;
pub mod progress;
mod report;
pub mod romfs;

pub use cancel::CancelFlag;
pub use extractor::{ExtractAbort, Extractor};
pub use options::ExtractOptions;
pub use path::{PathError, sanitize};
pub use pipeline::{
    ExtractRequest, ExtractionTask, Listing, PipelineError, SourceKind, list, run, spawn,
};
pub use policy::{EntryFailure, ErrorKind, Policy, Stage};
pub use progress::{
    ChannelSink, ExtractEvent, LogLevel, ProgressSink, TracingSink, format_size,
};
pub use report::ExtractionReport;
pub use romfs::{RomfsError, RomfsHint, RomfsOutcome, RomfsRequest, unpack_romfs};
