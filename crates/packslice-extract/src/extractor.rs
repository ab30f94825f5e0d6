//! Bounds-checked slicing of entries into files

use crate::cancel::CancelFlag;
use crate::path::sanitize;
use crate::policy::{EntryFailure, ErrorKind, Policy, Stage};
use crate::progress::{ExtractEvent, LogLevel, ProgressSink, format_size};
use crate::report::ExtractionReport;
use packslice_formats::ArchiveEntry;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A failure whose policy is to abort, with the counts gathered before it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{failure}")]
pub struct ExtractAbort {
    /// Failure that ended the run
    pub failure: EntryFailure,
    /// Entries written and skipped before the failure
    pub report: ExtractionReport,
}

/// Writes entries below a fixed output root
#[derive(Debug, Clone)]
pub struct Extractor {
    output_root: PathBuf,
}

impl Extractor {
    /// Extractor writing below `output_root`
    ///
    /// The root itself is not created here.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Directory entries are written below
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Extract `entries` in order from `source`
    ///
    /// Each entry gets one progress event. Failures with a skip policy are
    /// logged and recorded in the returned report. The first failure with an
    /// abort policy ends the run and is returned unlogged as an
    /// [`ExtractAbort`] carrying the partial report. Files written so far
    /// stay in place, as they do on cancellation.
    pub fn extract<R: Read + Seek>(
        &self,
        entries: &[ArchiveEntry],
        source: &mut R,
        sink: &mut dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<ExtractionReport, ExtractAbort> {
        let total = entries.len();
        let mut report = ExtractionReport::new(total);

        let source_len = match source.seek(SeekFrom::End(0)) {
            Ok(len) => len,
            Err(e) => {
                return Err(ExtractAbort {
                    failure: EntryFailure::run_level(
                        Stage::Extract,
                        ErrorKind::SourceIo,
                        e.to_string(),
                    ),
                    report,
                });
            }
        };

        for (index, entry) in entries.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                sink.log(
                    LogLevel::Warn,
                    format!("Cancelled after {index} of {total} entries"),
                );
                break;
            }

            sink.event(ExtractEvent::progress(index, total, entry.name(), entry.size()));

            match self.extract_one(entry, source, source_len) {
                Ok(path) => {
                    debug!(path = %path.display(), "wrote entry");
                    report.written += 1;
                    sink.log(
                        LogLevel::Info,
                        format!("Extracted: {} ({})", entry.name(), format_size(entry.size())),
                    );
                }
                Err(failure) => match failure.policy() {
                    Policy::SkipEntry => {
                        sink.log(LogLevel::Warn, format!("Skipped: {failure}"));
                        report.record_skip(failure);
                    }
                    Policy::Abort => return Err(ExtractAbort { failure, report }),
                },
            }
        }

        Ok(report)
    }

    fn extract_one<R: Read + Seek>(
        &self,
        entry: &ArchiveEntry,
        source: &mut R,
        source_len: u64,
    ) -> Result<PathBuf, EntryFailure> {
        let fail = |kind, message: String| {
            EntryFailure::new(Stage::Extract, kind, entry.name(), message)
        };
        let out_of_bounds = || {
            fail(
                ErrorKind::Bounds,
                format!(
                    "range {:#x}+{} is outside the {source_len}-byte source (likely a reference)",
                    entry.data_offset(),
                    entry.size()
                ),
            )
        };

        if !entry.fits_within(source_len) {
            return Err(out_of_bounds());
        }

        let relative = sanitize(entry.name()).map_err(|e| fail(ErrorKind::UnsafePath, e.to_string()))?;

        source
            .seek(SeekFrom::Start(entry.data_offset()))
            .map_err(|e| fail(ErrorKind::SourceIo, e.to_string()))?;

        let target = self.output_root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                fail(
                    ErrorKind::WriteIo,
                    format!("creating {}: {e}", parent.display()),
                )
            })?;
        }
        let write_failed = |e: io::Error| {
            fail(
                ErrorKind::WriteIo,
                format!("writing {}: {e}", target.display()),
            )
        };
        let file = File::create(&target).map_err(write_failed)?;

        let copied = copy_range(source, entry.size(), &mut BufWriter::new(file));
        let failure = match copied {
            Ok(n) if n == entry.size() => return Ok(target),
            Ok(_) => out_of_bounds(),
            Err(CopyError::Read(e)) => fail(ErrorKind::SourceIo, e.to_string()),
            Err(CopyError::Write(e)) => write_failed(e),
        };

        // Partial output is never left behind
        if let Err(e) = fs::remove_file(&target) {
            debug!(path = %target.display(), error = %e, "could not remove partial file");
        }
        Err(failure)
    }
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// Stream up to `size` bytes from `source` into `out`
///
/// Returns the number of bytes copied, which is less than `size` when the
/// source ends early.
fn copy_range<R: Read, W: Write>(
    source: &mut R,
    size: u64,
    out: &mut BufWriter<W>,
) -> Result<u64, CopyError> {
    let mut limited = source.take(size);
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    loop {
        let n = match limited.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        out.write_all(&buf[..n]).map_err(CopyError::Write)?;
        copied += n as u64;
    }

    out.flush().map_err(CopyError::Write)?;
    Ok(copied)
}
