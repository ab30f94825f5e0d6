//! Outcome of one extraction run

use crate::policy::{EntryFailure, ErrorKind};
use serde::Serialize;

/// Counts and per-entry failures of a finished run
///
/// `written + skipped <= total`; the difference is entries never reached
/// because the run was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Entries discovered, including unmapped ones
    pub total: usize,
    /// Entries written to disk
    pub written: usize,
    /// Entries skipped under a skip-entry policy
    pub skipped: usize,
    /// One record per skipped entry, in the order they happened
    pub failures: Vec<EntryFailure>,
    /// Whether the run stopped early on request
    pub cancelled: bool,
}

impl ExtractionReport {
    /// Empty report for a run over `total` entries
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count a skipped entry
    pub fn record_skip(&mut self, failure: EntryFailure) {
        self.skipped += 1;
        self.failures.push(failure);
    }

    /// Fold in entries dropped while parsing, ahead of extraction failures
    pub fn record_parse_skips(&mut self, failures: Vec<EntryFailure>) {
        self.total += failures.len();
        self.skipped += failures.len();
        self.failures.splice(0..0, failures);
    }

    /// Whether every discovered entry was written
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.written == self.total
    }

    /// Whether any entry failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of failures of `kind`
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}
