//! Skip-or-abort decisions for every failure kind
//!
//! | Kind          | Policy      |
//! |---------------|-------------|
//! | `Format`      | Abort       |
//! | `Consistency` | Abort       |
//! | `SourceIo`    | Abort       |
//! | `Bounds`      | Skip entry  |
//! | `Unmapped`    | Skip entry  |
//! | `UnsafePath`  | Skip entry  |
//! | `WriteIo`     | Skip entry  |
//!
//! Run-level failures (bad magic, duplicate offsets, unreadable input) abort
//! before anything is written. Per-entry failures are recorded in the
//! [`ExtractionReport`](crate::ExtractionReport) and the run moves on.

use serde::Serialize;
use std::fmt;

/// Pipeline stage a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading and joining container metadata
    Parse,
    /// Slicing entries and writing them out
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Extract => "extract",
        })
    }
}

/// Classification of everything that can go wrong in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad magic or signature, header or table too short
    Format,
    /// Entry range lies outside the source
    Bounds,
    /// Pack name with no offset in the data map
    Unmapped,
    /// Offsets not strictly ascending after sorting
    Consistency,
    /// Entry name unusable as an output path
    UnsafePath,
    /// Reading a source file failed
    SourceIo,
    /// Creating or writing an output file failed
    WriteIo,
}

/// What a run does when a failure of some kind occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Stop the whole run
    Abort,
    /// Record the failure and continue with the next entry
    SkipEntry,
}

impl ErrorKind {
    /// The policy applied to this kind
    pub const fn policy(self) -> Policy {
        match self {
            Self::Format | Self::Consistency | Self::SourceIo => Policy::Abort,
            Self::Bounds | Self::Unmapped | Self::UnsafePath | Self::WriteIo => Policy::SkipEntry,
        }
    }

    /// Whether this kind aborts the run
    pub const fn is_fatal(self) -> bool {
        matches!(self.policy(), Policy::Abort)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Format => "format error",
            Self::Bounds => "out of bounds",
            Self::Unmapped => "unmapped entry",
            Self::Consistency => "consistency error",
            Self::UnsafePath => "unsafe path",
            Self::SourceIo => "source I/O error",
            Self::WriteIo => "write I/O error",
        })
    }
}

/// One failure tied to a stage and, usually, an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    /// Stage the failure happened in
    pub stage: Stage,
    /// Failure classification
    pub kind: ErrorKind,
    /// Entry name, if the failure concerns a single entry
    pub entry: Option<String>,
    /// Human-readable detail
    pub message: String,
}

impl EntryFailure {
    /// Failure concerning the named entry
    pub fn new(
        stage: Stage,
        kind: ErrorKind,
        entry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            kind,
            entry: Some(entry.into()),
            message: message.into(),
        }
    }

    /// Failure of the run as a whole rather than one entry
    pub fn run_level(stage: Stage, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            entry: None,
            message: message.into(),
        }
    }

    /// Policy for this failure's kind
    pub const fn policy(&self) -> Policy {
        self.kind.policy()
    }
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(
                f,
                "[{}] {} in '{}': {}",
                self.stage, self.kind, entry, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.stage, self.kind, self.message),
        }
    }
}

impl std::error::Error for EntryFailure {}
