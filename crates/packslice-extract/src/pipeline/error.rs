//! Run-level errors

use crate::extractor::ExtractAbort;
use crate::policy::{ErrorKind, Stage};
use crate::report::ExtractionReport;
use packslice_formats::{PackMapError, Pfs0Error, ReadError, TrpfdError, TrpfsError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failure that ended a run
///
/// Everything except [`PipelineError::Aborted`] happens before the first
/// file is written.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file could not be opened or read
    #[error("[parse] cannot read {}: {source}", .path.display())]
    Open {
        /// Input path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Indexed archive rejected
    #[error("[parse] {0}")]
    Pfs0(#[from] Pfs0Error),

    /// Name index rejected
    #[error("[parse] {0}")]
    NameIndex(#[from] TrpfdError),

    /// Data map rejected
    #[error("[parse] {0}")]
    DataMap(#[from] TrpfsError),

    /// Joined offsets can't yield positive sizes
    #[error("[parse] {0}")]
    Consistency(#[from] PackMapError),

    /// Output directory missing or not creatable
    #[error("[extract] output directory {} is unusable: {source}", .path.display())]
    OutputDir {
        /// Output directory
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// An entry failure whose policy is to abort, with the partial report
    #[error("{0}")]
    Aborted(#[from] ExtractAbort),
}

impl PipelineError {
    /// Classification of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::SourceIo,
            Self::Pfs0(_) | Self::DataMap(TrpfsError::InvalidSignature { .. }) => ErrorKind::Format,
            Self::NameIndex(TrpfdError::Read(err)) | Self::DataMap(TrpfsError::Read(err)) => {
                read_error_kind(err)
            }
            Self::NameIndex(TrpfdError::Io(_)) | Self::DataMap(TrpfsError::Io(_)) => {
                ErrorKind::SourceIo
            }
            Self::Consistency(_) => ErrorKind::Consistency,
            Self::OutputDir { .. } => ErrorKind::WriteIo,
            Self::Aborted(abort) => abort.failure.kind,
        }
    }

    /// Stage this error happened in
    pub const fn stage(&self) -> Stage {
        match self {
            Self::OutputDir { .. } => Stage::Extract,
            Self::Aborted(abort) => abort.failure.stage,
            _ => Stage::Parse,
        }
    }

    /// Counts gathered before an abort
    ///
    /// `None` for errors raised before extraction started, which never
    /// write anything.
    pub const fn partial_report(&self) -> Option<&ExtractionReport> {
        match self {
            Self::Aborted(abort) => Some(&abort.report),
            _ => None,
        }
    }
}

const fn read_error_kind(err: &ReadError) -> ErrorKind {
    match err {
        ReadError::UnexpectedEof { .. } => ErrorKind::Format,
        ReadError::Io(_) => ErrorKind::SourceIo,
    }
}

/// Type alias for pipeline results
pub type Result<T> = std::result::Result<T, PipelineError>;
