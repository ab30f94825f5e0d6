//! Parse-then-extract runs over either container family
//!
//! ```text
//! IndexedArchive:  read file ─► Pfs0Archive::parse ─────────────────────────┐
//!                                                                           ├─► Extractor
//! SplitPack:       NameIndex ─┬─► pack_map::join ─► pack_map::derive_sizes ─┘
//!                  DataMap ───┘
//! ```
//!
//! Parsing finishes before the output directory is touched, so every
//! run-level error leaves the filesystem unchanged.

mod error;

pub use error::{PipelineError, Result};

use crate::cancel::CancelFlag;
use crate::extractor::Extractor;
use crate::options::ExtractOptions;
use crate::policy::{EntryFailure, ErrorKind, Stage};
use crate::progress::{ChannelSink, ExtractEvent, LogLevel, ProgressSink, TracingSink};
use crate::report::ExtractionReport;
use packslice_formats::{
    ArchiveEntry, ByteReader, DataMap, JoinResult, NameIndex, PackInfo, Pfs0Archive, TrpfdError,
    TrpfsError, pack_map,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, info_span};

/// Which container family a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Single self-describing PFS0 file
    IndexedArchive,
    /// TRPFD name index plus TRPFS data file
    SplitPack,
}

/// Inputs and output location for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// PFS0 archive, or TRPFD name index when `secondary` is set
    pub primary: PathBuf,
    /// TRPFS data file
    pub secondary: Option<PathBuf>,
    /// Directory entries are written below
    pub output_dir: PathBuf,
    /// Run options
    #[serde(default)]
    pub options: ExtractOptions,
}

impl ExtractRequest {
    /// Request for a PFS0 archive
    pub fn indexed_archive(archive: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            primary: archive.into(),
            secondary: None,
            output_dir: output_dir.into(),
            options: ExtractOptions::default(),
        }
    }

    /// Request for a TRPFD/TRPFS pair
    pub fn split_pack(
        name_index: impl Into<PathBuf>,
        data_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            primary: name_index.into(),
            secondary: Some(data_file.into()),
            output_dir: output_dir.into(),
            options: ExtractOptions::default(),
        }
    }

    /// Replace the options
    #[must_use]
    pub const fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Container family, decided by whether a data file is given
    pub const fn source_kind(&self) -> SourceKind {
        match self.secondary {
            Some(_) => SourceKind::SplitPack,
            None => SourceKind::IndexedArchive,
        }
    }
}

/// Parsed entries of a request, without extracting anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Container family
    pub kind: SourceKind,
    /// Length of the file entries are sliced from
    pub source_len: u64,
    /// Entries in extraction order
    pub entries: Vec<ArchiveEntry>,
    /// Packs listed by name but absent from the data map
    pub unmapped: Vec<PackInfo>,
}

impl Listing {
    /// Whether `entry`'s range lies within the source
    pub fn is_in_bounds(&self, entry: &ArchiveEntry) -> bool {
        entry.fits_within(self.source_len)
    }
}

enum Source {
    Memory(Vec<u8>),
    File(PathBuf),
}

struct Loaded {
    entries: Vec<ArchiveEntry>,
    unmapped: Vec<PackInfo>,
    source_len: u64,
    source: Source,
}

/// Run a request to completion on the current thread
///
/// On success a [`ExtractEvent::Finished`] event carrying the report is sent
/// to `sink`; on failure the error is logged to `sink` and returned.
pub fn run(
    request: &ExtractRequest,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<ExtractionReport> {
    let span = info_span!(
        "extract",
        kind = ?request.source_kind(),
        primary = %request.primary.display()
    );
    let _enter = span.enter();

    let result = run_inner(request, sink, cancel);
    match &result {
        Ok(report) => sink.event(ExtractEvent::Finished(report.clone())),
        Err(err) => sink.log(LogLevel::Error, err.to_string()),
    }
    result
}

fn run_inner(
    request: &ExtractRequest,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<ExtractionReport> {
    let loaded = load(request, sink)?;
    prepare_output_dir(request)?;

    let extractor = Extractor::new(&request.output_dir);
    sink.log(
        LogLevel::Info,
        format!(
            "Extracting {} entries to {}",
            loaded.entries.len(),
            request.output_dir.display()
        ),
    );

    let extracted = match loaded.source {
        Source::Memory(data) => {
            extractor.extract(&loaded.entries, &mut Cursor::new(data), sink, cancel)
        }
        Source::File(path) => {
            let mut file = BufReader::new(open(&path)?);
            extractor.extract(&loaded.entries, &mut file, sink, cancel)
        }
    };

    let parse_skips = unmapped_failures(&loaded.unmapped);
    let mut report = match extracted {
        Ok(report) => report,
        Err(mut abort) => {
            abort.report.record_parse_skips(parse_skips);
            return Err(abort.into());
        }
    };
    report.record_parse_skips(parse_skips);

    sink.log(
        LogLevel::Info,
        format!(
            "Finished: extracted {} of {} files ({} skipped)",
            report.written, report.total, report.skipped
        ),
    );
    Ok(report)
}

fn unmapped_failures(unmapped: &[PackInfo]) -> Vec<EntryFailure> {
    unmapped
        .iter()
        .map(|pack| {
            EntryFailure::new(
                Stage::Parse,
                ErrorKind::Unmapped,
                pack.name(),
                format!("hash {:016x} has no offset in the data map", pack.hash()),
            )
        })
        .collect()
}

/// Parse a request's inputs and return its entries without writing
pub fn list(request: &ExtractRequest) -> Result<Listing> {
    let loaded = load(request, &mut TracingSink)?;
    Ok(Listing {
        kind: request.source_kind(),
        source_len: loaded.source_len,
        entries: loaded.entries,
        unmapped: loaded.unmapped,
    })
}

/// Handle to a run on a blocking worker thread
#[derive(Debug)]
pub struct ExtractionTask {
    /// Resolves to the run's result
    pub handle: JoinHandle<Result<ExtractionReport>>,
    /// Events in the order the run produced them
    pub events: UnboundedReceiver<ExtractEvent>,
    /// Flag that stops the run before its next entry
    pub cancel: CancelFlag,
}

/// Start a run on tokio's blocking pool
///
/// Must be called from within a tokio runtime.
pub fn spawn(request: ExtractRequest) -> ExtractionTask {
    let (tx, events) = unbounded_channel();
    let cancel = CancelFlag::new();
    let flag = cancel.clone();

    let handle = tokio::task::spawn_blocking(move || {
        let mut sink = ChannelSink::new(tx);
        run(&request, &mut sink, &flag)
    });

    ExtractionTask {
        handle,
        events,
        cancel,
    }
}

fn load(request: &ExtractRequest, sink: &mut dyn ProgressSink) -> Result<Loaded> {
    match &request.secondary {
        None => load_indexed_archive(&request.primary, sink),
        Some(data_file) => load_split_pack(&request.primary, data_file, request.options, sink),
    }
}

fn load_indexed_archive(path: &Path, sink: &mut dyn ProgressSink) -> Result<Loaded> {
    sink.log(LogLevel::Info, format!("Reading {}", path.display()));
    let data = fs::read(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let archive = Pfs0Archive::parse(&data)?;
    let in_bounds = archive.in_bounds_count();
    let entries = archive.into_entries();
    sink.log(
        LogLevel::Info,
        format!(
            "Found PFS0 archive with {} files ({in_bounds} within the file)",
            entries.len()
        ),
    );

    Ok(Loaded {
        entries,
        unmapped: Vec::new(),
        source_len: data.len() as u64,
        source: Source::Memory(data),
    })
}

fn load_split_pack(
    name_index: &Path,
    data_file: &Path,
    options: ExtractOptions,
    sink: &mut dyn ProgressSink,
) -> Result<Loaded> {
    sink.log(
        LogLevel::Info,
        format!("[1/3] Parsing name index {}", name_index.display()),
    );
    let mut reader = ByteReader::new(BufReader::new(open(name_index)?), options.read_mode)
        .map_err(TrpfdError::from)?;
    let index = NameIndex::parse(&mut reader)?;
    sink.log(LogLevel::Info, format!("Found {} pack names", index.len()));

    sink.log(
        LogLevel::Info,
        format!("[2/3] Mapping and sorting offsets from {}", data_file.display()),
    );
    let mut reader = ByteReader::new(BufReader::new(open(data_file)?), options.read_mode)
        .map_err(TrpfsError::from)?;
    let map = DataMap::parse(&mut reader)?;
    if let Some((offsets, hashes)) = map.count_mismatch() {
        sink.log(
            LogLevel::Warn,
            format!(
                "Data map lists {offsets} offsets but {hashes} hashes; pairing the first {}",
                offsets.min(hashes)
            ),
        );
    }

    let JoinResult { mapped, unmapped } = pack_map::join(index.packs(), &map);
    for pack in &unmapped {
        sink.log(
            LogLevel::Warn,
            format!("Unmapped: {} (hash {:016x} not in data map)", pack.name(), pack.hash()),
        );
    }

    let entries = pack_map::derive_sizes(mapped, map.file_size())?;
    debug!(
        first = ?entries.first().map(ArchiveEntry::data_offset),
        file_size = map.file_size(),
        "derived pack sizes"
    );
    sink.log(
        LogLevel::Info,
        format!("[3/3] Mapped {} of {} packs", entries.len(), index.len()),
    );

    Ok(Loaded {
        entries,
        unmapped,
        source_len: map.file_size(),
        source: Source::File(data_file.to_path_buf()),
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn prepare_output_dir(request: &ExtractRequest) -> Result<()> {
    let dir = &request.output_dir;
    let outcome = if request.options.create_output_dir {
        fs::create_dir_all(dir)
    } else if dir.is_dir() {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::NotFound, "directory does not exist"))
    };

    outcome.map_err(|source| PipelineError::OutputDir {
        path: dir.clone(),
        source,
    })
}
