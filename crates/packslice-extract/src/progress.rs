//! Progress and log events delivered to callers
//!
//! A run reports through a [`ProgressSink`]. Closures taking an
//! [`ExtractEvent`] are sinks, [`ChannelSink`] forwards events across a
//! tokio channel to another task, and [`TracingSink`] turns them into
//! `tracing` records for headless use.

use crate::report::ExtractionReport;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Structural detail
    Debug,
    /// Normal progress
    Info,
    /// Skipped entry or suspicious input
    Warn,
    /// Fatal failure
    Error,
}

/// Something a run wants its caller to know
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractEvent {
    /// Free-form log line
    Log {
        /// Severity
        level: LogLevel,
        /// Message text
        message: String,
    },
    /// About to process entry `index` (1-based) of `total`
    Progress {
        /// 1-based entry index
        index: usize,
        /// Number of entries in this run
        total: usize,
        /// Entry name
        name: String,
        /// Entry size in bytes
        size: u64,
        /// `index / total`, in `0.0..=1.0`
        fraction: f32,
    },
    /// Run completed (possibly cancelled)
    Finished(ExtractionReport),
}

impl ExtractEvent {
    /// Progress event for entry `index` (0-based) of `total`
    pub fn progress(index: usize, total: usize, name: impl Into<String>, size: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let fraction = if total == 0 {
            1.0
        } else {
            (index + 1) as f32 / total as f32
        };
        Self::Progress {
            index: index + 1,
            total,
            name: name.into(),
            size,
            fraction,
        }
    }
}

/// Receiver of run events
///
/// Sinks are called from whatever thread runs the extraction.
pub trait ProgressSink {
    /// Deliver one event
    fn event(&mut self, event: ExtractEvent);

    /// Deliver a log line
    fn log(&mut self, level: LogLevel, message: String) {
        self.event(ExtractEvent::Log { level, message });
    }
}

impl<F: FnMut(ExtractEvent)> ProgressSink for F {
    fn event(&mut self, event: ExtractEvent) {
        self(event);
    }
}

/// Sink that forwards events over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ExtractEvent>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel
    pub const fn new(tx: UnboundedSender<ExtractEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn event(&mut self, event: ExtractEvent) {
        // A dropped receiver only means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

impl From<UnboundedSender<ExtractEvent>> for ChannelSink {
    fn from(tx: UnboundedSender<ExtractEvent>) -> Self {
        Self::new(tx)
    }
}

/// Sink that writes events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn event(&mut self, event: ExtractEvent) {
        match event {
            ExtractEvent::Log { level, message } => match level {
                LogLevel::Debug => debug!("{message}"),
                LogLevel::Info => info!("{message}"),
                LogLevel::Warn => warn!("{message}"),
                LogLevel::Error => error!("{message}"),
            },
            ExtractEvent::Progress {
                index,
                total,
                name,
                size,
                ..
            } => debug!("Extracting {index}/{total}: {name} ({})", format_size(size)),
            ExtractEvent::Finished(report) => info!(
                written = report.written,
                skipped = report.skipped,
                total = report.total,
                cancelled = report.cancelled,
                "extraction finished"
            ),
        }
    }
}

/// Render a byte count with binary units and one decimal
///
/// ```
/// use packslice_extract::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KiB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
