//! Runner for the external `hactool` RomFS unpacker
//!
//! NCA containers are encrypted and this crate has no knowledge of them.
//! The runner only builds the command line
//!
//! ```text
//! hactool -k <keys> --romfsdir <output>/<nca stem>_romfs <nca>
//! ```
//!
//! relays the tool's output to a [`ProgressSink`] and interprets the result.

mod error;

pub use error::{Result, RomfsError};

use crate::progress::{LogLevel, ProgressSink};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Binary looked up on `PATH` when no tool path is given
pub const DEFAULT_TOOL: &str = "hactool";

/// One unpacker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomfsRequest {
    /// NCA file to unpack
    pub nca: PathBuf,
    /// Keys file passed with `-k`
    pub keys: PathBuf,
    /// Base directory; the RomFS lands in a subdirectory of it
    pub output_dir: PathBuf,
    /// Unpacker binary
    pub tool: PathBuf,
}

impl RomfsRequest {
    /// Request using [`DEFAULT_TOOL`]
    pub fn new(
        nca: impl Into<PathBuf>,
        keys: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            nca: nca.into(),
            keys: keys.into(),
            output_dir: output_dir.into(),
            tool: PathBuf::from(DEFAULT_TOOL),
        }
    }

    /// Use a specific unpacker binary
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool = tool.into();
        self
    }

    /// `<output_dir>/<nca stem>_romfs`
    pub fn romfs_dir(&self) -> PathBuf {
        let mut name = self
            .nca
            .file_stem()
            .map_or_else(|| OsString::from("nca"), ToOwned::to_owned);
        name.push("_romfs");
        self.output_dir.join(name)
    }

    /// Arguments passed to the unpacker, in order
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-k".into(),
            self.keys.clone().into_os_string(),
            "--romfsdir".into(),
            self.romfs_dir().into_os_string(),
            self.nca.clone().into_os_string(),
        ]
    }
}

/// Likely cause of an unpacker failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RomfsHint {
    /// Keys file invalid or incomplete
    Keys,
    /// NCA has no RomFS section
    NoRomfs,
}

impl RomfsHint {
    /// Recognise a cause from the unpacker's error output
    pub fn from_stderr(stderr: &str) -> Option<Self> {
        if stderr.to_lowercase().contains("key") {
            Some(Self::Keys)
        } else if stderr.contains("Is NCA file a gamecard image?")
            || stderr.contains("PFS0 magic is invalid")
        {
            Some(Self::NoRomfs)
        } else {
            None
        }
    }
}

impl fmt::Display for RomfsHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keys => "the keys file may be invalid or incomplete (prod.keys)",
            Self::NoRomfs => {
                "this NCA likely has no RomFS section (update or metadata NCA); try the largest NCA of the title"
            }
        })
    }
}

/// Result of a successful unpacker run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomfsOutcome {
    /// Directory the RomFS was requested in
    pub romfs_dir: PathBuf,
    /// Whether that directory exists and is non-empty
    pub produced: bool,
}

/// Run the unpacker, relaying its output to `sink`
///
/// Standard output lines are logged at info level and standard error lines
/// at warn level. A zero exit without a populated RomFS directory is a
/// success with `produced == false`.
pub fn unpack_romfs(request: &RomfsRequest, sink: &mut dyn ProgressSink) -> Result<RomfsOutcome> {
    for input in [&request.nca, &request.keys] {
        if !input.is_file() {
            return Err(RomfsError::MissingInput {
                path: input.clone(),
            });
        }
    }

    let romfs_dir = request.romfs_dir();
    let args = request.args();
    sink.log(
        LogLevel::Info,
        format!("Target directory for RomFS: {}", romfs_dir.display()),
    );
    debug!(tool = %request.tool.display(), ?args, "running unpacker");

    let output = Command::new(&request.tool)
        .args(&args)
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RomfsError::ToolNotFound {
                tool: request.tool.clone(),
            },
            _ => RomfsError::Spawn {
                tool: request.tool.clone(),
                source,
            },
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    relay(sink, LogLevel::Info, &stdout);
    relay(sink, LogLevel::Warn, &stderr);

    if !output.status.success() {
        let hint = RomfsHint::from_stderr(&stderr);
        if let Some(hint) = hint {
            sink.log(LogLevel::Info, format!("Hint: {hint}"));
        }
        return Err(RomfsError::ToolFailed {
            tool: request.tool.clone(),
            status: output.status.to_string(),
            hint,
        });
    }

    let produced = is_populated(&romfs_dir);
    if produced {
        sink.log(
            LogLevel::Info,
            format!("Finished extracting RomFS to {}", romfs_dir.display()),
        );
    } else {
        sink.log(
            LogLevel::Warn,
            "Unpacker succeeded but produced no RomFS directory; the NCA probably has no RomFS section"
                .into(),
        );
    }

    Ok(RomfsOutcome {
        romfs_dir,
        produced,
    })
}

fn relay(sink: &mut dyn ProgressSink, level: LogLevel, text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        sink.log(level, line.to_owned());
    }
}

fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}
