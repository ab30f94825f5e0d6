//! Sequential little-endian cursor over a seekable byte source
//!
//! [`ByteReader`] is shared by every parser in this crate. It tracks its own
//! position and the total source length so callers can ask how many bytes
//! remain before committing to a read.
//!
//! # Read modes
//!
//! The TRPFD/TRPFS layouts are traditionally read leniently: an integer read
//! that hits end of file yields `0` and a string read returns whatever bytes
//! were left. This is intentional and preserved as [`ReadMode::Lenient`], the
//! default. [`ReadMode::Strict`] turns every short read into
//! [`ReadError::UnexpectedEof`].

use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;
use tracing::warn;

/// Errors produced by [`ByteReader`]
#[derive(Debug, Error)]
pub enum ReadError {
    /// Fewer bytes were available than requested (strict mode only)
    #[error("Unexpected end of data at offset {offset:#x}: wanted {wanted} bytes, {available} available")]
    UnexpectedEof {
        /// Offset at which the read started
        offset: u64,
        /// Number of bytes requested
        wanted: u64,
        /// Number of bytes that were actually available
        available: u64,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for reader operations
pub type Result<T> = std::result::Result<T, ReadError>;

/// How short reads are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Short integer reads yield `0`, short byte reads are truncated
    #[default]
    Lenient,
    /// Short reads fail with [`ReadError::UnexpectedEof`]
    Strict,
}

impl ReadMode {
    /// Whether short reads are errors
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Little-endian cursor over any `Read + Seek` source
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    len: u64,
    pos: u64,
    mode: ReadMode,
}

impl<'a> ByteReader<io::Cursor<&'a [u8]>> {
    /// Create a reader over an in-memory buffer
    pub fn from_slice(data: &'a [u8], mode: ReadMode) -> Self {
        Self {
            inner: io::Cursor::new(data),
            len: data.len() as u64,
            pos: 0,
            mode,
        }
    }
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wrap a seekable source, positioned at offset 0
    pub fn new(mut inner: R, mode: ReadMode) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            len,
            pos: 0,
            mode,
        })
    }

    /// Configured read mode
    pub const fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Total length of the source in bytes
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the source is empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position
    pub const fn position(&self) -> u64 {
        self.pos
    }

    /// Bytes between the cursor and end of source (zero past the end)
    pub const fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute offset
    ///
    /// Seeking past the end is allowed; subsequent reads behave as short reads.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Advance the cursor by `count` bytes without reading
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.seek(self.pos.saturating_add(count))
    }

    /// Read as many bytes as possible into `buf`, returning how many were read
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    fn read_array<const N: usize>(&mut self) -> Result<Option<[u8; N]>> {
        let offset = self.pos;
        let mut buf = [0u8; N];
        let got = self.fill(&mut buf)?;
        if got == N {
            return Ok(Some(buf));
        }
        if self.mode.is_strict() {
            return Err(ReadError::UnexpectedEof {
                offset,
                wanted: N as u64,
                available: got as u64,
            });
        }
        Ok(None)
    }

    /// Read a single byte (`0` on a lenient short read)
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?.map_or(0, |b| b[0]))
    }

    /// Read a little-endian `u32` (`0` on a lenient short read)
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_array::<4>()?.map_or(0, u32::from_le_bytes))
    }

    /// Read a little-endian `u64` (`0` on a lenient short read)
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.read_array::<8>()?.map_or(0, u64::from_le_bytes))
    }

    /// Read up to `count` bytes
    ///
    /// In lenient mode the result is truncated to what the source holds.
    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        let available = self.remaining();
        if count > available && self.mode.is_strict() {
            return Err(ReadError::UnexpectedEof {
                offset: self.pos,
                wanted: count,
                available,
            });
        }

        let mut buf = vec![0u8; count.min(available) as usize];
        let got = self.fill(&mut buf)?;
        buf.truncate(got);
        Ok(buf)
    }

    /// Read a `u32` length followed by that many bytes of UTF-8
    ///
    /// Invalid sequences are replaced with U+FFFD rather than rejected.
    pub fn read_length_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        let bytes = self.read_bytes(u64::from(len))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Number of `width`-byte items that fit in the remaining bytes, capped at `count`
    ///
    /// A corrupt count in a lenient read would otherwise produce billions of
    /// zero-filled values.
    fn clamp_count(&self, count: u64, width: u64, what: &str) -> Result<u64> {
        let fits = self.remaining() / width;
        if count <= fits {
            return Ok(count);
        }
        if self.mode.is_strict() {
            return Err(ReadError::UnexpectedEof {
                offset: self.pos,
                wanted: count.saturating_mul(width),
                available: self.remaining(),
            });
        }
        warn!(
            offset = format_args!("{:#x}", self.pos),
            stored = count,
            readable = fits,
            "{what} count exceeds remaining data, truncating"
        );
        Ok(fits)
    }

    /// Read `count` little-endian `u32` values
    pub fn read_u32_vec(&mut self, count: u32) -> Result<Vec<u32>> {
        let count = self.clamp_count(u64::from(count), 4, "u32 table")?;
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Read `count` little-endian `u64` values
    pub fn read_u64_vec(&mut self, count: u32) -> Result<Vec<u64>> {
        let count = self.clamp_count(u64::from(count), 8, "u64 table")?;
        (0..count).map(|_| self.read_u64()).collect()
    }

    /// Consume the reader and return the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }
}
