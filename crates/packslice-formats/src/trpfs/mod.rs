//! TRPFS data map parsing
//!
//! A TRPFS file holds the pack data itself plus a map from pack hash to the
//! absolute offset of each pack. It carries no names and no sizes.
//!
//! ```text
//! 0x00:              "ONEPACK\0"
//! 0x08:              u64 offsets_start
//! offsets_start+28:  u32 pack_count, u64 offset[pack_count]
//!                    4 bytes padding
//!                    u32 hash_count, u64 hash[hash_count]
//! ```
//!
//! Offsets and hashes are paired by position. If the two counts differ the
//! map is truncated to the shorter list and a warning is logged.

mod error;

pub use error::{Result, TrpfsError};

use crate::reader::{ByteReader, ReadMode};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// File signature
pub const ONEPACK_SIGNATURE: [u8; 8] = *b"ONEPACK\0";

/// Distance from `offsets_start` to the pack count
pub const OFFSET_TABLE_SKIP: u64 = 28;

/// Padding between the offset list and the hash count
pub const HASH_TABLE_PADDING: u64 = 4;

/// Parsed TRPFS map from pack hash to absolute offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataMap {
    offsets: HashMap<u64, u64>,
    file_size: u64,
    offsets_start: u64,
    offsets_read: usize,
    hashes_read: usize,
}

impl DataMap {
    /// Open and parse a TRPFS file
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut reader = ByteReader::new(file, mode)?;
        Self::parse(&mut reader)
    }

    /// Parse from a reader over the whole TRPFS file
    pub fn parse<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        reader.seek(0)?;
        let signature = reader.read_bytes(reader.remaining().min(8))?;
        if signature != ONEPACK_SIGNATURE {
            return Err(TrpfsError::InvalidSignature {
                found: String::from_utf8_lossy(&signature).into_owned(),
            });
        }

        let offsets_start = reader.read_u64()?;
        reader.seek(offsets_start.saturating_add(OFFSET_TABLE_SKIP))?;

        let pack_count = reader.read_u32()?;
        let pack_offsets = reader.read_u64_vec(pack_count)?;
        reader.skip(HASH_TABLE_PADDING)?;
        let hash_count = reader.read_u32()?;
        let pack_hashes = reader.read_u64_vec(hash_count)?;

        debug!(
            offsets_start = format_args!("{:#x}", offsets_start),
            pack_count,
            hash_count,
            "parsed TRPFS map"
        );

        if pack_offsets.len() != pack_hashes.len() {
            warn!(
                offsets = pack_offsets.len(),
                hashes = pack_hashes.len(),
                "TRPFS offset and hash counts differ, pairing the shorter list"
            );
        }

        let mut offsets = HashMap::with_capacity(pack_offsets.len().min(pack_hashes.len()));
        for (hash, offset) in pack_hashes.iter().zip(&pack_offsets) {
            if let Some(previous) = offsets.insert(*hash, *offset) {
                debug!(
                    hash = format_args!("{:016x}", hash),
                    previous, offset, "duplicate pack hash, keeping last"
                );
            }
        }

        Ok(Self {
            offsets,
            file_size: reader.len(),
            offsets_start,
            offsets_read: pack_offsets.len(),
            hashes_read: pack_hashes.len(),
        })
    }

    /// Absolute offset of the pack with `hash`
    pub fn get(&self, hash: u64) -> Option<u64> {
        self.offsets.get(&hash).copied()
    }

    /// Number of mapped packs
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether no packs are mapped
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate `(hash, offset)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.offsets.iter().map(|(h, o)| (*h, *o))
    }

    /// Size of the TRPFS file in bytes
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Offset of the map sub-structure
    pub const fn offsets_start(&self) -> u64 {
        self.offsets_start
    }

    /// `(offsets, hashes)` read when the two lists had different lengths
    pub fn count_mismatch(&self) -> Option<(usize, usize)> {
        (self.offsets_read != self.hashes_read).then_some((self.offsets_read, self.hashes_read))
    }
}

impl FromIterator<(u64, u64)> for DataMap {
    /// Build a map directly from `(hash, offset)` pairs; `file_size` is left at 0
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let offsets: HashMap<u64, u64> = iter.into_iter().collect();
        let n = offsets.len();
        Self {
            offsets,
            offsets_read: n,
            hashes_read: n,
            ..Self::default()
        }
    }
}
