mod error;

pub use error::{PackMapError, Result};

use crate::ArchiveEntry;
use crate::trpfd::PackInfo;
use crate::trpfs::DataMap;
use serde::Serialize;
use tracing::debug;

/// A pack name joined to its absolute offset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackMapEntry {
    name: String,
    offset: u64,
}

impl PackMapEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Pack name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute offset in the data file
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

/// Outcome of joining names to offsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinResult {
    /// Packs found in the map, in name index order
    pub mapped: Vec<PackMapEntry>,
    /// Packs whose hash has no offset
    pub unmapped: Vec<PackInfo>,
}

/// Look up every pack's hash in `map`
///
/// Order of `mapped` follows `packs`; no sorting happens here.
pub fn join(packs: &[PackInfo], map: &DataMap) -> JoinResult {
    let mut result = JoinResult::default();
    for pack in packs {
        match map.get(pack.hash()) {
            Some(offset) => result.mapped.push(PackMapEntry::new(pack.name(), offset)),
            None => result.unmapped.push(pack.clone()),
        }
    }

    debug!(
        mapped = result.mapped.len(),
        unmapped = result.unmapped.len(),
        "joined name index to data map"
    );
    result
}

/// Sort by offset and derive each pack's size from the next pack's offset
///
/// The last pack runs to `data_len`. Offsets must be strictly ascending once
/// sorted and the last must lie before `data_len`, so every derived size is
/// positive.
pub fn derive_sizes(mut entries: Vec<PackMapEntry>, data_len: u64) -> Result<Vec<ArchiveEntry>> {
    entries.sort_by_key(PackMapEntry::offset);

    if let Some(pair) = entries.windows(2).find(|w| w[0].offset == w[1].offset) {
        return Err(PackMapError::DuplicateOffset {
            offset: pair[0].offset,
            first: pair[0].name.clone(),
            second: pair[1].name.clone(),
        });
    }

    if let Some(last) = entries.last() {
        if last.offset >= data_len {
            return Err(PackMapError::OffsetBeyondEnd {
                name: last.name.clone(),
                offset: last.offset,
                data_len,
            });
        }
    }

    let ends: Vec<u64> = entries
        .iter()
        .skip(1)
        .map(PackMapEntry::offset)
        .chain(std::iter::once(data_len))
        .collect();

    Ok(entries
        .into_iter()
        .zip(ends)
        .map(|(entry, end)| ArchiveEntry::new(entry.name, entry.offset, end - entry.offset))
        .collect())
}
