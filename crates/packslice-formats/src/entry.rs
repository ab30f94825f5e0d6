//! Named byte range recovered from a container

use serde::Serialize;

/// One embedded file: a name and an absolute byte range in its source
///
/// Built once by a parser and never mutated. `data_offset` is always absolute
/// within the source the entry was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArchiveEntry {
    name: String,
    data_offset: u64,
    size: u64,
}

impl ArchiveEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>, data_offset: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            data_offset,
            size,
        }
    }

    /// Archive-internal name (may contain `/` separators)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute start offset in the source
    pub const fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Length in bytes
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Exclusive end offset, `None` if it overflows `u64`
    pub const fn end(&self) -> Option<u64> {
        self.data_offset.checked_add(self.size)
    }

    /// Whether the whole range lies within a source of `source_len` bytes
    pub fn fits_within(&self, source_len: u64) -> bool {
        self.end().is_some_and(|end| end <= source_len)
    }
}
