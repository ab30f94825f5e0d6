//! PFS0 indexed archive parsing
//!
//! # Layout
//!
//! ```text
//! +--------------------+ 0x00
//! | Header (16 bytes)  |  magic "PFS0", file_count, string_table_size, reserved
//! +--------------------+ 0x10
//! | File table         |  file_count x 24 bytes
//! +--------------------+
//! | String table       |  string_table_size bytes of NUL-terminated names
//! +--------------------+ data_section_start
//! | Data section       |  to end of file
//! +--------------------+
//! ```
//!
//! Entry offsets in the file table are relative to `data_section_start`;
//! [`Pfs0Archive`] rebases them so every [`ArchiveEntry`] it returns carries
//! an absolute offset.
//!
//! # Example
//!
//! ```
//! use packslice_formats::pfs0::Pfs0Archive;
//!
//! let data = b"XXXX\0\0\0\0\0\0\0\0\0\0\0\0";
//! assert!(Pfs0Archive::parse(data).is_err());
//! ```

mod error;
mod header;

pub use error::{Pfs0Error, Result};
pub use header::{
    FILE_ENTRY_SIZE, HEADER_SIZE, PFS0_MAGIC, PFS0_MAGIC_LE, Pfs0FileEntry, Pfs0Header,
};

use crate::ArchiveEntry;
use binrw::BinRead;
use std::io::Cursor;
use tracing::{debug, info};

/// Parsed PFS0 archive
#[derive(Debug, Clone)]
pub struct Pfs0Archive {
    header: Pfs0Header,
    file_table: Vec<Pfs0FileEntry>,
    entries: Vec<ArchiveEntry>,
    data_section_start: u64,
    source_len: u64,
}

impl Pfs0Archive {
    /// Parse a whole-file buffer
    ///
    /// Fails on a short input, a bad magic tag, or tables that extend past
    /// the end of `data`. Entries whose data range is out of bounds are kept;
    /// use [`Pfs0Archive::is_in_bounds`] to tell them apart.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let len = data.len() as u64;
        if len < HEADER_SIZE {
            return Err(Pfs0Error::TooSmall {
                len,
                min: HEADER_SIZE,
            });
        }

        let mut cursor = Cursor::new(data);
        let header = Pfs0Header::read(&mut cursor)?;
        header.validate()?;

        info!(file_count = header.file_count, "PFS0 header found");

        let string_table_start = header.string_table_start();
        if string_table_start > len {
            return Err(Pfs0Error::TruncatedFileTable {
                file_count: header.file_count,
                table_end: string_table_start,
                len,
            });
        }

        let data_section_start = header.data_section_start();
        if data_section_start > len {
            return Err(Pfs0Error::TruncatedStringTable {
                table_end: data_section_start,
                len,
            });
        }

        let file_table = (0..header.file_count)
            .map(|_| Pfs0FileEntry::read(&mut cursor))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        // Both bounds were checked against `len` above
        let string_table = &data[string_table_start as usize..data_section_start as usize];

        debug!(
            string_table_start = format_args!("{:#x}", string_table_start),
            data_section_start = format_args!("{:#x}", data_section_start),
            string_table_size = header.string_table_size,
            "parsed PFS0 tables"
        );

        let entries = file_table
            .iter()
            .map(|raw| {
                ArchiveEntry::new(
                    name_at(string_table, raw.string_offset),
                    data_section_start.saturating_add(raw.data_offset),
                    raw.size,
                )
            })
            .collect();

        Ok(Self {
            header,
            file_table,
            entries,
            data_section_start,
            source_len: len,
        })
    }

    /// Archive header
    pub const fn header(&self) -> &Pfs0Header {
        &self.header
    }

    /// Raw file table entries, in file order
    pub fn file_table(&self) -> &[Pfs0FileEntry] {
        &self.file_table
    }

    /// Entries with absolute offsets, in file order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Consume the archive, returning its entries
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    /// Absolute offset of the data section
    pub const fn data_section_start(&self) -> u64 {
        self.data_section_start
    }

    /// Length of the buffer the archive was parsed from
    pub const fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Whether `entry`'s data lies within the parsed buffer
    ///
    /// Entries that don't are usually references to content stored
    /// elsewhere.
    pub fn is_in_bounds(&self, entry: &ArchiveEntry) -> bool {
        entry.fits_within(self.source_len)
    }

    /// Number of entries whose data lies within the parsed buffer
    pub fn in_bounds_count(&self) -> usize {
        self.entries.iter().filter(|e| self.is_in_bounds(e)).count()
    }
}

/// NUL-terminated name starting at `offset` in the string table
///
/// A missing terminator runs to the end of the table; an offset outside the
/// table yields an empty name.
fn name_at(table: &[u8], offset: u32) -> String {
    let Some(tail) = table.get(offset as usize..) else {
        return String::new();
    };
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}
