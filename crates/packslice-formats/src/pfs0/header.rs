//! PFS0 header and file table records

use crate::pfs0::error::{Pfs0Error, Result};
use binrw::BinRead;

/// Size of the fixed PFS0 header in bytes
pub const HEADER_SIZE: u64 = 16;

/// Size of one file table entry in bytes
pub const FILE_ENTRY_SIZE: u64 = 24;

/// Magic tag bytes
pub const PFS0_MAGIC: [u8; 4] = *b"PFS0";

/// Magic tag read as a little-endian `u32`
pub const PFS0_MAGIC_LE: u32 = 0x3053_4650;

/// PFS0 header (16 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Pfs0Header {
    /// Magic tag, `PFS0`
    pub magic: [u8; 4],
    /// Number of entries in the file table
    pub file_count: u32,
    /// Size of the string table in bytes
    pub string_table_size: u32,
    /// Reserved
    pub reserved: u32,
}

impl Pfs0Header {
    /// Check the magic tag
    pub fn validate(&self) -> Result<()> {
        if u32::from_le_bytes(self.magic) != PFS0_MAGIC_LE {
            return Err(Pfs0Error::InvalidMagic {
                found: String::from_utf8_lossy(&self.magic).into_owned(),
                raw: self.magic,
            });
        }
        Ok(())
    }

    /// Offset of the string table (immediately after the file table)
    pub fn string_table_start(&self) -> u64 {
        HEADER_SIZE + u64::from(self.file_count) * FILE_ENTRY_SIZE
    }

    /// Offset of the data section (immediately after the string table)
    pub fn data_section_start(&self) -> u64 {
        self.string_table_start() + u64::from(self.string_table_size)
    }
}

/// One file table entry (24 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Pfs0FileEntry {
    /// Offset relative to the start of the data section
    pub data_offset: u64,
    /// Size in bytes
    pub size: u64,
    /// Offset of the NUL-terminated name within the string table
    pub string_offset: u32,
    /// Reserved
    pub reserved: u32,
}
