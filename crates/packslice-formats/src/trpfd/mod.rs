//! TRPFD name index parsing
//!
//! The name index lists every pack by name but stores no offsets or sizes.
//! Names are located through a table of self-relative pointers:
//!
//! ```text
//! 0x1C:  u32 rel           base = 0x1C + rel
//! base:  u32 count
//!        u32 rel[count]    name[i] at base + 4 + i*4 + rel[i]
//! name:  u32 len, len bytes (normally UTF-8)
//! ```
//!
//! Each name is hashed with FNV-1a over its stored bytes to produce the key
//! used by the TRPFS map. Decoding for display happens afterwards and never
//! affects the hash.

mod error;

pub use error::{Result, TrpfdError};

use crate::fnv::fnv1a_64;
use crate::reader::{ByteReader, ReadMode};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Fixed offset of the pointer to the name table
pub const NAME_TABLE_POINTER_OFFSET: u64 = 0x1C;

/// A pack name and its FNV-1a hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackInfo {
    name: String,
    hash: u64,
}

impl PackInfo {
    /// Create from a name, deriving the hash from its UTF-8 bytes
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = fnv1a_64(name.as_bytes());
        Self { name, hash }
    }

    /// Create from the bytes stored in the index
    ///
    /// The hash covers `raw` exactly; the name is a lossy UTF-8 decoding of
    /// it, so an invalid sequence still joins against the data map.
    pub fn from_raw(raw: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(raw).into_owned(),
            hash: fnv1a_64(raw),
        }
    }

    /// Pack name as listed in the index
    pub fn name(&self) -> &str {
        &self.name
    }

    /// FNV-1a hash of the name
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

/// Parsed TRPFD name index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    packs: Vec<PackInfo>,
}

impl NameIndex {
    /// Open and parse a name index file
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut reader = ByteReader::new(file, mode)?;
        Self::parse(&mut reader)
    }

    /// Parse from a reader positioned anywhere in the file
    pub fn parse<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        reader.seek(NAME_TABLE_POINTER_OFFSET)?;
        let base = NAME_TABLE_POINTER_OFFSET + u64::from(reader.read_u32()?);

        reader.seek(base)?;
        let count = reader.read_u32()?;
        let relative = reader.read_u32_vec(count)?;

        debug!(
            base = format_args!("{:#x}", base),
            count,
            readable = relative.len(),
            "parsed TRPFD name table"
        );

        let mut packs = Vec::with_capacity(relative.len());
        for (i, rel) in relative.iter().enumerate() {
            let location = base + 4 + (i as u64) * 4 + u64::from(*rel);
            reader.seek(location)?;
            let len = reader.read_u32()?;
            let raw = reader.read_bytes(u64::from(len))?;
            packs.push(PackInfo::from_raw(&raw));
        }

        Ok(Self { packs })
    }

    /// Packs in listed order
    pub fn packs(&self) -> &[PackInfo] {
        &self.packs
    }

    /// Number of packs
    pub fn len(&self) -> usize {
        self.packs.len()
    }

    /// Whether the index lists no packs
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{trpfd_bytes, trpfd_raw_bytes};
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8], mode: ReadMode) -> Result<NameIndex> {
        NameIndex::parse(&mut ByteReader::from_slice(data, mode))
    }

    #[test]
    fn test_parse_names_in_listed_order() {
        let data = trpfd_bytes(&["arc/field.trpak", "arc/battle.trpak", "arc/ui.trpak"]);
        let index = parse(&data, ReadMode::Strict).unwrap();

        let names: Vec<_> = index.packs().iter().map(PackInfo::name).collect();
        assert_eq!(names, vec!["arc/field.trpak", "arc/battle.trpak", "arc/ui.trpak"]);
    }

    #[test]
    fn test_hash_matches_name_bytes() {
        let data = trpfd_bytes(&["arc/field.trpak"]);
        let index = parse(&data, ReadMode::Strict).unwrap();

        assert_eq!(index.packs()[0].hash(), fnv1a_64(b"arc/field.trpak"));
    }

    #[test]
    fn test_invalid_utf8_name_hashes_stored_bytes() {
        let raw: &[u8] = b"a/\xFFx";
        let data = trpfd_raw_bytes(&[raw]);
        let index = parse(&data, ReadMode::Lenient).unwrap();

        let pack = &index.packs()[0];
        assert_eq!(pack.hash(), fnv1a_64(raw));
        assert_ne!(pack.hash(), fnv1a_64(pack.name().as_bytes()));
        assert_eq!(pack.name(), "a/\u{FFFD}x");
    }

    #[test]
    fn test_utf8_name_constructors_agree() {
        assert_eq!(
            PackInfo::from_raw("arc/ui.trpak".as_bytes()),
            PackInfo::new("arc/ui.trpak")
        );
    }

    #[test]
    fn test_empty_index() {
        let data = trpfd_bytes(&[]);
        assert!(parse(&data, ReadMode::Strict).unwrap().is_empty());
    }

    #[test]
    fn test_lenient_truncated_file_yields_zero_fields() {
        // File ends right after the pointer: base points past EOF, count reads as 0
        let data = trpfd_bytes(&["a"]);
        let index = parse(&data[..0x20], ReadMode::Lenient).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_lenient_truncated_name_is_shortened() {
        let data = trpfd_bytes(&["arc/field.trpak"]);
        let cut = data.len() - 6;
        let index = parse(&data[..cut], ReadMode::Lenient).unwrap();
        assert_eq!(index.packs()[0].name(), "arc/field");
    }

    #[test]
    fn test_strict_truncated_file_fails() {
        let data = trpfd_bytes(&["arc/field.trpak"]);
        let cut = data.len() - 6;
        assert!(matches!(
            parse(&data[..cut], ReadMode::Strict),
            Err(TrpfdError::Read(_))
        ));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.trpfd");
        std::fs::write(&path, trpfd_bytes(&["x", "y"])).unwrap();

        let index = NameIndex::open(&path, ReadMode::Lenient).unwrap();
        assert_eq!(index.len(), 2);
    }
}
