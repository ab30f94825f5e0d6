//! Synthetic fixtures for parser tests
//!
//! Builds minimal well-formed inputs in memory so tests don't depend on
//! game files.

/// Build a PFS0 archive holding `files` in order
pub fn pfs0_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut string_table = Vec::new();
    let mut table = Vec::new();
    let mut data = Vec::new();

    for (name, contents) in files {
        table.extend_from_slice(&(data.len() as u64).to_le_bytes());
        table.extend_from_slice(&(contents.len() as u64).to_le_bytes());
        table.extend_from_slice(&(string_table.len() as u32).to_le_bytes());
        table.extend_from_slice(&0u32.to_le_bytes());
        string_table.extend_from_slice(name.as_bytes());
        string_table.push(0);
        data.extend_from_slice(contents);
    }

    // Real archives pad the string table; keep that quirk in the fixtures
    while string_table.len() % 0x20 != 0 {
        string_table.push(0);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"PFS0");
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.extend_from_slice(&(string_table.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&table);
    out.extend_from_slice(&string_table);
    out.extend_from_slice(&data);
    out
}

/// Build a TRPFD name index listing `names` in order
pub fn trpfd_bytes(names: &[&str]) -> Vec<u8> {
    let raw: Vec<&[u8]> = names.iter().map(|n| n.as_bytes()).collect();
    trpfd_raw_bytes(&raw)
}

/// Build a TRPFD name index from raw name bytes, which need not be UTF-8
pub fn trpfd_raw_bytes(names: &[&[u8]]) -> Vec<u8> {
    // Header padding up to the structural pointer
    let mut out = vec![0u8; 0x1C];
    // base = 0x1C + 4 = 0x20
    out.extend_from_slice(&4u32.to_le_bytes());
    let base = out.len();
    out.extend_from_slice(&(names.len() as u32).to_le_bytes());

    let table_start = out.len();
    out.resize(table_start + names.len() * 4, 0);

    for (i, name) in names.iter().enumerate() {
        let slot = table_start + i * 4;
        let relative = (out.len() - (base + 4 + i * 4)) as u32;
        out[slot..slot + 4].copy_from_slice(&relative.to_le_bytes());
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name);
    }
    out
}

/// Offset of the map sub-structure in fixtures built by [`trpfs_bytes`]
pub const TRPFS_MAP_START: u64 = 16;

/// Build a TRPFS data file whose map lists `packs` as `(hash, contents)`
///
/// Pack data follows the map in the given order; the map's offsets point at
/// each pack's first byte.
pub fn trpfs_bytes(packs: &[(u64, &[u8])]) -> Vec<u8> {
    let n = packs.len() as u64;
    let map_len = 28 + 4 + 8 * n + 4 + 4 + 8 * n;
    let mut offset = TRPFS_MAP_START + map_len;

    let mut offsets = Vec::new();
    for (_, contents) in packs {
        offsets.push(offset);
        offset += contents.len() as u64;
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"ONEPACK\0");
    out.extend_from_slice(&TRPFS_MAP_START.to_le_bytes());
    out.extend_from_slice(&[0u8; 28]);
    out.extend_from_slice(&(n as u32).to_le_bytes());
    for o in &offsets {
        out.extend_from_slice(&o.to_le_bytes());
    }
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&(n as u32).to_le_bytes());
    for (hash, _) in packs {
        out.extend_from_slice(&hash.to_le_bytes());
    }
    for (_, contents) in packs {
        out.extend_from_slice(contents);
    }
    out
}
