//! Synthetic container builders shared by the integration tests

#![allow(dead_code)]

use packslice_formats::fnv1a_64;
use std::fs;
use std::path::{Path, PathBuf};

/// PFS0 archive holding `files` in order
pub fn pfs0(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut strings = Vec::new();
    let mut table = Vec::new();
    let mut data = Vec::new();

    for (name, contents) in files {
        table.extend_from_slice(&(data.len() as u64).to_le_bytes());
        table.extend_from_slice(&(contents.len() as u64).to_le_bytes());
        table.extend_from_slice(&(strings.len() as u32).to_le_bytes());
        table.extend_from_slice(&[0; 4]);
        strings.extend_from_slice(name.as_bytes());
        strings.push(0);
        data.extend_from_slice(contents);
    }

    let mut out = b"PFS0".to_vec();
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.extend_from_slice(&(strings.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&table);
    out.extend_from_slice(&strings);
    out.extend_from_slice(&data);
    out
}

/// TRPFD name index listing `names`
pub fn trpfd(names: &[&str]) -> Vec<u8> {
    let mut out = vec![0u8; 0x1C];
    out.extend_from_slice(&4u32.to_le_bytes());
    let base = out.len();
    out.extend_from_slice(&(names.len() as u32).to_le_bytes());
    let table = out.len();
    out.resize(table + names.len() * 4, 0);

    for (i, name) in names.iter().enumerate() {
        let rel = (out.len() - (base + 4 + i * 4)) as u32;
        out[table + i * 4..table + i * 4 + 4].copy_from_slice(&rel.to_le_bytes());
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
    }
    out
}

/// TRPFS data file mapping each `(name, contents)` by the name's hash
///
/// Pack data is laid out after the map in the order given.
pub fn trpfs(packs: &[(&str, &[u8])]) -> Vec<u8> {
    let hashed: Vec<(u64, &[u8])> = packs
        .iter()
        .map(|(name, contents)| (fnv1a_64(name.as_bytes()), *contents))
        .collect();
    trpfs_hashed(&hashed)
}

/// TRPFS data file with explicit hashes
pub fn trpfs_hashed(packs: &[(u64, &[u8])]) -> Vec<u8> {
    const MAP_START: u64 = 16;
    let n = packs.len() as u64;
    let mut offset = MAP_START + 28 + 4 + 8 * n + 4 + 4 + 8 * n;

    let mut out = b"ONEPACK\0".to_vec();
    out.extend_from_slice(&MAP_START.to_le_bytes());
    out.extend_from_slice(&[0; 28]);
    out.extend_from_slice(&(n as u32).to_le_bytes());
    for (_, contents) in packs {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += contents.len() as u64;
    }
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(n as u32).to_le_bytes());
    for (hash, _) in packs {
        out.extend_from_slice(&hash.to_le_bytes());
    }
    for (_, contents) in packs {
        out.extend_from_slice(contents);
    }
    out
}

/// Write `bytes` to `dir/name` and return the path
pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Every file below `root` as `(relative path with '/', contents)`, sorted
pub fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.push((relative, fs::read(&path).unwrap()));
        }
    }
}
