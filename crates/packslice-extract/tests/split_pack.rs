#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end runs over synthetic TRPFD/TRPFS pairs

mod common;

use packslice_extract::{
    CancelFlag, ErrorKind, ExtractEvent, ExtractOptions, ExtractRequest, ExtractionReport,
    LogLevel, PipelineError, SourceKind, Stage, list, run, spawn,
};
use packslice_formats::{ReadMode, fnv1a_64};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PACKS: &[(&str, &[u8])] = &[
    ("arc/field.trpak", b"FIELD PACK CONTENTS"),
    ("arc/pokemon.trpak", b"PKMN"),
    ("arc/ui/menu.trpak", b"MENU-DATA"),
];

fn run_quiet(request: &ExtractRequest) -> Result<ExtractionReport, PipelineError> {
    run(request, &mut |_: ExtractEvent| {}, &CancelFlag::new())
}

/// Writes a pair whose index lists `names` and whose data holds `packs`
fn pair(dir: &Path, names: &[&str], packs: &[(&str, &[u8])]) -> (PathBuf, PathBuf) {
    (
        common::write(dir, "data.trpfd", &common::trpfd(names)),
        common::write(dir, "data.trpfs", &common::trpfs(packs)),
    )
}

// --- Round trip ---

#[test]
fn extracts_packs_with_derived_sizes() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let (index, data) = pair(dir.path(), &names, PACKS);
    let out = dir.path().join("out");

    let request = ExtractRequest::split_pack(&index, &data, &out);
    assert_eq!(request.source_kind(), SourceKind::SplitPack);

    let report = run_quiet(&request).unwrap();
    assert_eq!(report.written, 3);
    assert!(report.is_complete());

    let mut expected: Vec<(String, Vec<u8>)> = PACKS
        .iter()
        .map(|(n, c)| ((*n).to_string(), c.to_vec()))
        .collect();
    expected.sort();
    assert_eq!(common::snapshot(&out), expected);
}

#[test]
fn index_order_does_not_affect_sizes() {
    let dir = TempDir::new().unwrap();
    // Listed in reverse of their data order
    let (index, data) = pair(
        dir.path(),
        &["arc/ui/menu.trpak", "arc/pokemon.trpak", "arc/field.trpak"],
        PACKS,
    );

    let listing = list(&ExtractRequest::split_pack(&index, &data, dir.path())).unwrap();

    let sizes: Vec<(&str, u64)> = listing
        .entries
        .iter()
        .map(|e| (e.name(), e.size()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("arc/field.trpak", 19),
            ("arc/pokemon.trpak", 4),
            ("arc/ui/menu.trpak", 9),
        ]
    );
    assert_eq!(
        listing.entries.last().and_then(|e| e.end()),
        Some(listing.source_len)
    );
}

#[test]
fn rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let (index, data) = pair(dir.path(), &names, PACKS);
    let out = dir.path().join("out");
    let request = ExtractRequest::split_pack(&index, &data, &out);

    run_quiet(&request).unwrap();
    let first = common::snapshot(&out);
    run_quiet(&request).unwrap();
    assert_eq!(common::snapshot(&out), first);
}

// --- Unmapped names ---

#[test]
fn unmapped_names_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let (index, data) = pair(
        dir.path(),
        &["arc/field.trpak", "arc/missing.trpak", "arc/pokemon.trpak"],
        &PACKS[..2],
    );
    let out = dir.path().join("out");

    let report = run_quiet(&ExtractRequest::split_pack(&index, &data, &out)).unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    let failure = &report.failures[0];
    assert_eq!(failure.kind, ErrorKind::Unmapped);
    assert_eq!(failure.stage, Stage::Parse);
    assert_eq!(failure.entry.as_deref(), Some("arc/missing.trpak"));
    assert!(out.join("arc/pokemon.trpak").exists());
}

#[test]
fn mismatched_map_counts_warn_and_extraction_continues() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let index = common::write(dir.path(), "data.trpfd", &common::trpfd(&names));
    let mut bytes = common::trpfs(PACKS);
    // Hash count sits after 3 offsets and 4 bytes of padding: 16 + 28 + 4 + 24 + 4
    bytes[76..80].copy_from_slice(&2u32.to_le_bytes());
    let data = common::write(dir.path(), "data.trpfs", &bytes);
    let out = dir.path().join("out");

    let mut events = Vec::new();
    let report = run(
        &ExtractRequest::split_pack(&index, &data, &out),
        &mut |e: ExtractEvent| events.push(e),
        &CancelFlag::new(),
    )
    .unwrap();

    let warned = events.iter().any(|e| {
        matches!(
            e,
            ExtractEvent::Log { level: LogLevel::Warn, message }
                if message.contains("3 offsets but 2 hashes")
        )
    });
    assert!(warned, "no count mismatch warning in {events:?}");

    // The third pack's hash was never read, so it is unmapped and the second
    // pack runs to the end of the file
    assert_eq!(report.written, 2);
    assert_eq!(report.count_of(ErrorKind::Unmapped), 1);
    assert_eq!(
        std::fs::read(out.join("arc/pokemon.trpak")).unwrap(),
        b"PKMNMENU-DATA"
    );
    assert!(matches!(events.last(), Some(ExtractEvent::Finished(_))));
}

// --- Fatal input errors ---

#[test]
fn duplicate_offsets_abort_before_writing() {
    let dir = TempDir::new().unwrap();
    let index = common::write(
        dir.path(),
        "data.trpfd",
        &common::trpfd(&["a.trpak", "b.trpak"]),
    );
    let mut bytes = common::trpfs(&[("a.trpak", b"AAAA"), ("b.trpak", b"BBBB")]);
    // Point the second offset at the first pack (offsets start at 16 + 28 + 4)
    let first = 48;
    let copy: [u8; 8] = bytes[first..first + 8].try_into().unwrap();
    bytes[first + 8..first + 16].copy_from_slice(&copy);
    let data = common::write(dir.path(), "data.trpfs", &bytes);
    let out = dir.path().join("out");

    let err = run_quiet(&ExtractRequest::split_pack(&index, &data, &out)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert!(matches!(err, PipelineError::Consistency(_)));
    assert!(!out.exists());
}

#[test]
fn bad_signature_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let index = common::write(dir.path(), "data.trpfd", &common::trpfd(&["a"]));
    let data = common::write(dir.path(), "data.trpfs", b"TWOPACK\0garbage");

    let err = run_quiet(&ExtractRequest::split_pack(&index, &data, dir.path().join("out")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn truncated_index_depends_on_read_mode() {
    let dir = TempDir::new().unwrap();
    let mut index_bytes = common::trpfd(&["arc/field.trpak", "arc/pokemon.trpak"]);
    index_bytes.truncate(index_bytes.len() - 3);
    let index = common::write(dir.path(), "data.trpfd", &index_bytes);
    let data = common::write(dir.path(), "data.trpfs", &common::trpfs(PACKS));

    let lenient = ExtractRequest::split_pack(&index, &data, dir.path().join("lenient"));
    let report = run_quiet(&lenient).unwrap();
    // The truncated name no longer hashes to a mapped pack
    assert_eq!(report.written, 1);
    assert_eq!(report.count_of(ErrorKind::Unmapped), 1);

    let strict = ExtractRequest::split_pack(&index, &data, dir.path().join("strict"))
        .with_options(ExtractOptions::default().with_read_mode(ReadMode::Strict));
    let err = run_quiet(&strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(!dir.path().join("strict").exists());
}

#[test]
fn existing_output_dir_required_when_creation_disabled() {
    let dir = TempDir::new().unwrap();
    let (index, data) = pair(dir.path(), &["arc/pokemon.trpak"], &PACKS[1..2]);
    let request = ExtractRequest::split_pack(&index, &data, dir.path().join("absent"))
        .with_options(ExtractOptions::default().with_create_output_dir(false));

    let err = run_quiet(&request).unwrap_err();
    assert!(matches!(err, PipelineError::OutputDir { .. }));
}

// --- Background task ---

#[tokio::test]
async fn spawned_run_streams_events() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let (index, data) = pair(dir.path(), &names, PACKS);

    let mut task = spawn(ExtractRequest::split_pack(&index, &data, dir.path().join("out")));
    let mut progress = 0;
    let mut finished = None;
    while let Some(event) = task.events.recv().await {
        match event {
            ExtractEvent::Progress { .. } => progress += 1,
            ExtractEvent::Finished(report) => finished = Some(report),
            ExtractEvent::Log { .. } => {}
        }
    }

    let report = task.handle.await.unwrap().unwrap();
    assert_eq!(progress, 3);
    assert_eq!(finished, Some(report));
}

#[tokio::test]
async fn cancelled_task_keeps_written_files() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let (index, data) = pair(dir.path(), &names, PACKS);
    let out = dir.path().join("out");

    let task = spawn(ExtractRequest::split_pack(&index, &data, &out));
    task.cancel.cancel();
    let report = task.handle.await.unwrap().unwrap();

    // Cancellation lands before some entry; whatever was written stays
    assert!(report.written <= 3);
    assert_eq!(common::snapshot(&out).len(), report.written);
    if report.cancelled {
        assert!(report.written < 3);
    }
}

#[test]
fn cancel_flag_set_before_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let names: Vec<&str> = PACKS.iter().map(|(n, _)| *n).collect();
    let (index, data) = pair(dir.path(), &names, PACKS);
    let out = dir.path().join("out");
    let cancel = CancelFlag::new();
    cancel.cancel();

    let report = run(
        &ExtractRequest::split_pack(&index, &data, &out),
        &mut |_: ExtractEvent| {},
        &cancel,
    )
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.written, 0);
    assert!(common::snapshot(&out).is_empty());
}

#[test]
fn hash_join_is_on_raw_name_bytes() {
    // Case differs, so the hash differs and the pack is unmapped
    assert_ne!(fnv1a_64(b"arc/Field.trpak"), fnv1a_64(b"arc/field.trpak"));

    let dir = TempDir::new().unwrap();
    let (index, data) = pair(dir.path(), &["arc/Field.trpak"], &PACKS[..1]);
    let listing = list(&ExtractRequest::split_pack(&index, &data, dir.path())).unwrap();

    assert!(listing.entries.is_empty());
    assert_eq!(listing.unmapped.len(), 1);
}
