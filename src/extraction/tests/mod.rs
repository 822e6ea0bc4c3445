use crate::error::{Error, Result};
use crate::extraction::{self, EntryInfo, ExtractionEngine, ZipEngine};
use crate::resources::MemoryResourceStore;
use crate::types::{ArchiveSpec, CancelHandle, ResolvedPaths};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn paths_in(dir: &TempDir) -> ResolvedPaths {
    ResolvedPaths {
        work_dir: dir.path().to_path_buf(),
        archive_file: dir.path().join("setup.cab"),
    }
}

fn empty_spec() -> ArchiveSpec {
    ArchiveSpec::new(Arc::new(MemoryResourceStore::new()))
}

/// Engine scripted with a fixed entry table; writes zero-filled files
struct ScriptedEngine {
    entries: Vec<(&'static str, u64)>,
}

impl ExtractionEngine for ScriptedEngine {
    fn extract(
        &self,
        _archive: &Path,
        dest: &Path,
        before: extraction::BeforeEntry<'_>,
        after: extraction::AfterEntry<'_>,
    ) -> Result<()> {
        for (name, size) in &self.entries {
            before(&EntryInfo {
                name: (*name).to_string(),
                size: *size,
            })?;
            let path = dest.join(name);
            std::fs::write(&path, vec![0u8; *size as usize]).map_err(|e| Error::Io {
                path: path.clone(),
                source: e,
            })?;
            after(&path);
        }
        Ok(())
    }
}

/// Engine that fails mid-run with a non-extraction fault
struct BrokenPipeEngine;

impl ExtractionEngine for BrokenPipeEngine {
    fn extract(
        &self,
        _archive: &Path,
        _dest: &Path,
        before: extraction::BeforeEntry<'_>,
        _after: extraction::AfterEntry<'_>,
    ) -> Result<()> {
        before(&EntryInfo {
            name: "a.txt".to_string(),
            size: 1,
        })?;
        Err(Error::Io {
            path: "/dev/full".into(),
            source: std::io::Error::other("no space left on device"),
        })
    }
}

/// Create a ZIP archive containing the given files (stored, no compression)
fn create_zip_archive(archive_path: &Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content).unwrap();
    }
    writer.finish().unwrap();
}

// ---------------------------------------------------------------------------
// Extractor hook wiring
// ---------------------------------------------------------------------------

#[test]
fn emits_one_status_line_per_entry_with_human_size() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let engine = ScriptedEngine {
        entries: vec![("a.txt", 5), ("b.bin", 2048)],
    };

    let lines = Mutex::new(Vec::new());
    let entries = extraction::extract(
        &engine,
        &empty_spec(),
        &paths,
        &|line| lines.lock().unwrap().push(line.to_string()),
        &CancelHandle::new(),
    )
    .unwrap();

    assert_eq!(entries, 2);
    let lines = lines.into_inner().unwrap();
    assert_eq!(lines, vec!["a.txt - 5 bytes", "b.bin - 2.0 KB"]);
}

#[test]
fn before_and_after_pair_once_per_entry() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let engine = ScriptedEngine {
        entries: vec![("a.txt", 5)],
    };

    let statuses = AtomicUsize::new(0);
    let entries = extraction::extract(
        &engine,
        &empty_spec(),
        &paths,
        &|_| {
            statuses.fetch_add(1, Ordering::SeqCst);
        },
        &CancelHandle::new(),
    )
    .unwrap();

    // One before (status line) and one after (entry count) for the entry
    assert_eq!(statuses.load(Ordering::SeqCst), 1);
    assert_eq!(entries, 1);
    assert_eq!(
        std::fs::metadata(dir.path().join("a.txt")).unwrap().len(),
        5
    );
}

#[test]
fn cancellation_at_entry_boundary_stops_remaining_entries() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let engine = ScriptedEngine {
        entries: vec![("one.txt", 4), ("two.txt", 4), ("three.txt", 4)],
    };

    // Flag during the second entry's status line; its cancellation check
    // runs right after, so entry 2 and 3 are never written.
    let cancel = CancelHandle::new();
    let flag = cancel.clone();
    let seen = AtomicUsize::new(0);
    let on_status = move |_: &str| {
        if seen.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
            flag.cancel();
        }
    };

    let err = extraction::extract(&engine, &empty_spec(), &paths, &on_status, &cancel)
        .unwrap_err();
    assert!(err.is_cancelled());

    assert!(dir.path().join("one.txt").exists());
    assert!(!dir.path().join("two.txt").exists());
    assert!(!dir.path().join("three.txt").exists());
}

#[test]
fn cancellation_message_comes_from_the_spec() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let engine = ScriptedEngine {
        entries: vec![("a.txt", 1)],
    };
    let spec = empty_spec().with_cancel_message("Aborted by operator");

    let cancel = CancelHandle::new();
    cancel.cancel();

    let err = extraction::extract(&engine, &spec, &paths, &|_| {}, &cancel).unwrap_err();
    assert_eq!(err.to_string(), "Aborted by operator");
}

#[test]
fn non_extraction_engine_fault_is_wrapped_naming_the_archive() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);

    let err = extraction::extract(
        &BrokenPipeEngine,
        &empty_spec(),
        &paths,
        &|_| {},
        &CancelHandle::new(),
    )
    .unwrap_err();

    match err {
        Error::Extraction { archive, reason } => {
            assert_eq!(archive, paths.archive_file);
            assert!(reason.contains("no space left on device"));
        }
        other => panic!("expected Extraction, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// ZipEngine
// ---------------------------------------------------------------------------

#[test]
fn zip_engine_extracts_entries_in_table_order() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    create_zip_archive(
        &paths.archive_file,
        &[("a.txt", b"hello"), ("nested/b.txt", b"world!")],
    );

    let lines = Mutex::new(Vec::new());
    let entries = extraction::extract(
        &ZipEngine::new(),
        &empty_spec(),
        &paths,
        &|line| lines.lock().unwrap().push(line.to_string()),
        &CancelHandle::new(),
    )
    .unwrap();

    assert_eq!(entries, 2);
    assert_eq!(
        std::fs::read(dir.path().join("a.txt")).unwrap(),
        b"hello"
    );
    assert_eq!(
        std::fs::read(dir.path().join("nested/b.txt")).unwrap(),
        b"world!"
    );

    let lines = lines.into_inner().unwrap();
    assert_eq!(lines, vec!["a.txt - 5 bytes", "nested/b.txt - 6 bytes"]);
}

#[test]
fn zip_engine_single_entry_yields_one_callback_pair() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    create_zip_archive(&paths.archive_file, &[("a.txt", b"12345")]);

    let statuses = AtomicUsize::new(0);
    let entries = extraction::extract(
        &ZipEngine::new(),
        &empty_spec(),
        &paths,
        &|_| {
            statuses.fetch_add(1, Ordering::SeqCst);
        },
        &CancelHandle::new(),
    )
    .unwrap();

    assert_eq!(statuses.load(Ordering::SeqCst), 1);
    assert_eq!(entries, 1);
    assert_eq!(
        std::fs::metadata(dir.path().join("a.txt")).unwrap().len(),
        5
    );
}

#[test]
fn zip_engine_cancellation_prevents_later_entries() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    create_zip_archive(
        &paths.archive_file,
        &[("keep.txt", b"kept"), ("skip.txt", b"never")],
    );

    let cancel = CancelHandle::new();
    let flag = cancel.clone();
    let seen = AtomicUsize::new(0);
    let on_status = move |_: &str| {
        if seen.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
            flag.cancel();
        }
    };

    let err = extraction::extract(
        &ZipEngine::new(),
        &empty_spec(),
        &paths,
        &on_status,
        &cancel,
    )
    .unwrap_err();
    assert!(err.is_cancelled());

    assert!(dir.path().join("keep.txt").exists());
    assert!(!dir.path().join("skip.txt").exists());
}

#[test]
fn zip_engine_missing_archive_is_an_extraction_fault_naming_the_path() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    // A file unrelated to the run already lives in the work dir
    std::fs::write(dir.path().join("unrelated.txt"), b"x").unwrap();

    let err = extraction::extract(
        &ZipEngine::new(),
        &empty_spec(),
        &paths,
        &|_| {},
        &CancelHandle::new(),
    )
    .unwrap_err();

    match err {
        Error::Extraction { archive, .. } => assert_eq!(archive, paths.archive_file),
        other => panic!("expected Extraction, got {other:?}"),
    }

    // Nothing was extracted; the directory holds only the pre-existing file
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["unrelated.txt"]);
}

#[test]
fn zip_engine_garbage_archive_is_an_extraction_fault() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    std::fs::write(&paths.archive_file, b"this is not an archive").unwrap();

    let err = extraction::extract(
        &ZipEngine::new(),
        &empty_spec(),
        &paths,
        &|_| {},
        &CancelHandle::new(),
    )
    .unwrap_err();

    match err {
        Error::Extraction { archive, .. } => assert_eq!(archive, paths.archive_file),
        other => panic!("expected Extraction, got {other:?}"),
    }
}
