//! Integration tests for the filesystem contract.
//!
//! Exercises the root, file and directory handles together over an
//! in-memory gist, the way generic consumers (directory walkers, static
//! file servers) use them.

use chrono::{TimeZone, Utc};
use gistfs::{Collection, File, FileMode, GistFs, GistId, Handle, ROOT_NAME, StaticFetcher};
use std::io::Read;
use tokio_util::sync::CancellationToken;

fn reference_collection() -> Collection {
    let updated_at = Utc.with_ymd_and_hms(2020, 1, 2, 10, 20, 30).unwrap();
    Collection::new(updated_at)
        .with_file("test1.txt", "foobar\nbarfoo")
        .with_file("test2.txt", "olala\n12345\nabcde")
        .with_file("empty.md", "")
}

async fn loaded(collection: Collection) -> GistFs {
    let fs = GistFs::with_fetcher(
        StaticFetcher::new(collection),
        GistId::new("ded2f6727d98e6b0095e62a7813aa7cf").unwrap(),
    );
    fs.load(&CancellationToken::new()).await.unwrap();
    fs
}

fn drain(handle: &impl File) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 4];
    loop {
        let n = handle.read(&mut buf).unwrap();
        if n == 0 {
            return out;
        }
        out.extend_from_slice(&buf[..n]);
    }
}

/// Opening and fully draining every file reproduces its content exactly.
#[tokio::test]
async fn test_open_read_round_trip() {
    let collection = reference_collection();
    let fs = loaded(collection.clone()).await;

    for (name, content) in &collection.files {
        let handle = fs.open(name).unwrap();
        assert_eq!(&drain(&handle), content, "content of {name}");
        assert_eq!(&fs.read_file(name).unwrap(), content);
    }
}

/// `stat().size()` matches the byte length obtainable by reading.
#[tokio::test]
async fn test_stat_size_matches_content() {
    let fs = loaded(reference_collection()).await;

    for meta in fs.read_dir(".").unwrap() {
        let handle = fs.open(meta.name()).unwrap();
        let stat = handle.stat().unwrap();
        let content = fs.read_file(meta.name()).unwrap();

        assert_eq!(stat.size(), content.len() as u64);
        assert_eq!(stat.size(), meta.size());
        assert_eq!(drain(&handle).len() as u64, stat.size());
    }
}

/// File metadata follows the read-only regular-file shape.
#[tokio::test]
async fn test_file_stat_fields() {
    let fs = loaded(reference_collection()).await;
    let expected_time = Utc.with_ymd_and_hms(2020, 1, 2, 10, 20, 30).unwrap();

    let handle = fs.open("test1.txt").unwrap();
    let stat = handle.stat().unwrap();

    assert_eq!(stat.name(), "test1.txt");
    assert_eq!(stat.size(), "foobar\nbarfoo".len() as u64);
    assert_eq!(stat.mode(), FileMode::from_bits(0o444));
    assert_eq!(stat.modified(), expected_time);
    assert!(!stat.is_dir());
    assert_eq!(
        stat.sys().map(|record| record.content()),
        Some(&b"foobar\nbarfoo"[..])
    );
}

/// Root metadata follows the directory shape.
#[tokio::test]
async fn test_root_stat_fields() {
    let fs = loaded(reference_collection()).await;
    let root = fs.open(".").unwrap();
    let stat = root.stat().unwrap();

    assert_eq!(stat.name(), ROOT_NAME);
    assert_eq!(stat.size(), 0);
    assert!(stat.mode().is_dir());
    assert!(stat.is_dir());
    assert_eq!(Some(stat.modified()), fs.modified());
}

/// Read and stat fail after close; closing twice never fails.
#[tokio::test]
async fn test_closed_handle() {
    let fs = loaded(reference_collection()).await;
    let handle = fs.open("test1.txt").unwrap();

    handle.close().unwrap();
    handle.close().unwrap();

    assert!(handle.read(&mut [0u8; 7]).unwrap_err().is_closed());
    assert!(handle.stat().unwrap_err().is_closed());
}

/// Every operation fails with `NotLoaded` before the first load.
#[test]
fn test_operations_before_load() {
    let fs = GistFs::with_fetcher(
        StaticFetcher::new(reference_collection()),
        GistId::new("abc").unwrap(),
    );

    for path in [".", "/", "test1.txt", "missing"] {
        assert!(fs.open(path).unwrap_err().is_not_loaded());
        assert!(fs.read_file(path).unwrap_err().is_not_loaded());
        assert!(fs.read_dir(path).unwrap_err().is_not_loaded());
    }
}

/// The two-file example: listing, reading and a missing name.
#[tokio::test]
async fn test_two_file_example() {
    let collection = Collection::new(Utc::now())
        .with_file("a.txt", "hi")
        .with_file("b.txt", "bye");
    let fs = loaded(collection).await;

    let names: Vec<_> = fs
        .read_dir(".")
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(names, ["a.txt", "b.txt"]);

    assert_eq!(fs.read_file("a.txt").unwrap(), b"hi");

    let err = fs.open("c.txt").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.path(), Some("c.txt"));
}

/// `read_dir(1)` yields K single-entry batches, then empty batches.
#[tokio::test]
async fn test_paginated_read_dir() {
    let fs = loaded(reference_collection()).await;
    let root = fs.open(".").unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let batch = root.read_dir(1).unwrap();
        assert_eq!(batch.len(), 1);
        seen.push(batch[0].name().to_string());
    }
    assert!(root.read_dir(1).unwrap().is_empty());
    assert!(root.read_dir(1).unwrap().is_empty());

    assert_eq!(seen, ["empty.md", "test1.txt", "test2.txt"]);
}

/// `read_dir(-1)` returns everything at once; the next call is empty.
#[tokio::test]
async fn test_unbounded_read_dir() {
    let fs = loaded(reference_collection()).await;
    let root = fs.open("/").unwrap();

    assert_eq!(root.read_dir(-1).unwrap().len(), 3);
    assert!(root.read_dir(-1).unwrap().is_empty());
}

/// Chunked enumeration is contiguous and matches the one-shot listing.
#[tokio::test]
async fn test_chunks_are_contiguous() {
    let mut collection = Collection::new(Utc::now());
    for i in 0..25 {
        collection = collection.with_file(format!("file{i:02}.txt"), format!("{i}"));
    }
    let fs = loaded(collection).await;

    let expected: Vec<_> = fs
        .read_dir(".")
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    let root = fs.open(".").unwrap();
    let mut chunked = Vec::new();
    loop {
        let batch = root.read_dir(7).unwrap();
        if batch.is_empty() {
            break;
        }
        assert!(batch.len() <= 7);
        chunked.extend(batch.iter().map(|e| e.name().to_string()));
    }

    assert_eq!(chunked, expected);
}

/// Directories reject byte reads; files reject listing.
#[tokio::test]
async fn test_kind_mismatch_errors() {
    let fs = loaded(reference_collection()).await;

    let root = fs.open(".").unwrap();
    assert!(root.read(&mut [0u8; 8]).unwrap_err().is_a_directory());

    let file = fs.open("test2.txt").unwrap();
    for n in [-1, 0, 1] {
        assert!(file.read_dir(n).unwrap_err().is_not_a_directory());
    }
}

/// Entries returned by a directory listing are readable handles.
#[tokio::test]
async fn test_dir_entries_are_handles() {
    let fs = loaded(reference_collection()).await;
    let root = fs.open(".").unwrap();

    for entry in root.read_dir(-1).unwrap() {
        assert!(!entry.is_dir());
        assert!(entry.file_type().is_regular());
        let content = drain(entry.handle());
        assert_eq!(content, fs.read_file(entry.name()).unwrap());
    }
}

/// Handles plug into `std::io` consumers.
#[tokio::test]
async fn test_std_io_read() {
    let fs = loaded(reference_collection()).await;

    let mut handle = fs.open("test2.txt").unwrap();
    let mut text = String::new();
    handle.read_to_string(&mut text).unwrap();
    assert_eq!(text, "olala\n12345\nabcde");

    let mut root = fs.open(".").unwrap();
    let err = Read::read(&mut root, &mut [0u8; 1]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::IsADirectory);
}

/// A generic walker built only on the `File` contract visits every file.
#[tokio::test]
async fn test_generic_walk() {
    fn walk(fs: &GistFs, handle: &Handle, out: &mut Vec<(String, u64)>) {
        if let Ok(entries) = handle.read_dir(2) {
            if entries.is_empty() {
                return;
            }
            for entry in entries {
                let child = fs.open(entry.name()).unwrap();
                walk(fs, &child, out);
            }
            walk(fs, handle, out);
        } else {
            let stat = handle.stat().unwrap();
            out.push((stat.name().to_string(), stat.size()));
        }
    }

    let fs = loaded(reference_collection()).await;
    let root = fs.open(".").unwrap();
    let mut visited = Vec::new();
    walk(&fs, &root, &mut visited);

    assert_eq!(
        visited,
        [
            ("empty.md".to_string(), 0),
            ("test1.txt".to_string(), 13),
            ("test2.txt".to_string(), 17),
        ]
    );
}

/// A reload swaps the snapshot; handles opened earlier keep the old one.
#[tokio::test]
async fn test_reload_keeps_open_handles_stable() {
    use async_trait::async_trait;
    use gistfs::{BoxError, GistFetcher};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Versioned {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GistFetcher for Versioned {
        async fn fetch(
            &self,
            _id: &GistId,
            _cancel: &CancellationToken,
        ) -> Result<Collection, BoxError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let collection = if call == 0 {
                Collection::new(Utc::now())
                    .with_file("a.txt", "v1")
                    .with_file("b.txt", "v1")
            } else {
                Collection::new(Utc::now()).with_file("c.txt", "v2")
            };
            Ok(collection)
        }
    }

    let fs = GistFs::with_fetcher(Versioned::default(), GistId::new("abc").unwrap());
    let cancel = CancellationToken::new();
    fs.load(&cancel).await.unwrap();

    let old_root = fs.open(".").unwrap();
    let old_file = fs.open("a.txt").unwrap();
    assert_eq!(old_root.read_dir(1).unwrap()[0].name(), "a.txt");

    fs.load(&cancel).await.unwrap();

    assert_eq!(old_root.read_dir(-1).unwrap()[0].name(), "b.txt");
    assert_eq!(drain(&old_file), b"v1");

    assert!(fs.open("a.txt").unwrap_err().is_not_found());
    assert_eq!(fs.read_file("c.txt").unwrap(), b"v2");
    assert_eq!(fs.len(), 1);
}
