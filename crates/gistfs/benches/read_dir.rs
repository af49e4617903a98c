//! Benchmarks for directory enumeration
//!
//! Measures opening the root and draining it in batches of varying size,
//! plus the one-shot `GistFs::read_dir` listing.

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gistfs::{BlobRecord, Collection, DirHandle, File, GistFs, GistId, StaticFetcher};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

fn records(count: usize) -> Vec<Arc<BlobRecord>> {
    let now = Utc::now();
    (0..count)
        .map(|i| Arc::new(BlobRecord::new(format!("file{i:05}.txt"), vec![b'x'; 128], now)))
        .collect()
}

fn loaded_fs(count: usize) -> GistFs {
    let collection = (0..count).fold(Collection::new(Utc::now()), |c, i| {
        c.with_file(format!("file{i:05}.txt"), vec![b'x'; 128])
    });
    let fs = GistFs::with_fetcher(
        StaticFetcher::new(collection),
        GistId::new("bench").expect("valid id"),
    );
    Runtime::new()
        .expect("runtime")
        .block_on(fs.load(&CancellationToken::new()))
        .expect("load");
    fs
}

/// Drains a 1000-entry directory with different batch sizes
fn bench_paginated_read_dir(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginated_read_dir");
    let records = records(1000);

    group.throughput(Throughput::Elements(records.len() as u64));
    for batch in [1isize, 16, 128, -1] {
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.iter(|| {
                let dir = DirHandle::new(&records, Utc::now());
                let mut seen = 0;
                loop {
                    let entries = dir.read_dir(black_box(batch)).expect("read_dir");
                    if entries.is_empty() {
                        break;
                    }
                    seen += entries.len();
                }
                seen
            });
        });
    }

    group.finish();
}

/// Lists the root of filesystems of growing size
fn bench_fs_read_dir(c: &mut Criterion) {
    let mut group = c.benchmark_group("fs_read_dir");

    for count in [10, 100, 1000] {
        let fs = loaded_fs(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &fs, |b, fs| {
            b.iter(|| fs.read_dir(black_box(".")).expect("read_dir"));
        });
    }

    group.finish();
}

/// Opens and fully reads a single file
fn bench_open_and_read(c: &mut Criterion) {
    let fs = loaded_fs(100);

    c.bench_function("open_and_read", |b| {
        b.iter(|| {
            let handle = fs.open(black_box("file00042.txt")).expect("open");
            let mut buf = [0u8; 64];
            let mut total = 0;
            while let Ok(n @ 1..) = handle.read(&mut buf) {
                total += n;
            }
            total
        });
    });
}

criterion_group!(
    benches,
    bench_paginated_read_dir,
    bench_fs_read_dir,
    bench_open_and_read
);
criterion_main!(benches);
