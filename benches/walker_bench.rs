//! Benchmarks for fswalk
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fswalk::{MemoryFileSystem, Walker};

/// `width` directories with `width` files each under "root"
fn wide_tree(width: usize) -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::new();
    for d in 0..width {
        for f in 0..width {
            fs = fs.add_file(&format!("root/dir{:04}/file{:04}", d, f), 128);
        }
    }
    fs
}

fn benchmark_step_handoff(c: &mut Criterion) {
    let fs = wide_tree(32);

    c.bench_function("walker_drain_1k", |b| {
        b.iter(|| {
            let mut walker = Walker::with_fs(fs.clone(), "root").unwrap();
            let mut count = 0u64;
            while walker.step() {
                count += 1;
            }
            black_box(count);
        })
    });
}

fn benchmark_skip_everything(c: &mut Criterion) {
    let fs = wide_tree(32);

    c.bench_function("walker_skip_subdirs", |b| {
        b.iter(|| {
            let mut walker = Walker::with_fs(fs.clone(), "root").unwrap();
            walker.step();
            while walker.step() {
                walker.skip_dir();
            }
            black_box(walker.stats().skipped);
        })
    });
}

fn benchmark_path_join(c: &mut Criterion) {
    c.bench_function("path_join_clean", |b| {
        b.iter(|| black_box(fswalk::fs::join(&["root/./a//b/", "..", "file.txt"])))
    });
}

criterion_group!(
    benches,
    benchmark_step_handoff,
    benchmark_skip_everything,
    benchmark_path_join
);
criterion_main!(benches);
