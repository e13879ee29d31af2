//! Benchmarks for resource manager construction.
//!
//! Measures scan + rules + loading + fingerprinting over generated folders
//! of increasing size.
//!
//! # Run Benchmarks
//!
//! ```bash
//! cargo bench --bench pipeline
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pathtyped::{DefinitionFile, Loaders, ResourceManager, Scanner, group_by, strip_extensions};
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

/// Builds `dirs` directories of `files` grouped text files each.
fn generate_folder(root: &Path, dirs: usize, files: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("level{d}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files {
            fs::write(dir.join(format!("tile_{f}.txt")), format!("tile {d}/{f}")).unwrap();
        }
        fs::write(dir.join("meta.json"), r#"{"width": 16}"#).unwrap();
    }
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for files in [10, 100, 500] {
        let temp = TempDir::new().unwrap();
        generate_folder(temp.path(), 4, files);
        let scanner = Scanner::new("__.*__").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(files * 4), &files, |b, _| {
            b.iter(|| scanner.scan(black_box(temp.path())).unwrap());
        });
    }

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for files in [10, 100, 500] {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("res");
        generate_folder(&folder, 4, files);
        let definition = DefinitionFile::new("", temp.path().join("definition.py"));

        group.bench_with_input(BenchmarkId::from_parameter(files * 4), &files, |b, _| {
            b.iter(|| {
                ResourceManager::builder(black_box(&folder), definition.clone())
                    .middleware(strip_extensions("txt|json").unwrap())
                    .middleware(group_by(r"(tile)_(\d+)").unwrap())
                    .loader(Loaders::text())
                    .loader(Loaders::json())
                    .check_only(true)
                    .build()
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_construction);
criterion_main!(benches);
