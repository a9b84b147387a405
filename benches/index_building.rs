use std::fs;
use std::hint::black_box;
use std::io::Write;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lyric_meta_search::indexer::{PlatformLayout, build_snapshot};
use lyric_meta_search::parsers::parse_index_file;
use tempfile::TempDir;

/// Write a synthetic platform index with N records
fn write_index(root: &Path, platform: &str, num_entries: usize) {
    let dir = root.join(format!("{}-lyrics", platform));
    fs::create_dir_all(&dir).unwrap();
    let mut file = fs::File::create(dir.join("index.jsonl")).unwrap();

    for i in 0..num_entries {
        writeln!(
            file,
            r#"{{"id":"{}","rawLyricFile":"{}-{}.ttml","metadata":[["musicName",["Song {}"]],["artists",["Artist {}","Featured {}"]],["album",["Album {}"]]]}}"#,
            i,
            platform,
            i,
            i,
            i % 500,
            i % 37,
            i % 120
        )
        .unwrap();
    }
}

fn bench_parse_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_index_file");

    for size in [1_000, 10_000, 50_000].iter() {
        let temp = TempDir::new().unwrap();
        write_index(temp.path(), "ncm", *size);
        let path = temp.path().join("ncm-lyrics/index.jsonl");

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_index_file(black_box(&path)).unwrap());
        });
    }

    group.finish();
}

fn bench_build_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_snapshot");
    let layout = PlatformLayout::default();

    for size in [1_000, 10_000, 50_000].iter() {
        let temp = TempDir::new().unwrap();
        for platform in ["ncm", "qq", "am", "spotify"] {
            write_index(temp.path(), platform, *size);
        }

        group.throughput(Throughput::Elements(*size as u64 * 4));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| build_snapshot(black_box(temp.path()), &layout));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_index, bench_build_snapshot);
criterion_main!(benches);
