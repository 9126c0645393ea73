//! Benchmarks for probing, bulk loading and frame-by-frame decoding.
//!
//! Run with: cargo bench
//!
//! Requires fixture files from `tests/fixtures/generate_fixtures.sh`.

use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::{Array3, Array4};
use videoreader::{VideoProbe, VideoReader};

const SAMPLE_SMALL: &str = "tests/fixtures/sample_10f_64x48.avi";
const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn benchmark_probe(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    criterion.bench_function("probe", |bencher| {
        bencher.iter(|| VideoProbe::probe(SAMPLE_VIDEO).unwrap());
    });
}

fn benchmark_load(criterion: &mut Criterion) {
    for path in [SAMPLE_SMALL, SAMPLE_VIDEO] {
        if !Path::new(path).exists() {
            continue;
        }
        let reader = VideoReader::open(path).unwrap();
        let mut video = Array4::<u8>::zeros(reader.info().video_shape());

        criterion.bench_function(&format!("load {path}"), |bencher| {
            bencher.iter(|| reader.load(&mut video).unwrap());
        });
    }
}

fn benchmark_iteration(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }
    let reader = VideoReader::open(SAMPLE_VIDEO).unwrap();

    criterion.bench_function("read every frame", |bencher| {
        let mut frame = Array3::<u8>::zeros(reader.info().frame_shape());
        bencher.iter(|| {
            let mut cursor = reader.begin().unwrap();
            while !cursor.is_end() {
                cursor.read(&mut frame).unwrap();
            }
        });
    });

    criterion.bench_function("advance every frame (no conversion)", |bencher| {
        bencher.iter(|| {
            let mut cursor = reader.begin().unwrap();
            cursor.advance_by(reader.frame_count()).unwrap();
        });
    });
}

criterion_group!(benches, benchmark_probe, benchmark_load, benchmark_iteration);
criterion_main!(benches);
