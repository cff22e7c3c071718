//! Benchmarks for the posture pipeline

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stance_core::{SensitivityLevel, CONFIDENCE_THRESHOLD};
use stance_posture::{classify, extract, CalibrationBaseline, PostureAnalyzer, ScoreState};
use stance_test::{slouched, uneven_shoulders, upright};

fn bench_extract(c: &mut Criterion) {
    let baseline = CalibrationBaseline::from_sample(upright(), CONFIDENCE_THRESHOLD)
        .expect("upright pose calibrates");
    let sample = uneven_shoulders(12.0);

    c.bench_function("metrics_extract", |b| {
        b.iter(|| black_box(extract(black_box(&sample), &baseline)))
    });
}

fn bench_classify(c: &mut Criterion) {
    let baseline = CalibrationBaseline::from_sample(upright(), CONFIDENCE_THRESHOLD)
        .expect("upright pose calibrates");
    let metrics = extract(&slouched(30.0), &baseline).expect("slouched pose extracts");
    let profile = SensitivityLevel::Medium.profile();

    c.bench_function("classify", |b| {
        b.iter(|| black_box(classify(black_box(&metrics), &profile)))
    });
}

fn bench_scoring(c: &mut Criterion) {
    let mut state = ScoreState::new();
    let baseline = CalibrationBaseline::from_sample(upright(), CONFIDENCE_THRESHOLD)
        .expect("upright pose calibrates");
    let metrics = extract(&uneven_shoulders(12.0), &baseline).expect("pose extracts");
    let verdict = classify(&metrics, &SensitivityLevel::High.profile()).verdict;

    c.bench_function("score_apply", |b| {
        b.iter(|| {
            if state.score() == 0 {
                state.reset();
            }
            black_box(state.apply(black_box(verdict), SensitivityLevel::High))
        })
    });
}

fn bench_analyzer_tick(c: &mut Criterion) {
    let mut analyzer = PostureAnalyzer::new();
    analyzer
        .calibrate(upright())
        .expect("upright pose calibrates");
    let samples = [upright(), uneven_shoulders(12.0), slouched(30.0)];

    c.bench_function("analyzer_tick", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % samples.len();
            black_box(analyzer.analyze(
                black_box(&samples[i]),
                SensitivityLevel::Medium,
                || Duration::from_millis(100),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_extract,
    bench_classify,
    bench_scoring,
    bench_analyzer_tick
);
criterion_main!(benches);
