//! Benchmark suite for danci-handwriting
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use danci_handwriting::{
    match_stroke, MatchScope, MedianRecognizer, Point, ReferenceStroke, Shortstraw, StepProgress,
};

fn raw_trace() -> Vec<Point> {
    (0..200)
        .map(|i| {
            let t = i as f64 / 199.0;
            let y = if t < 0.5 { 500.0 } else { 500.0 + (t - 0.5) * 800.0 };
            Point::new(100.0 + t.min(0.5) * 1600.0, y)
        })
        .collect()
}

fn steps() -> Vec<StepProgress> {
    (0..12)
        .map(|i| {
            let y = 80.0 * i as f64;
            StepProgress {
                reference: ReferenceStroke {
                    median: vec![Point::new(100.0, y), Point::new(500.0, y), Point::new(900.0, y + 40.0)],
                    stroke: String::new(),
                },
                done: i % 3 == 0,
            }
        })
        .collect()
}

fn bench_shortstraw(c: &mut Criterion) {
    let trace = raw_trace();
    let simplifier = Shortstraw::default();
    c.bench_function("Shortstraw::run", |b| b.iter(|| simplifier.run(black_box(&trace))));
}

fn bench_match_stroke(c: &mut Criterion) {
    let candidate = Shortstraw::default().run(&raw_trace());
    let steps = steps();
    let recognizer = MedianRecognizer::default();
    c.bench_function("match_stroke/12 steps", |b| {
        b.iter(|| match_stroke(black_box(&candidate), &steps, 1, &recognizer, MatchScope::All))
    });
}

criterion_group!(benches, bench_shortstraw, bench_match_stroke);
criterion_main!(benches);
