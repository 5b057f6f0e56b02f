// Copyright 2025 vectorbench contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Metric reduction benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vectorbench::data::synthetic_embeddings;
use vectorbench::metrics::{compute_percentiles, recall_at_k, DEFAULT_PERCENTILES};

fn benchmark_percentiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_percentiles");
    for &n in &[100usize, 10_000, 100_000] {
        let samples: Vec<f64> = (0..n).map(|i| (i as f64 * 31.7) % 1000.0).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &samples, |b, samples| {
            b.iter(|| compute_percentiles(black_box(samples), &DEFAULT_PERCENTILES));
        });
    }
    group.finish();
}

fn benchmark_recall(c: &mut Criterion) {
    let y_true: Vec<i64> = (0..1000).map(|i| i % 10).collect();
    let y_pred: Vec<Vec<i64>> = y_true
        .iter()
        .map(|l| (0..10).map(|j| (l + j) % 10).collect())
        .collect();

    c.bench_function("recall_at_10_1000_queries", |b| {
        b.iter(|| recall_at_k(black_box(&y_true), black_box(&y_pred), 10));
    });
}

fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthetic_embeddings");
    for &n in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| synthetic_embeddings(black_box(n), 128, 10, 42));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_percentiles,
    benchmark_recall,
    benchmark_generation
);
criterion_main!(benches);
