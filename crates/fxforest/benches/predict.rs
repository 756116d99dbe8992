//! Prediction benchmarks: single-row latency and batch throughput per
//! traversal strategy.

mod common;

use common::criterion_config::{batch_criterion, default_criterion};

use fxforest::inference::{features, Predictor, StandardTraversal, UnrolledTraversal};
use fxforest::testing::data::{random_ensemble, random_rows};
use fxforest::{ClassifierConfig, ForestClassifier, Parallelism};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_single_row(c: &mut Criterion) {
    let ensemble = random_ensemble(42);
    let fv = features::from_raw([3, -12, 40, 0, -7, 25]);

    let simple = Predictor::<StandardTraversal>::new(&ensemble);
    let unrolled = Predictor::<UnrolledTraversal>::new(&ensemble);

    let mut group = c.benchmark_group("predict/single_row");
    group.bench_function("entry_point", |b| {
        b.iter(|| black_box(fxforest::predict(black_box(&ensemble), black_box(&fv))))
    });
    group.bench_function("standard", |b| {
        b.iter(|| black_box(simple.predict(black_box(&fv), Parallelism::Sequential)))
    });
    group.bench_function("unrolled", |b| {
        b.iter(|| black_box(unrolled.predict(black_box(&fv), Parallelism::Sequential)))
    });
    group.bench_function("unrolled_par_trees", |b| {
        b.iter(|| black_box(unrolled.predict(black_box(&fv), Parallelism::Parallel)))
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let ensemble = random_ensemble(42);

    let std_block64 = Predictor::<StandardTraversal>::new(&ensemble).with_block_size(64);
    let unroll_no_block = Predictor::<UnrolledTraversal>::new(&ensemble).with_block_size(100_000);
    let unroll_block64 = Predictor::<UnrolledTraversal>::new(&ensemble).with_block_size(64);

    let mut group = c.benchmark_group("predict/batch");
    let seq = Parallelism::Sequential;

    for batch_size in [1_000usize, 10_000] {
        let rows = random_rows(batch_size, 7, -2_000, 2_000);
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(BenchmarkId::new("std_block64", batch_size), &rows, |b, r| {
            b.iter(|| black_box(std_block64.predict_batch(black_box(r.view()), seq)))
        });
        group.bench_with_input(BenchmarkId::new("unroll_no_block", batch_size), &rows, |b, r| {
            b.iter(|| black_box(unroll_no_block.predict_batch(black_box(r.view()), seq)))
        });
        group.bench_with_input(BenchmarkId::new("unroll_block64", batch_size), &rows, |b, r| {
            b.iter(|| black_box(unroll_block64.predict_batch(black_box(r.view()), seq)))
        });

        for n_threads in [2usize, 4] {
            let config =
                ClassifierConfig::builder().n_threads(n_threads).build().unwrap_or_default();
            let clf = ForestClassifier::from_ensemble(ensemble.clone()).with_config(config);
            group.bench_with_input(
                BenchmarkId::new(format!("classifier_{n_threads}t"), batch_size),
                &rows,
                |b, r| b.iter(|| black_box(clf.predict_batch(black_box(r.view())))),
            );
        }
    }

    group.finish();
}

criterion_group! {
    name = single_row;
    config = default_criterion();
    targets = bench_single_row
}
criterion_group! {
    name = batch;
    config = batch_criterion();
    targets = bench_batch
}
criterion_main!(single_row, batch);
