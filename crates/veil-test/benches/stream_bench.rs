//! Benchmarks for VEIL stream pipelines

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use veil_stream::{flat_map, generate, snapshot};
use veil_test::{numbered_pairs, shuffled_pairs};

fn bench_filter_map_collect(c: &mut Criterion) {
    let pairs = shuffled_pairs(10_000, 1);

    c.bench_function("filter_map_collect_10k", |b| {
        b.iter(|| {
            let collected: BTreeMap<u32, u64> = snapshot(black_box(pairs.clone()))
                .filter(|k, _| k % 3 == 0)
                .map(|k, v| (k, v >> 1))
                .collect();
            black_box(collected)
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let left = numbered_pairs(5_000);
    let right = numbered_pairs(7_500);

    c.bench_function("merge_uneven_sides", |b| {
        b.iter(|| {
            snapshot(black_box(left.clone()))
                .merge(snapshot(black_box(right.clone())), |a, b| {
                    (a.map_or(0, |(k, _)| k), b.map_or(0, |(_, v)| v))
                })
                .count()
        })
    });
}

fn bench_generator(c: &mut Criterion) {
    c.bench_function("generator_for_each_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            generate(|previous: Option<&u32>| {
                let next = previous.map_or(0, |k| k + 1);
                (next < 10_000).then_some((next, u64::from(next)))
            })
            .for_each(|_, v| sum += v);
            black_box(sum)
        })
    });
}

fn bench_flat_map(c: &mut Criterion) {
    let chunks: Vec<Vec<(u32, u32)>> = (0..100).map(|_| numbered_pairs(100)).collect();

    c.bench_function("flat_map_100_chunks", |b| {
        b.iter(|| flat_map(black_box(chunks.clone()).into_iter().map(snapshot)).count())
    });
}

criterion_group!(
    benches,
    bench_filter_map_collect,
    bench_merge,
    bench_generator,
    bench_flat_map
);
criterion_main!(benches);
