//! Benchmarks for relinking sorts and queue churn.
//!
//! Compares merge sort against quicksort on random, sorted and
//! duplicate-heavy inputs, with `Vec<String>::sort` as a baseline.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_chain::{SortStrategy, StrQueue};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 3] = [64, 1_024, 16_384];

fn random_words(n: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let len = rng.random_range(1..12);
            (0..len).map(|_| rng.random_range(b'a'..=b'z') as char).collect()
        })
        .collect()
}

fn filled(words: &[String], strategy: SortStrategy) -> StrQueue<SmallRng> {
    let mut queue = StrQueue::with_rng(SmallRng::seed_from_u64(42)).with_strategy(strategy);
    for word in words {
        queue.insert_tail(word).unwrap();
    }
    queue
}

// ============================================================================
// Sort throughput
// ============================================================================

fn bench_sort_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_random");

    for &n in &SIZES {
        let words = random_words(n, n as u64);
        group.throughput(Throughput::Elements(n as u64));

        for (name, strategy) in [("merge", SortStrategy::Merge), ("quick", SortStrategy::Quick)] {
            group.bench_with_input(BenchmarkId::new(name, n), &words, |b, words| {
                b.iter_batched_ref(
                    || filled(words, strategy),
                    |queue| queue.sort(),
                    criterion::BatchSize::LargeInput,
                );
            });
        }

        group.bench_with_input(BenchmarkId::new("vec_baseline", n), &words, |b, words| {
            b.iter_batched_ref(
                || words.clone(),
                |v| v.sort(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_sort_presorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_presorted");

    for &n in &SIZES {
        let mut words = random_words(n, 7);
        words.sort();
        group.throughput(Throughput::Elements(n as u64));

        for (name, strategy) in [("merge", SortStrategy::Merge), ("quick", SortStrategy::Quick)] {
            group.bench_with_input(BenchmarkId::new(name, n), &words, |b, words| {
                b.iter_batched_ref(
                    || filled(words, strategy),
                    |queue| queue.sort(),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_sort_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_duplicates");

    for &n in &SIZES {
        // Four distinct values
        let words: Vec<String> = (0..n).map(|i| ["w", "x", "y", "z"][i % 4].to_string()).collect();
        group.throughput(Throughput::Elements(n as u64));

        for (name, strategy) in [("merge", SortStrategy::Merge), ("quick", SortStrategy::Quick)] {
            group.bench_with_input(BenchmarkId::new(name, n), &words, |b, words| {
                b.iter_batched_ref(
                    || filled(words, strategy),
                    |queue| queue.sort(),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

// ============================================================================
// Insert/remove churn
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    group.bench_function("insert_tail_remove_head/16b", |b| {
        let mut queue = StrQueue::with_capacity(1024);
        let mut buf = [0u8; 32];
        b.iter(|| {
            queue.insert_tail(black_box("sixteen-byte-val")).unwrap();
            black_box(queue.remove_head(Some(&mut buf)))
        });
    });

    group.bench_function("reverse/1024", |b| {
        let words = random_words(1024, 3);
        let mut queue = filled(&words, SortStrategy::Merge);
        b.iter(|| queue.reverse());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sort_random,
    bench_sort_presorted,
    bench_sort_duplicates,
    bench_churn
);
criterion_main!(benches);
