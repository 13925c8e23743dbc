use std::collections::BTreeMap;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId,
    Criterion,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use randgen::{AffineSeq, Gen, Permutation};
use rb_map::RbMap;

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb_map");

    let mut rng = ChaCha20Rng::from_seed([
        0x5C, 0x1A, 0x9F, 0xEB, 0xA4, 0x9E, 0x61, 0xE6, 0x55, 0xEF, 0xE0, 0x3C,
        0x71, 0xDA, 0xFC, 0xAB, 0xF5, 0xDD, 0x07, 0x06, 0xAE, 0xE4, 0x5A, 0xDC,
        0x1E, 0x7E, 0x29, 0x77, 0x38, 0x9A, 0xF5, 0x67,
    ]);
    let len = 100_000;
    let keys: Vec<_> = AffineSeq::default().take(len).collect();
    let query: Vec<_> = Permutation { len }
        .generate(&mut rng)
        .into_iter()
        .map(|i| keys[i])
        .collect();

    let rb: RbMap<_, _> = keys.iter().map(|&k| (k, k)).collect();
    let bt: BTreeMap<_, _> = keys.iter().map(|&k| (k, k)).collect();

    group
        .bench_function(BenchmarkId::new("rb_map", "insert"), |b| {
            b.iter(|| {
                let mut map = RbMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                black_box(map)
            })
        })
        .bench_function(BenchmarkId::new("btree_map", "insert"), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                black_box(map)
            })
        })
        .bench_function(BenchmarkId::new("rb_map", "get"), |b| {
            b.iter(|| {
                for k in &query {
                    black_box(rb.get(k));
                }
            })
        })
        .bench_function(BenchmarkId::new("btree_map", "get"), |b| {
            b.iter(|| {
                for k in &query {
                    black_box(bt.get(k));
                }
            })
        })
        .bench_function(BenchmarkId::new("rb_map", "erase"), |b| {
            b.iter_batched(
                || rb.clone(),
                |mut map| {
                    for k in &query {
                        map.erase(k);
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        })
        .bench_function(BenchmarkId::new("btree_map", "erase"), |b| {
            b.iter_batched(
                || bt.clone(),
                |mut map| {
                    for k in &query {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::LargeInput,
            )
        });

    group.finish();
}

criterion_group!(benches, bench_map);
criterion_main!(benches);
