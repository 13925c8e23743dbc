use std::collections::BTreeSet;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId,
    Criterion,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha20Rng;
use randgen::AffineSeq;
use rb_set::RbSet;

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb_set");

    let mut rng = ChaCha20Rng::from_seed([
        0x55, 0xEF, 0xE0, 0x3C, 0x71, 0xDA, 0xFC, 0xAB, 0x5C, 0x1A, 0x9F, 0xEB,
        0xA4, 0x9E, 0x61, 0xE6, 0x1E, 0x7E, 0x29, 0x77, 0x38, 0x9A, 0xF5, 0x67,
        0xF5, 0xDD, 0x07, 0x06, 0xAE, 0xE4, 0x5A, 0xDC,
    ]);
    let len = 100_000;
    let keys: Vec<_> = AffineSeq::default().take(len).collect();
    let mut query = keys.clone();
    query.shuffle(&mut rng);

    let rb: RbSet<_> = keys.iter().copied().collect();
    let bt: BTreeSet<_> = keys.iter().copied().collect();

    group
        .bench_function(BenchmarkId::new("rb_set", "insert"), |b| {
            b.iter(|| {
                let mut set = RbSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                black_box(set)
            })
        })
        .bench_function(BenchmarkId::new("btree_set", "insert"), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in &keys {
                    set.insert(k);
                }
                black_box(set)
            })
        })
        .bench_function(BenchmarkId::new("rb_set", "find"), |b| {
            b.iter(|| {
                for k in &query {
                    black_box(rb.find(k));
                }
            })
        })
        .bench_function(BenchmarkId::new("btree_set", "find"), |b| {
            b.iter(|| {
                for k in &query {
                    black_box(bt.get(k));
                }
            })
        })
        .bench_function(BenchmarkId::new("rb_set", "erase"), |b| {
            b.iter_batched(
                || rb.clone(),
                |mut set| {
                    for k in &query {
                        set.erase(k);
                    }
                    set
                },
                BatchSize::LargeInput,
            )
        })
        .bench_function(BenchmarkId::new("btree_set", "erase"), |b| {
            b.iter_batched(
                || bt.clone(),
                |mut set| {
                    for k in &query {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::LargeInput,
            )
        });

    group.finish();
}

criterion_group!(benches, bench_set);
criterion_main!(benches);
