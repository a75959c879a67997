use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;

use bptree::{Arena, BPlusTree};

const KEYS: usize = 100_000;
const FANOUT: usize = 256;

fn point_lookup_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<i32> = (0..KEYS).map(|_| rng.gen()).collect();

    let arena =
        Arena::new(BPlusTree::<i32, i32, FANOUT>::arena_capacity_for(4096)).unwrap();
    let mut tree = BPlusTree::<i32, i32, FANOUT>::new(&arena).unwrap();
    let mut std_tree = BTreeMap::new();
    for &k in &keys {
        tree.insert(k, k).unwrap();
        std_tree.insert(k, k);
    }

    // Half hits, half misses, in a cache-unfriendly order.
    let probes: Vec<i32> = keys
        .iter()
        .step_by(2)
        .copied()
        .chain((0..KEYS / 2).map(|_| rng.gen()))
        .collect();

    let mut group = c.benchmark_group("point_lookups");
    group.bench_function("find_linear", |b| {
        b.iter(|| {
            for k in &probes {
                black_box(tree.find_linear(black_box(k)));
            }
        })
    });
    group.bench_function("find_binary", |b| {
        b.iter(|| {
            for k in &probes {
                black_box(tree.find_binary(black_box(k)));
            }
        })
    });
    group.bench_function("find_simd", |b| {
        b.iter(|| {
            for k in &probes {
                black_box(tree.find_simd(black_box(k)));
            }
        })
    });
    group.bench_function("std_btreemap_get", |b| {
        b.iter(|| {
            for k in &probes {
                black_box(std_tree.get(black_box(k)));
            }
        })
    });
    group.finish();
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let keys: Vec<i32> = (0..KEYS).map(|_| rng.gen()).collect();

    let mut group = c.benchmark_group("random_inserts");
    group.bench_function("bptree", |b| {
        b.iter(|| {
            let arena =
                Arena::new(BPlusTree::<i32, i32, FANOUT>::arena_capacity_for(4096)).unwrap();
            let mut tree = BPlusTree::<i32, i32, FANOUT>::new(&arena).unwrap();
            for &k in &keys {
                tree.insert(k, k).unwrap();
            }
            black_box(tree.len());
        })
    });
    group.bench_function("std_btreemap", |b| {
        b.iter(|| {
            let mut tree = BTreeMap::new();
            for &k in &keys {
                tree.insert(k, k);
            }
            black_box(tree.len());
        })
    });
    group.finish();
}

criterion_group!(benches, point_lookup_benchmark, insert_benchmark);
criterion_main!(benches);
