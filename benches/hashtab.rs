#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use hashtab::{
    ChainedHashMap, OpenAddressingHashMap, Probing,
    hashing::{HashFn, fibonacci, modulo},
};
use proptest::{
    collection::vec,
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn secondary(key: &u64, modulus: usize) -> usize {
    modulo(key, modulus.saturating_sub(2)).saturating_add(1)
}

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = vec(any::<(u64, u64)>(), ITEMS_AMOUNT).new_tree(&mut runner).unwrap().current();
    let hash: HashFn<u64> = fibonacci;

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);

    let mut chained_map = ChainedHashMap::new(ITEMS_AMOUNT, hash);
    let mut linear_map = OpenAddressingHashMap::new(ITEMS_AMOUNT, hash, Probing::Linear);
    let mut quadratic_map = OpenAddressingHashMap::new(ITEMS_AMOUNT, hash, Probing::Quadratic);
    let mut double_map =
        OpenAddressingHashMap::new(ITEMS_AMOUNT, hash, Probing::DoubleHashing(secondary));
    let mut rust_map = HashMap::new();

    group.bench_function("chained insert", |b| {
        b.iter(|| {
            chained_map.clear();
            chained_map.extend(items.iter().copied());
        });
    });
    group.bench_function("linear probing insert", |b| {
        b.iter(|| {
            linear_map.clear();
            linear_map.extend(items.iter().copied());
        });
    });
    group.bench_function("quadratic probing insert", |b| {
        b.iter(|| {
            quadratic_map.clear();
            quadratic_map.extend(items.iter().copied());
        });
    });
    group.bench_function("double hashing insert", |b| {
        b.iter(|| {
            double_map.clear();
            double_map.extend(items.iter().copied());
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            rust_map.clear();
            rust_map.extend(items.iter().copied());
        });
    });

    group.bench_function("chained find", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = chained_map.find(key);
            }
        });
    });
    group.bench_function("linear probing find", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = linear_map.find(key);
            }
        });
    });
    group.bench_function("quadratic probing find", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = quadratic_map.find(key);
            }
        });
    });
    group.bench_function("double hashing find", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = double_map.find(key);
            }
        });
    });
    group.bench_function("rust std find", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = rust_map.get(key);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
