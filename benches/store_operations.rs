//! Benchmark suite for LogStore operations
//!
//! Covers:
//! - Write: insert (with and without streams)
//! - Read: get, lookup (within / past trie depth), filter (AND / OR), get_stream
//!
//! Run: cargo bench --bench store_operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use logstore::{BasicFilter, Conjunction, Entry, FilterQuery, IndexId, LogStore, Token};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HEADER_LEN: usize = 40;
const SHAPES: [(usize, usize); 3] = [(4, 2), (2, 2), (1, 1)];

fn tokens_for(ids: &[IndexId], i: u64) -> Vec<Token> {
    let bytes = i.to_le_bytes();
    ids.iter()
        .zip(SHAPES.iter())
        .map(|(&id, &(len, _))| Token::new(id, bytes[..len].to_vec()))
        .collect()
}

fn create_store(entries: u64, streams: usize) -> (LogStore, Vec<IndexId>) {
    let store = LogStore::new();
    let ids: Vec<IndexId> = SHAPES
        .iter()
        .map(|&(len, depth)| store.add_index(len, depth).unwrap())
        .collect();
    for s in 0..streams as u64 {
        store.add_stream(move |e: &Entry<'_>| e.id % (s + 2) == 0);
    }
    for i in 0..entries {
        store.insert(&[(i % 256) as u8; HEADER_LEN], &tokens_for(&ids, i)).unwrap();
    }
    (store, ids)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for streams in [0usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("streams", streams), &streams, |b, &streams| {
            b.iter_batched(
                || create_store(0, streams),
                |(store, ids)| {
                    for i in 0..1000u64 {
                        black_box(store.insert(&[0u8; HEADER_LEN], &tokens_for(&ids, i)).unwrap());
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let (store, _) = create_store(100_000, 0);
    let mut out = Vec::with_capacity(HEADER_LEN);

    c.bench_function("get", |b| {
        let mut id = 0u64;
        b.iter(|| {
            id = (id + 7919) % 100_000;
            black_box(store.get(black_box(id), &mut out));
        });
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [10_000u64, 100_000] {
        let (store, ids) = create_store(size, 0);

        group.bench_with_input(BenchmarkId::new("within_depth", size), &size, |b, _| {
            b.iter(|| black_box(store.lookup(ids[0], black_box(&[42u8, 0][..]), 2).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("past_depth", size), &size, |b, _| {
            b.iter(|| black_box(store.lookup(ids[0], black_box(&[42u8, 0, 0][..]), 3).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("wide_prefix", size), &size, |b, _| {
            b.iter(|| black_box(store.lookup(ids[2], black_box(&[42u8][..]), 1).unwrap()));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let (store, ids) = create_store(100_000, 0);

    let and_query = FilterQuery::new().or(Conjunction::new()
        .and(BasicFilter::prefix(ids[2], vec![7u8]))
        .and(BasicFilter::prefix(ids[1], vec![7u8, 1])));
    group.bench_function("and", |b| {
        b.iter(|| black_box(store.filter(black_box(&and_query)).unwrap()));
    });

    let or_query = (0..8u8).fold(FilterQuery::new(), |q, v| {
        q.or(Conjunction::single(BasicFilter::prefix(ids[2], vec![v])))
    });
    group.bench_function("or_8", |b| {
        b.iter(|| black_box(store.filter(black_box(&or_query)).unwrap()));
    });

    group.finish();
}

fn bench_get_stream(c: &mut Criterion) {
    let (store, _) = create_store(100_000, 4);

    c.bench_function("get_stream", |b| {
        b.iter(|| black_box(store.get_stream(black_box(0)).unwrap().len()));
    });
}

// ---------------------------------------------------------------------------
// Criterion group registration
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_insert,
    bench_get,
    bench_lookup,
    bench_filter,
    bench_get_stream,
);
criterion_main!(benches);
