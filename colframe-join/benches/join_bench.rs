//! Benchmarks for DataFrame joins.
//!
//! Every join is a nested loop, O(N×M) in the operand row counts, so the
//! sizes here stay small. A 1K×1K join already performs one million key
//! comparisons.

use std::hint::black_box;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use colframe_column::{AllocatorRef, default_allocator};
use colframe_frame::DataFrame;
use colframe_join::{DataFrameJoinExt, JoinOptions};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A frame of `num_rows` rows with schema `id (Int64), value (Float64)`.
/// Ids are drawn from `[0, key_range)`, so smaller ranges mean more
/// duplicate keys and more fan-out.
fn create_frame(
    allocator: &AllocatorRef,
    rng: &mut StdRng,
    num_rows: usize,
    key_range: i64,
) -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("value", DataType::Float64, false),
    ]));
    let ids: Vec<i64> = (0..num_rows).map(|_| rng.random_range(0..key_range)).collect();
    let values: Vec<f64> = (0..num_rows).map(|i| i as f64).collect();
    DataFrame::try_new(
        allocator,
        schema,
        vec![
            Arc::new(Int64Array::from(ids)) as ArrayRef,
            Arc::new(Float64Array::from(values)) as ArrayRef,
        ],
    )
    .unwrap()
}

fn bench_keyed_joins(c: &mut Criterion) {
    let allocator = default_allocator();
    let mut rng = StdRng::seed_from_u64(42);

    for (name, options) in [
        ("inner", JoinOptions::inner()),
        ("left", JoinOptions::left()),
        ("right", JoinOptions::right()),
        ("outer", JoinOptions::outer()),
    ] {
        let mut group = c.benchmark_group(format!("nested_loop_{name}_join"));
        for size in [100usize, 500, 1_000] {
            let left = create_frame(&allocator, &mut rng, size, size as i64);
            let right = create_frame(&allocator, &mut rng, size, size as i64);

            group.throughput(Throughput::Elements((size * size) as u64));
            group.sample_size(20);
            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
                b.iter(|| {
                    let joined = left.join_with(&right, &["id"], &options).unwrap();
                    black_box(joined.num_rows());
                });
            });
        }
        group.finish();
    }
}

fn bench_cross_join(c: &mut Criterion) {
    let allocator = default_allocator();
    let mut rng = StdRng::seed_from_u64(7);
    let mut group = c.benchmark_group("cross_join");

    for size in [10usize, 50, 100] {
        let left = create_frame(&allocator, &mut rng, size, 10);
        let right = create_frame(&allocator, &mut rng, size, 10);

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let joined = left.cross_join(&right).unwrap();
                black_box(joined.num_rows());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_keyed_joins, bench_cross_join);
criterion_main!(benches);
