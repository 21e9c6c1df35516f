// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Benchmarks comparing sequential and parallel computation of multi-value entries.

#![allow(missing_docs, reason = "Benchmark code")]

use std::hint::black_box;
use std::thread;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use memostore::{Execution, Repository};

const PRODUCER_LATENCY: Duration = Duration::from_millis(2);

fn slow(key: &u64, factor: u64) -> u64 {
    thread::sleep(PRODUCER_LATENCY);
    key * factor
}

fn bench_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("miss_with_slow_producers");

    for (name, execution) in [("sequential", Execution::Sequential), ("parallel", Execution::Parallel)] {
        group.bench_function(name, |b| {
            let repository = Repository::builder()
                .producer(|key: &u64| slow(key, 2))
                .producer(|key: &u64| slow(key, 3))
                .producer(|key: &u64| slow(key, 5))
                .producer(|key: &u64| slow(key, 7))
                .execution(execution)
                .build();

            let mut key = 0_u64;
            b.iter(|| {
                key += 1;
                black_box(repository.get(black_box(&key)))
            });
        });
    }

    group.finish();
}

fn bench_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit");

    for (name, execution) in [("sequential", Execution::Sequential), ("parallel", Execution::Parallel)] {
        group.bench_function(name, |b| {
            let repository = Repository::builder()
                .producer(|key: &u64| key * 2)
                .producer(|key: &u64| key.to_string())
                .execution(execution)
                .build();
            let _warm = repository.get(&1);

            b.iter(|| black_box(repository.get(black_box(&1))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_miss, bench_hit);
criterion_main!(benches);
