//! Benchmarks for the rollout bucket hash.

use criterion::{Criterion, criterion_group, criterion_main};
use fosterflow_core::rollout;
use std::hint::black_box;

fn bench_bucket(c: &mut Criterion) {
    let ids: Vec<String> = (0..1000).map(|i| format!("user_{i:08x}")).collect();

    c.bench_function("bucket_single", |b| {
        b.iter(|| rollout::bucket(black_box("user_3f92ab7c1d")));
    });

    c.bench_function("bucket_1000_identities", |b| {
        b.iter(|| {
            let mut enabled = 0usize;
            for id in &ids {
                if rollout::is_enrolled(black_box(id), 50) {
                    enabled += 1;
                }
            }
            enabled
        });
    });
}

criterion_group!(benches, bench_bucket);
criterion_main!(benches);
