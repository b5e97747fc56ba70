use criterion::{criterion_group, criterion_main};

mod common;

criterion_group!(histogram_benches, common::bench_profiler);
criterion_main!(histogram_benches);
