//! Benchmarks for gex-profile library.
//!
//! - **exposure_bench**: Filtering, gamma estimation, aggregation and king node selection
//! - **pipeline_bench**: Cached pipeline runs and report rendering


use criterion::{criterion_group, criterion_main};

// Computation core benchmarks
criterion_group!(
    exposure_benches,
    exposure_bench::exposure_operations,
    exposure_bench::exposure_scaling,
);

// Pipeline benchmarks
criterion_group!(
    pipeline_benches,
    pipeline_bench::pipeline_operations,
    pipeline_bench::report_operations,
);

criterion_main!(exposure_benches, pipeline_benches);
