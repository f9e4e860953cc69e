//! Benchmarks for the synthetic generation path.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

use datasmith::generate::{GenerationContext, Generator, SyntheticGenerator};
use datasmith::request::GenerateRequest;
use datasmith::schema::SchemaRegistry;

fn bench_synthetic_users(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let registry = Arc::new(SchemaRegistry::new());

    let mut group = c.benchmark_group("synthetic_users");
    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(size),
            size,
            |b, &size| {
                let request = GenerateRequest {
                    request_id: "bench".to_string(),
                    domain: "ecommerce".to_string(),
                    entity: "user".to_string(),
                    count: size,
                    ..GenerateRequest::default()
                };
                let generator = SyntheticGenerator::new(registry.clone()).with_seed(42);
                b.iter(|| {
                    let result = runtime
                        .block_on(generator.generate(&request, &GenerationContext::default()))
                        .expect("generation succeeds");
                    black_box(result.data.len())
                });
            },
        );
    }
    group.finish();
}

fn bench_synthetic_carts(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let registry = Arc::new(SchemaRegistry::new());

    let mut group = c.benchmark_group("synthetic_carts");
    for size in [100, 1_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(size),
            size,
            |b, &size| {
                let request = GenerateRequest {
                    request_id: "bench".to_string(),
                    domain: "ecommerce".to_string(),
                    entity: "cart".to_string(),
                    count: size,
                    ..GenerateRequest::default()
                };
                let generator = SyntheticGenerator::new(registry.clone()).with_seed(42);
                b.iter(|| {
                    let result = runtime
                        .block_on(generator.generate(&request, &GenerationContext::default()))
                        .expect("generation succeeds");
                    black_box(result.data.len())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_synthetic_users, bench_synthetic_carts);
criterion_main!(benches);
