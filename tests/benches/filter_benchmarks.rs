//! # Bitmap Bloom Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | Offset derivation | k chained encodes per value, per encoder |
//! | In-memory store | `set` and `exist` through the full service path |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use bitmap_bloom::{
    EncoderKind, FilterConfigBuilder, HashSequenceGenerator, InMemoryBitStore, MembershipFilter,
    MembershipFilterApi,
};

// ============================================================================
// Offset derivation
// ============================================================================

fn bench_offset_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset-generation");
    group.measurement_time(Duration::from_secs(5));

    let encoders = [
        EncoderKind::Murmur3 { seed: 0 },
        EncoderKind::Sha256,
        EncoderKind::Siphash { key0: 1, key1: 2 },
    ];

    for kind in encoders {
        let generator = HashSequenceGenerator::new(kind.build());
        for k in [3u32, 7, 16] {
            group.throughput(Throughput::Elements(k as u64));
            group.bench_with_input(BenchmarkId::new(kind.to_string(), k), &k, |b, &k| {
                b.iter(|| black_box(generator.generate(black_box("user@example.com"), k)))
            });
        }
    }

    group.finish();
}

// ============================================================================
// Service path over the in-memory store
// ============================================================================

fn bench_memory_store(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");

    let mut group = c.benchmark_group("in-memory-filter");
    group.measurement_time(Duration::from_secs(5));

    let config = FilterConfigBuilder::new()
        .size_bits(1 << 20)
        .hash_count(7)
        .build()
        .expect("valid config");
    let filter = MembershipFilter::new(&config, Arc::new(InMemoryBitStore::new()))
        .expect("valid filter");

    let mut rng = rand::thread_rng();
    let values: Vec<String> = (0..1_000)
        .map(|_| format!("value-{}", rng.gen::<u64>()))
        .collect();

    runtime.block_on(async {
        for value in &values {
            filter.set("bench", value).await.expect("set");
        }
    });

    group.throughput(Throughput::Elements(1));
    group.bench_function("set", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % values.len();
            runtime.block_on(filter.set("bench", &values[i]))
        })
    });

    group.bench_function("exist_hit", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % values.len();
            black_box(runtime.block_on(filter.exist("bench", &values[i])))
        })
    });

    group.bench_function("exist_miss", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let value = format!("absent-{}", i);
            black_box(runtime.block_on(filter.exist("bench", &value)))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_offset_generation, bench_memory_store);
criterion_main!(benches);
