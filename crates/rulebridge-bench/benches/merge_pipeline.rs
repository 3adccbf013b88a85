//! Group 3: Merge and full post-processing pipeline benchmarks.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rulebridge_bench::{SizeTier, generate_overlapping};
use rulebridge_core::{PipelineConfig, condense, merge, process};

const TIERS: [(&str, SizeTier); 3] = [
    ("S", SizeTier::Small),
    ("M", SizeTier::Medium),
    ("L", SizeTier::Large),
];

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for (name, tier) in TIERS {
        let (base, incoming) = generate_overlapping(&tier.config(42));
        group.throughput(Throughput::Elements(
            (base.defect_count() + incoming.defect_count()) as u64,
        ));
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(base, incoming),
            |b, (base, incoming)| {
                b.iter_batched(
                    || (base.clone(), incoming.clone()),
                    |(base, incoming)| merge(base, incoming),
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = PipelineConfig::default();

    for (name, tier) in TIERS {
        let (base, incoming) = generate_overlapping(&tier.config(42));
        let base = condense(base);
        group.throughput(Throughput::Elements(incoming.defect_count() as u64));

        group.bench_with_input(BenchmarkId::new("fresh", name), &incoming, |b, incoming| {
            b.iter_batched(
                || incoming.clone(),
                |incoming| process(incoming, None, &config),
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(
            BenchmarkId::new("accumulate", name),
            &(base, incoming),
            |b, (base, incoming)| {
                b.iter_batched(
                    || (base.clone(), incoming.clone()),
                    |(base, incoming)| process(incoming, Some(base), &config),
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_pipeline);
criterion_main!(benches);
