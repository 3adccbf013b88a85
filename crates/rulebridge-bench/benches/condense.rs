//! Group 2: Condensation and diagnostic emission benchmarks.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rulebridge_bench::{SizeTier, generate_report};
use rulebridge_core::{SeverityPolicy, condense, defect_groups, emit};

const TIERS: [(&str, SizeTier); 3] = [
    ("S", SizeTier::Small),
    ("M", SizeTier::Medium),
    ("L", SizeTier::Large),
];

fn bench_condense(c: &mut Criterion) {
    let mut group = c.benchmark_group("condense");

    for (name, tier) in TIERS {
        let report = generate_report(&tier.config(42));
        group.throughput(Throughput::Elements(report.defect_count() as u64));
        group.bench_with_input(BenchmarkId::new("fresh", name), &report, |b, report| {
            b.iter_batched(|| report.clone(), condense, BatchSize::LargeInput);
        });

        // Already condensed input: the common accumulate steady state.
        let condensed = condense(report.clone());
        group.bench_with_input(
            BenchmarkId::new("idempotent", name),
            &condensed,
            |b, report| {
                b.iter_batched(|| report.clone(), condense, BatchSize::LargeInput);
            },
        );
    }
    group.finish();
}

fn bench_defect_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("defect_groups");

    for (name, tier) in TIERS {
        let report = generate_report(&tier.config(42));
        group.throughput(Throughput::Elements(report.defect_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &report, |b, report| {
            b.iter(|| defect_groups(report));
        });
    }
    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    let policy = SeverityPolicy::default();

    for (name, tier) in TIERS {
        let report = condense(generate_report(&tier.config(42)));
        group.throughput(Throughput::Elements(report.defect_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &report, |b, report| {
            b.iter(|| emit(report, &policy));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_condense, bench_defect_groups, bench_emit);
criterion_main!(benches);
