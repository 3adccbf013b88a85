//! Group 1: Parse and write benchmarks.
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rulebridge_bench::{SizeTier, generate_report, huge_fixture_path};
use rulebridge_core::{parse_report, write_report};

const TIERS: [(&str, SizeTier); 3] = [
    ("S", SizeTier::Small),
    ("M", SizeTier::Medium),
    ("L", SizeTier::Large),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, tier) in TIERS {
        let report = generate_report(&tier.config(42));
        let xml = write_report(&report).expect("write");

        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("xml", name), &xml, |b, xml| {
            b.iter(|| parse_report(xml).expect("parse"));
        });
    }

    // The huge tier is generated ahead of time by `gen-report`.
    if let Ok(xml) = std::fs::read_to_string(huge_fixture_path()) {
        group.sample_size(10);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("xml", "Huge"), &xml, |b, xml| {
            b.iter(|| parse_report(xml).expect("parse"));
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for (name, tier) in TIERS {
        let report = generate_report(&tier.config(42));
        let bytes = write_report(&report).expect("write").len() as u64;

        group.throughput(Throughput::Bytes(bytes));
        group.bench_with_input(BenchmarkId::new("xml", name), &report, |b, report| {
            b.iter(|| write_report(report).expect("write"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_write);
criterion_main!(benches);
