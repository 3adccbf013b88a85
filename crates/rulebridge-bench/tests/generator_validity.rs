//! Checks that generated reports are deterministic and well-shaped.
#![allow(clippy::expect_used)]

use proptest::prelude::*;
use rulebridge_bench::{GeneratorConfig, SizeTier, generate_overlapping, generate_report};
use rulebridge_core::{parse_report, write_report};

#[test]
fn same_seed_same_report() {
    let a = generate_report(&SizeTier::Small.config(9));
    let b = generate_report(&SizeTier::Small.config(9));
    assert_eq!(a, b);
}

#[test]
fn different_seeds_differ() {
    let a = generate_report(&SizeTier::Small.config(1));
    let b = generate_report(&SizeTier::Small.config(2));
    assert_ne!(a, b);
}

#[test]
fn tier_sizes_match_config() {
    let config = SizeTier::Medium.config(42);
    let report = generate_report(&config);
    assert_eq!(report.files.len(), config.num_files);
    assert_eq!(report.rule_index.len(), config.num_rules);
    assert_eq!(report.rules.len(), config.num_rules);
    assert_eq!(
        report.defect_count(),
        config.num_rules * config.targets_per_rule * config.defects_per_target
    );
}

#[test]
fn overlapping_reports_share_names() {
    let (a, b) = generate_overlapping(&SizeTier::Small.config(42));
    let names_a: Vec<&str> = a.rules.iter().map(|r| r.name.as_str()).collect();
    let names_b: Vec<&str> = b.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names_a, names_b);
    assert_eq!(a.files, b.files);
    assert_ne!(a, b);
}

#[test]
fn generated_report_parses_after_writing() {
    let report = generate_report(&SizeTier::Small.config(42));
    let xml = write_report(&report).expect("write");
    let back = parse_report(&xml).expect("parse");
    assert_eq!(back.defect_count(), report.defect_count());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_config_yields_requested_shape(
        seed in any::<u64>(),
        num_files in 0usize..4,
        num_rules in 0usize..6,
        targets_per_rule in 0usize..4,
        defects_per_target in 0usize..5,
        duplicate_rate in 0.0f64..=1.0,
        unlocated_rate in 0.0f64..=1.0,
    ) {
        let config = GeneratorConfig {
            seed,
            num_files,
            num_rules,
            targets_per_rule,
            defects_per_target,
            duplicate_rate,
            unlocated_rate,
        };
        let report = generate_report(&config);
        prop_assert_eq!(report.rules.len(), num_rules);
        prop_assert_eq!(
            report.defect_count(),
            num_rules * targets_per_rule * defects_per_target
        );
    }
}
