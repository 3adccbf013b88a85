//! Analysis report generator.
//!
//! Produces [`Report`] instances with a configurable share of defects that
//! condense together, so condensation and merge benchmarks see realistic
//! collapse ratios.

pub mod index;
pub mod results;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rulebridge_core::{Report, RootInfo};

/// Configuration for the report generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of inspected binaries in the `files` section.
    pub num_files: usize,
    /// Number of rules with results.
    pub num_rules: usize,
    /// Targets reported per rule.
    pub targets_per_rule: usize,
    /// Defects reported per target.
    pub defects_per_target: usize,
    /// Probability that a defect repeats the previous defect's location
    /// (0.0-1.0). Repeats collapse under condensation.
    pub duplicate_rate: f64,
    /// Probability that a defect has no parsable source location (0.0-1.0).
    pub unlocated_rate: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~200 defects, ~50KB XML
    Small,
    /// ~3000 defects, ~800KB XML
    Medium,
    /// ~20000 defects, ~5MB XML
    Large,
    /// ~200000 defects, ~50MB XML
    Huge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_files: 2,
                num_rules: 10,
                targets_per_rule: 5,
                defects_per_target: 4,
                duplicate_rate: 0.4,
                unlocated_rate: 0.05,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_files: 8,
                num_rules: 40,
                targets_per_rule: 15,
                defects_per_target: 5,
                duplicate_rate: 0.4,
                unlocated_rate: 0.05,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_files: 20,
                num_rules: 80,
                targets_per_rule: 50,
                defects_per_target: 5,
                duplicate_rate: 0.5,
                unlocated_rate: 0.05,
            },
            SizeTier::Huge => GeneratorConfig {
                seed,
                num_files: 60,
                num_rules: 200,
                targets_per_rule: 200,
                defects_per_target: 5,
                duplicate_rate: 0.5,
                unlocated_rate: 0.05,
            },
        }
    }
}

/// Generates a report from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_report(config: &GeneratorConfig) -> Report {
    let mut rng = StdRng::seed_from_u64(config.seed);
    Report {
        root: root_info(config.seed),
        files: index::files(config),
        rule_index: index::rule_index(config),
        rules: results::rules(config, &mut rng),
    }
}

/// Generates two reports over the same rule, target and file names, as two
/// consecutive runs against the same assemblies would produce.
pub fn generate_overlapping(config: &GeneratorConfig) -> (Report, Report) {
    let second = GeneratorConfig {
        seed: config.seed.wrapping_add(1),
        ..config.clone()
    };
    (generate_report(config), generate_report(&second))
}

fn root_info(seed: u64) -> RootInfo {
    RootInfo {
        attributes: vec![
            ("date".to_owned(), format!("2026-01-01 00:00:{:02}Z", seed % 60)),
            ("version".to_owned(), "2.10.0.0".to_owned()),
        ],
        ..RootInfo::default()
    }
}
