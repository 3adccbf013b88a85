//! Report generator and benchmark utilities for rulebridge.
//!
//! This crate provides deterministic generation of realistic analysis
//! reports for benchmarking and property-based testing of `rulebridge-core`.

use std::path::PathBuf;

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_overlapping, generate_report};

/// Returns the path where the huge-tier report fixture is stored on disk.
///
/// The file lives under `target/bench-fixtures/huge-report.xml` so it is
/// automatically gitignored and shared between the generator binary and
/// the benchmark harness.
pub fn huge_fixture_path() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .join("..")
        .join("..")
        .join("target")
        .join("bench-fixtures")
        .join("huge-report.xml")
}
