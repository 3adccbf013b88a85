//! Generates the huge-tier benchmark report to disk.
//!
//! Writes `target/bench-fixtures/huge-report.xml`, which
//! `benches/parse_write.rs` loads when present.

use std::error::Error;
use std::fs;

use rulebridge_bench::{SizeTier, generate_report, huge_fixture_path};
use rulebridge_core::write_report;

fn main() -> Result<(), Box<dyn Error>> {
    let path = huge_fixture_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    eprintln!("Generating Huge tier...");
    let report = generate_report(&SizeTier::Huge.config(42));
    eprintln!(
        "Generated {} rules, {} targets, {} defects",
        report.rules.len(),
        report.target_count(),
        report.defect_count()
    );

    eprintln!("Writing XML to {}...", path.display());
    let xml = write_report(&report)?;
    fs::write(&path, &xml)?;
    eprintln!("XML: {:.1} MB", xml.len() as f64 / (1024.0 * 1024.0));

    Ok(())
}
