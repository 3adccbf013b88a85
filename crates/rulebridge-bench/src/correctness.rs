//! Post-operation invariant checkers for correctness validation.

use std::collections::{BTreeSet, HashSet};

use rulebridge_core::{Diagnostic, GroupKey, Report, defect_groups, parse_report, write_report};

fn group_keys(report: &Report) -> BTreeSet<GroupKey> {
    defect_groups(report).into_iter().map(|g| g.key).collect()
}

/// Verifies condensation invariants:
/// - exactly one defect remains per group of the input
/// - no group is introduced or lost
/// - rule names are unique, and target names are unique within each rule
pub fn check_condensed(before: &Report, after: &Report) -> Result<(), String> {
    let before_keys = group_keys(before);
    if after.defect_count() != before_keys.len() {
        return Err(format!(
            "condensed defect count {} differs from group count {}",
            after.defect_count(),
            before_keys.len()
        ));
    }

    let after_keys = group_keys(after);
    if after_keys != before_keys {
        return Err(format!(
            "group keys changed: {} before, {} after",
            before_keys.len(),
            after_keys.len()
        ));
    }

    let mut rule_names = HashSet::new();
    for rule in &after.rules {
        if !rule_names.insert(rule.name.as_str()) {
            return Err(format!("rule {} appears more than once", rule.name));
        }
        let mut target_names = HashSet::new();
        for target in &rule.targets {
            if !target_names.insert(target.name.as_str()) {
                return Err(format!(
                    "target {} appears more than once under rule {}",
                    target.name, rule.name
                ));
            }
        }
    }
    Ok(())
}

/// Verifies merge invariants for an uncondensed merge:
/// - every defect of both inputs is kept
/// - every file, rule index entry and result rule of both inputs is present
/// - the base's root metadata wins
pub fn check_merge(base: &Report, incoming: &Report, merged: &Report) -> Result<(), String> {
    let expected = base.defect_count() + incoming.defect_count();
    if merged.defect_count() != expected {
        return Err(format!(
            "merged defect count {} differs from sum of inputs {expected}",
            merged.defect_count()
        ));
    }

    let merged_files: HashSet<String> = merged.files.iter().map(|f| f.key()).collect();
    for file in base.files.iter().chain(&incoming.files) {
        if !merged_files.contains(&file.key()) {
            return Err(format!("file {} missing from merged report", file.path));
        }
    }

    let merged_index: HashSet<&str> = merged.rule_index.iter().map(|r| r.name.as_str()).collect();
    for info in base.rule_index.iter().chain(&incoming.rule_index) {
        if !merged_index.contains(info.name.as_str()) {
            return Err(format!("rule {} missing from merged rule index", info.name));
        }
    }

    for rule in base.rules.iter().chain(&incoming.rules) {
        if merged.rule(&rule.name).is_none() {
            return Err(format!("rule {} missing from merged results", rule.name));
        }
    }

    if merged.root != base.root {
        return Err("merged root metadata differs from the base".to_owned());
    }
    Ok(())
}

/// Verifies that one diagnostic was emitted per defect, each carrying its
/// rule as the code.
pub fn check_diagnostics(report: &Report, diagnostics: &[Diagnostic]) -> Result<(), String> {
    if diagnostics.len() != report.defect_count() {
        return Err(format!(
            "{} diagnostics for {} defects",
            diagnostics.len(),
            report.defect_count()
        ));
    }
    for ((rule, _, _), diag) in report.defects().zip(diagnostics) {
        if diag.code != rule.name {
            return Err(format!(
                "diagnostic code {} does not match rule {}",
                diag.code, rule.name
            ));
        }
    }
    Ok(())
}

/// Verifies that a report survives serialization and re-parsing unchanged.
pub fn check_round_trip(report: &Report) -> Result<(), String> {
    let xml = write_report(report).map_err(|e| format!("write failed: {e}"))?;
    let back = parse_report(&xml).map_err(|e| format!("parse failed: {e}"))?;
    if &back != report {
        return Err("report changed after a write/parse round trip".to_owned());
    }
    Ok(())
}
