//! Shared constructors for unit-test fixtures.
//!
//! Compiled only in test builds. Integration tests under
//! `crates/rulebridge-core/tests/` define their own helpers because they link
//! against the non-test library build.

use crate::model::{Defect, FileEntry, Report, Rule, RuleInfo, Target};

/// A defect with the given source location and description and no optional
/// tool attributes.
pub fn defect(source: &str, description: &str) -> Defect {
    Defect {
        severity: None,
        confidence: None,
        location: None,
        source: source.to_owned(),
        description: description.to_owned(),
    }
}

/// A target without an assembly attribute.
pub fn target(name: &str, defects: Vec<Defect>) -> Target {
    Target {
        name: name.to_owned(),
        assembly: None,
        defects,
    }
}

/// A rule with the given problem text, an empty solution and no URI.
pub fn rule(name: &str, problem: &str, targets: Vec<Target>) -> Rule {
    Rule {
        name: name.to_owned(),
        uri: None,
        problem: problem.to_owned(),
        solution: String::new(),
        targets,
    }
}

/// A file index entry whose assembly text is the file stem.
pub fn file(path: &str) -> FileEntry {
    let stem = path
        .rsplit('/')
        .next()
        .and_then(|name| name.split('.').next())
        .unwrap_or(path);
    FileEntry {
        path: path.to_owned(),
        assembly: stem.to_owned(),
    }
}

/// A rule index entry.
pub fn rule_info(name: &str) -> RuleInfo {
    RuleInfo {
        name: name.to_owned(),
        kind: None,
        uri: None,
        full_name: format!("Checks.{name}"),
    }
}

/// A report with the default root and only a results section.
pub fn report(rules: Vec<Rule>) -> Report {
    Report {
        rules,
        ..Report::new()
    }
}
