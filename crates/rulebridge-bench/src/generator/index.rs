//! Index section generators: inspected files and the rule catalogue.

use rulebridge_core::{FileEntry, RuleInfo};

use super::GeneratorConfig;

/// Rule categories cycled through when naming generated rules.
pub const CATEGORIES: &[&str] = &["Design", "Performance", "Correctness", "Smells", "Security"];

/// Name of the `i`th generated rule.
pub fn rule_name(i: usize) -> String {
    format!("GeneratedCheck{i:04}Rule")
}

/// Documentation URI of the `i`th generated rule.
pub fn rule_uri(i: usize) -> String {
    format!(
        "https://example.org/rules/{}#{}",
        CATEGORIES[i % CATEGORIES.len()],
        rule_name(i)
    )
}

/// Assembly name of the `i`th generated binary.
pub fn assembly_name(i: usize) -> String {
    format!("Gen.Module{i}")
}

/// Builds the `files` section.
pub fn files(config: &GeneratorConfig) -> Vec<FileEntry> {
    (0..config.num_files)
        .map(|i| FileEntry {
            path: format!("/build/bin/{}.dll", assembly_name(i)),
            assembly: format!(
                "{}, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
                assembly_name(i)
            ),
        })
        .collect()
}

/// Builds the `rules` index section.
pub fn rule_index(config: &GeneratorConfig) -> Vec<RuleInfo> {
    (0..config.num_rules)
        .map(|i| RuleInfo {
            name: rule_name(i),
            kind: Some(if i % 2 == 0 { "Method" } else { "Type" }.to_owned()),
            uri: Some(rule_uri(i)),
            full_name: format!(
                "Rules.{}.{}",
                CATEGORIES[i % CATEGORIES.len()],
                rule_name(i)
            ),
        })
        .collect()
}
