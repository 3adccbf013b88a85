//! Results section generator: rules, targets and defects.

use rand::Rng;
use rand::rngs::StdRng;
use rulebridge_core::{Defect, Rule, Target};

use super::GeneratorConfig;
use super::index::{assembly_name, rule_name, rule_uri};

const SEVERITIES: &[&str] = &["Critical", "High", "Medium", "Low"];
const CONFIDENCES: &[&str] = &["Total", "High", "Normal", "Low"];

const DESCRIPTIONS: &[&str] = &[
    "Method is too long.",
    "Field is never disposed.",
    "Parameter is never used.",
    "Local variable is assigned but never read.",
    "Exception is caught and ignored.",
    "Comparison with a floating point literal.",
    "Boxing inside a loop.",
    "String concatenation inside a loop.",
];

const UNLOCATED_SOURCE: &str = "debugging symbols unavailable";

/// Builds the `results` section.
pub fn rules(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Rule> {
    (0..config.num_rules)
        .map(|r| Rule {
            name: rule_name(r),
            uri: Some(rule_uri(r)),
            problem: format!("Generated problem statement for check {r}."),
            solution: format!("Generated remediation advice for check {r}."),
            targets: (0..config.targets_per_rule)
                .map(|t| target(config, rng, r, t))
                .collect(),
        })
        .collect()
}

fn target(config: &GeneratorConfig, rng: &mut StdRng, rule: usize, index: usize) -> Target {
    let module = if config.num_files == 0 {
        0
    } else {
        (rule + index) % config.num_files
    };
    let type_name = format!("{}.Type{index}", assembly_name(module));
    let file = format!("/src/{}/Type{index}.cs", assembly_name(module));

    let mut line: u32 = rng.gen_range(1..2000);
    let defects = (0..config.defects_per_target)
        .map(|d| {
            if d > 0 && !rng.gen_bool(config.duplicate_rate) {
                line = rng.gen_range(1..2000);
            }
            let source = if rng.gen_bool(config.unlocated_rate) {
                UNLOCATED_SOURCE.to_owned()
            } else {
                format!("{file}(\u{2248}{line})")
            };
            Defect {
                severity: Some(SEVERITIES[rng.gen_range(0..SEVERITIES.len())].to_owned()),
                confidence: Some(CONFIDENCES[rng.gen_range(0..CONFIDENCES.len())].to_owned()),
                location: Some(format!("System.Void {type_name}::Method{line}()")),
                source,
                description: DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())].to_owned(),
            }
        })
        .collect();

    Target {
        name: type_name,
        assembly: Some(format!("{}, Version=1.0.0.0", assembly_name(module))),
        defects,
    }
}
