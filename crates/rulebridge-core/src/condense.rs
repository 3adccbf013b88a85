//! Condensation: collapse defects that differ only in their description.
//!
//! Defects are grouped by [`GroupKey`] (rule identity, the rule's problem
//! text, target name, normalized source location). Each group becomes one
//! representative defect (the first one seen) whose description aggregates
//! the members' descriptions (see [`aggregate_descriptions`]). Rules with the
//! same identity and targets with the same name within a rule are folded
//! into their first occurrence beforehand, which is what makes a freshly
//! merged report come out with unique identity keys.
//!
//! Output order follows first-seen order for rules, targets and groups.
//! [`condense`] is idempotent: every group of a condensed report has exactly
//! one member, and a single description is kept as it is.
use std::collections::{BTreeSet, HashMap};

use crate::location::{SourceLocation, extract_location, location_key};
use crate::model::{Defect, Report, Rule, Target};

/// Line separator used between aggregated descriptions.
pub const DESCRIPTION_SEPARATOR: &str = "\n";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Composite identity of a defect group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Owning rule identity.
    pub rule: String,
    /// The owning rule's problem text.
    pub problem: String,
    /// Owning target name.
    pub target: String,
    /// Normalized source location (see [`location_key`]).
    pub location: String,
}

/// One condensed defect group: a representative defect with the aggregated
/// description, plus the number of raw defects it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectGroup {
    /// Identity of the group.
    pub key: GroupKey,
    /// The representative defect carrying the aggregated description.
    pub defect: Defect,
    /// Parsed source location of the representative, if any.
    pub location: Option<SourceLocation>,
    /// Number of raw defects collapsed into this group.
    pub members: usize,
}

/// Counts describing one condensation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CondenseStats {
    /// Raw defects in the input.
    pub defects_before: usize,
    /// Defect groups in the output.
    pub defects_after: usize,
    /// Raw defects absorbed into another defect's group.
    pub groups_collapsed: usize,
    /// Rules folded into an earlier rule with the same identity.
    pub rules_folded: usize,
    /// Targets folded into an earlier target with the same name.
    pub targets_folded: usize,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Condenses `report`, returning a new report in which every [`GroupKey`]
/// occurs at most once.
pub fn condense(report: Report) -> Report {
    condense_with_stats(report).0
}

/// Like [`condense`], also returning statistics for logging.
pub fn condense_with_stats(report: Report) -> (Report, CondenseStats) {
    let (condensed, members, mut stats) = fold(report);
    stats.defects_after = members.len();
    stats.groups_collapsed = stats.defects_before.saturating_sub(stats.defects_after);
    tracing::debug!(
        before = stats.defects_before,
        after = stats.defects_after,
        collapsed = stats.groups_collapsed,
        rules_folded = stats.rules_folded,
        targets_folded = stats.targets_folded,
        "condensed report"
    );
    (condensed, stats)
}

/// Returns the defect groups of `report` in document order without consuming
/// it. For an already-condensed report every group has one member.
pub fn defect_groups(report: &Report) -> Vec<DefectGroup> {
    let (condensed, members, _) = fold(report.clone());
    let mut counts = members.into_iter();

    let mut groups = Vec::with_capacity(condensed.defect_count());
    for rule in &condensed.rules {
        for target in &rule.targets {
            for defect in &target.defects {
                groups.push(DefectGroup {
                    key: group_key(rule, target, defect),
                    location: extract_location(&defect.source),
                    members: counts.next().unwrap_or(1),
                    defect: defect.clone(),
                });
            }
        }
    }
    groups
}

/// Aggregates descriptions. Texts are trimmed and empty ones dropped. A
/// single distinct text is returned unchanged. Several distinct texts are
/// merged line by line: every non-empty trimmed line, deduplicated, sorted
/// lexicographically and joined with [`DESCRIPTION_SEPARATOR`].
///
/// The result does not depend on how earlier passes grouped the same texts.
pub fn aggregate_descriptions<'a>(descriptions: impl IntoIterator<Item = &'a str>) -> String {
    let texts: BTreeSet<&str> = descriptions
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if texts.len() <= 1 {
        return texts.into_iter().next().unwrap_or_default().to_owned();
    }

    let lines: BTreeSet<&str> = texts
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines.into_iter().collect::<Vec<_>>().join(DESCRIPTION_SEPARATOR)
}

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Position of a group's representative inside the output report.
#[derive(Debug, Clone, Copy)]
struct Slot {
    rule: usize,
    target: usize,
    defect: usize,
}

/// Performs the fold and returns the condensed report, the member count of
/// each output defect in document order, and partial statistics.
fn fold(report: Report) -> (Report, Vec<usize>, CondenseStats) {
    let mut stats = CondenseStats {
        defects_before: report.defect_count(),
        ..CondenseStats::default()
    };

    let Report {
        root,
        files,
        rule_index,
        rules,
    } = report;

    let mut out_rules: Vec<Rule> = Vec::with_capacity(rules.len());
    let mut rule_slots: HashMap<String, usize> = HashMap::new();
    let mut target_slots: HashMap<(usize, String), usize> = HashMap::new();
    let mut group_slots: HashMap<GroupKey, Slot> = HashMap::new();
    // Description sets per output defect, addressed by slot.
    let mut descriptions: HashMap<(usize, usize, usize), Vec<String>> = HashMap::new();

    for rule in rules {
        let Rule {
            name,
            uri,
            problem,
            solution,
            targets,
        } = rule;

        let rule_idx = match rule_slots.get(&name) {
            Some(&idx) => {
                stats.rules_folded += 1;
                idx
            }
            None => {
                let idx = out_rules.len();
                rule_slots.insert(name.clone(), idx);
                out_rules.push(Rule {
                    name,
                    uri,
                    problem,
                    solution,
                    targets: Vec::new(),
                });
                idx
            }
        };

        for target in targets {
            let Target {
                name: target_name,
                assembly,
                defects,
            } = target;

            let slot_key = (rule_idx, target_name.clone());
            let target_idx = match target_slots.get(&slot_key) {
                Some(&idx) => {
                    stats.targets_folded += 1;
                    idx
                }
                None => {
                    let targets = &mut out_rules[rule_idx].targets;
                    let idx = targets.len();
                    targets.push(Target {
                        name: target_name,
                        assembly,
                        defects: Vec::new(),
                    });
                    target_slots.insert(slot_key, idx);
                    idx
                }
            };

            for defect in defects {
                let out_rule = &out_rules[rule_idx];
                let key = GroupKey {
                    rule: out_rule.name.clone(),
                    problem: out_rule.problem.clone(),
                    target: out_rule.targets[target_idx].name.clone(),
                    location: location_key(&defect.source),
                };

                match group_slots.get(&key) {
                    Some(slot) => {
                        descriptions
                            .entry((slot.rule, slot.target, slot.defect))
                            .or_default()
                            .push(defect.description);
                    }
                    None => {
                        let defects = &mut out_rules[rule_idx].targets[target_idx].defects;
                        let slot = Slot {
                            rule: rule_idx,
                            target: target_idx,
                            defect: defects.len(),
                        };
                        descriptions
                            .entry((slot.rule, slot.target, slot.defect))
                            .or_default()
                            .push(defect.description.clone());
                        defects.push(defect);
                        group_slots.insert(key, slot);
                    }
                }
            }
        }
    }

    let mut members = Vec::with_capacity(group_slots.len());
    for (r, rule) in out_rules.iter_mut().enumerate() {
        for (t, target) in rule.targets.iter_mut().enumerate() {
            for (d, defect) in target.defects.iter_mut().enumerate() {
                let texts = descriptions.remove(&(r, t, d)).unwrap_or_default();
                members.push(texts.len().max(1));
                defect.description = aggregate_descriptions(texts.iter().map(String::as_str));
            }
        }
    }

    let condensed = Report {
        root,
        files,
        rule_index,
        rules: out_rules,
    };
    (condensed, members, stats)
}

fn group_key(rule: &Rule, target: &Target, defect: &Defect) -> GroupKey {
    GroupKey {
        rule: rule.name.clone(),
        problem: rule.problem.clone(),
        target: target.name.clone(),
        location: location_key(&defect.source),
    }
}
