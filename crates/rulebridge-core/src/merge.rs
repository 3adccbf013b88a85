//! Merging of a cumulative report with a freshly produced one.
//!
//! The merge is a keyed union that never drops anything:
//!
//! - `files` entries are unioned by normalized path;
//! - `rules` index entries and result rules are unioned by rule identity;
//! - for a result rule present in both inputs, the incoming rule's targets
//!   are appended to the base rule's target list.
//!
//! When a key is present in both inputs the base entry is kept unchanged,
//! including its `problem`/`solution` text and root metadata. Duplicate
//! targets and defects produced by appending are left for
//! [`crate::condense`] to collapse.
use std::collections::{HashMap, HashSet};

use crate::model::{FileEntry, Report, RuleInfo};

/// Counts describing one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// File entries present only in the incoming report.
    pub files_added: usize,
    /// Result rules present only in the incoming report.
    pub rules_added: usize,
    /// Targets appended to a rule the base already had.
    pub targets_appended: usize,
}

/// Merges `incoming` into `base` and returns the combined report.
pub fn merge(base: Report, incoming: Report) -> Report {
    merge_with_stats(base, incoming).0
}

/// Like [`merge`], also returning statistics for logging.
pub fn merge_with_stats(base: Report, incoming: Report) -> (Report, MergeStats) {
    let mut stats = MergeStats::default();
    let mut merged = base;

    let Report {
        root: _,
        files,
        rule_index,
        rules,
    } = incoming;

    stats.files_added = union_files(&mut merged.files, files);
    union_rule_index(&mut merged.rule_index, rule_index);

    let mut positions: HashMap<String, usize> = HashMap::new();
    for (idx, rule) in merged.rules.iter().enumerate() {
        positions.entry(rule.name.clone()).or_insert(idx);
    }

    for rule in rules {
        match positions.get(&rule.name) {
            Some(&idx) => {
                stats.targets_appended += rule.targets.len();
                merged.rules[idx].targets.extend(rule.targets);
            }
            None => {
                positions.insert(rule.name.clone(), merged.rules.len());
                stats.rules_added += 1;
                merged.rules.push(rule);
            }
        }
    }

    tracing::debug!(
        files_added = stats.files_added,
        rules_added = stats.rules_added,
        targets_appended = stats.targets_appended,
        defects = merged.defect_count(),
        "merged report"
    );

    (merged, stats)
}

/// Folds `incoming` into an optional cumulative report.
///
/// With no base the incoming report is returned verbatim; otherwise this is
/// [`merge`].
pub fn accumulate(base: Option<Report>, incoming: Report) -> Report {
    match base {
        Some(base) => merge(base, incoming),
        None => {
            tracing::debug!("no cumulative report yet, starting from incoming");
            incoming
        }
    }
}

/// Appends incoming file entries whose normalized path the base lacks.
/// Returns the number of entries added.
fn union_files(base: &mut Vec<FileEntry>, incoming: Vec<FileEntry>) -> usize {
    let mut seen: HashSet<String> = base.iter().map(FileEntry::key).collect();
    let before = base.len();
    for file in incoming {
        if seen.insert(file.key()) {
            base.push(file);
        }
    }
    base.len() - before
}

fn union_rule_index(base: &mut Vec<RuleInfo>, incoming: Vec<RuleInfo>) {
    let mut seen: HashSet<String> = base.iter().map(|r| r.name.clone()).collect();
    for info in incoming {
        if seen.insert(info.name.clone()) {
            base.push(info);
        }
    }
}
