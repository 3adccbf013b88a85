//! Property-based tests for merging and condensation.
//!
//! Reports are generated from small pools of rule, target, source and
//! description values so that generated inputs overlap heavily.
#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rulebridge_core::{
    Defect, GroupKey, Report, Rule, Target, condense, defect_groups, merge,
};

const RULES: &[&str] = &["R0", "R1", "R2"];
const TARGETS: &[&str] = &["T0", "T1", "T2"];
const SOURCES: &[&str] = &["a.cs(1)", "a.cs(2)", r"src\b.cs(≈7)", "src/b.cs(≈7)", "nowhere", ""];
const DESCRIPTIONS: &[&str] = &["x", "y", "z", "w"];

fn arb_defect() -> impl Strategy<Value = Defect> {
    (0..SOURCES.len(), 0..DESCRIPTIONS.len()).prop_map(|(s, d)| Defect {
        severity: None,
        confidence: None,
        location: None,
        source: SOURCES[s].to_owned(),
        description: DESCRIPTIONS[d].to_owned(),
    })
}

fn arb_target() -> impl Strategy<Value = Target> {
    (0..TARGETS.len(), prop::collection::vec(arb_defect(), 0..4)).prop_map(|(t, defects)| Target {
        name: TARGETS[t].to_owned(),
        assembly: None,
        defects,
    })
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    (0..RULES.len(), prop::collection::vec(arb_target(), 0..3)).prop_map(|(r, targets)| Rule {
        name: RULES[r].to_owned(),
        uri: None,
        problem: format!("problem of {}", RULES[r]),
        solution: String::new(),
        targets,
    })
}

fn arb_report() -> impl Strategy<Value = Report> {
    prop::collection::vec(arb_rule(), 0..4).prop_map(|rules| Report {
        rules,
        ..Report::new()
    })
}

/// Group keys present in a report, regardless of condensation state.
fn keys(report: &Report) -> BTreeSet<GroupKey> {
    defect_groups(report).into_iter().map(|g| g.key).collect()
}

/// Group key to aggregated description, for a condensed report.
fn group_map(report: &Report) -> BTreeMap<GroupKey, String> {
    defect_groups(report)
        .into_iter()
        .map(|g| (g.key, g.defect.description))
        .collect()
}

proptest! {
    #[test]
    fn merge_keeps_every_defect(a in arb_report(), b in arb_report()) {
        let total = a.defect_count() + b.defect_count();
        let merged = merge(a, b);
        prop_assert_eq!(merged.defect_count(), total);
    }

    #[test]
    fn merge_is_superset_union(a in arb_report(), b in arb_report()) {
        let mut expected = keys(&a);
        expected.extend(keys(&b));
        let merged = condense(merge(a, b));
        prop_assert_eq!(keys(&merged), expected);
    }

    #[test]
    fn condense_is_idempotent(r in arb_report()) {
        let once = condense(r);
        let twice = condense(once.clone());
        prop_assert_eq!(&twice, &once);
        prop_assert!(defect_groups(&once).iter().all(|g| g.members == 1));
    }

    #[test]
    fn merge_order_does_not_change_groups(
        a in arb_report(),
        b in arb_report(),
        c in arb_report(),
    ) {
        let abc = condense(merge(merge(a.clone(), b.clone()), c.clone()));
        let cab = condense(merge(merge(c.clone(), a.clone()), b.clone()));
        prop_assert_eq!(group_map(&abc), group_map(&cab));

        // Condensing between merges, as accumulation does, changes nothing.
        let stepwise = condense(merge(condense(merge(a, b)), c));
        prop_assert_eq!(group_map(&stepwise), group_map(&abc));
    }
}
