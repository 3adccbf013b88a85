//! Mapping of report defects to host build diagnostics.
//!
//! [`emit`] produces exactly one [`Diagnostic`] per defect in document order
//! (rule, then target, then defect). Condense first to get one diagnostic per
//! defect group. Severity is uniform for a run and comes from the
//! [`SeverityPolicy`]; there is no per-rule mapping.
use std::fmt;

use serde::Serialize;

use crate::location::extract_location;
use crate::model::{Defect, Report, Rule, Target};

/// Category tag attached to every diagnostic.
pub const CATEGORY: &str = "[analysis]";

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of an emitted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the build.
    Error,
    /// Reported but does not fail the build.
    Warning,
}

impl Severity {
    /// Lowercase name as used in build-system diagnostic lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-wide severity choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityPolicy {
    /// Report every defect as an error and fail the run if any exist.
    pub treat_as_error: bool,
}

impl SeverityPolicy {
    /// The severity applied to every diagnostic under this policy.
    pub fn severity(&self) -> Severity {
        if self.treat_as_error {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// One build diagnostic derived from a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Uniform run severity.
    pub severity: Severity,
    /// Always [`CATEGORY`].
    pub category: &'static str,
    /// Rule identity, used as the error code.
    pub code: String,
    /// Source file, empty when the location is unknown.
    pub file: String,
    /// Line number, `0` when unknown.
    pub line: u32,
    /// Column number, `0` when unknown.
    pub column: u32,
    /// Human-readable message; may span several lines.
    pub message: String,
}

impl Diagnostic {
    /// Returns `true` when the diagnostic carries a file attribution.
    pub fn has_file(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_char = match self.severity {
            Severity::Error => 'E',
            Severity::Warning => 'W',
        };
        write!(f, "[{level_char}] {}", self.code)?;
        if self.has_file() {
            write!(f, " {}:{}:{}", self.file, self.line, self.column)?;
        }
        write!(f, ": {}", self.message)
    }
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run succeeded.
    Success,
    /// Defects were found while they are treated as errors.
    Failure,
}

/// Produces one diagnostic per defect in document order.
pub fn emit(report: &Report, policy: &SeverityPolicy) -> Vec<Diagnostic> {
    let severity = policy.severity();
    report
        .defects()
        .map(|(rule, target, defect)| to_diagnostic(rule, target, defect, severity))
        .collect()
}

/// Decides the run outcome from the emitted diagnostics: failure iff the
/// policy treats defects as errors and at least one diagnostic exists.
pub fn outcome(diagnostics: &[Diagnostic], policy: &SeverityPolicy) -> RunOutcome {
    if policy.treat_as_error && !diagnostics.is_empty() {
        RunOutcome::Failure
    } else {
        RunOutcome::Success
    }
}

fn to_diagnostic(rule: &Rule, target: &Target, defect: &Defect, severity: Severity) -> Diagnostic {
    let (file, line, column, message) = match extract_location(&defect.source) {
        Some(loc) => {
            let head = format!("{}: {}", rule.name, rule.problem);
            (loc.file, loc.line, loc.column, with_description(head, defect))
        }
        None => {
            let head = format!("{}: {}: {}", rule.name, target.name, rule.problem);
            (String::new(), 0, 0, with_description(head, defect))
        }
    };

    Diagnostic {
        severity,
        category: CATEGORY,
        code: rule.name.clone(),
        file,
        line,
        column,
        message,
    }
}

fn with_description(mut head: String, defect: &Defect) -> String {
    if !defect.description.is_empty() {
        head.push('\n');
        head.push_str(&defect.description);
    }
    head
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::condense::condense;
    use crate::test_helpers::{defect, report, rule, target};

    const WARN: SeverityPolicy = SeverityPolicy {
        treat_as_error: false,
    };
    const STRICT: SeverityPolicy = SeverityPolicy {
        treat_as_error: true,
    };

    fn sample() -> Report {
        report(vec![rule(
            "R1",
            "Problem text",
            vec![target(
                "T1",
                vec![
                    defect("src/a.cs(≈10,3)", "x"),
                    defect("src/a.cs(≈10,3)", "y"),
                    defect("nowhere", "z"),
                ],
            )],
        )])
    }

    #[test]
    fn one_diagnostic_per_raw_defect() {
        assert_eq!(emit(&sample(), &WARN).len(), 3);
    }

    #[test]
    fn one_diagnostic_per_group_after_condensing() {
        assert_eq!(emit(&condense(sample()), &WARN).len(), 2);
    }

    #[test]
    fn located_defect_maps_file_line_and_column() {
        let diags = emit(&condense(sample()), &WARN);
        let d = &diags[0];
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.category, "[analysis]");
        assert_eq!(d.code, "R1");
        assert_eq!(d.file, "src/a.cs");
        assert_eq!(d.line, 10);
        assert_eq!(d.column, 3);
        assert_eq!(d.message, "R1: Problem text\nx\ny");
    }

    #[test]
    fn unlocated_defect_is_attributed_to_target() {
        let diags = emit(&sample(), &WARN);
        let d = &diags[2];
        assert!(!d.has_file());
        assert_eq!((d.line, d.column), (0, 0));
        assert_eq!(d.message, "R1: T1: Problem text\nz");
    }

    #[test]
    fn empty_description_adds_no_separator() {
        let r = report(vec![rule("R1", "P", vec![target("T1", vec![defect("a.cs(1)", "")])])]);
        assert_eq!(emit(&r, &WARN)[0].message, "R1: P");
    }

    #[test]
    fn strict_policy_makes_errors_and_fails() {
        let diags = emit(&sample(), &STRICT);
        assert!(diags.iter().all(|d| d.severity == Severity::Error));
        assert_eq!(outcome(&diags, &STRICT), RunOutcome::Failure);
    }

    #[test]
    fn warnings_never_fail_the_run() {
        let diags = emit(&sample(), &WARN);
        assert_eq!(outcome(&diags, &WARN), RunOutcome::Success);
    }

    #[test]
    fn clean_report_succeeds_even_when_strict() {
        let diags = emit(&Report::new(), &STRICT);
        assert!(diags.is_empty());
        assert_eq!(outcome(&diags, &STRICT), RunOutcome::Success);
    }

    #[test]
    fn emission_follows_document_order() {
        let r = report(vec![
            rule("B", "P", vec![target("T2", vec![defect("b.cs(1)", "")])]),
            rule("A", "P", vec![target("T1", vec![defect("a.cs(1)", "")])]),
        ]);
        let codes: Vec<_> = emit(&r, &WARN).into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }

    #[test]
    fn display_is_compact() {
        let diags = emit(&sample(), &WARN);
        assert_eq!(diags[0].to_string(), "[W] R1 src/a.cs:10:3: R1: Problem text\nx");
        assert_eq!(diags[2].to_string(), "[W] R1: R1: T1: Problem text\nz");
    }
}
