/// Post-processing pipeline for one freshly produced report.
///
/// Steps, in order:
///
/// 1. Condense the incoming report (when enabled).
/// 2. If a cumulative base exists, merge the incoming report into it and
///    condense the result again (when enabled).
/// 3. Emit one diagnostic per remaining defect and derive the run outcome.
///
/// Every step consumes its input and returns a new [`Report`]; the caller
/// owns the result and decides where to persist it.
///
/// The primary entry point is [`process`].
use crate::condense::{CondenseStats, condense_with_stats};
use crate::diagnostic::{Diagnostic, RunOutcome, SeverityPolicy, emit, outcome};
use crate::merge::{MergeStats, merge_with_stats};
use crate::model::Report;

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Configuration for [`process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Collapse defects that differ only in description.
    pub condense: bool,
    /// Severity applied to emitted diagnostics.
    pub policy: SeverityPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            condense: true,
            policy: SeverityPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineOutput
// ---------------------------------------------------------------------------

/// Everything [`process`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// The final report, ready to be persisted.
    pub report: Report,
    /// Diagnostics in document order.
    pub diagnostics: Vec<Diagnostic>,
    /// Overall run outcome under the configured policy.
    pub outcome: RunOutcome,
    /// Statistics of the last condensation pass, if any ran.
    pub condense_stats: Option<CondenseStats>,
    /// Statistics of the merge, if a base was supplied.
    pub merge_stats: Option<MergeStats>,
}

// ---------------------------------------------------------------------------
// process
// ---------------------------------------------------------------------------

/// Runs the post-processing pipeline on `incoming`, folding it into `base`
/// when one is given.
pub fn process(incoming: Report, base: Option<Report>, config: &PipelineConfig) -> PipelineOutput {
    let mut condense_stats = None;

    let incoming = if config.condense {
        let (report, stats) = condense_with_stats(incoming);
        condense_stats = Some(stats);
        report
    } else {
        incoming
    };

    let mut merge_stats = None;
    let report = match base {
        Some(base) => {
            let (merged, stats) = merge_with_stats(base, incoming);
            merge_stats = Some(stats);
            if config.condense {
                let (report, stats) = condense_with_stats(merged);
                condense_stats = Some(stats);
                report
            } else {
                merged
            }
        }
        None => incoming,
    };

    let diagnostics = emit(&report, &config.policy);
    let outcome = outcome(&diagnostics, &config.policy);

    tracing::debug!(
        diagnostics = diagnostics.len(),
        accumulated = merge_stats.is_some(),
        ?outcome,
        "pipeline finished"
    );

    PipelineOutput {
        report,
        diagnostics,
        outcome,
        condense_stats,
        merge_stats,
    }
}
