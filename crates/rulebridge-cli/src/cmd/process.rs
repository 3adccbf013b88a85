//! Implementation of `rulebridge process <report>... --output <file>`.
//!
//! Loads existing reports, merges them in order, runs the post-processing
//! pipeline (optionally accumulating into the existing output report),
//! writes the result, and prints one diagnostic per remaining defect to
//! stderr.
//!
//! Exit codes:
//! - 0 = success
//! - 1 = defects found while `--treat-defects-as-errors` is set
//! - 2 = a report could not be read or parsed
use std::path::{Path, PathBuf};

use rulebridge_core::{PipelineConfig, Report, RunOutcome, SeverityPolicy, merge, pipeline};

use super::{Context, report_diagnostics};
use crate::error::CliError;
use crate::io::{load_existing_report, load_report, persist_report};
use crate::{PathOrStdin, PostProcessArgs};

/// Runs the `process` command.
///
/// # Errors
///
/// - [`CliError::InvalidConfiguration`]: no reports given.
/// - [`CliError::MalformedReport`] and other exit-2 errors from reading.
/// - [`CliError::DefectsAsErrors`]: defects remain under the strict policy.
pub fn run(
    ctx: &Context,
    reports: &[PathBuf],
    output: &Path,
    post: &PostProcessArgs,
) -> Result<(), CliError> {
    let Some((first, rest)) = reports.split_first() else {
        return Err(CliError::InvalidConfiguration {
            detail: "no input reports specified".to_owned(),
        });
    };

    let mut incoming = load(ctx, first)?;
    for path in rest {
        incoming = merge(incoming, load(ctx, path)?);
    }

    finish(ctx, incoming, output, post)
}

/// Runs the pipeline on a freshly produced report, persists the result to
/// `output` and emits diagnostics. Shared with `run`.
///
/// With `--accumulate` an existing report at `output` is the merge base; a
/// base that exists but cannot be parsed aborts the run.
pub(crate) fn finish(
    ctx: &Context,
    incoming: Report,
    output: &Path,
    post: &PostProcessArgs,
) -> Result<(), CliError> {
    let base = if post.accumulate {
        load_existing_report(output, ctx.max_file_size)?
    } else {
        None
    };

    let config = PipelineConfig {
        condense: post.condense_enabled(),
        policy: SeverityPolicy {
            treat_as_error: post.treat_defects_as_errors,
        },
    };
    let out = pipeline::process(incoming, base, &config);

    if let Some(stats) = out.condense_stats {
        tracing::info!(
            before = stats.defects_before,
            after = stats.defects_after,
            "condensed defects"
        );
    }
    if let Some(stats) = out.merge_stats {
        tracing::info!(
            files_added = stats.files_added,
            rules_added = stats.rules_added,
            targets_appended = stats.targets_appended,
            "accumulated into {}",
            output.display()
        );
    }

    persist_report(&out.report, output)?;
    report_diagnostics(ctx, &out.diagnostics, post.host_diagnostics)?;

    match out.outcome {
        RunOutcome::Success => Ok(()),
        RunOutcome::Failure => Err(CliError::DefectsAsErrors {
            count: out.diagnostics.len(),
        }),
    }
}

fn load(ctx: &Context, path: &Path) -> Result<Report, CliError> {
    load_report(&PathOrStdin::Path(path.to_path_buf()), ctx.max_file_size)
}
