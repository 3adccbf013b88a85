//! Implementation of `rulebridge merge <file>...`.
//!
//! Reads two or more reports, merges them in argument order (the first is
//! the base), condenses the result unless `--no-condense` is given, and
//! writes the merged report to `--output` or stdout. No diagnostics are
//! emitted.
//!
//! Exit codes:
//! - 0 = success
//! - 2 = any input could not be read or parsed
use std::path::Path;

use rulebridge_core::{Report, condense_with_stats, merge_with_stats};

use super::Context;
use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::{emit_report, load_report};

/// Runs the `merge` command.
///
/// # Errors
///
/// - [`CliError::InvalidConfiguration`]: stdin was named more than once.
/// - Any exit-2 error from reading or parsing an input.
pub fn run(
    ctx: &Context,
    files: &[PathOrStdin],
    output: Option<&Path>,
    no_condense: bool,
) -> Result<(), CliError> {
    let stdin_count = files
        .iter()
        .filter(|f| matches!(f, PathOrStdin::Stdin))
        .count();
    if stdin_count > 1 {
        return Err(CliError::InvalidConfiguration {
            detail: "stdin (-) may be given at most once".to_owned(),
        });
    }

    let mut merged: Option<Report> = None;
    for source in files {
        let report = load_report(source, ctx.max_file_size)?;
        merged = Some(match merged {
            None => report,
            Some(base) => {
                let (next, stats) = merge_with_stats(base, report);
                tracing::info!(
                    input = %source.label(),
                    files_added = stats.files_added,
                    rules_added = stats.rules_added,
                    targets_appended = stats.targets_appended,
                    "merged"
                );
                next
            }
        });
    }
    let merged = merged.unwrap_or_default();

    let result = if no_condense {
        merged
    } else {
        let (condensed, stats) = condense_with_stats(merged);
        tracing::info!(
            before = stats.defects_before,
            after = stats.defects_after,
            "condensed defects"
        );
        condensed
    };

    emit_report(&result, output)
}
