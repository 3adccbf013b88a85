//! Implementation of `rulebridge condense <file>`.
//!
//! Reads one report, collapses defects that differ only in description, and
//! writes the result to `--output` or stdout.
use std::path::Path;

use rulebridge_core::condense_with_stats;

use super::Context;
use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::{emit_report, load_report};

/// Runs the `condense` command.
///
/// # Errors
///
/// Any exit-2 error from reading or parsing the input, or from writing the
/// output.
pub fn run(ctx: &Context, file: &PathOrStdin, output: Option<&Path>) -> Result<(), CliError> {
    let report = load_report(file, ctx.max_file_size)?;
    let (condensed, stats) = condense_with_stats(report);
    tracing::info!(
        before = stats.defects_before,
        after = stats.defects_after,
        rules_folded = stats.rules_folded,
        targets_folded = stats.targets_folded,
        "condensed {}",
        file.label()
    );
    emit_report(&condensed, output)
}
