//! Implementation of `rulebridge run <assembly>... --tool <exe> --output <file>`.
//!
//! Checks the configuration, invokes the analysis tool with its report
//! directed to a temporary file, then hands that report to the same
//! post-processing path as `process`. The temporary file is removed on every
//! exit path; a failure to remove it is logged and otherwise ignored.
//!
//! Exit codes:
//! - 0 = success
//! - 1 = the tool failed, or defects were found under the strict policy
//! - 2 = missing tool, invalid configuration, or an unreadable report
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::Context;
use super::process::finish;
use crate::error::CliError;
use crate::io::load_report;
use crate::tool::{ProcessRunner, ToolCommand, execute};
use crate::{PathOrStdin, PostProcessArgs, ToolArgs};

/// Runs the `run` command with the given process runner.
///
/// # Errors
///
/// - [`CliError::ToolNotFound`] / [`CliError::InvalidConfiguration`]: the
///   pre-flight checks failed; nothing was spawned.
/// - [`CliError::ToolExecutionError`]: the tool exited non-zero with stderr
///   output; no report processing was attempted.
/// - Everything [`finish`] returns.
pub fn run(
    ctx: &Context,
    runner: &dyn ProcessRunner,
    assemblies: &[PathBuf],
    output: &Path,
    tool: &ToolArgs,
    post: &PostProcessArgs,
) -> Result<(), CliError> {
    // Pre-flight does not look at the report path.
    ToolCommand::new(tool, assemblies, output, ctx.verbosity).preflight()?;

    let temp = temp_report()?;
    let result = analyze(ctx, runner, assemblies, temp.path(), output, tool, post);
    cleanup(temp);
    result
}

fn analyze(
    ctx: &Context,
    runner: &dyn ProcessRunner,
    assemblies: &[PathBuf],
    report_path: &Path,
    output: &Path,
    tool: &ToolArgs,
    post: &PostProcessArgs,
) -> Result<(), CliError> {
    let command = ToolCommand::new(tool, assemblies, report_path, ctx.verbosity);
    execute(runner, &command)?;

    let incoming = load_report(
        &PathOrStdin::Path(report_path.to_path_buf()),
        ctx.max_file_size,
    )?;
    finish(ctx, incoming, output, post)
}

fn temp_report() -> Result<NamedTempFile, CliError> {
    tempfile::Builder::new()
        .prefix("rulebridge-")
        .suffix(".xml")
        .tempfile()
        .map_err(|e| CliError::IoError {
            source: "temporary report".to_owned(),
            detail: e.to_string(),
        })
}

fn cleanup(temp: NamedTempFile) {
    let path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        tracing::debug!(path = %path.display(), error = %e, "could not remove temporary report");
    }
}
