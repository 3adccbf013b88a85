/// Command module for the `rulebridge` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or a
/// [`crate::error::CliError`] on failure.
use std::io::Write as _;

use rulebridge_core::Diagnostic;

use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig, count_by_severity, write_diagnostic, write_summary};
use crate::{OutputFormat, Verbosity};

pub mod condense;
pub mod merge;
pub mod process;
pub mod run;

/// Global settings every subcommand needs.
#[derive(Debug, Clone)]
pub struct Context {
    /// `--format`.
    pub format: OutputFormat,
    /// Quiet/verbose preference.
    pub verbosity: Verbosity,
    /// `--max-file-size`.
    pub max_file_size: u64,
    /// `--no-color`.
    pub no_color: bool,
}

impl Context {
    fn formatter(&self) -> FormatterConfig {
        FormatterConfig::from_flags(self.no_color, self.verbosity == Verbosity::Quiet)
    }

    fn mode(&self, host_diagnostics: bool) -> FormatMode {
        if host_diagnostics {
            return FormatMode::Host;
        }
        match self.format {
            OutputFormat::Human => FormatMode::Human,
            OutputFormat::Json => FormatMode::Json,
        }
    }
}

/// Writes every diagnostic and the summary to stderr.
fn report_diagnostics(
    ctx: &Context,
    diagnostics: &[Diagnostic],
    host_diagnostics: bool,
) -> Result<(), CliError> {
    let config = ctx.formatter();
    let mode = ctx.mode(host_diagnostics);

    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    for diag in diagnostics {
        write_diagnostic(&mut err_out, diag, mode, &config).map_err(stderr_error)?;
    }
    let (errors, warnings) = count_by_severity(diagnostics);
    write_summary(&mut err_out, errors, warnings, mode, &config).map_err(stderr_error)?;
    err_out.flush().map_err(stderr_error)
}

fn stderr_error(e: std::io::Error) -> CliError {
    CliError::IoError {
        source: "stderr".to_owned(),
        detail: e.to_string(),
    }
}
