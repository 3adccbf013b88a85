//! External analysis tool invocation.
//!
//! [`ToolCommand`] builds the ordered argument list, [`ToolCommand::preflight`]
//! rejects configurations that cannot work before anything is spawned, and
//! [`execute`] runs the tool through a [`ProcessRunner`] and applies the
//! failure rule: a non-zero exit with non-empty stderr is a tool failure,
//! while a non-zero exit with empty stderr is how the tool signals that it
//! found defects.
//!
//! Invocation is blocking, with no timeout and no retry.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CliError;
use crate::{ToolArgs, Verbosity};

/// Captured result of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Runs an executable with an argument list and captures its output.
pub trait ProcessRunner {
    /// Runs `exe` with `args`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the process could not be started.
    fn invoke(&self, exe: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn invoke(&self, exe: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        let output = Command::new(exe).args(args).output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// ToolCommand
// ---------------------------------------------------------------------------

/// One fully specified tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Tool executable.
    pub executable: PathBuf,
    /// Where the tool writes its XML report.
    pub report: PathBuf,
    /// Rules configuration file.
    pub rules_config: Option<PathBuf>,
    /// Rule set name.
    pub rule_set: Option<String>,
    /// Ignore list file.
    pub ignore: Option<PathBuf>,
    /// Severity filter.
    pub severity: Option<String>,
    /// Confidence filter.
    pub confidence: Option<String>,
    /// Defect limit.
    pub limit: Option<u32>,
    /// Quiet/verbose preference forwarded to the tool.
    pub verbosity: Verbosity,
    /// Assemblies to analyze.
    pub assemblies: Vec<PathBuf>,
}

impl ToolCommand {
    /// Builds a command from parsed CLI arguments.
    pub fn new(
        tool: &ToolArgs,
        assemblies: &[PathBuf],
        report: &Path,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            executable: tool.tool.clone(),
            report: report.to_path_buf(),
            rules_config: tool.rules_config.clone(),
            rule_set: tool.rule_set.clone(),
            ignore: tool.ignore.clone(),
            severity: tool.severity.clone(),
            confidence: tool.confidence.clone(),
            limit: tool.limit,
            verbosity,
            assemblies: assemblies.to_vec(),
        }
    }

    /// Returns the ordered argument list.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--xml".into(), self.report.clone().into()];

        if let Some(config) = &self.rules_config {
            args.push("--config".into());
            args.push(config.clone().into());
        }
        if let Some(set) = &self.rule_set {
            args.push("--set".into());
            args.push(set.into());
        }
        if let Some(ignore) = &self.ignore {
            args.push("--ignore".into());
            args.push(ignore.clone().into());
        }
        if let Some(severity) = &self.severity {
            args.push("--severity".into());
            args.push(severity.into());
        }
        if let Some(confidence) = &self.confidence {
            args.push("--confidence".into());
            args.push(confidence.into());
        }
        if let Some(limit) = self.limit {
            args.push("--limit".into());
            args.push(limit.to_string().into());
        }
        match self.verbosity {
            Verbosity::Quiet => args.push("--quiet".into()),
            Verbosity::Verbose => args.push("--verbose".into()),
            Verbosity::Default => {}
        }

        args.extend(self.assemblies.iter().map(|a| a.clone().into_os_string()));
        args
    }

    /// Checks that the tool and every referenced input exist.
    ///
    /// # Errors
    ///
    /// - [`CliError::ToolNotFound`]: the executable does not exist.
    /// - [`CliError::InvalidConfiguration`]: no assemblies, or an assembly,
    ///   the ignore list or the rules configuration does not exist.
    pub fn preflight(&self) -> Result<(), CliError> {
        if !self.executable.is_file() {
            return Err(CliError::ToolNotFound {
                path: self.executable.clone(),
            });
        }

        if self.assemblies.is_empty() {
            return Err(CliError::InvalidConfiguration {
                detail: "no assemblies specified".to_owned(),
            });
        }
        for assembly in &self.assemblies {
            require_file(assembly, "assembly")?;
        }
        if let Some(ignore) = &self.ignore {
            require_file(ignore, "ignore list")?;
        }
        if let Some(config) = &self.rules_config {
            require_file(config, "rules configuration")?;
        }
        Ok(())
    }
}

fn require_file(path: &Path, what: &str) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::InvalidConfiguration {
            detail: format!("{what} does not exist: {}", path.display()),
        })
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Runs `command` and applies the failure rule.
///
/// # Errors
///
/// - [`CliError::ToolNotFound`]: the executable vanished before spawning.
/// - [`CliError::IoError`]: the process could not be started.
/// - [`CliError::ToolExecutionError`]: non-zero exit with stderr output.
pub fn execute(
    runner: &dyn ProcessRunner,
    command: &ToolCommand,
) -> Result<ProcessOutput, CliError> {
    let args = command.args();
    tracing::info!(
        tool = %command.executable.display(),
        assemblies = command.assemblies.len(),
        "invoking analysis tool"
    );
    tracing::debug!(?args, "tool arguments");

    let output = runner
        .invoke(&command.executable, &args)
        .map_err(|e| spawn_error(&e, &command.executable))?;

    for line in output.stdout.lines() {
        tracing::debug!(target: "tool", "{line}");
    }

    let stderr = output.stderr.trim();
    if output.exit_code != 0 && !stderr.is_empty() {
        return Err(CliError::ToolExecutionError {
            exit_code: output.exit_code,
            stderr: stderr.to_owned(),
        });
    }
    if !stderr.is_empty() {
        tracing::warn!(stderr, "analysis tool wrote to stderr");
    }

    tracing::debug!(exit_code = output.exit_code, "analysis tool finished");
    Ok(output)
}

#[allow(clippy::wildcard_enum_match_arm)]
fn spawn_error(e: &std::io::Error, exe: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::ToolNotFound {
            path: exe.to_path_buf(),
        },
        _ => CliError::IoError {
            source: exe.display().to_string(),
            detail: e.to_string(),
        },
    }
}
