/// Diagnostic formatting: human-readable, JSON (NDJSON) and host modes.
///
/// This module implements three output strategies for
/// [`rulebridge_core::Diagnostic`] values:
///
/// - **Human mode** (default): one entry per diagnostic, color-coded by
///   severity. Continuation lines of multi-line messages are indented.
///   Colors are disabled when `--no-color` is set, the `NO_COLOR`
///   environment variable is present (per <https://no-color.org>), or stderr
///   is not a TTY.
/// - **JSON mode**: each diagnostic is serialized as a single-line JSON
///   object (NDJSON).
/// - **Host mode** (`--host-diagnostics`): the canonical build-tool line
///   format `file(line,col): warning [analysis] CODE: message`, which build
///   systems pick up as inline diagnostics.
///
/// Human and JSON modes honour **quiet** (suppress warnings and the summary).
/// Host mode always writes every diagnostic since that is the build channel.
use std::io::{IsTerminal as _, Write};

use rulebridge_core::{Diagnostic, Severity};

/// Origin written in host mode when a diagnostic has no file.
pub const HOST_ORIGIN: &str = "rulebridge";

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

// ---------------------------------------------------------------------------
// ANSI escape sequences
// ---------------------------------------------------------------------------

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the diagnostic formatter, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
        }
    }
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Human-readable, optionally colored output.
    Human,
    /// Structured NDJSON output.
    Json,
    /// Build-system canonical diagnostic lines.
    Host,
}

// ---------------------------------------------------------------------------
// Human-mode formatting
// ---------------------------------------------------------------------------

/// Writes a single [`Diagnostic`] in human-readable format.
///
/// Format: `[W] R1  src/Foo.cs:10:0: R1: problem`, followed by the
/// remaining message lines indented by four spaces. Diagnostics without a
/// file omit the location.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic_human<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet && diag.severity == Severity::Warning {
        return Ok(());
    }

    let (tag, color) = match diag.severity {
        Severity::Error => ("[E]", ANSI_RED),
        Severity::Warning => ("[W]", ANSI_YELLOW),
    };

    if config.colors {
        write!(writer, "{color}{tag}{ANSI_RESET} {}  ", diag.code)?;
    } else {
        write!(writer, "{tag} {}  ", diag.code)?;
    }
    if diag.has_file() {
        write!(writer, "{}:{}:{}: ", diag.file, diag.line, diag.column)?;
    }

    let mut lines = diag.message.lines();
    writeln!(writer, "{}", lines.next().unwrap_or_default())?;
    for line in lines {
        writeln!(writer, "    {line}")?;
    }
    Ok(())
}

/// Writes the summary line for human mode: `3 errors, 1 warning`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary_human<W: Write>(
    writer: &mut W,
    errors: usize,
    warnings: usize,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    writeln!(
        writer,
        "{errors} {}, {warnings} {}",
        pluralize(errors, "error", "errors"),
        pluralize(warnings, "warning", "warnings"),
    )
}

// ---------------------------------------------------------------------------
// JSON-mode formatting (NDJSON)
// ---------------------------------------------------------------------------

/// Writes a single [`Diagnostic`] as a NDJSON line:
///
/// ```json
/// {"severity":"warning","category":"[analysis]","code":"R1","file":"a.cs","line":10,"column":0,"message":"..."}
/// ```
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_diagnostic_json<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet && diag.severity == Severity::Warning {
        return Ok(());
    }
    serde_json::to_writer(&mut *writer, diag).map_err(std::io::Error::other)?;
    writeln!(writer)
}

/// Writes the JSON summary object: `{"summary":{"errors":3,"warnings":1}}`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary_json<W: Write>(
    writer: &mut W,
    errors: usize,
    warnings: usize,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    writeln!(
        writer,
        r#"{{"summary":{{"errors":{errors},"warnings":{warnings}}}}}"#,
    )
}

// ---------------------------------------------------------------------------
// Host-mode formatting
// ---------------------------------------------------------------------------

/// Renders a diagnostic as one build-tool line.
///
/// - `src/Foo.cs(10,3): warning [analysis] R1: R1: problem x`
/// - `src/Foo.cs: error [analysis] R1: ...` when the line is unknown
/// - `rulebridge: warning [analysis] R1: R1: T1: problem` without a file
///
/// Newlines in the message are flattened to spaces.
pub fn host_line(diag: &Diagnostic) -> String {
    let origin = if !diag.has_file() {
        HOST_ORIGIN.to_owned()
    } else if diag.line == 0 {
        diag.file.clone()
    } else {
        format!("{}({},{})", diag.file, diag.line, diag.column)
    };
    let message = diag
        .message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{origin}: {} {} {}: {message}",
        diag.severity, diag.category, diag.code
    )
}

/// Writes a single [`Diagnostic`] in host mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic_host<W: Write>(writer: &mut W, diag: &Diagnostic) -> std::io::Result<()> {
    writeln!(writer, "{}", host_line(diag))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Writes a single [`Diagnostic`] in the requested format.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match mode {
        FormatMode::Human => write_diagnostic_human(writer, diag, config),
        FormatMode::Json => write_diagnostic_json(writer, diag, config),
        FormatMode::Host => write_diagnostic_host(writer, diag),
    }
}

/// Writes a summary in the requested format. Host mode uses the human
/// summary line.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    errors: usize,
    warnings: usize,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match mode {
        FormatMode::Human | FormatMode::Host => {
            write_summary_human(writer, errors, warnings, config)
        }
        FormatMode::Json => write_summary_json(writer, errors, warnings, config),
    }
}

/// Counts `(errors, warnings)` in `diagnostics`.
pub fn count_by_severity(diagnostics: &[Diagnostic]) -> (usize, usize) {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    (errors, diagnostics.len() - errors)
}

/// Returns the singular or plural form of `word` depending on `count`.
fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
