/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `rulebridge` binary.
/// Every variant maps to a stable exit code (1 or 2) via
/// [`CliError::exit_code`]:
///
/// - Exit code **2**: input or configuration failure. The run aborts before
///   any report is processed or any diagnostic is emitted.
/// - Exit code **1**: logical failure. The analysis tool itself failed, or
///   defects were found while they are treated as errors.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `rulebridge` CLI can produce.
///
/// Use [`CliError::exit_code`] to obtain the exit code associated with each
/// variant. [`CliError::message`] returns the human-readable error string
/// that should be printed to stderr before exiting.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The offending path.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes, when known.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// A human-readable label for the source.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source or destination.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The configured analysis tool executable does not exist.
    ToolNotFound {
        /// The configured executable path.
        path: PathBuf,
    },

    /// A required input is missing or a referenced auxiliary file does not
    /// exist.
    InvalidConfiguration {
        /// What is wrong.
        detail: String,
    },

    /// A report could not be parsed.
    MalformedReport {
        /// The offending report (`"-"` for stdin).
        source: String,
        /// Parser error message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The analysis tool exited non-zero and wrote to its error stream.
    ToolExecutionError {
        /// Exit code of the tool.
        exit_code: i32,
        /// The tool's stderr, trimmed.
        stderr: String,
    },

    /// Defects were found while `--treat-defects-as-errors` is set.
    ///
    /// The diagnostics have already been printed; this variant exists so
    /// `main` can exit with code 1 cleanly.
    DefectsAsErrors {
        /// Number of diagnostics emitted as errors.
        count: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2`: input or configuration failure.
    /// - `1`: tool failure or defects treated as errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::IoError { .. }
            | Self::ToolNotFound { .. }
            | Self::InvalidConfiguration { .. }
            | Self::MalformedReport { .. } => 2,

            Self::ToolExecutionError { .. } | Self::DefectsAsErrors { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ToolNotFound { path } => {
                format!("error: analysis tool not found: {}", path.display())
            }
            Self::InvalidConfiguration { detail } => {
                format!("error: invalid configuration: {detail}")
            }
            Self::MalformedReport { source, detail } => {
                format!("error: malformed report {source}: {detail}")
            }
            Self::ToolExecutionError { exit_code, stderr } => {
                format!("error: analysis tool failed with exit code {exit_code}: {stderr}")
            }
            Self::DefectsAsErrors { count } => {
                format!(
                    "error: {count} {} treated as errors",
                    if *count == 1 { "defect" } else { "defects" }
                )
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
