/// Report file I/O with size enforcement and UTF-8 validation.
///
/// This module is the single entry point for all report I/O in the
/// `rulebridge` binary. `rulebridge-core` never touches the filesystem; all
/// reading and writing happens here.
///
/// Key behaviours:
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - UTF-8 validation via `std::str::from_utf8` with byte-offset reporting.
/// - Parse failures become [`CliError::MalformedReport`] carrying the path.
/// - The cumulative output is read then rewritten, non-atomically.
use std::io::{Read as _, Write as _};
use std::path::Path;

use rulebridge_core::{Report, parse_report, write_report};

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing file, a permission
/// problem, input over `max_size`, any other I/O error, or invalid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Reads and parses a report.
///
/// # Errors
///
/// Everything [`read_input`] returns, plus [`CliError::MalformedReport`].
pub fn load_report(source: &PathOrStdin, max_size: u64) -> Result<Report, CliError> {
    let text = read_input(source, max_size)?;
    parse_report(&text).map_err(|e| CliError::MalformedReport {
        source: source.label(),
        detail: e.to_string(),
    })
}

/// Loads the cumulative report at `path` if the file exists.
///
/// # Errors
///
/// A file that exists but cannot be read or parsed is an error; the caller
/// does not silently overwrite it.
pub fn load_existing_report(path: &Path, max_size: u64) -> Result<Option<Report>, CliError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no cumulative report yet");
        return Ok(None);
    }
    load_report(&PathOrStdin::Path(path.to_path_buf()), max_size).map(Some)
}

/// Reads a disk file, enforcing the size limit and UTF-8 requirement.
fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(&bytes, &path.display().to_string())
}

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// If the stream produces exactly `max_size` bytes one more byte is probed to
/// tell "at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();

    let mut buf: Vec<u8> = Vec::new();
    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| stdin_error(&e))?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle.read(&mut probe).map_err(|e| stdin_error(&e))?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(&buf, "-")
}

fn stdin_error(e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdin".to_owned(),
        detail: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Serializes `report` and writes it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CliError::IoError`] or [`CliError::PermissionDenied`] if the
/// file cannot be written.
pub fn persist_report(report: &Report, path: &Path) -> Result<(), CliError> {
    let xml = serialize(report)?;
    std::fs::write(path, xml).map_err(|e| io_error_to_cli(&e, path))?;
    tracing::debug!(path = %path.display(), defects = report.defect_count(), "report written");
    Ok(())
}

/// Writes `report` to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// See [`persist_report`]; stdout failures map to [`CliError::IoError`].
pub fn emit_report(report: &Report, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => persist_report(report, path),
        None => {
            let xml = serialize(report)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(xml.as_bytes())
                .map_err(|e| CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                })
        }
    }
}

fn serialize(report: &Report) -> Result<String, CliError> {
    write_report(report).map_err(|e| CliError::IoError {
        source: "report writer".to_owned(),
        detail: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Maps a `std::io::Error` arising from a disk-file operation to a [`CliError`].
#[allow(clippy::wildcard_enum_match_arm)]
pub fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}

/// Converts a byte buffer to a `String`, returning a [`CliError`] with the
/// byte offset of the first invalid sequence on failure.
fn bytes_to_string(bytes: &[u8], source_label: &str) -> Result<String, CliError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(CliError::InvalidUtf8 {
            source: source_label.to_owned(),
            byte_offset: e.valid_up_to(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
