//! Best-effort extraction of source locations from defect `Source` strings.
//!
//! The tool writes locations as free text, typically `src/Foo.cs(42)`, with
//! `(unavailable)` when no line is known and a `≈` marker when the line is
//! only an estimate. Nothing about this is a guaranteed contract, so the
//! extractor never fails: numeric fragments that do not parse degrade to `0`
//! and strings that do not match at all yield `None`.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::normalize_path;

/// Matches `<path>(<marker>?<line-or-unavailable>[,<column>])` at the end of
/// the string.
static SOURCE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<path>.+?)\s*\((?P<approx>≈|~)?\s*(?P<line>[^,()]*?)\s*(?:,\s*(?P<column>[^,()]*?)\s*)?\)\s*$").ok()
});

/// Keyword the tool writes in place of a line number it could not determine.
const UNAVAILABLE: &str = "unavailable";

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

/// A structured source location recovered from a defect's `Source` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// The file path exactly as written (surrounding whitespace removed).
    pub file: String,
    /// One-based line number, or `0` when unavailable or unparsable.
    pub line: u32,
    /// One-based column number, or `0` when absent or unparsable.
    pub column: u32,
    /// `true` when the tool marked the line as an estimate.
    pub approximate: bool,
}

impl SourceLocation {
    /// Returns the canonical identity string for this location.
    ///
    /// Two `Source` strings that differ only in whitespace or path separator
    /// style produce the same key.
    pub fn normalized_key(&self) -> String {
        let marker = if self.approximate { "≈" } else { "" };
        format!(
            "{}({marker}{},{})",
            normalize_path(&self.file),
            self.line,
            self.column
        )
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Parses a defect `Source` string into a [`SourceLocation`].
///
/// Returns `None` when the string carries no parenthesized line suffix (or no
/// path before it); such defects are attributed to their target only.
pub fn extract_location(raw: &str) -> Option<SourceLocation> {
    let pattern = SOURCE_PATTERN.as_ref()?;
    let caps = pattern.captures(raw)?;

    let file = caps.name("path")?.as_str().trim();
    if file.is_empty() {
        return None;
    }

    let line = caps
        .name("line")
        .map(|m| parse_number(m.as_str()))
        .unwrap_or_default();
    let column = caps
        .name("column")
        .map(|m| parse_number(m.as_str()))
        .unwrap_or_default();

    Some(SourceLocation {
        file: file.to_owned(),
        line,
        column,
        approximate: caps.name("approx").is_some(),
    })
}

/// Returns the condensation key for a raw `Source` string.
///
/// Parsed locations use [`SourceLocation::normalized_key`]; unparsable strings
/// use their trimmed text so that distinct unknown locations stay distinct.
pub fn location_key(raw: &str) -> String {
    match extract_location(raw) {
        Some(loc) => loc.normalized_key(),
        None => raw.trim().to_owned(),
    }
}

/// Parses a line or column fragment, degrading to `0` on anything that is not
/// a plain non-negative integer (including the `unavailable` keyword).
fn parse_number(fragment: &str) -> u32 {
    let fragment = fragment.trim();
    if fragment.eq_ignore_ascii_case(UNAVAILABLE) {
        return 0;
    }
    fragment.parse::<u32>().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn loc(raw: &str) -> SourceLocation {
        extract_location(raw).expect("location should parse")
    }

    #[test]
    fn exact_line() {
        let l = loc("src/Foo.cs(42)");
        assert_eq!(l.file, "src/Foo.cs");
        assert_eq!(l.line, 42);
        assert_eq!(l.column, 0);
        assert!(!l.approximate);
    }

    #[test]
    fn approximate_line() {
        let l = loc("src/Foo.cs(≈10)");
        assert_eq!(l.file, "src/Foo.cs");
        assert_eq!(l.line, 10);
        assert!(l.approximate);
    }

    #[test]
    fn tilde_is_also_an_approximation_marker() {
        let l = loc("src/Foo.cs(~7)");
        assert_eq!(l.line, 7);
        assert!(l.approximate);
    }

    #[test]
    fn unavailable_line_is_zero() {
        let l = loc("src/Foo.cs(unavailable)");
        assert_eq!(l.file, "src/Foo.cs");
        assert_eq!(l.line, 0);
        assert!(!l.approximate);
    }

    #[test]
    fn approximate_unavailable_is_zero() {
        let l = loc("src/Foo.cs(≈unavailable)");
        assert_eq!(l.line, 0);
        assert!(l.approximate);
    }

    #[test]
    fn line_and_column() {
        let l = loc("C:\\work\\Bar.cs(12,5)");
        assert_eq!(l.file, "C:\\work\\Bar.cs");
        assert_eq!(l.line, 12);
        assert_eq!(l.column, 5);
    }

    #[test]
    fn unparsable_numbers_degrade_to_zero() {
        let l = loc("Bar.cs(twelve,x)");
        assert_eq!(l.line, 0);
        assert_eq!(l.column, 0);
    }

    #[test]
    fn negative_numbers_degrade_to_zero() {
        assert_eq!(loc("Bar.cs(-3)").line, 0);
    }

    #[test]
    fn paths_with_parentheses_use_the_final_suffix() {
        let l = loc("src/Program Files (x86)/Baz.cs(3)");
        assert_eq!(l.file, "src/Program Files (x86)/Baz.cs");
        assert_eq!(l.line, 3);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let l = loc("  src/Foo.cs ( 42 )  ");
        assert_eq!(l.file, "src/Foo.cs");
        assert_eq!(l.line, 42);
    }

    #[test]
    fn no_parenthesized_suffix_is_no_location() {
        assert!(extract_location("src/Foo.cs").is_none());
        assert!(extract_location("").is_none());
        assert!(extract_location("debugging symbols unavailable").is_none());
    }

    #[test]
    fn missing_path_is_no_location() {
        assert!(extract_location("(42)").is_none());
    }

    #[test]
    fn normalized_key_ignores_separator_style() {
        assert_eq!(
            location_key("src\\Foo.cs(42)"),
            location_key(" src/Foo.cs(42) ")
        );
    }

    #[test]
    fn normalized_key_distinguishes_approximation() {
        assert_ne!(location_key("a.cs(10)"), location_key("a.cs(≈10)"));
    }

    #[test]
    fn unknown_locations_key_on_raw_text() {
        assert_eq!(location_key("  somewhere "), "somewhere");
        assert_ne!(location_key("somewhere"), location_key("elsewhere"));
    }

    #[test]
    fn display_uses_colon_form() {
        assert_eq!(loc("a.cs(10,2)").to_string(), "a.cs:10:2");
    }
}
