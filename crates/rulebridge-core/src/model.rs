//! In-memory representation of an analysis report.
//!
//! A [`Report`] owns its [`FileEntry`], [`RuleInfo`] and [`Rule`] values; a
//! [`Rule`] owns its [`Target`] values and a [`Target`] owns its [`Defect`]
//! values. Every stage of the pipeline (parse, condense, merge) consumes one
//! `Report` by value and produces a new one, so no stage can observe a
//! structure that another stage is still mutating.
//!
//! Every attribute the external tool writes is carried on the model so that
//! writing a report back out loses nothing that was read in.

// ---------------------------------------------------------------------------
// RootInfo
// ---------------------------------------------------------------------------

/// Root element name and attributes of a serialized report.
///
/// The tool stamps the root with run metadata (`date`, `version`). These are
/// preserved verbatim and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootInfo {
    /// The root element name, e.g. `analysis-output`.
    pub name: String,
    /// Root attributes in document order.
    pub attributes: Vec<(String, String)>,
}

impl Default for RootInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROOT_NAME.to_owned(),
            attributes: Vec::new(),
        }
    }
}

/// Root element name used when a report is built in memory.
pub const DEFAULT_ROOT_NAME: &str = "analysis-output";

// ---------------------------------------------------------------------------
// Index sections
// ---------------------------------------------------------------------------

/// An inspected binary listed in the `files` index section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileEntry {
    /// Path of the binary as written by the tool.
    pub path: String,
    /// Display name of the binary (element text), e.g. its assembly name.
    pub assembly: String,
}

impl FileEntry {
    /// Returns the merge/dedup key for this file: the normalized path.
    pub fn key(&self) -> String {
        normalize_path(&self.path)
    }
}

/// A rule listed in the `rules` index section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleInfo {
    /// Rule identity.
    pub name: String,
    /// Kind of element the rule inspects (`Type` attribute).
    pub kind: Option<String>,
    /// Documentation URI.
    pub uri: Option<String>,
    /// Fully-qualified rule name (element text).
    pub full_name: String,
}

// ---------------------------------------------------------------------------
// Results section
// ---------------------------------------------------------------------------

/// A single reported violation instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Defect {
    /// Tool severity label (`Severity` attribute), carried verbatim.
    pub severity: Option<String>,
    /// Tool confidence label (`Confidence` attribute), carried verbatim.
    pub confidence: Option<String>,
    /// Code-element location text (`Location` attribute), carried verbatim.
    pub location: Option<String>,
    /// Free-text source location, `<file-path>(line)` in the common case.
    pub source: String,
    /// Free-text description. After condensation this may hold several
    /// descriptions joined by `\n`.
    pub description: String,
}

/// An inspected code element within a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Target {
    /// Element name; unique within its parent rule after condensation.
    pub name: String,
    /// Owning assembly (`Assembly` attribute).
    pub assembly: Option<String>,
    /// Defects reported against this element, in document order.
    pub defects: Vec<Defect>,
}

/// A named check with its findings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    /// Rule identity (merge/dedup key).
    pub name: String,
    /// Documentation URI.
    pub uri: Option<String>,
    /// Human-readable description of the problem the rule detects.
    pub problem: String,
    /// Human-readable description of how to fix it.
    pub solution: String,
    /// Targets in document order.
    pub targets: Vec<Target>,
}

impl Rule {
    /// Returns the total number of defects across all targets.
    pub fn defect_count(&self) -> usize {
        self.targets.iter().map(|t| t.defects.len()).sum()
    }
}

/// Root entity: a complete analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    /// Root element metadata.
    pub root: RootInfo,
    /// The `files` index section.
    pub files: Vec<FileEntry>,
    /// The `rules` index section.
    pub rule_index: Vec<RuleInfo>,
    /// The `results` section.
    pub rules: Vec<Rule>,
}

impl Report {
    /// Creates an empty report with default root metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of defects in the report.
    pub fn defect_count(&self) -> usize {
        self.rules.iter().map(Rule::defect_count).sum()
    }

    /// Returns the total number of targets across all rules.
    pub fn target_count(&self) -> usize {
        self.rules.iter().map(|r| r.targets.len()).sum()
    }

    /// Returns the first result rule with the given identity.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Returns `true` if the report has no defects.
    pub fn is_clean(&self) -> bool {
        self.defect_count() == 0
    }

    /// Iterates over every defect together with its owning rule and target,
    /// in document order.
    pub fn defects(&self) -> impl Iterator<Item = (&Rule, &Target, &Defect)> {
        self.rules.iter().flat_map(|rule| {
            rule.targets
                .iter()
                .flat_map(move |target| target.defects.iter().map(move |d| (rule, target, d)))
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalizes a path for identity comparison: trims surrounding whitespace and
/// converts Windows separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('\\', "/")
}

/// Derives a rule identity from a documentation URI: its last non-empty path
/// segment, with any fragment or query removed.
pub fn rule_name_from_uri(uri: &str) -> Option<String> {
    let without_suffix = uri.split(['#', '?']).next().unwrap_or_default();
    without_suffix
        .split('/')
        .rev()
        .find(|segment| !segment.trim().is_empty())
        .map(|segment| segment.trim().to_owned())
}
