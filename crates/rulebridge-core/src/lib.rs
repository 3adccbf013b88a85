#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod condense;
pub mod diagnostic;
pub mod error;
pub mod location;
pub mod merge;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod write;

mod xml;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use condense::{
    CondenseStats, DefectGroup, GroupKey, aggregate_descriptions, condense, condense_with_stats,
    defect_groups,
};
pub use diagnostic::{
    CATEGORY, Diagnostic, RunOutcome, Severity, SeverityPolicy, emit, outcome,
};
pub use error::ReportError;
pub use location::{SourceLocation, extract_location, location_key};
pub use merge::{MergeStats, accumulate, merge, merge_with_stats};
pub use model::{
    DEFAULT_ROOT_NAME, Defect, FileEntry, Report, RootInfo, Rule, RuleInfo, Target,
    normalize_path, rule_name_from_uri,
};
pub use parse::parse_report;
pub use pipeline::{PipelineConfig, PipelineOutput, process};
pub use write::write_report;

/// Returns the crate version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
