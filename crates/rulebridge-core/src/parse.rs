//! Report parser: serialized XML report to [`Report`].
//!
//! The root element may have any name; it must contain a `results` section.
//! The `files` and `rules` index sections are optional. Elements the format
//! does not define are skipped together with their subtrees. Text content is
//! trimmed at both ends.
use crate::error::ReportError;
use crate::model::{
    Defect, FileEntry, Report, RootInfo, Rule, RuleInfo, Target, rule_name_from_uri,
};
use crate::xml::{Element, read_tree};

/// Element names used by the report format.
pub(crate) mod names {
    pub const FILES: &str = "files";
    pub const FILE: &str = "file";
    pub const RULES: &str = "rules";
    pub const RULE: &str = "rule";
    pub const RESULTS: &str = "results";
    pub const PROBLEM: &str = "problem";
    pub const SOLUTION: &str = "solution";
    pub const TARGET: &str = "target";
    pub const DEFECT: &str = "defect";
}

/// Attribute names used by the report format.
pub(crate) mod attrs {
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const URI: &str = "Uri";
    pub const ASSEMBLY: &str = "Assembly";
    pub const SEVERITY: &str = "Severity";
    pub const CONFIDENCE: &str = "Confidence";
    pub const LOCATION: &str = "Location";
    pub const SOURCE: &str = "Source";
}

/// Parses a serialized report.
///
/// Parsing never mutates its input; the returned [`Report`] is a fresh value
/// owned by the caller.
///
/// # Errors
///
/// - [`ReportError::Syntax`] / [`ReportError::EmptyDocument`]: not well-formed XML.
/// - [`ReportError::MissingSection`]: no `results` section under the root.
/// - [`ReportError::MissingAttribute`]: a rule has neither `Name` nor `Uri`,
///   a target has no `Name`, a defect has no `Source`, or an indexed file has
///   no `Name`.
pub fn parse_report(xml: &str) -> Result<Report, ReportError> {
    let root = read_tree(xml)?;

    let results = root.child(names::RESULTS).ok_or(ReportError::MissingSection {
        section: names::RESULTS,
    })?;

    let files = match root.child(names::FILES) {
        Some(section) => section
            .children_named(names::FILE)
            .map(parse_file_entry)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let rule_index = match root.child(names::RULES) {
        Some(section) => section
            .children_named(names::RULE)
            .map(parse_rule_info)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let rules = results
        .children_named(names::RULE)
        .map(parse_rule)
        .collect::<Result<Vec<_>, _>>()?;

    let report = Report {
        root: RootInfo {
            name: root.name.clone(),
            attributes: root.attributes.clone(),
        },
        files,
        rule_index,
        rules,
    };

    tracing::trace!(
        rules = report.rules.len(),
        targets = report.target_count(),
        defects = report.defect_count(),
        "parsed report"
    );

    Ok(report)
}

fn parse_file_entry(el: &Element) -> Result<FileEntry, ReportError> {
    let path = required(el, names::FILE, attrs::NAME)?;
    Ok(FileEntry {
        path: path.to_owned(),
        assembly: el.trimmed_text().to_owned(),
    })
}

fn parse_rule_info(el: &Element) -> Result<RuleInfo, ReportError> {
    Ok(RuleInfo {
        name: rule_identity(el)?,
        kind: optional(el, attrs::TYPE),
        uri: optional(el, attrs::URI),
        full_name: el.trimmed_text().to_owned(),
    })
}

fn parse_rule(el: &Element) -> Result<Rule, ReportError> {
    let targets = el
        .children_named(names::TARGET)
        .map(parse_target)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        name: rule_identity(el)?,
        uri: optional(el, attrs::URI),
        problem: child_text(el, names::PROBLEM),
        solution: child_text(el, names::SOLUTION),
        targets,
    })
}

fn parse_target(el: &Element) -> Result<Target, ReportError> {
    let name = required(el, names::TARGET, attrs::NAME)?;
    let defects = el
        .children_named(names::DEFECT)
        .map(parse_defect)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Target {
        name: name.to_owned(),
        assembly: optional(el, attrs::ASSEMBLY),
        defects,
    })
}

fn parse_defect(el: &Element) -> Result<Defect, ReportError> {
    let source = required(el, names::DEFECT, attrs::SOURCE)?;
    Ok(Defect {
        severity: optional(el, attrs::SEVERITY),
        confidence: optional(el, attrs::CONFIDENCE),
        location: optional(el, attrs::LOCATION),
        source: source.to_owned(),
        description: el.trimmed_text().to_owned(),
    })
}

/// Resolves a rule's identity: its `Name`, else the last segment of its `Uri`.
fn rule_identity(el: &Element) -> Result<String, ReportError> {
    let name = el.attr(attrs::NAME).map(str::trim);
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        return Ok(name.to_owned());
    }
    el.attr(attrs::URI)
        .and_then(rule_name_from_uri)
        .ok_or(ReportError::MissingAttribute {
            element: names::RULE,
            attribute: attrs::NAME,
        })
}

fn required<'a>(
    el: &'a Element,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ReportError> {
    el.attr(attribute)
        .ok_or(ReportError::MissingAttribute { element, attribute })
}

fn optional(el: &Element, attribute: &str) -> Option<String> {
    el.attr(attribute).map(str::to_owned)
}

fn child_text(el: &Element, name: &str) -> String {
    el.child(name)
        .map(|c| c.trimmed_text().to_owned())
        .unwrap_or_default()
}
