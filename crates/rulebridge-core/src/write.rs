//! Report writer: [`Report`] back to the XML format read by [`crate::parse`].
//!
//! Output starts with an XML declaration and is indented with two spaces.
//! Optional attributes are written only when present, so writing a parsed
//! report and parsing the result again yields an equal [`Report`].
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::ReportError;
use crate::model::{Defect, FileEntry, Report, Rule, RuleInfo, Target};
use crate::parse::{attrs, names};

type XmlWriter = Writer<Vec<u8>>;

/// Serializes `report` to an XML string.
///
/// # Errors
///
/// Returns [`ReportError::Write`] if the underlying writer fails.
pub fn write_report(report: &Report) -> Result<String, ReportError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut w,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    let mut root = BytesStart::new(report.root.name.as_str());
    for (key, value) in &report.root.attributes {
        root.push_attribute((key.as_str(), value.as_str()));
    }
    emit(&mut w, Event::Start(root))?;

    write_section(&mut w, names::FILES, &report.files, write_file_entry)?;
    write_section(&mut w, names::RULES, &report.rule_index, write_rule_info)?;
    write_section(&mut w, names::RESULTS, &report.rules, write_rule)?;

    emit(&mut w, Event::End(BytesEnd::new(report.root.name.as_str())))?;

    let bytes = w.into_inner();
    let mut out = String::from_utf8(bytes).map_err(|e| ReportError::Write {
        detail: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

/// Writes `<name>` followed by each item and `</name>`, or `<name/>` when
/// there are no items.
fn write_section<T>(
    w: &mut XmlWriter,
    name: &str,
    items: &[T],
    write_item: fn(&mut XmlWriter, &T) -> Result<(), ReportError>,
) -> Result<(), ReportError> {
    if items.is_empty() {
        return emit(w, Event::Empty(BytesStart::new(name)));
    }
    emit(w, Event::Start(BytesStart::new(name)))?;
    for item in items {
        write_item(w, item)?;
    }
    emit(w, Event::End(BytesEnd::new(name)))
}

fn write_file_entry(w: &mut XmlWriter, file: &FileEntry) -> Result<(), ReportError> {
    let mut start = BytesStart::new(names::FILE);
    start.push_attribute((attrs::NAME, file.path.as_str()));
    text_element(w, start, names::FILE, &file.assembly)
}

fn write_rule_info(w: &mut XmlWriter, info: &RuleInfo) -> Result<(), ReportError> {
    let mut start = BytesStart::new(names::RULE);
    start.push_attribute((attrs::NAME, info.name.as_str()));
    push_optional(&mut start, attrs::TYPE, info.kind.as_deref());
    push_optional(&mut start, attrs::URI, info.uri.as_deref());
    text_element(w, start, names::RULE, &info.full_name)
}

fn write_rule(w: &mut XmlWriter, rule: &Rule) -> Result<(), ReportError> {
    let mut start = BytesStart::new(names::RULE);
    start.push_attribute((attrs::NAME, rule.name.as_str()));
    push_optional(&mut start, attrs::URI, rule.uri.as_deref());
    emit(w, Event::Start(start))?;

    text_element(w, BytesStart::new(names::PROBLEM), names::PROBLEM, &rule.problem)?;
    text_element(w, BytesStart::new(names::SOLUTION), names::SOLUTION, &rule.solution)?;
    for target in &rule.targets {
        write_target(w, target)?;
    }

    emit(w, Event::End(BytesEnd::new(names::RULE)))
}

fn write_target(w: &mut XmlWriter, target: &Target) -> Result<(), ReportError> {
    let mut start = BytesStart::new(names::TARGET);
    start.push_attribute((attrs::NAME, target.name.as_str()));
    push_optional(&mut start, attrs::ASSEMBLY, target.assembly.as_deref());

    if target.defects.is_empty() {
        return emit(w, Event::Empty(start));
    }

    emit(w, Event::Start(start))?;
    for defect in &target.defects {
        write_defect(w, defect)?;
    }
    emit(w, Event::End(BytesEnd::new(names::TARGET)))
}

fn write_defect(w: &mut XmlWriter, defect: &Defect) -> Result<(), ReportError> {
    let mut start = BytesStart::new(names::DEFECT);
    push_optional(&mut start, attrs::SEVERITY, defect.severity.as_deref());
    push_optional(&mut start, attrs::CONFIDENCE, defect.confidence.as_deref());
    push_optional(&mut start, attrs::LOCATION, defect.location.as_deref());
    start.push_attribute((attrs::SOURCE, defect.source.as_str()));
    text_element(w, start, names::DEFECT, &defect.description)
}

/// Writes `start`, the escaped `text`, and the matching end tag. Empty text
/// produces a self-closing element.
fn text_element(
    w: &mut XmlWriter,
    start: BytesStart<'_>,
    name: &str,
    text: &str,
) -> Result<(), ReportError> {
    if text.is_empty() {
        return emit(w, Event::Empty(start));
    }
    emit(w, Event::Start(start))?;
    emit(w, Event::Text(BytesText::new(text)))?;
    emit(w, Event::End(BytesEnd::new(name)))
}

fn push_optional(start: &mut BytesStart<'_>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        start.push_attribute((key, value));
    }
}

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<(), ReportError> {
    w.write_event(event).map_err(|e| ReportError::Write {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::model::RootInfo;
    use crate::parse::parse_report;

    fn sample() -> Report {
        Report {
            root: RootInfo {
                name: "analysis-output".to_owned(),
                attributes: vec![("date".to_owned(), "2026-03-01".to_owned())],
            },
            files: vec![FileEntry {
                path: "bin/Foo.dll".to_owned(),
                assembly: "Foo".to_owned(),
            }],
            rule_index: vec![RuleInfo {
                name: "R1".to_owned(),
                kind: Some("Type".to_owned()),
                uri: None,
                full_name: "Ns.R1".to_owned(),
            }],
            rules: vec![Rule {
                name: "R1".to_owned(),
                uri: Some("https://example.org/R1".to_owned()),
                problem: "Types & <generics> misuse".to_owned(),
                solution: "Use \"quotes\"".to_owned(),
                targets: vec![
                    Target {
                        name: "Foo".to_owned(),
                        assembly: Some("Foo".to_owned()),
                        defects: vec![Defect {
                            severity: Some("Low".to_owned()),
                            confidence: None,
                            location: None,
                            source: "a.cs(≈3)".to_owned(),
                            description: "first\nsecond".to_owned(),
                        }],
                    },
                    Target {
                        name: "Empty".to_owned(),
                        assembly: None,
                        defects: Vec::new(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn written_report_parses_back_to_equal_value() {
        let report = sample();
        let xml = write_report(&report).expect("write");
        let back = parse_report(&xml).expect("re-parse");
        assert_eq!(back, report);
    }

    #[test]
    fn output_has_declaration_and_root() {
        let xml = write_report(&sample()).expect("write");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<analysis-output date=\"2026-03-01\">"));
        assert!(xml.trim_end().ends_with("</analysis-output>"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let xml = write_report(&sample()).expect("write");
        assert!(xml.contains("Types &amp; &lt;generics&gt; misuse"), "{xml}");
    }

    #[test]
    fn empty_report_writes_empty_sections() {
        let xml = write_report(&Report::new()).expect("write");
        assert!(xml.contains("<results/>"), "{xml}");
        let back = parse_report(&xml).expect("re-parse");
        assert_eq!(back, Report::new());
    }
}
