//! Minimal element tree built from a quick-xml event stream.
//!
//! Reports are small enough to hold in memory, and interpreting a tree keeps
//! the report-specific rules in [`crate::parse`] free of reader state.
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::ReportError;

/// One XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Returns the value of the attribute named `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over child elements named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the trimmed text content of this element.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Reads `xml` into an element tree and returns its root element.
///
/// # Errors
///
/// Returns [`ReportError::Syntax`] if the document is not well-formed and
/// [`ReportError::EmptyDocument`] if it has no root element.
#[allow(clippy::wildcard_enum_match_arm)]
pub(crate) fn read_tree(xml: &str) -> Result<Element, ReportError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ReportError::Syntax {
            position: reader.buffer_position() as u64,
            detail: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start, &reader)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, &reader)?;
                attach(element, &mut stack, &mut root, reader.buffer_position() as u64)?;
            }
            Event::End(_) => {
                // quick-xml checks that end tags match, so the stack is never
                // empty here for a well-formed document.
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root, reader.buffer_position() as u64)?;
                }
            }
            Event::Text(text) => {
                let decoded = text.decode().map_err(|e| syntax(&reader, &e))?;
                push_text(&mut stack, &decoded);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&bytes));
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference, &reader)?;
                push_text(&mut stack, &resolved);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing a report needs.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ReportError::Syntax {
            position: reader.buffer_position() as u64,
            detail: "unexpected end of document".to_owned(),
        });
    }

    root.ok_or(ReportError::EmptyDocument)
}

/// Builds an [`Element`] (without children) from a start or empty tag.
fn element_from_start(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<Element, ReportError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax(reader, &e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| syntax(reader, &e))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

/// Resolves a character reference or one of the predefined XML entities.
fn resolve_reference(
    reference: &BytesRef<'_>,
    reader: &Reader<&[u8]>,
) -> Result<String, ReportError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|e| syntax(reader, &e))? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|e| syntax(reader, &e))?;
    match quick_xml::escape::resolve_predefined_entity(&name) {
        Some(value) => Ok(value.to_owned()),
        None => Err(ReportError::Syntax {
            position: reader.buffer_position() as u64,
            detail: format!("unknown entity reference &{name};"),
        }),
    }
}

/// Appends a completed element to its parent, or makes it the root. A second
/// top-level element is a syntax error.
fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    position: u64,
) -> Result<(), ReportError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(ReportError::Syntax {
                position,
                detail: format!("unexpected second root element <{}>", element.name),
            });
        }
        None => *root = Some(element),
    }
    Ok(())
}

/// Appends text to the innermost open element. Text outside the root is
/// whitespace in any well-formed document and is ignored.
fn push_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}

fn syntax(reader: &Reader<&[u8]>, err: &dyn std::fmt::Display) -> ReportError {
    ReportError::Syntax {
        position: reader.buffer_position() as u64,
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn reads_nested_elements_and_attributes() {
        let root = read_tree(r#"<a x="1"><b y="2">hi</b><c/></a>"#).expect("tree");
        assert_eq!(root.name, "a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.children.len(), 2);
        let b = root.child("b").expect("b");
        assert_eq!(b.attr("y"), Some("2"));
        assert_eq!(b.trimmed_text(), "hi");
        assert!(root.child("c").is_some());
    }

    #[test]
    fn resolves_entities_in_text_and_attributes() {
        let root = read_tree(r#"<a v="x &lt; y">1 &amp; 2 &#x41;</a>"#).expect("tree");
        assert_eq!(root.attr("v"), Some("x < y"));
        assert_eq!(root.trimmed_text(), "1 & 2 A");
    }

    #[test]
    fn keeps_cdata_verbatim() {
        let root = read_tree("<a><![CDATA[<raw> & text]]></a>").expect("tree");
        assert_eq!(root.trimmed_text(), "<raw> & text");
    }

    #[test]
    fn ignores_declaration_and_comments() {
        let root = read_tree("<?xml version=\"1.0\"?>\n<!-- c --><a/>").expect("tree");
        assert_eq!(root.name, "a");
    }

    #[test]
    fn mismatched_tags_are_syntax_errors() {
        let err = read_tree("<a><b></a>").expect_err("should fail");
        assert!(matches!(err, ReportError::Syntax { .. }), "got {err:?}");
    }

    #[test]
    fn unclosed_root_is_a_syntax_error() {
        let err = read_tree("<a><b/>").expect_err("should fail");
        assert!(matches!(err, ReportError::Syntax { .. }), "got {err:?}");
    }

    #[test]
    fn second_top_level_element_is_a_syntax_error() {
        let err = read_tree("<a><results/></a><b/>").expect_err("should fail");
        assert!(matches!(err, ReportError::Syntax { .. }), "got {err:?}");

        let err = read_tree("<a/><b></b>").expect_err("should fail");
        assert!(matches!(err, ReportError::Syntax { .. }), "got {err:?}");
    }

    #[test]
    fn empty_input_has_no_root() {
        assert_eq!(
            read_tree("").expect_err("should fail"),
            ReportError::EmptyDocument
        );
        assert_eq!(
            read_tree("<?xml version=\"1.0\"?>").expect_err("should fail"),
            ReportError::EmptyDocument
        );
    }
}
