//! Error type shared by the report reader and writer.

/// Errors produced while reading or writing a serialized report.
///
/// Every variant except [`ReportError::Write`] means the document is
/// malformed: it is not well-formed XML or lacks the structure a report must
/// have. Callers attach the offending file path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// The document is not well-formed XML.
    #[error("XML syntax error at byte {position}: {detail}")]
    Syntax {
        /// Byte offset where the reader stopped.
        position: u64,
        /// Reader error message.
        detail: String,
    },

    /// The document contains no root element.
    #[error("document has no root element")]
    EmptyDocument,

    /// A mandatory section is absent from the root element.
    #[error("missing required section <{section}>")]
    MissingSection {
        /// Element name of the missing section.
        section: &'static str,
    },

    /// An element lacks an attribute the report format requires.
    #[error("<{element}> element is missing required attribute {attribute:?}")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// Serializing a report failed.
    #[error("could not serialize report: {detail}")]
    Write {
        /// Writer error message.
        detail: String,
    },
}

impl ReportError {
    /// Returns `true` if this error means the input document is malformed.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}
