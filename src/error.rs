use std::path::PathBuf;

use crate::dom::Node;

/// Errors found while turning XML text into a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The underlying tokenizer rejected the input as malformed.
    #[error("malformed XML: {0}")]
    XmlParser(#[from] xmlparser::Error),
    /// Only XML 1.0 is supported.
    #[error("unsupported XML version: {0}")]
    UnsupportedVersion(String),
    /// A close tag doesn't match the open element.
    #[error("invalid close tag at {position}: expected </{expected}>, found </{found}>")]
    InvalidCloseTag {
        /// Name of the open element.
        expected: String,
        /// Name in the close tag.
        found: String,
        /// Byte offset of the close tag name.
        position: usize,
    },
    /// The input ended while an element was still open.
    #[error("unclosed tag: <{0}>")]
    UnclosedTag(String),
    /// A prefix was used without a namespace declaration in scope.
    #[error("unknown namespace prefix {prefix:?} at {position}")]
    UnknownPrefix {
        /// The undeclared prefix.
        prefix: String,
        /// Byte offset of the prefixed name.
        position: usize,
    },
    /// Two attributes on one element resolve to the same name.
    #[error("duplicate attribute {name} at {position}")]
    DuplicateAttribute {
        /// Attribute name as written.
        name: String,
        /// Byte offset of the second attribute.
        position: usize,
    },
    /// An entity reference without a terminating `;`.
    #[error("unclosed entity reference: &{0}")]
    UnclosedEntity(String),
    /// Expanding entity references went over the configured limits.
    #[error("entity expansion limit exceeded while expanding &{0};")]
    EntityExpansionLimit(String),
    /// An entity reference that is neither predefined nor declared.
    #[error("unknown entity: &{0};")]
    InvalidEntity(String),
    /// A character reference that isn't a valid character.
    #[error("invalid character reference: &{0};")]
    InvalidCharacterReference(String),
    /// Non-whitespace text before or after the document element.
    #[error("text outside the document element at {0}")]
    TextOutsideElement(usize),
    /// No element at all in the input.
    #[error("document has no document element")]
    NoDocumentElement,
    /// The bytes could not be decoded with the detected encoding.
    #[error("input is not valid {0}")]
    Undecodable(String),
}

/// Error type for everything in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A parser or serializer could not be constructed with the requested
    /// configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// No encoder or decoder exists for this encoding label.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    /// The tree could not be serialized.
    #[error("transformation error: {0}")]
    Transform(String),
    /// Catch-all wrapper used by [`document_to_string`](crate::document_to_string).
    #[error("error converting to string")]
    Conversion {
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
    /// An output format file could not be read as output properties.
    #[error("invalid output format file {}: {source}", path.display())]
    OutputFormat {
        /// Path of the output format file.
        path: PathBuf,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// A tree manipulation would break the document structure.
    #[error("invalid tree operation: {0}")]
    InvalidOperation(String),
    /// The node is not an element.
    #[error("node is not an element: {0:?}")]
    NotElement(Node),
    /// The node is not a document.
    #[error("node is not a document: {0:?}")]
    NotDocument(Node),
}

impl From<indextree::NodeError> for Error {
    #[inline]
    fn from(e: indextree::NodeError) -> Self {
        Error::InvalidOperation(e.to_string())
    }
}
