#![forbid(unsafe_code)]

//! Helper routines for XML document trees: naming elements, parsing byte
//! streams, creating empty documents, finding child values and
//! serializing documents or nodes back to text.
//!
//! All documents live in a [`Dom`]; a [`Node`] is a small handle into it.
//! Parsers and transformers that follow a host's configuration come from an
//! [`ExecutionContext`]; [`DefaultContext`] is a ready-made one.
//!
//! ```rust
//! use domutils::{
//!     document_to_string, find_first_child_value, parse_document, qualified_name,
//!     DefaultContext, Dom,
//! };
//!
//! let context = DefaultContext::new();
//! let mut dom = Dom::new();
//! let input: &[u8] = br#"<x:doc xmlns:x="urn:example"><?status draft?></x:doc>"#;
//! let doc = parse_document(&context, &mut dom, input)?;
//! let doc_el = dom.document_element(doc).unwrap();
//!
//! assert_eq!(qualified_name(&dom, Some(doc_el)).to_string(), "{urn:example}doc");
//! assert_eq!(find_first_child_value(&dom, doc_el, "status"), Some("draft"));
//! assert!(document_to_string(&dom, doc)?.starts_with("<?xml"));
//! # Ok::<(), domutils::Error>(())
//! ```

mod access;
mod compare;
mod context;
mod creation;
mod dom;
mod encoding;
mod entity;
mod error;
pub mod fixed;
mod idmap;
mod manipulation;
mod name;
mod nameaccess;
pub mod output;
mod parse;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest;
mod qname;
pub mod utils;
mod valueaccess;
mod xmlvalue;

pub use access::NodeEdge;
pub use context::{DefaultContext, ExecutionContext};
pub use dom::{Dom, Node};
pub use error::{Error, ParseError};
pub use name::{NameId, NamespaceId, PrefixId};
pub use output::{Method, OutputProperties, Transformer};
pub use parse::{DocumentBuilder, ParserConfig};
pub use qname::QualifiedName;
pub use utils::{
    document_to_string, document_to_string_with, find_first_child_value, new_empty_document,
    parse_document, qualified_name, serialize_node_to_string,
};
pub use xmlvalue::{
    Attribute, Comment, DocumentInfo, DocumentType, Element, ProcessingInstruction, Text, Value,
    ValueType,
};
