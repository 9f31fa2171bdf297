//! Helper routines over documents: naming, parsing, querying and
//! serializing.
//!
//! None of these keep any state between calls. Parsing and serialization
//! that should follow the host's configuration go through an
//! [`ExecutionContext`].
use std::io::Read;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::output::{Method, OutputProperties, Transformer};
use crate::parse::{DocumentBuilder, ParserConfig};
use crate::qname::QualifiedName;

/// The namespace URI and local name of an element.
///
/// Both are empty when there is no element; the namespace URI is empty
/// when the element is in no namespace. Other kinds of node have no name
/// to copy and give empty strings too.
///
/// ```rust
/// use domutils::{qualified_name, Dom};
///
/// let mut dom = Dom::new();
/// let doc = dom.parse(r#"<x:foo xmlns:x="ns1"/>"#)?;
/// let foo = dom.document_element(doc);
///
/// let name = qualified_name(&dom, foo);
/// assert_eq!(name.namespace_uri(), "ns1");
/// assert_eq!(name.local_name(), "foo");
/// assert!(qualified_name(&dom, None).is_empty());
/// # Ok::<(), domutils::Error>(())
/// ```
pub fn qualified_name(dom: &Dom, element: Option<Node>) -> QualifiedName {
    let Some(element) = element.and_then(|node| dom.element(node)) else {
        return QualifiedName::default();
    };
    let (local_name, namespace_uri) = dom.name_ns_str(element.name());
    QualifiedName::new(namespace_uri, local_name)
}

/// Parse a document from a byte stream with the context's document
/// builder. The stream is read to the end.
pub fn parse_document<C, R>(context: &C, dom: &mut Dom, input: R) -> Result<Node, Error>
where
    C: ExecutionContext + ?Sized,
    R: Read,
{
    context.document_builder()?.parse_reader(dom, input)
}

/// Create a document without any children, using the default parser
/// configuration.
pub fn new_empty_document(dom: &mut Dom) -> Result<Node, Error> {
    let builder = DocumentBuilder::new(ParserConfig::default())?;
    Ok(builder.new_document(dom))
}

/// The node value of the first child with the given node name.
///
/// Only immediate children are looked at, in document order, and names
/// are compared as written: `x:title` does not match `title`. Elements
/// have no node value, so a matching element gives `None`, just like no
/// match at all.
///
/// ```rust
/// use domutils::{find_first_child_value, Dom};
///
/// let mut dom = Dom::new();
/// let doc = dom.parse("<doc><?version 1.0?><?version 2.0?></doc>")?;
/// let doc_el = dom.document_element(doc).unwrap();
/// assert_eq!(find_first_child_value(&dom, doc_el, "version"), Some("1.0"));
/// assert_eq!(find_first_child_value(&dom, doc_el, "missing"), None);
/// # Ok::<(), domutils::Error>(())
/// ```
pub fn find_first_child_value<'a>(dom: &'a Dom, element: Node, child_name: &str) -> Option<&'a str> {
    dom.children(element)
        .find(|child| dom.node_name(*child) == child_name)
        .and_then(|child| dom.node_value(child))
}

/// Serialize a document, indented, in UTF-8, with an XML declaration.
///
/// Any failure is reported as [`Error::Conversion`].
pub fn document_to_string(dom: &Dom, document: Node) -> Result<String, Error> {
    document_to_string_with(dom, document, false)
}

/// Serialize a document, indented, in UTF-8, with or without an XML
/// declaration.
///
/// Any failure is reported as [`Error::Conversion`].
///
/// ```rust
/// use domutils::{document_to_string_with, Dom};
///
/// let mut dom = Dom::new();
/// let doc = dom.parse("<doc><a>1</a></doc>")?;
/// assert_eq!(
///     document_to_string_with(&dom, doc, true)?,
///     "<doc>\n  <a>1</a>\n</doc>\n"
/// );
/// # Ok::<(), domutils::Error>(())
/// ```
pub fn document_to_string_with(
    dom: &Dom,
    document: Node,
    omit_xml_declaration: bool,
) -> Result<String, Error> {
    let transformer = Transformer::with_properties(OutputProperties {
        method: Method::Xml,
        indent: true,
        omit_xml_declaration,
        encoding: "UTF-8".to_string(),
        ..Default::default()
    });
    transformer
        .transform_to_string(dom, document)
        .map_err(|e| Error::Conversion {
            source: Box::new(e),
        })
}

/// Serialize a document or any node below it with a transformer from the
/// context.
///
/// Without a node there is nothing to serialize, and no transformer is
/// requested. An encoding declared by the node's document takes precedence
/// over the requested `encoding`. With `include_doctype_declaration`, the
/// identifiers of the document's document type declaration are passed on
/// to the transformer; a node outside of any document has neither.
///
/// Errors from the transformer are returned as they are.
pub fn serialize_node_to_string<C>(
    context: &C,
    dom: &Dom,
    node: Option<Node>,
    include_xml_declaration: bool,
    include_doctype_declaration: bool,
    encoding: &str,
) -> Result<Option<String>, Error>
where
    C: ExecutionContext + ?Sized,
{
    let Some(node) = node else {
        return Ok(None);
    };
    let mut transformer = context.transformer(None)?;
    transformer.set_omit_xml_declaration(!include_xml_declaration);

    let document = dom.owner_document(node);
    let declared = document.and_then(|document| dom.xml_encoding(document));
    if let Some(declared) = declared {
        if !declared.eq_ignore_ascii_case(encoding) {
            debug!(declared, requested = encoding, "document encoding overrides requested encoding");
        }
    }
    transformer.set_encoding(declared.unwrap_or(encoding));

    if include_doctype_declaration {
        if let Some(doctype) = document.and_then(|document| dom.doctype(document)) {
            if let Some(public_id) = doctype.public_id() {
                transformer.set_doctype_public(Some(public_id));
            }
            if let Some(system_id) = doctype.system_id() {
                transformer.set_doctype_system(Some(system_id));
            }
        }
    }

    transformer.transform_to_string(dom, node).map(Some)
}
