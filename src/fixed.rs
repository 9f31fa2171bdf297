//! An owned description of a document that can be built into a [`Dom`].
//!
//! Trees in a [`Dom`] are only reachable through it. Sometimes it's useful
//! to describe a tree as a plain value, to store it, compare it or
//! generate it, and only then turn it into nodes. Call `build` to do so.
//!
//! ```rust
//! use domutils::{document_to_string_with, fixed, Dom};
//!
//! let document = fixed::Document {
//!     before: vec![],
//!     document_element: fixed::Element {
//!         name: fixed::Name::new("", "foo"),
//!         prefixes: vec![],
//!         attributes: vec![],
//!         children: vec![fixed::Content::Text("Example".to_string())],
//!     },
//!     after: vec![],
//! };
//!
//! let mut dom = Dom::new();
//! let doc = document.build(&mut dom)?;
//! assert_eq!(document_to_string_with(&dom, doc, true)?, "<foo>Example</foo>\n");
//! # Ok::<(), domutils::Error>(())
//! ```

use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::name::NameId;

/// A document: its element, and the comments and processing instructions
/// around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// Comments and processing instructions before the document element
    pub before: Vec<DocumentContent>,
    /// The document element
    pub document_element: Element,
    /// Comments and processing instructions after the document element
    pub after: Vec<DocumentContent>,
}

/// A name. An empty namespace means no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub namespace: String,
    pub local_name: String,
}

impl Name {
    pub fn new<N: Into<String>, L: Into<String>>(namespace: N, local_name: L) -> Self {
        Name {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    fn build(&self, dom: &mut Dom) -> NameId {
        let namespace_id = dom.add_namespace(&self.namespace);
        dom.add_name_ns(&self.local_name, namespace_id)
    }
}

/// A namespace declaration. An empty prefix declares the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub prefix: String,
    pub namespace: String,
}

/// An element with its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    pub name: Name,
    /// Namespace declarations
    pub prefixes: Vec<Prefix>,
    pub attributes: Vec<(Name, String)>,
    pub children: Vec<Content>,
}

/// Element content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Content {
    Text(String),
    Comment(String),
    ProcessingInstruction(ProcessingInstruction),
    Element(Element),
}

/// What can appear next to the document element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentContent {
    Comment(String),
    ProcessingInstruction(ProcessingInstruction),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessingInstruction {
    pub target: String,
    pub data: Option<String>,
}

impl Document {
    /// Build a new document.
    pub fn build(&self, dom: &mut Dom) -> Result<Node, Error> {
        let document = dom.new_document();
        for content in &self.before {
            let node = content.build(dom);
            dom.append(document, node)?;
        }
        let element = self.document_element.build(dom)?;
        dom.append(document, element)?;
        for content in &self.after {
            let node = content.build(dom);
            dom.append(document, node)?;
        }
        Ok(document)
    }
}

impl Element {
    /// Build a detached element.
    pub fn build(&self, dom: &mut Dom) -> Result<Node, Error> {
        let name_id = self.name.build(dom);
        let prefixes = self
            .prefixes
            .iter()
            .map(|prefix| (dom.add_prefix(&prefix.prefix), dom.add_namespace(&prefix.namespace)))
            .collect::<Vec<_>>();
        let attributes = self
            .attributes
            .iter()
            .map(|(name, value)| (name.build(dom), value))
            .collect::<Vec<_>>();

        let node = dom.new_element(name_id);
        let element = dom.element_mut(node).ok_or(Error::NotElement(node))?;
        for (prefix_id, namespace_id) in prefixes {
            element.set_prefix(prefix_id, namespace_id);
        }
        for (name_id, value) in attributes {
            element.set_attribute(name_id, value.as_str());
        }

        for child in &self.children {
            let child = child.build(dom)?;
            dom.append(node, child)?;
        }
        Ok(node)
    }
}

impl ProcessingInstruction {
    fn build(&self, dom: &mut Dom) -> Node {
        dom.new_processing_instruction(&self.target, self.data.as_deref())
    }
}

impl Content {
    fn build(&self, dom: &mut Dom) -> Result<Node, Error> {
        Ok(match self {
            Content::Text(text) => dom.new_text(text),
            Content::Comment(comment) => dom.new_comment(comment),
            Content::ProcessingInstruction(pi) => pi.build(dom),
            Content::Element(element) => element.build(dom)?,
        })
    }
}

impl DocumentContent {
    fn build(&self, dom: &mut Dom) -> Node {
        match self {
            DocumentContent::Comment(comment) => dom.new_comment(comment),
            DocumentContent::ProcessingInstruction(pi) => pi.build(dom),
        }
    }
}
