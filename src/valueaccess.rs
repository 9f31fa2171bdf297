use crate::dom::{Dom, Node};
use crate::xmlvalue::{
    DocumentInfo, DocumentType, Element, ProcessingInstruction, Text, Value, ValueType,
};

/// Obtain XML values, their types and their DOM names and values.
///
/// If you want to handle all value types, use a `match` statement on
/// [`Value`](crate::Value) instead.
impl Dom {
    /// Access to the XML value for this node.
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena()[node.get()].get()
    }

    /// Mutable access to the XML value for this node.
    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        self.arena_mut()[node.get()].get_mut()
    }

    /// Get the [`ValueType`] of a node.
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    /// Return true if node is a document.
    pub fn is_document(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Document
    }

    /// Return true if node is an element.
    pub fn is_element(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Element
    }

    /// Return true if node is text.
    pub fn is_text(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Text
    }

    /// Return true if node is a comment.
    pub fn is_comment(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Comment
    }

    /// Return true if node is a processing instruction.
    pub fn is_processing_instruction(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::ProcessingInstruction
    }

    /// If this node is an element, return a reference to it.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// If this node is an element, return a mutable reference to it.
    pub fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        match self.value_mut(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// If this node's value is text, return a reference to it.
    pub fn text(&self, node: Node) -> Option<&Text> {
        match self.value(node) {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// If this node's value is text, return a mutable reference to it.
    pub fn text_mut(&mut self, node: Node) -> Option<&mut Text> {
        match self.value_mut(node) {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// If this node's value is text, return the string.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        self.text(node).map(|text| text.get())
    }

    /// If this node is a comment, return its text.
    pub fn comment_str(&self, node: Node) -> Option<&str> {
        match self.value(node) {
            Value::Comment(comment) => Some(comment.get()),
            _ => None,
        }
    }

    /// If this node is a processing instruction, return a reference to it.
    pub fn processing_instruction(&self, node: Node) -> Option<&ProcessingInstruction> {
        match self.value(node) {
            Value::ProcessingInstruction(pi) => Some(pi),
            _ => None,
        }
    }

    /// If this node is a document, return what its prolog declared.
    pub fn document_info(&self, node: Node) -> Option<&DocumentInfo> {
        match self.value(node) {
            Value::Document(info) => Some(info),
            _ => None,
        }
    }

    /// If this node is a document, return a mutable reference to its
    /// prolog information.
    pub fn document_info_mut(&mut self, node: Node) -> Option<&mut DocumentInfo> {
        match self.value_mut(node) {
            Value::Document(info) => Some(info),
            _ => None,
        }
    }

    /// The document type declaration of a document.
    pub fn doctype(&self, document: Node) -> Option<&DocumentType> {
        self.document_info(document).and_then(|info| info.doctype())
    }

    /// The encoding declared in the XML declaration of a document.
    pub fn xml_encoding(&self, document: Node) -> Option<&str> {
        self.document_info(document)
            .and_then(|info| info.xml_encoding())
    }

    /// The DOM node name.
    ///
    /// Elements give their name as written (`prefix:local` or `local`),
    /// processing instructions their target. The other kinds have fixed
    /// names: `#document`, `#text` and `#comment`.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.parse(r#"<x:p xmlns:x="http://example.com">Hi</x:p>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.node_name(doc), "#document");
    /// assert_eq!(dom.node_name(p), "x:p");
    /// assert_eq!(dom.node_name(dom.first_child(p).unwrap()), "#text");
    /// ```
    pub fn node_name(&self, node: Node) -> String {
        match self.value(node) {
            Value::Document(_) => "#document".to_string(),
            Value::Element(element) => {
                let local = self.local_name_str(element.name());
                let prefix = self.prefix_str(element.prefix());
                if prefix.is_empty() {
                    local.to_string()
                } else {
                    format!("{}:{}", prefix, local)
                }
            }
            Value::Text(_) => "#text".to_string(),
            Value::Comment(_) => "#comment".to_string(),
            Value::ProcessingInstruction(pi) => pi.target().to_string(),
        }
    }

    /// The DOM node value.
    ///
    /// Text and comments give their content, processing instructions their
    /// data (empty if there is none). Documents and elements have no value.
    pub fn node_value(&self, node: Node) -> Option<&str> {
        match self.value(node) {
            Value::Document(_) | Value::Element(_) => None,
            Value::Text(text) => Some(text.get()),
            Value::Comment(comment) => Some(comment.get()),
            Value::ProcessingInstruction(pi) => Some(pi.data().unwrap_or("")),
        }
    }
}
