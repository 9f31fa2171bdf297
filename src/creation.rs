use crate::dom::{Dom, Node};
use crate::name::{NameId, PrefixId, EMPTY_PREFIX};
use crate::xmlvalue::{Comment, DocumentInfo, Element, ProcessingInstruction, Text, Value};

/// Creating nodes.
///
/// New nodes are detached; attach them with the
/// [manipulation](crate::Dom::append) methods.
impl Dom {
    pub(crate) fn new_node(&mut self, value: Value) -> Node {
        Node::new(self.arena_mut().new_node(value))
    }

    /// Create a new, empty document.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.new_document();
    /// assert_eq!(dom.children(doc).count(), 0);
    /// assert_eq!(dom.xml_encoding(doc), None);
    /// ```
    pub fn new_document(&mut self) -> Node {
        self.new_node(Value::Document(DocumentInfo::default()))
    }

    /// Create a new element. It's written without a prefix unless its
    /// namespace needs one.
    pub fn new_element(&mut self, name_id: NameId) -> Node {
        self.new_prefixed_element(name_id, EMPTY_PREFIX)
    }

    /// Create a new element with the prefix it should be written with.
    pub fn new_prefixed_element(&mut self, name_id: NameId, prefix_id: PrefixId) -> Node {
        self.new_node(Value::Element(Element::new(name_id, prefix_id)))
    }

    /// Create a new text node.
    pub fn new_text(&mut self, text: &str) -> Node {
        self.new_node(Value::Text(Text::new(text.to_string())))
    }

    /// Create a new comment node.
    pub fn new_comment(&mut self, comment: &str) -> Node {
        self.new_node(Value::Comment(Comment::new(comment.to_string())))
    }

    /// Create a new processing instruction node.
    pub fn new_processing_instruction(&mut self, target: &str, data: Option<&str>) -> Node {
        self.new_node(Value::ProcessingInstruction(ProcessingInstruction::new(
            target.to_string(),
            data.filter(|data| !data.is_empty()).map(str::to_string),
        )))
    }
}
