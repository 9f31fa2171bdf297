use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::name::NameId;
use crate::xmlvalue::ValueType;

/// Manipulation of the tree structure.
///
/// This maintains an XML structure:
/// - Only elements and documents have children.
/// - A document holds at most one element, and no text.
/// - A document cannot be placed inside anything.
///
/// Text nodes are consolidated: two text nodes never appear next to each
/// other. Text added next to existing text is merged into it and the added
/// node is removed from the tree. This also happens when removing a node
/// leaves two text nodes adjacent.
impl Dom {
    /// Append a child to the end of the children of the given parent.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.new_document();
    /// let name = dom.add_name("doc");
    /// let el = dom.new_element(name);
    /// dom.append(doc, el)?;
    /// dom.append_text(el, "Hello")?;
    /// dom.append_text(el, " world")?;
    /// assert_eq!(dom.children(el).count(), 1);
    /// assert_eq!(dom.text_str(dom.first_child(el).unwrap()), Some("Hello world"));
    /// # Ok::<(), domutils::Error>(())
    /// ```
    pub fn append(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        self.add_structure_check(parent, child)?;
        self.detach_consolidated(child);
        if self.add_consolidate_text_nodes(child, self.last_child(parent), None) {
            return Ok(());
        }
        parent.get().checked_append(child.get(), self.arena_mut())?;
        Ok(())
    }

    /// Create an element with the given name and append it.
    pub fn append_element(&mut self, parent: Node, name_id: NameId) -> Result<Node, Error> {
        let element = self.new_element(name_id);
        self.append(parent, element)?;
        Ok(element)
    }

    /// Append text; it merges with preceding text.
    pub fn append_text(&mut self, parent: Node, text: &str) -> Result<(), Error> {
        let text = self.new_text(text);
        self.append(parent, text)
    }

    /// Append a comment.
    pub fn append_comment(&mut self, parent: Node, comment: &str) -> Result<Node, Error> {
        let comment = self.new_comment(comment);
        self.append(parent, comment)?;
        Ok(comment)
    }

    /// Append a processing instruction.
    pub fn append_processing_instruction(
        &mut self,
        parent: Node,
        target: &str,
        data: Option<&str>,
    ) -> Result<Node, Error> {
        let pi = self.new_processing_instruction(target, data);
        self.append(parent, pi)?;
        Ok(pi)
    }

    /// Prepend a child to the beginning of the children of the given parent.
    pub fn prepend(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        self.add_structure_check(parent, child)?;
        self.detach_consolidated(child);
        if self.add_consolidate_text_nodes(child, None, self.first_child(parent)) {
            return Ok(());
        }
        parent.get().checked_prepend(child.get(), self.arena_mut())?;
        Ok(())
    }

    /// Insert a new sibling after a reference node.
    pub fn insert_after(&mut self, reference_node: Node, new_sibling: Node) -> Result<(), Error> {
        let parent = self.parent(reference_node).ok_or_else(|| {
            Error::InvalidOperation("cannot add a sibling to a node without parent".into())
        })?;
        self.add_structure_check(parent, new_sibling)?;
        self.detach_consolidated(new_sibling);
        if self.add_consolidate_text_nodes(
            new_sibling,
            Some(reference_node),
            self.next_sibling(reference_node),
        ) {
            return Ok(());
        }
        reference_node
            .get()
            .checked_insert_after(new_sibling.get(), self.arena_mut())?;
        Ok(())
    }

    /// Insert a new sibling before a reference node.
    pub fn insert_before(&mut self, reference_node: Node, new_sibling: Node) -> Result<(), Error> {
        let parent = self.parent(reference_node).ok_or_else(|| {
            Error::InvalidOperation("cannot add a sibling to a node without parent".into())
        })?;
        self.add_structure_check(parent, new_sibling)?;
        self.detach_consolidated(new_sibling);
        if self.add_consolidate_text_nodes(
            new_sibling,
            self.previous_sibling(reference_node),
            Some(reference_node),
        ) {
            return Ok(());
        }
        reference_node
            .get()
            .checked_insert_before(new_sibling.get(), self.arena_mut())?;
        Ok(())
    }

    /// Remove a node and its descendants.
    ///
    /// The node handle, and handles to its descendants, are no longer
    /// valid afterwards.
    pub fn remove(&mut self, node: Node) -> Result<(), Error> {
        if self.is_removed(node) {
            return Err(Error::InvalidOperation("node was already removed".into()));
        }
        let prev_node = self.previous_sibling(node);
        let next_node = self.next_sibling(node);
        node.get().remove_subtree(self.arena_mut());
        self.remove_consolidate_text_nodes(prev_node, next_node);
        Ok(())
    }

    fn detach_consolidated(&mut self, node: Node) {
        if self.parent(node).is_none() {
            return;
        }
        let prev_node = self.previous_sibling(node);
        let next_node = self.next_sibling(node);
        node.get().detach(self.arena_mut());
        self.remove_consolidate_text_nodes(prev_node, next_node);
    }

    fn add_structure_check(&self, parent: Node, child: Node) -> Result<(), Error> {
        if parent == child {
            return Err(Error::InvalidOperation("cannot add a node to itself".into()));
        }
        let parent_type = self.value_type(parent);
        if !matches!(parent_type, ValueType::Element | ValueType::Document) {
            return Err(Error::InvalidOperation(
                "only elements and documents have children".into(),
            ));
        }
        match self.value_type(child) {
            ValueType::Document => {
                return Err(Error::InvalidOperation(
                    "a document cannot be added to another node".into(),
                ));
            }
            ValueType::Element => {
                if parent_type == ValueType::Document {
                    let existing = self.document_element(parent);
                    if existing.is_some() && existing != Some(child) {
                        return Err(Error::InvalidOperation(
                            "a document has only one document element".into(),
                        ));
                    }
                }
                if self.ancestors(parent).any(|ancestor| ancestor == child) {
                    return Err(Error::InvalidOperation(
                        "cannot add a node to its own descendant".into(),
                    ));
                }
            }
            ValueType::Text => {
                if parent_type == ValueType::Document {
                    return Err(Error::InvalidOperation(
                        "a document cannot contain text".into(),
                    ));
                }
            }
            ValueType::ProcessingInstruction | ValueType::Comment => {}
        }
        Ok(())
    }

    fn add_consolidate_text_nodes(
        &mut self,
        node: Node,
        prev_node: Option<Node>,
        next_node: Option<Node>,
    ) -> bool {
        let added_text = match self.text_str(node) {
            Some(text) => text.to_string(),
            None => return false,
        };
        // since text nodes are never adjacent, merging with one side is enough
        if let Some(prev) = prev_node.and_then(|n| self.text_mut(n)) {
            let mut s = prev.get().to_string();
            s.push_str(&added_text);
            prev.set(s);
        } else if let Some(next) = next_node.and_then(|n| self.text_mut(n)) {
            let mut s = added_text;
            s.push_str(next.get());
            next.set(s);
        } else {
            return false;
        }
        node.get().remove(self.arena_mut());
        true
    }

    fn remove_consolidate_text_nodes(&mut self, prev_node: Option<Node>, next_node: Option<Node>) {
        let (Some(prev_node), Some(next_node)) = (prev_node, next_node) else {
            return;
        };
        let Some(to_add) = self.text_str(next_node).map(str::to_string) else {
            return;
        };
        if let Some(prev) = self.text_mut(prev_node) {
            let mut s = prev.get().to_string();
            s.push_str(&to_add);
            prev.set(s);
            next_node.get().remove(self.arena_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_takes_one_element() {
        let mut dom = Dom::new();
        let doc = dom.new_document();
        let a = dom.add_name("a");
        dom.append_element(doc, a).unwrap();
        let err = dom.append_element(doc, a).unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
        // comments and processing instructions are fine
        dom.append_comment(doc, "after").unwrap();
        assert_eq!(dom.children(doc).count(), 2);
    }

    #[test]
    fn test_document_rejects_text() {
        let mut dom = Dom::new();
        let doc = dom.new_document();
        assert!(matches!(
            dom.append_text(doc, "text"),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_cannot_add_to_text() {
        let mut dom = Dom::new();
        let text = dom.new_text("a");
        let a = dom.add_name("a");
        let el = dom.new_element(a);
        assert!(matches!(
            dom.append(text, el),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_cannot_add_ancestor_to_descendant() {
        let mut dom = Dom::new();
        let a = dom.add_name("a");
        let outer = dom.new_element(a);
        let inner = dom.append_element(outer, a).unwrap();
        assert!(matches!(
            dom.append(inner, outer),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_insert_text_before_text_merges() {
        let mut dom = Dom::new();
        let doc = dom.parse("<p>world</p>").unwrap();
        let p = dom.document_element(doc).unwrap();
        let world = dom.first_child(p).unwrap();
        let hello = dom.new_text("hello ");
        dom.insert_before(world, hello).unwrap();
        assert_eq!(dom.children(p).count(), 1);
        assert_eq!(dom.text_str(world), Some("hello world"));
    }

    #[test]
    fn test_remove_merges_neighbours() {
        let mut dom = Dom::new();
        let doc = dom.parse("<p>a<b/>c</p>").unwrap();
        let p = dom.document_element(doc).unwrap();
        let b = dom.children(p).nth(1).unwrap();
        dom.remove(b).unwrap();
        assert!(dom.is_removed(b));
        let children = dom.children(p).collect::<Vec<_>>();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_str(children[0]), Some("ac"));
    }

    #[test]
    fn test_move_node_between_parents() {
        let mut dom = Dom::new();
        let doc = dom.parse("<p><a/><b/></p>").unwrap();
        let p = dom.document_element(doc).unwrap();
        let a = dom.first_child(p).unwrap();
        let b = dom.next_sibling(a).unwrap();
        dom.append(b, a).unwrap();
        assert_eq!(dom.children(p).collect::<Vec<_>>(), vec![b]);
        assert_eq!(dom.parent(a), Some(b));
    }
}
