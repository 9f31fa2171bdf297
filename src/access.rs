use indextree::NodeEdge as IndexTreeNodeEdge;

use crate::dom::{Dom, Node};
use crate::xmlvalue::{Value, ValueType};

/// Node edges.
///
/// Used by [`Dom::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// The start edge of a node. In case of an element this is the start
    /// tag. In case of a document the start of the document.
    Start(Node),
    /// The end edge of a node. For values other than elements and documents
    /// the end edge comes immediately after the start edge.
    End(Node),
}

/// ## Read-only access
impl Dom {
    /// Obtain the document element of a document.
    ///
    /// Returns [`None`] if the node is not a document, or if the document
    /// is still empty.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    ///
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.node_name(p), "p");
    /// assert_eq!(dom.document_element(p), None);
    /// ```
    pub fn document_element(&self, node: Node) -> Option<Node> {
        if self.value_type(node) != ValueType::Document {
            return None;
        }
        self.children(node).find(|child| self.is_element(*child))
    }

    /// The document this node belongs to.
    ///
    /// A document is its own owner. Nodes that are not (yet) attached to a
    /// document have no owner.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.owner_document(p), Some(doc));
    /// assert_eq!(dom.owner_document(doc), Some(doc));
    ///
    /// let name = dom.add_name("q");
    /// let q = dom.new_element(name);
    /// assert_eq!(dom.owner_document(q), None);
    /// ```
    pub fn owner_document(&self, node: Node) -> Option<Node> {
        self.ancestors(node).find(|ancestor| self.is_document(*ancestor))
    }

    /// Check whether a node has been removed.
    pub fn is_removed(&self, node: Node) -> bool {
        self.arena()[node.get()].is_removed()
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for a document or a detached node.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].parent().map(Node::new)
    }

    /// Get first child.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let text = dom.first_child(p).unwrap();
    /// assert_eq!(dom.first_child(doc), Some(p));
    /// assert_eq!(dom.first_child(text), None);
    /// ```
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].first_child().map(Node::new)
    }

    /// Get last child.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].last_child().map(Node::new)
    }

    /// Get next sibling.
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    /// Get previous sibling.
    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].previous_sibling().map(Node::new)
    }

    /// Iterator over the child nodes of this node, in document order.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.parse("<p><a/><b/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let names = dom.children(p).map(|n| dom.node_name(n)).collect::<Vec<_>>();
    /// assert_eq!(names, vec!["a", "b"]);
    /// ```
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// Iterator over ancestor nodes, including this one.
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(self.arena()).map(Node::new)
    }

    /// Iterator over the descendants of this node, including this one, in
    /// document order.
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(self.arena()).map(Node::new)
    }

    /// Traverse over node edges in document order.
    ///
    /// For `<a><b/></a>` this gives the start of `a`, the start of `b`, the
    /// end of `b` and the end of `a`.
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get().traverse(self.arena()).map(|edge| match edge {
            IndexTreeNodeEdge::Start(node_id) => NodeEdge::Start(Node::new(node_id)),
            IndexTreeNodeEdge::End(node_id) => NodeEdge::End(Node::new(node_id)),
        })
    }

    /// The first element in this subtree in document order, the node itself
    /// included.
    pub(crate) fn first_element(&self, node: Node) -> Option<Node> {
        self.descendants(node)
            .find(|n| matches!(self.value(*n), Value::Element(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traverse() {
        let mut dom = Dom::new();
        let doc = dom.parse("<a><b>Text</b></a>").unwrap();
        let a = dom.document_element(doc).unwrap();
        let b = dom.first_child(a).unwrap();
        let text = dom.first_child(b).unwrap();
        let edges = dom.traverse(a).collect::<Vec<_>>();
        assert_eq!(
            edges,
            vec![
                NodeEdge::Start(a),
                NodeEdge::Start(b),
                NodeEdge::Start(text),
                NodeEdge::End(text),
                NodeEdge::End(b),
                NodeEdge::End(a),
            ]
        );
    }

    #[test]
    fn test_siblings_and_ancestors() {
        let mut dom = Dom::new();
        let doc = dom.parse("<p><a/><b><c/></b></p>").unwrap();
        let p = dom.document_element(doc).unwrap();
        let a = dom.first_child(p).unwrap();
        let b = dom.next_sibling(a).unwrap();
        let c = dom.first_child(b).unwrap();
        assert_eq!(dom.previous_sibling(b), Some(a));
        assert_eq!(dom.next_sibling(b), None);
        assert_eq!(dom.last_child(p), Some(b));
        assert_eq!(dom.ancestors(c).collect::<Vec<_>>(), vec![c, b, p, doc]);
        assert_eq!(
            dom.descendants(p).collect::<Vec<_>>(),
            vec![p, a, b, c]
        );
    }

    #[test]
    fn test_first_element_skips_comments() {
        let mut dom = Dom::new();
        let doc = dom.parse("<!--c--><?pi?><root/>").unwrap();
        let root = dom.document_element(doc).unwrap();
        assert_eq!(dom.first_element(doc), Some(root));
    }
}
