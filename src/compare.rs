use crate::dom::{Dom, Node};
use crate::xmlvalue::{Element, Value};

impl Dom {
    /// Compare two subtrees for structural equality.
    ///
    /// Element names, attributes (in any order), and the sequence of child
    /// nodes with their text, comment and processing instruction content
    /// must match. Prefixes, namespace declarations and prolog information
    /// are not compared.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let a = dom.parse(r#"<x:a xmlns:x="urn:a" b="1" c="2"/>"#).unwrap();
    /// let b = dom.parse(r#"<a xmlns="urn:a" c="2" b="1"/>"#).unwrap();
    /// assert!(dom.deep_equal(a, b));
    /// ```
    pub fn deep_equal(&self, a: Node, b: Node) -> bool {
        let equal_values = match (self.value(a), self.value(b)) {
            (Value::Document(_), Value::Document(_)) => true,
            (Value::Element(a), Value::Element(b)) => elements_equal(a, b),
            (Value::Text(a), Value::Text(b)) => a.get() == b.get(),
            (Value::Comment(a), Value::Comment(b)) => a.get() == b.get(),
            (Value::ProcessingInstruction(a), Value::ProcessingInstruction(b)) => {
                a.target() == b.target() && a.data() == b.data()
            }
            _ => false,
        };
        if !equal_values {
            return false;
        }
        let mut a_children = self.children(a);
        let mut b_children = self.children(b);
        loop {
            match (a_children.next(), b_children.next()) {
                (Some(a), Some(b)) => {
                    if !self.deep_equal(a, b) {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

fn elements_equal(a: &Element, b: &Element) -> bool {
    if a.name() != b.name() || a.attributes().len() != b.attributes().len() {
        return false;
    }
    a.attributes()
        .iter()
        .all(|attribute| b.get_attribute(attribute.name()) == Some(attribute.value()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_unimportant() {
        let mut dom = Dom::new();
        let a = dom.parse(r#"<a foo="FOO" bar="BAR"/>"#).unwrap();
        let b = dom.parse(r#"<a bar="BAR" foo="FOO"/>"#).unwrap();
        assert!(dom.deep_equal(a, b));
    }

    #[test]
    fn test_attribute_value_differs() {
        let mut dom = Dom::new();
        let a = dom.parse(r#"<a foo="FOO"/>"#).unwrap();
        let b = dom.parse(r#"<a foo="BAR"/>"#).unwrap();
        assert!(!dom.deep_equal(a, b));
    }

    #[test]
    fn test_extra_attribute_differs() {
        let mut dom = Dom::new();
        let a = dom.parse(r#"<a foo="FOO"/>"#).unwrap();
        let b = dom.parse(r#"<a foo="FOO" bar="BAR"/>"#).unwrap();
        assert!(!dom.deep_equal(a, b));
        assert!(!dom.deep_equal(b, a));
    }

    #[test]
    fn test_namespace_matters() {
        let mut dom = Dom::new();
        let a = dom.parse(r#"<a xmlns="urn:x"/>"#).unwrap();
        let b = dom.parse(r#"<a xmlns="urn:y"/>"#).unwrap();
        assert!(!dom.deep_equal(a, b));
    }

    #[test]
    fn test_children_differ() {
        let mut dom = Dom::new();
        let a = dom.parse(r#"<a><b/>text</a>"#).unwrap();
        let b = dom.parse(r#"<a><b/></a>"#).unwrap();
        let c = dom.parse(r#"<a><b/>other</a>"#).unwrap();
        assert!(!dom.deep_equal(a, b));
        assert!(!dom.deep_equal(a, c));
    }
}
