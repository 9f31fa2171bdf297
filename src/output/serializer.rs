use genawaiter::rc::gen;
use genawaiter::yield_;

use crate::access::NodeEdge;
use crate::dom::{Dom, Node};
use crate::xmlvalue::{Attribute, Element, Value};

/// Output of serialization
///
/// What a serialization step represents in the XML tree. The document
/// node itself produces no output; its children do.
#[derive(Debug, PartialEq)]
pub(crate) enum Output<'a> {
    /// Start tag open, i.e `<foo` or `<ns:foo`
    StartTagOpen(&'a Element),
    /// Attribute, i.e. `foo="bar"`
    Attribute(&'a Attribute),
    /// Start tag close, either `>` or `/>`
    StartTagClose,
    /// End tag, i.e. `</foo>`; nothing for an element closed with `/>`
    EndTag(&'a Element),
    /// Text, i.e. `foo`
    Text(&'a str),
    /// Comment, i.e. `<!-- foo -->`
    Comment(&'a str),
    /// Processing instruction, i.e. `<?foo bar?>`
    ProcessingInstruction(&'a str, Option<&'a str>),
}

pub(crate) fn gen_outputs(dom: &Dom, node: Node) -> impl Iterator<Item = (Node, Output)> + '_ {
    gen!({
        for edge in dom.traverse(node) {
            match edge {
                NodeEdge::Start(current_node) => {
                    for output in gen_edge_start(dom, current_node) {
                        yield_!((current_node, output));
                    }
                }
                NodeEdge::End(current_node) => {
                    if let Value::Element(element) = dom.value(current_node) {
                        yield_!((current_node, Output::EndTag(element)));
                    }
                }
            }
        }
    })
    .into_iter()
}

fn gen_edge_start(dom: &Dom, node: Node) -> impl Iterator<Item = Output> + '_ {
    gen!({
        match dom.value(node) {
            Value::Document(_) => {}
            Value::Element(element) => {
                yield_!(Output::StartTagOpen(element));
                for attribute in element.attributes() {
                    yield_!(Output::Attribute(attribute));
                }
                yield_!(Output::StartTagClose);
            }
            Value::Text(text) => {
                yield_!(Output::Text(text.get()));
            }
            Value::Comment(comment) => {
                yield_!(Output::Comment(comment.get()));
            }
            Value::ProcessingInstruction(pi) => {
                yield_!(Output::ProcessingInstruction(pi.target(), pi.data()));
            }
        }
    })
    .into_iter()
}

/// A rendered output token.
pub(crate) struct OutputToken {
    /// Whether the token is prefixed by a space character.
    pub(crate) space: bool,
    /// A fragment of XML like `<foo` or `a="A"` or `/>`.
    pub(crate) text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_in_document_order() {
        let mut dom = Dom::new();
        let root = dom.parse(r#"<doc a="A">Text<!--c--></doc>"#).unwrap();
        let doc = dom.document_element(root).unwrap();
        let doc_el = dom.element(doc).unwrap();
        let mut iter = gen_outputs(&dom, root);

        assert_eq!(iter.next().unwrap().1, Output::StartTagOpen(doc_el));
        assert_eq!(
            iter.next().unwrap().1,
            Output::Attribute(&doc_el.attributes()[0])
        );
        assert_eq!(iter.next().unwrap().1, Output::StartTagClose);
        assert_eq!(iter.next().unwrap().1, Output::Text("Text"));
        assert_eq!(iter.next().unwrap().1, Output::Comment("c"));
        assert_eq!(iter.next().unwrap().1, Output::EndTag(doc_el));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_outputs_of_a_text_node() {
        let mut dom = Dom::new();
        let root = dom.parse("<doc>Text</doc>").unwrap();
        let doc = dom.document_element(root).unwrap();
        let text = dom.first_child(doc).unwrap();
        let outputs = gen_outputs(&dom, text).collect::<Vec<_>>();
        assert_eq!(outputs, vec![(text, Output::Text("Text"))]);
    }
}
