use std::io;

use ahash::HashMap;

use crate::dom::{Dom, Node};
use crate::encoding::OutputEncoding;
use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::name::{NameId, NamespaceId};

use super::pretty::Pretty;
use super::serializer::{Output, OutputToken};

// Namespace declarations in effect in the output, innermost last. The tree's
// own declarations aren't trusted: a subtree may be serialized without its
// ancestors, and elements may be created without declaring anything, so
// every prefix the output uses is checked against this.
#[derive(Debug, Default)]
struct Scope {
    declarations: Vec<(String, NamespaceId)>,
    // rendered names of the element this scope was opened for
    element_name: String,
    attribute_names: HashMap<NameId, String>,
}

pub(crate) struct XmlSerializer<'a> {
    dom: &'a Dom,
    encoding: &'a OutputEncoding,
    scopes: Vec<Scope>,
}

impl<'a> XmlSerializer<'a> {
    pub(crate) fn new(dom: &'a Dom, encoding: &'a OutputEncoding) -> Self {
        Self {
            dom,
            encoding,
            scopes: Vec::new(),
        }
    }

    pub(crate) fn serialize<W: io::Write>(
        &mut self,
        w: &mut W,
        outputs: impl Iterator<Item = (Node, Output<'a>)>,
    ) -> Result<(), Error> {
        for (node, output) in outputs {
            self.serialize_node(w, node, &output)?;
        }
        Ok(())
    }

    pub(crate) fn serialize_pretty<W: io::Write>(
        &mut self,
        w: &mut W,
        outputs: impl Iterator<Item = (Node, Output<'a>)>,
    ) -> Result<(), Error> {
        let mut pretty = Pretty::new(self.dom);
        for (node, output) in outputs {
            let (indentation, newline) = pretty.prettify(node, &output);
            if indentation > 0 {
                w.write_all(" ".repeat(indentation * 2).as_bytes())?;
            }
            self.serialize_node(w, node, &output)?;
            if newline {
                w.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn serialize_node<W: io::Write>(
        &mut self,
        w: &mut W,
        node: Node,
        output: &Output<'a>,
    ) -> Result<(), Error> {
        let token = self.render_output(node, output)?;
        if token.space {
            w.write_all(b" ")?;
        }
        w.write_all(token.text.as_bytes())?;
        Ok(())
    }

    fn render_output(&mut self, node: Node, output: &Output<'a>) -> Result<OutputToken, Error> {
        use Output::*;
        let encoding = self.encoding;
        let representable = |c| encoding.can_encode(c);
        let token = match output {
            StartTagOpen(_) => OutputToken {
                space: false,
                text: self.open_element(node),
            },
            Attribute(attribute) => {
                let name = match self.scopes.last() {
                    Some(scope) => scope.attribute_names.get(&attribute.name()),
                    None => None,
                };
                let name = name
                    .map(String::as_str)
                    .unwrap_or_else(|| self.dom.local_name_str(attribute.name()));
                OutputToken {
                    space: true,
                    text: format!(
                        "{}=\"{}\"",
                        name,
                        serialize_attribute(attribute.value(), representable)
                    ),
                }
            }
            StartTagClose => OutputToken {
                space: false,
                text: if self.dom.first_child(node).is_none() {
                    "/>".to_string()
                } else {
                    ">".to_string()
                },
            },
            EndTag(_) => {
                let scope = self.scopes.pop().unwrap_or_default();
                let text = if self.dom.first_child(node).is_some() {
                    format!("</{}>", scope.element_name)
                } else {
                    String::new()
                };
                OutputToken { space: false, text }
            }
            Text(text) => OutputToken {
                space: false,
                text: serialize_text(text, representable).into_owned(),
            },
            Comment(text) => {
                if text.contains("--") || text.ends_with('-') {
                    return Err(Error::Transform(format!(
                        "comment cannot be serialized: {:?}",
                        text
                    )));
                }
                OutputToken {
                    space: false,
                    text: format!("<!--{}-->", text),
                }
            }
            ProcessingInstruction(target, data) => {
                let text = match data {
                    Some(data) => {
                        if data.contains("?>") {
                            return Err(Error::Transform(format!(
                                "processing instruction data cannot be serialized: {:?}",
                                data
                            )));
                        }
                        format!("<?{} {}?>", target, data)
                    }
                    None => format!("<?{}?>", target),
                };
                OutputToken { space: false, text }
            }
        };
        Ok(token)
    }

    fn lookup(&self, prefix: &str) -> Option<NamespaceId> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.declarations.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, namespace_id)| *namespace_id)
    }

    fn is_bound(&self, prefix: &str, namespace_id: NamespaceId) -> bool {
        match self.lookup(prefix) {
            Some(bound) => bound == namespace_id,
            // without a declaration the default namespace is no namespace
            None => prefix.is_empty() && namespace_id == self.dom.no_namespace(),
        }
    }

    // open a scope for an element, and render its name together with the
    // namespace declarations it needs
    fn open_element(&mut self, node: Node) -> String {
        let dom = self.dom;
        let encoding = self.encoding;
        let Some(element) = dom.element(node) else {
            self.scopes.push(Scope::default());
            return String::new();
        };
        let xml_prefix = dom.prefix_str(dom.xml_prefix());

        // keep the declarations the tree has, unless they are in effect already
        let mut scope = Scope::default();
        for (prefix_id, namespace_id) in element.prefixes() {
            let prefix = dom.prefix_str(*prefix_id);
            if prefix == xml_prefix || self.is_bound(prefix, *namespace_id) {
                continue;
            }
            scope.declarations.push((prefix.to_string(), *namespace_id));
        }
        self.scopes.push(scope);

        let namespace_id = dom.namespace_for_name(element.name());
        let local = dom.local_name_str(element.name());
        let mut prefix = dom.prefix_str(element.prefix()).to_string();
        if namespace_id == dom.no_namespace() {
            // only unprefixed names can be in no namespace
            prefix.clear();
        }
        if !self.is_bound(&prefix, namespace_id) {
            if !prefix.is_empty() && self.declared_here(&prefix) {
                prefix = self.generate_prefix();
            }
            self.declare(&prefix, namespace_id);
        }
        let element_name = if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", prefix, local)
        };

        for attribute in element.attributes() {
            let name = self.attribute_name(attribute.name(), dom.prefix_str(attribute.prefix()));
            if let Some(scope) = self.scopes.last_mut() {
                scope.attribute_names.insert(attribute.name(), name);
            }
        }

        let mut text = format!("<{}", element_name);
        if let Some(scope) = self.scopes.last_mut() {
            for (prefix, namespace_id) in &scope.declarations {
                let uri =
                    serialize_attribute(dom.namespace_str(*namespace_id), |c| encoding.can_encode(c));
                if prefix.is_empty() {
                    text.push_str(&format!(" xmlns=\"{}\"", uri));
                } else {
                    text.push_str(&format!(" xmlns:{}=\"{}\"", prefix, uri));
                }
            }
            scope.element_name = element_name;
        }
        text
    }

    fn attribute_name(&mut self, name_id: NameId, preferred: &str) -> String {
        let dom = self.dom;
        let local = dom.local_name_str(name_id);
        let namespace_id = dom.namespace_for_name(name_id);
        if namespace_id == dom.no_namespace() {
            return local.to_string();
        }
        if namespace_id == dom.xml_namespace() {
            return format!("{}:{}", dom.prefix_str(dom.xml_prefix()), local);
        }
        // attributes can only be put in a namespace with a prefix
        let prefix = if !preferred.is_empty() && self.is_bound(preferred, namespace_id) {
            preferred.to_string()
        } else if let Some(prefix) = self.prefix_for_namespace(namespace_id) {
            prefix
        } else {
            let prefix = if !preferred.is_empty() && !self.declared_here(preferred) {
                preferred.to_string()
            } else {
                self.generate_prefix()
            };
            self.declare(&prefix, namespace_id);
            prefix
        };
        format!("{}:{}", prefix, local)
    }

    // a non-empty prefix in scope for this namespace
    fn prefix_for_namespace(&self, namespace_id: NamespaceId) -> Option<String> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.declarations.iter().rev())
            .filter(|(prefix, ns)| !prefix.is_empty() && *ns == namespace_id)
            .map(|(prefix, _)| prefix)
            .find(|prefix| self.is_bound(prefix, namespace_id))
            .cloned()
    }

    fn declared_here(&self, prefix: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.declarations.iter().any(|(p, _)| p == prefix))
            .unwrap_or(false)
    }

    fn generate_prefix(&self) -> String {
        (0..)
            .map(|i| format!("ns{}", i))
            .find(|prefix| self.lookup(prefix).is_none())
            .unwrap_or_default()
    }

    fn declare(&mut self, prefix: &str, namespace_id: NamespaceId) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        match scope.declarations.iter_mut().find(|(p, _)| p == prefix) {
            Some(declaration) => declaration.1 = namespace_id,
            None => scope.declarations.push((prefix.to_string(), namespace_id)),
        }
    }
}
