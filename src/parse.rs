use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xmlparser::{ElementEnd, EntityDefinition, ExternalId, StrSpan, Token, Tokenizer};

use crate::dom::{Dom, Node};
use crate::encoding::decode;
use crate::entity::{decode_attribute, decode_text, normalize_newlines, Entities};
use crate::error::{Error, ParseError};
use crate::name::{NameId, NamespaceId, PrefixId, EMPTY_PREFIX, NO_NAMESPACE};
use crate::xmlvalue::{Attribute, DocumentType, Element, Value};

/// Parser settings.
///
/// ```rust
/// use domutils::ParserConfig;
///
/// let config: ParserConfig = serde_json::from_str(r#"{"strip-whitespace": true}"#).unwrap();
/// assert!(config.strip_whitespace);
/// assert!(!config.validating);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserConfig {
    /// Validate against the DTD. There is no validating parser, so a
    /// builder asked for one fails to construct.
    pub validating: bool,
    /// Drop text nodes that consist only of whitespace.
    pub strip_whitespace: bool,
    /// How many entity references a document may expand, counting the
    /// references inside entity values each time they are used.
    pub entity_expansion_limit: usize,
    /// How many bytes of entity replacement text a document may produce.
    pub entity_size_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            validating: false,
            strip_whitespace: false,
            entity_expansion_limit: 64_000,
            entity_size_limit: 50_000_000,
        }
    }
}

/// A non-validating XML parser producing documents in a [`Dom`].
///
/// Documents are parsed as a whole; the DTD's internal subset is read for
/// entity declarations, and external subsets are never fetched.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    config: ParserConfig,
}

impl DocumentBuilder {
    /// Create a builder.
    ///
    /// Fails with [`Error::Configuration`] when the configuration asks for
    /// something this parser can't do.
    pub fn new(config: ParserConfig) -> Result<Self, Error> {
        if config.validating {
            return Err(Error::Configuration(
                "validating document builders are not supported".to_string(),
            ));
        }
        Ok(DocumentBuilder { config })
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Create a new, empty document.
    pub fn new_document(&self, dom: &mut Dom) -> Node {
        dom.new_document()
    }

    /// Parse a document from a reader, consuming it to the end.
    pub fn parse_reader<R: Read>(&self, dom: &mut Dom, mut reader: R) -> Result<Node, Error> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse_bytes(dom, &data)
    }

    /// Parse a document from bytes. The encoding is detected from the
    /// byte order mark or the XML declaration; UTF-8 otherwise.
    pub fn parse_bytes(&self, dom: &mut Dom, data: &[u8]) -> Result<Node, Error> {
        let xml = decode(data)?;
        self.parse_str(dom, &xml)
    }

    /// Parse a document from text.
    ///
    /// ```rust
    /// use domutils::{DocumentBuilder, Dom};
    ///
    /// let mut dom = Dom::new();
    /// let builder = DocumentBuilder::default();
    /// let doc = builder.parse_str(&mut dom, "<doc><a>1</a></doc>")?;
    /// let doc_el = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.children(doc_el).count(), 1);
    /// # Ok::<(), domutils::Error>(())
    /// ```
    pub fn parse_str(&self, dom: &mut Dom, xml: &str) -> Result<Node, Error> {
        let document = dom.new_document();
        let result = TreeBuilder::new(dom, document, &self.config).build(xml);
        if let Err(e) = result {
            // don't leave a half-built document behind
            document.get().remove_subtree(dom.arena_mut());
            return Err(e);
        }
        debug!(nodes = dom.descendants(document).count(), "parsed document");
        Ok(document)
    }
}

impl Dom {
    /// Parse a string with the default parser settings.
    ///
    /// ```rust
    /// let mut dom = domutils::Dom::new();
    /// let doc = dom.parse("<p>Example</p>")?;
    /// assert!(dom.is_document(doc));
    /// # Ok::<(), domutils::Error>(())
    /// ```
    pub fn parse(&mut self, xml: &str) -> Result<Node, Error> {
        DocumentBuilder::default().parse_str(self, xml)
    }
}

struct OpenElement<'x> {
    node: Node,
    prefix: StrSpan<'x>,
    local: StrSpan<'x>,
}

struct PendingElement<'x> {
    prefix: StrSpan<'x>,
    local: StrSpan<'x>,
    declarations: Vec<(&'x str, String)>,
    attributes: Vec<(StrSpan<'x>, StrSpan<'x>, String)>,
}

struct TreeBuilder<'a, 'x> {
    dom: &'a mut Dom,
    config: &'a ParserConfig,
    document: Node,
    open: Vec<OpenElement<'x>>,
    scopes: Vec<Vec<(PrefixId, NamespaceId)>>,
    pending: Option<PendingElement<'x>>,
    entities: Entities,
    seen_element: bool,
}

impl<'a, 'x> TreeBuilder<'a, 'x> {
    fn new(dom: &'a mut Dom, document: Node, config: &'a ParserConfig) -> Self {
        TreeBuilder {
            dom,
            config,
            document,
            open: Vec::new(),
            scopes: Vec::new(),
            pending: None,
            entities: Entities::new(
                config.entity_expansion_limit,
                config.entity_size_limit,
            ),
            seen_element: false,
        }
    }

    fn build(mut self, xml: &'x str) -> Result<(), Error> {
        for token in Tokenizer::from(xml) {
            self.token(token.map_err(ParseError::from)?)?;
        }
        if let Some(open) = self.open.last() {
            return Err(ParseError::UnclosedTag(qualified(open.prefix, open.local)).into());
        }
        if !self.seen_element {
            return Err(ParseError::NoDocumentElement.into());
        }
        Ok(())
    }

    fn current(&self) -> Node {
        self.open
            .last()
            .map(|open| open.node)
            .unwrap_or(self.document)
    }

    fn token(&mut self, token: Token<'x>) -> Result<(), Error> {
        match token {
            Token::Declaration {
                version,
                encoding,
                standalone,
                ..
            } => {
                if version.as_str() != "1.0" {
                    return Err(ParseError::UnsupportedVersion(version.to_string()).into());
                }
                let document = self.document;
                if let Some(info) = self.dom.document_info_mut(document) {
                    info.xml_version = Some(version.to_string());
                    info.xml_encoding = encoding.map(|e| e.to_string());
                    info.xml_standalone = standalone;
                }
            }
            Token::ProcessingInstruction {
                target, content, ..
            } => {
                let current = self.current();
                self.dom.append_processing_instruction(
                    current,
                    target.as_str(),
                    content.map(|c| c.as_str()),
                )?;
            }
            Token::Comment { text, .. } => {
                let current = self.current();
                self.dom.append_comment(current, text.as_str())?;
            }
            Token::DtdStart {
                name, external_id, ..
            }
            | Token::EmptyDtd {
                name, external_id, ..
            } => {
                let (public_id, system_id) = match external_id {
                    Some(ExternalId::System(system)) => (None, Some(system.as_str())),
                    Some(ExternalId::Public(public, system)) => {
                        (Some(public.as_str()), Some(system.as_str()))
                    }
                    None => (None, None),
                };
                let document = self.document;
                if let Some(info) = self.dom.document_info_mut(document) {
                    info.doctype = Some(DocumentType::new(name.as_str(), public_id, system_id));
                }
            }
            Token::EntityDeclaration {
                name,
                definition,
                span,
            } => {
                if is_parameter_entity(span.as_str()) {
                    return Ok(());
                }
                // external entities are never fetched
                if let EntityDefinition::EntityValue(value) = definition {
                    self.entities.declare(name.as_str(), value.as_str())?;
                }
            }
            Token::DtdEnd { .. } => {}
            Token::ElementStart { prefix, local, .. } => {
                self.pending = Some(PendingElement {
                    prefix,
                    local,
                    declarations: Vec::new(),
                    attributes: Vec::new(),
                });
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                let value = decode_attribute(value.as_str(), &mut self.entities)?.into_owned();
                if let Some(pending) = self.pending.as_mut() {
                    if prefix.as_str() == "xmlns" {
                        pending.declarations.push((local.as_str(), value));
                    } else if prefix.as_str().is_empty() && local.as_str() == "xmlns" {
                        pending.declarations.push(("", value));
                    } else {
                        pending.attributes.push((prefix, local, value));
                    }
                }
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => {
                    self.open_element()?;
                }
                ElementEnd::Empty => {
                    self.open_element()?;
                    self.close_element();
                }
                ElementEnd::Close(prefix, local) => {
                    let open = self
                        .open
                        .last()
                        .ok_or_else(|| ParseError::UnclosedTag(qualified(prefix, local)))?;
                    if open.prefix.as_str() != prefix.as_str()
                        || open.local.as_str() != local.as_str()
                    {
                        return Err(ParseError::InvalidCloseTag {
                            expected: qualified(open.prefix, open.local),
                            found: qualified(prefix, local),
                            position: if prefix.as_str().is_empty() {
                                local.start()
                            } else {
                                prefix.start()
                            },
                        }
                        .into());
                    }
                    self.close_element();
                }
            },
            Token::Text { text } => {
                if self.open.is_empty() {
                    if text.as_str().chars().all(|c| c.is_ascii_whitespace()) {
                        return Ok(());
                    }
                    return Err(ParseError::TextOutsideElement(text.start()).into());
                }
                let text = decode_text(text.as_str(), &mut self.entities)?;
                self.add_text(&text)?;
            }
            Token::Cdata { text, .. } => {
                let text = normalize_newlines(text.as_str());
                self.add_text(&text)?;
            }
        }
        Ok(())
    }

    fn add_text(&mut self, text: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        if self.config.strip_whitespace && text.chars().all(|c| c.is_ascii_whitespace()) {
            return Ok(());
        }
        let current = self.current();
        self.dom.append_text(current, text)
    }

    fn open_element(&mut self) -> Result<(), Error> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let mut scope = Vec::with_capacity(pending.declarations.len());
        for (prefix, uri) in &pending.declarations {
            let prefix_id = self.dom.add_prefix(prefix);
            let namespace_id = self.dom.add_namespace(uri);
            scope.push((prefix_id, namespace_id));
        }
        self.scopes.push(scope.clone());

        let (name_id, prefix_id) = self.resolve(pending.prefix, pending.local, true)?;
        let mut element = Element::new(name_id, prefix_id);
        element.prefixes = scope;
        for (prefix, local, value) in pending.attributes {
            let (name_id, prefix_id) = self.resolve(prefix, local, false)?;
            if element.get_attribute(name_id).is_some() {
                return Err(ParseError::DuplicateAttribute {
                    name: qualified(prefix, local),
                    position: if prefix.as_str().is_empty() {
                        local.start()
                    } else {
                        prefix.start()
                    },
                }
                .into());
            }
            element.attributes.push(Attribute {
                name_id,
                prefix_id,
                value,
            });
        }

        let node = self.dom.new_node(Value::Element(element));
        let current = self.current();
        self.dom.append(current, node)?;
        self.seen_element = true;
        self.open.push(OpenElement {
            node,
            prefix: pending.prefix,
            local: pending.local,
        });
        Ok(())
    }

    fn close_element(&mut self) {
        self.open.pop();
        self.scopes.pop();
    }

    /// Resolve a name as written to a name id. Unprefixed attributes are in
    /// no namespace; unprefixed elements are in the default namespace.
    fn resolve(
        &mut self,
        prefix: StrSpan<'x>,
        local: StrSpan<'x>,
        is_element: bool,
    ) -> Result<(NameId, PrefixId), Error> {
        if prefix.as_str().is_empty() {
            let namespace_id = if is_element {
                self.lookup(EMPTY_PREFIX).unwrap_or(NO_NAMESPACE)
            } else {
                NO_NAMESPACE
            };
            return Ok((self.dom.add_name_ns(local.as_str(), namespace_id), EMPTY_PREFIX));
        }
        let prefix_id = self.dom.add_prefix(prefix.as_str());
        let namespace_id = if prefix_id == self.dom.xml_prefix() {
            self.dom.xml_namespace()
        } else {
            self.lookup(prefix_id)
                .ok_or_else(|| ParseError::UnknownPrefix {
                    prefix: prefix.to_string(),
                    position: prefix.start(),
                })?
        };
        Ok((self.dom.add_name_ns(local.as_str(), namespace_id), prefix_id))
    }

    fn lookup(&self, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(p, _)| *p == prefix_id)
            .map(|(_, namespace_id)| *namespace_id)
    }
}

// the tokenizer reports `<!ENTITY % name ...>` like a general entity
fn is_parameter_entity(declaration: &str) -> bool {
    declaration
        .strip_prefix("<!ENTITY")
        .is_some_and(|rest| rest.trim_start().starts_with('%'))
}

fn qualified(prefix: StrSpan, local: StrSpan) -> String {
    if prefix.as_str().is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix.as_str(), local.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<(Dom, Node), Error> {
        let mut dom = Dom::new();
        let doc = dom.parse(xml)?;
        Ok((dom, doc))
    }

    #[test]
    fn test_parse_namespaces() {
        let (dom, doc) = parse(
            r#"<doc xmlns="urn:default" xmlns:x="urn:x"><x:a x:b="1" c="2"/><d/></doc>"#,
        )
        .unwrap();
        let doc_el = dom.document_element(doc).unwrap();
        let a = dom.first_child(doc_el).unwrap();
        let d = dom.next_sibling(a).unwrap();
        let x = dom.namespace("urn:x").unwrap();
        let default = dom.namespace("urn:default").unwrap();

        let a_el = dom.element(a).unwrap();
        assert_eq!(dom.namespace_for_name(a_el.name()), x);
        assert_eq!(dom.node_name(a), "x:a");
        let b = dom.name_ns("b", x).unwrap();
        let c = dom.name("c").unwrap();
        assert_eq!(a_el.get_attribute(b), Some("1"));
        assert_eq!(a_el.get_attribute(c), Some("2"));

        let d_el = dom.element(d).unwrap();
        assert_eq!(dom.namespace_for_name(d_el.name()), default);
        assert_eq!(dom.namespace_for_prefix(d, dom.empty_prefix()), Some(default));
    }

    #[test]
    fn test_parse_xml_prefix_is_predeclared() {
        let (dom, doc) = parse(r#"<doc xml:lang="en"/>"#).unwrap();
        let doc_el = dom.document_element(doc).unwrap();
        let lang = dom.name_ns("lang", dom.xml_namespace()).unwrap();
        assert_eq!(dom.element(doc_el).unwrap().get_attribute(lang), Some("en"));
    }

    #[test]
    fn test_parse_entities_and_cdata() {
        let (dom, doc) = parse("<doc>a &amp; b<![CDATA[ <c> ]]>&#x21;</doc>").unwrap();
        let doc_el = dom.document_element(doc).unwrap();
        let children = dom.children(doc_el).collect::<Vec<_>>();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_str(children[0]), Some("a & b <c> !"));
    }

    #[test]
    fn test_parse_doctype() {
        let (dom, doc) = parse(
            r#"<!DOCTYPE note PUBLIC "-//Example//DTD Note//EN" "note.dtd"><note/>"#,
        )
        .unwrap();
        let doctype = dom.doctype(doc).unwrap();
        assert_eq!(doctype.name(), "note");
        assert_eq!(doctype.public_id(), Some("-//Example//DTD Note//EN"));
        assert_eq!(doctype.system_id(), Some("note.dtd"));
    }

    #[test]
    fn test_is_parameter_entity() {
        assert!(is_parameter_entity(r#"<!ENTITY % p "v">"#));
        assert!(is_parameter_entity("<!ENTITY\n  %  p SYSTEM \"p.ent\">"));
        assert!(!is_parameter_entity(r#"<!ENTITY p "100%">"#));
    }

    #[test]
    fn test_parse_internal_entity() {
        let (dom, doc) = parse(
            r#"<!DOCTYPE note [<!ENTITY who "World">]><note greeting="Hello &who;">Hi &who;</note>"#,
        )
        .unwrap();
        let note = dom.document_element(doc).unwrap();
        let greeting = dom.name("greeting").unwrap();
        assert_eq!(
            dom.element(note).unwrap().get_attribute(greeting),
            Some("Hello World")
        );
        assert_eq!(dom.text_str(dom.first_child(note).unwrap()), Some("Hi World"));
        let doctype = dom.doctype(doc).unwrap();
        assert_eq!(doctype.system_id(), None);
    }

    #[test]
    fn test_parse_top_level_comments() {
        let (dom, doc) = parse("<!--before--><doc/>\n<?after?>").unwrap();
        let names = dom
            .children(doc)
            .map(|n| dom.node_name(n))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["#comment", "doc", "after"]);
    }

    #[test]
    fn test_strip_whitespace() {
        let mut dom = Dom::new();
        let builder = DocumentBuilder::new(ParserConfig {
            strip_whitespace: true,
            ..Default::default()
        })
        .unwrap();
        let doc = builder
            .parse_str(&mut dom, "<doc>\n  <a> x </a>\n</doc>")
            .unwrap();
        let doc_el = dom.document_element(doc).unwrap();
        let a = dom.first_child(doc_el).unwrap();
        assert_eq!(dom.children(doc_el).count(), 1);
        assert_eq!(dom.text_str(dom.first_child(a).unwrap()), Some(" x "));
    }

    #[test]
    fn test_validating_builder_is_a_configuration_error() {
        let err = DocumentBuilder::new(ParserConfig {
            validating: true,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_failed_parse_leaves_no_document() {
        let mut dom = Dom::new();
        assert!(dom.parse("<doc><a></doc>").is_err());
        let doc = dom.parse("<ok/>").unwrap();
        assert_eq!(dom.descendants(doc).count(), 2);
    }

    #[test]
    fn test_parse_reader() {
        let mut dom = Dom::new();
        let input: &[u8] = b"<doc>caf\xc3\xa9</doc>";
        let doc = DocumentBuilder::default()
            .parse_reader(&mut dom, input)
            .unwrap();
        let doc_el = dom.document_element(doc).unwrap();
        assert_eq!(dom.text_str(dom.first_child(doc_el).unwrap()), Some("caf\u{e9}"));
    }
}
