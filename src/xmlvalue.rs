use crate::error::Error;
use crate::name::{NameId, NamespaceId, PrefixId};

/// The type of the XML node.
///
/// Access it using [`Value::value_type`] or
/// [`Dom::value_type`](crate::Dom::value_type).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// Document node. It holds the document element as well as any
    /// comments and processing instructions outside of it.
    Document,
    /// Element; it has a name, attributes and namespace declarations.
    Element,
    /// Text.
    Text,
    /// Processing instruction.
    ProcessingInstruction,
    /// Comment.
    Comment,
}

/// An XML value.
///
/// Access it using [`Dom::value`](crate::Dom::value) or
/// mutably using [`Dom::value_mut`](crate::Dom::value_mut).
#[derive(Debug, Clone)]
pub enum Value {
    /// Document node, with what the prolog declared.
    Document(DocumentInfo),
    /// Element.
    Element(Element),
    /// Text.
    Text(Text),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
    /// Comment.
    Comment(Comment),
}

impl Value {
    /// Returns the type of the XML value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Document(_) => ValueType::Document,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }
}

/// What the prolog of a document declared.
///
/// A document built in memory starts out with nothing declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub(crate) xml_version: Option<String>,
    pub(crate) xml_encoding: Option<String>,
    pub(crate) xml_standalone: Option<bool>,
    pub(crate) doctype: Option<DocumentType>,
}

impl DocumentInfo {
    /// The `version` of the XML declaration, if there was one.
    pub fn xml_version(&self) -> Option<&str> {
        self.xml_version.as_deref()
    }

    /// The `encoding` of the XML declaration, if there was one.
    ///
    /// This is the label as written in the document, not the encoding
    /// actually used to decode it.
    pub fn xml_encoding(&self) -> Option<&str> {
        self.xml_encoding.as_deref()
    }

    /// The `standalone` flag of the XML declaration.
    pub fn xml_standalone(&self) -> Option<bool> {
        self.xml_standalone
    }

    /// The document type declaration.
    pub fn doctype(&self) -> Option<&DocumentType> {
        self.doctype.as_ref()
    }

    /// Set or clear the declared encoding.
    pub fn set_xml_encoding<S: Into<String>>(&mut self, encoding: Option<S>) {
        self.xml_encoding = encoding.map(Into::into);
    }

    /// Set or clear the declared standalone flag.
    pub fn set_xml_standalone(&mut self, standalone: Option<bool>) {
        self.xml_standalone = standalone;
    }

    /// Set or clear the document type declaration.
    pub fn set_doctype(&mut self, doctype: Option<DocumentType>) {
        self.doctype = doctype;
    }
}

/// A document type declaration: `<!DOCTYPE name PUBLIC "public" "system">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub(crate) name: String,
    pub(crate) public_id: Option<String>,
    pub(crate) system_id: Option<String>,
}

impl DocumentType {
    /// Create a document type declaration.
    pub fn new<S: Into<String>>(name: S, public_id: Option<S>, system_id: Option<S>) -> Self {
        DocumentType {
            name: name.into(),
            public_id: public_id.map(Into::into),
            system_id: system_id.map(Into::into),
        }
    }

    /// The declared root element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The public identifier.
    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    /// The system identifier.
    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }
}

/// An attribute of an element.
///
/// The prefix is the one the attribute was written with; it's only used to
/// produce the node name and to prefer that prefix when serializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name_id: NameId,
    pub(crate) prefix_id: PrefixId,
    pub(crate) value: String,
}

impl Attribute {
    /// The name of the attribute.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The prefix the attribute was written with.
    pub fn prefix(&self) -> PrefixId {
        self.prefix_id
    }

    /// The attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// XML element value.
///
/// Example: `<foo/>` or `<x:foo xmlns:x="http://example.com" bar="baz"/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name_id: NameId,
    pub(crate) prefix_id: PrefixId,
    pub(crate) prefixes: Vec<(PrefixId, NamespaceId)>,
    pub(crate) attributes: Vec<Attribute>,
}

impl Element {
    pub(crate) fn new(name_id: NameId, prefix_id: PrefixId) -> Self {
        Element {
            name_id,
            prefix_id,
            prefixes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// The name of the element.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The prefix the element was written with; the empty prefix for
    /// unprefixed names.
    pub fn prefix(&self) -> PrefixId {
        self.prefix_id
    }

    /// The attributes, in document order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get an attribute value by name.
    ///
    /// ```rust
    /// use domutils::{DocumentBuilder, Dom, ParserConfig};
    ///
    /// let mut dom = Dom::new();
    /// let builder = DocumentBuilder::new(ParserConfig::default())?;
    /// let doc = builder.parse_str(&mut dom, r#"<doc a="A"/>"#)?;
    /// let name_a = dom.name("a").unwrap();
    /// let doc_el = dom.document_element(doc).unwrap();
    ///
    /// assert_eq!(dom.element(doc_el).unwrap().get_attribute(name_a), Some("A"));
    /// # Ok::<(), domutils::Error>(())
    /// ```
    pub fn get_attribute(&self, name_id: NameId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name_id == name_id)
            .map(|attribute| attribute.value.as_str())
    }

    /// Set an attribute value. A new attribute goes after the existing ones;
    /// an existing attribute keeps its position and prefix.
    pub fn set_attribute<S: Into<String>>(&mut self, name_id: NameId, value: S) {
        self.set_prefixed_attribute(name_id, None, value)
    }

    pub(crate) fn set_prefixed_attribute<S: Into<String>>(
        &mut self,
        name_id: NameId,
        prefix_id: Option<PrefixId>,
        value: S,
    ) {
        let value = value.into();
        if let Some(attribute) = self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name_id == name_id)
        {
            attribute.value = value;
            if let Some(prefix_id) = prefix_id {
                attribute.prefix_id = prefix_id;
            }
            return;
        }
        self.attributes.push(Attribute {
            name_id,
            // the empty prefix; the serializer picks one if a namespace needs it
            prefix_id: prefix_id.unwrap_or(crate::name::EMPTY_PREFIX),
            value,
        });
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, name_id: NameId) {
        self.attributes
            .retain(|attribute| attribute.name_id != name_id);
    }

    /// Declare a prefix for a namespace on this element.
    pub fn set_prefix(&mut self, prefix_id: PrefixId, namespace_id: NamespaceId) {
        if let Some(entry) = self.prefixes.iter_mut().find(|(p, _)| *p == prefix_id) {
            entry.1 = namespace_id;
        } else {
            self.prefixes.push((prefix_id, namespace_id));
        }
    }

    /// Remove a namespace declaration.
    pub fn remove_prefix(&mut self, prefix_id: PrefixId) {
        self.prefixes.retain(|(p, _)| *p != prefix_id);
    }

    /// The namespace declared for a prefix on this element.
    ///
    /// This does not look at ancestors; see
    /// [`Dom::namespace_for_prefix`](crate::Dom::namespace_for_prefix).
    pub fn get_namespace(&self, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.prefixes
            .iter()
            .find(|(p, _)| *p == prefix_id)
            .map(|(_, ns)| *ns)
    }

    /// The namespace declarations made on this element.
    pub fn prefixes(&self) -> &[(PrefixId, NamespaceId)] {
        &self.prefixes
    }
}

/// XML text value.
///
/// Example: `Bar` in `<foo>Bar</foo>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    /// Get the text value.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Set the text value.
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }
}

/// XML comment.
///
/// Example: `<!-- foo -->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Set the comment text.
    ///
    /// Rejects comments that contain `--`.
    pub fn set<S: Into<String>>(&mut self, text: S) -> Result<(), Error> {
        let text = text.into();
        if text.contains("--") {
            return Err(Error::InvalidOperation(format!(
                "comment may not contain '--': {:?}",
                text
            )));
        }
        self.text = text;
        Ok(())
    }
}

/// XML processing instruction value.
///
/// Example: `<?foo?>` or `<?foo bar?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }

    /// Get processing instruction target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get processing instruction data.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Set data. Empty data is the same as no data.
    pub fn set_data<S: Into<String>>(&mut self, data: Option<S>) {
        self.data = data.map(Into::into).filter(|data| !data.is_empty());
    }
}
