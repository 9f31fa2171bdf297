use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::dom::{Dom, Node};
use crate::encoding::OutputEncoding;
use crate::error::Error;

use super::properties::{Method, OutputProperties};
use super::serializer::gen_outputs;
use super::xml_serializer::XmlSerializer;

/// Serializes a node, and everything below it, according to a set of
/// [`OutputProperties`].
///
/// ```rust
/// use domutils::{Dom, Transformer};
///
/// let mut dom = Dom::new();
/// let doc = dom.parse("<doc><a>1</a></doc>")?;
/// let mut transformer = Transformer::new();
/// transformer.set_omit_xml_declaration(true);
/// assert_eq!(transformer.transform_to_string(&dom, doc)?, "<doc><a>1</a></doc>");
/// # Ok::<(), domutils::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    properties: OutputProperties,
}

impl Transformer {
    /// A transformer with default output properties: XML, UTF-8, with an
    /// XML declaration and without indentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transformer with the given output properties.
    pub fn with_properties(properties: OutputProperties) -> Self {
        Transformer { properties }
    }

    /// A transformer with output properties read from an output format
    /// file.
    pub fn from_output_format(path: &Path) -> Result<Self, Error> {
        let properties = OutputProperties::from_file(path)?;
        debug!(path = %path.display(), ?properties, "loaded output format");
        Ok(Transformer { properties })
    }

    /// The current output properties.
    pub fn properties(&self) -> &OutputProperties {
        &self.properties
    }

    /// Set the output method.
    pub fn set_method(&mut self, method: Method) {
        self.properties.method = method;
    }

    pub fn set_indent(&mut self, indent: bool) {
        self.properties.indent = indent;
    }

    pub fn set_omit_xml_declaration(&mut self, omit: bool) {
        self.properties.omit_xml_declaration = omit;
    }

    /// Set the output encoding by label, like `UTF-8` or `ISO-8859-1`.
    pub fn set_encoding<S: Into<String>>(&mut self, encoding: S) {
        self.properties.encoding = encoding.into();
    }

    pub fn set_standalone(&mut self, standalone: Option<bool>) {
        self.properties.standalone = standalone;
    }

    pub fn set_doctype_public<S: Into<String>>(&mut self, public_id: Option<S>) {
        self.properties.doctype_public = public_id.map(Into::into);
    }

    pub fn set_doctype_system<S: Into<String>>(&mut self, system_id: Option<S>) {
        self.properties.doctype_system = system_id.map(Into::into);
    }

    /// Serialize into a writer, encoded in the output encoding.
    pub fn transform<W: Write>(&self, dom: &Dom, node: Node, w: &mut W) -> Result<(), Error> {
        let encoding = OutputEncoding::for_label(&self.properties.encoding)?;
        let text = self.render(dom, node, &encoding)?;
        w.write_all(&encoding.encode(&text))?;
        Ok(())
    }

    /// Serialize into a string.
    ///
    /// The output encoding still matters: the declaration names it, and
    /// characters it can't represent are written as character references.
    pub fn transform_to_string(&self, dom: &Dom, node: Node) -> Result<String, Error> {
        let encoding = OutputEncoding::for_label(&self.properties.encoding)?;
        self.render(dom, node, &encoding)
    }

    fn render(&self, dom: &Dom, node: Node, encoding: &OutputEncoding) -> Result<String, Error> {
        let properties = &self.properties;
        debug!(
            method = ?properties.method,
            encoding = encoding.label(),
            indent = properties.indent,
            "serializing"
        );
        if properties.method == Method::Text {
            return Ok(dom
                .descendants(node)
                .filter_map(|n| dom.text_str(n))
                .collect());
        }

        let mut buf = Vec::new();
        if !properties.omit_xml_declaration {
            self.write_declaration(&mut buf, encoding)?;
        }
        self.write_doctype(&mut buf, dom, node)?;

        let mut serializer = XmlSerializer::new(dom, encoding);
        let outputs = gen_outputs(dom, node);
        if properties.indent {
            serializer.serialize_pretty(&mut buf, outputs)?;
        } else {
            serializer.serialize(&mut buf, outputs)?;
        }
        String::from_utf8(buf).map_err(|e| Error::Transform(e.to_string()))
    }

    fn write_declaration<W: Write>(&self, w: &mut W, encoding: &OutputEncoding) -> io::Result<()> {
        write!(w, "<?xml version=\"1.0\" encoding=\"{}\"", encoding.label())?;
        match self.properties.standalone {
            Some(true) => write!(w, " standalone=\"yes\"")?,
            Some(false) => write!(w, " standalone=\"no\"")?,
            None => {}
        }
        write!(w, "?>")?;
        if self.properties.indent {
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_doctype<W: Write>(&self, w: &mut W, dom: &Dom, node: Node) -> io::Result<()> {
        let properties = &self.properties;
        let Some(system_id) = &properties.doctype_system else {
            if let Some(public_id) = &properties.doctype_public {
                warn!(%public_id, "doctype-public without doctype-system; no DOCTYPE written");
            }
            return Ok(());
        };
        let Some(root) = dom.first_element(node) else {
            warn!(%system_id, "nothing to name the DOCTYPE after; no DOCTYPE written");
            return Ok(());
        };
        let root_name = dom.node_name(root);
        match &properties.doctype_public {
            Some(public_id) => write!(
                w,
                "<!DOCTYPE {} PUBLIC {} {}>",
                root_name,
                quote(public_id),
                quote(system_id)
            )?,
            None => write!(w, "<!DOCTYPE {} SYSTEM {}>", root_name, quote(system_id))?,
        }
        if properties.indent {
            writeln!(w)?;
        }
        Ok(())
    }
}

// a literal can't contain its own quote character
fn quote(literal: &str) -> String {
    if literal.contains('"') {
        format!("'{}'", literal)
    } else {
        format!("\"{}\"", literal)
    }
}
