use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a tree is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Markup.
    #[default]
    Xml,
    /// Only the text content, without escaping.
    Text,
}

/// Output properties of a [`Transformer`](crate::Transformer).
///
/// These can be loaded from an output format file, a JSON object with
/// kebab-case keys:
///
/// ```json
/// { "method": "xml", "indent": true, "encoding": "ISO-8859-1" }
/// ```
///
/// Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputProperties {
    /// The output method.
    pub method: Method,
    /// Indent nested elements, two spaces per level.
    pub indent: bool,
    /// Leave out the `<?xml ...?>` declaration.
    pub omit_xml_declaration: bool,
    /// Encoding label, written into the declaration.
    pub encoding: String,
    /// The `standalone` flag of the declaration.
    pub standalone: Option<bool>,
    /// Public identifier of the document type declaration.
    pub doctype_public: Option<String>,
    /// System identifier of the document type declaration. No document
    /// type declaration is written without one.
    pub doctype_system: Option<String>,
}

impl Default for OutputProperties {
    fn default() -> Self {
        OutputProperties {
            method: Method::Xml,
            indent: false,
            omit_xml_declaration: false,
            encoding: "UTF-8".to_string(),
            standalone: None,
            doctype_public: None,
            doctype_system: None,
        }
    }
}

impl OutputProperties {
    /// Read output properties from an output format file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::OutputFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}
