use std::fmt;

use serde::{Deserialize, Serialize};

/// A namespace URI and local name pair.
///
/// Both parts are empty strings when there is nothing to name; a name in
/// no namespace has an empty namespace URI.
///
/// It displays in Clark notation, `{namespace}local`, or just `local` when
/// the name is in no namespace.
///
/// ```rust
/// use domutils::QualifiedName;
///
/// let name = QualifiedName::new("http://example.com", "doc");
/// assert_eq!(name.to_string(), "{http://example.com}doc");
/// assert_eq!(QualifiedName::new("", "doc").to_string(), "doc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    namespace_uri: String,
    local_name: String,
}

impl QualifiedName {
    /// Create a qualified name.
    pub fn new<N: Into<String>, L: Into<String>>(namespace_uri: N, local_name: L) -> Self {
        QualifiedName {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
        }
    }

    /// The namespace URI; empty for no namespace.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// The local name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Whether both parts are empty.
    pub fn is_empty(&self) -> bool {
        self.namespace_uri.is_empty() && self.local_name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_uri.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let name = QualifiedName::default();
        assert!(name.is_empty());
        assert_eq!(name.namespace_uri(), "");
        assert_eq!(name.local_name(), "");
        assert_eq!(name.to_string(), "");
    }
}
