use crate::dom::{Dom, Node};
use crate::name::{Name, NameId, NamespaceId, PrefixId, EMPTY_PREFIX, NO_NAMESPACE};
use crate::xmlvalue::Value;

/// Creation and lookup of names, namespaces and prefixes.
impl Dom {
    /// Look up name without a namespace.
    pub fn name(&self, name: &str) -> Option<NameId> {
        self.name_ns(name, NO_NAMESPACE)
    }

    /// Add name without a namespace.
    /// If the name already exists, return its id.
    pub fn add_name(&mut self, name: &str) -> NameId {
        self.add_name_ns(name, NO_NAMESPACE)
    }

    /// Look up name with a namespace.
    pub fn name_ns(&self, name: &str, namespace_id: NamespaceId) -> Option<NameId> {
        self.name_lookup.get_id(&Name::new(name, namespace_id))
    }

    /// Add name with a namespace.
    /// If the name already exists, return its id.
    pub fn add_name_ns(&mut self, name: &str, namespace_id: NamespaceId) -> NameId {
        self.name_lookup.get_id_mut(Name::new(name, namespace_id))
    }

    /// Look up namespace.
    pub fn namespace(&self, namespace: &str) -> Option<NamespaceId> {
        self.namespace_lookup.get_id(&namespace.to_string())
    }

    /// Add namespace.
    /// If the namespace already exists, return its id.
    pub fn add_namespace(&mut self, namespace: &str) -> NamespaceId {
        self.namespace_lookup.get_id_mut(namespace.to_string())
    }

    /// Look up prefix.
    pub fn prefix(&self, prefix: &str) -> Option<PrefixId> {
        self.prefix_lookup.get_id(&prefix.to_string())
    }

    /// Add prefix.
    /// If the prefix already exists, return its id.
    pub fn add_prefix(&mut self, prefix: &str) -> PrefixId {
        self.prefix_lookup.get_id_mut(prefix.to_string())
    }

    /// The id of "no namespace". Its URI is the empty string.
    pub fn no_namespace(&self) -> NamespaceId {
        NO_NAMESPACE
    }

    /// The id of the empty prefix, used for unprefixed names and the
    /// default namespace declaration.
    pub fn empty_prefix(&self) -> PrefixId {
        EMPTY_PREFIX
    }

    /// The id of the `http://www.w3.org/XML/1998/namespace` namespace.
    pub fn xml_namespace(&self) -> NamespaceId {
        self.xml_namespace_id
    }

    /// The id of the `xml` prefix.
    pub fn xml_prefix(&self) -> PrefixId {
        self.xml_prefix_id
    }

    /// The id of the `xml:space` attribute name.
    pub fn xml_space_name(&self) -> NameId {
        self.xml_space_name_id
    }

    /// The local name of a name.
    pub fn local_name_str(&self, name_id: NameId) -> &str {
        &self.name_lookup.get_value(name_id).local
    }

    /// The namespace of a name.
    pub fn namespace_for_name(&self, name_id: NameId) -> NamespaceId {
        self.name_lookup.get_value(name_id).namespace_id
    }

    /// The URI of a namespace.
    pub fn namespace_str(&self, namespace_id: NamespaceId) -> &str {
        self.namespace_lookup.get_value(namespace_id)
    }

    /// The string of a prefix; empty for the empty prefix.
    pub fn prefix_str(&self, prefix_id: PrefixId) -> &str {
        self.prefix_lookup.get_value(prefix_id)
    }

    /// Local name and namespace URI of a name.
    pub fn name_ns_str(&self, name_id: NameId) -> (&str, &str) {
        let name = self.name_lookup.get_value(name_id);
        (&name.local, self.namespace_str(name.namespace_id))
    }

    /// Find the namespace bound to a prefix at this node, looking at the
    /// declarations of the node and its ancestors.
    ///
    /// The `xml` prefix is always bound. The empty prefix resolves to no
    /// namespace when no default namespace is declared.
    pub fn namespace_for_prefix(&self, node: Node, prefix_id: PrefixId) -> Option<NamespaceId> {
        if prefix_id == self.xml_prefix_id {
            return Some(self.xml_namespace_id);
        }
        for ancestor in self.ancestors(node) {
            if let Value::Element(element) = self.value(ancestor) {
                if let Some(namespace_id) = element.get_namespace(prefix_id) {
                    return Some(namespace_id);
                }
            }
        }
        if prefix_id == EMPTY_PREFIX {
            Some(NO_NAMESPACE)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_interned_per_namespace() {
        let mut dom = Dom::new();
        let ns = dom.add_namespace("http://example.com");
        let plain = dom.add_name("a");
        let namespaced = dom.add_name_ns("a", ns);
        assert_ne!(plain, namespaced);
        assert_eq!(dom.add_name("a"), plain);
        assert_eq!(dom.name_ns("a", ns), Some(namespaced));
        assert_eq!(dom.name_ns_str(namespaced), ("a", "http://example.com"));
        assert_eq!(dom.name_ns_str(plain), ("a", ""));
    }

    #[test]
    fn test_builtin_ids() {
        let dom = Dom::new();
        assert_eq!(dom.namespace(""), Some(dom.no_namespace()));
        assert_eq!(dom.prefix(""), Some(dom.empty_prefix()));
        assert_eq!(dom.prefix("xml"), Some(dom.xml_prefix()));
        assert_eq!(
            dom.namespace_str(dom.xml_namespace()),
            "http://www.w3.org/XML/1998/namespace"
        );
        assert_eq!(dom.local_name_str(dom.xml_space_name()), "space");
    }

    #[test]
    fn test_unknown_lookups() {
        let dom = Dom::new();
        assert_eq!(dom.name("missing"), None);
        assert_eq!(dom.namespace("http://example.com/missing"), None);
        assert_eq!(dom.prefix("missing"), None);
    }
}
