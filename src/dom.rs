use indextree::{Arena, NodeId};

use crate::name::{
    Name, NameId, NameLookup, NamespaceId, NamespaceLookup, PrefixId, PrefixLookup, EMPTY_PREFIX,
    NO_NAMESPACE,
};
use crate::xmlvalue::Value;

pub(crate) type XmlArena = Arena<Value>;

pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in an XML tree.
///
/// This is a lightweight handle into a [`Dom`] and can be copied. It is
/// only meaningful together with the `Dom` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// The `Dom` owns the XML trees of the caller: any number of documents and
/// detached nodes, along with the interned names they use.
///
/// The utility functions in this crate never keep a `Dom` or a [`Node`]
/// beyond a single call.
pub struct Dom {
    pub(crate) arena: XmlArena,
    pub(crate) namespace_lookup: NamespaceLookup,
    pub(crate) prefix_lookup: PrefixLookup,
    pub(crate) name_lookup: NameLookup,
    pub(crate) xml_namespace_id: NamespaceId,
    pub(crate) xml_prefix_id: PrefixId,
    pub(crate) xml_space_name_id: NameId,
}

impl Dom {
    /// Create a new, empty `Dom`.
    pub fn new() -> Self {
        let mut namespace_lookup = NamespaceLookup::new();
        let no_namespace_id = namespace_lookup.get_id_mut(String::new());
        debug_assert_eq!(no_namespace_id, NO_NAMESPACE);
        let xml_namespace_id = namespace_lookup.get_id_mut(XML_NAMESPACE.to_string());
        let mut prefix_lookup = PrefixLookup::new();
        let empty_prefix_id = prefix_lookup.get_id_mut(String::new());
        debug_assert_eq!(empty_prefix_id, EMPTY_PREFIX);
        let xml_prefix_id = prefix_lookup.get_id_mut("xml".to_string());
        let mut name_lookup = NameLookup::new();
        let xml_space_name_id = name_lookup.get_id_mut(Name::new("space", xml_namespace_id));
        Dom {
            arena: XmlArena::new(),
            namespace_lookup,
            prefix_lookup,
            name_lookup,
            xml_namespace_id,
            xml_prefix_id,
            xml_space_name_id,
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &XmlArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut XmlArena {
        &mut self.arena
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
