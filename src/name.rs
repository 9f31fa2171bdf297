use crate::idmap::{IdIndex, IdMap};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Ord, PartialOrd)]
        pub struct $name(u32);

        impl IdIndex for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                $name(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_type!(
    /// Id of an interned name: a local name in a namespace.
    NameId
);
id_type!(
    /// Id of an interned namespace URI.
    NamespaceId
);
id_type!(
    /// Id of an interned namespace prefix.
    PrefixId
);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct Name {
    pub(crate) local: String,
    pub(crate) namespace_id: NamespaceId,
}

impl Name {
    pub(crate) fn new(local: &str, namespace_id: NamespaceId) -> Self {
        Name {
            local: local.to_string(),
            namespace_id,
        }
    }
}

pub(crate) type NameLookup = IdMap<NameId, Name>;
pub(crate) type NamespaceLookup = IdMap<NamespaceId, String>;
pub(crate) type PrefixLookup = IdMap<PrefixId, String>;

// Dom::new interns these first, so their ids are fixed.
pub(crate) const NO_NAMESPACE: NamespaceId = NamespaceId(0);
pub(crate) const EMPTY_PREFIX: PrefixId = PrefixId(0);
