use std::hash::Hash;

use ahash::HashMap;

pub(crate) trait IdIndex: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Interning table: every distinct value gets a stable, dense id.
pub(crate) struct IdMap<K: IdIndex, V: Eq + Hash + Clone> {
    by_id: Vec<V>,
    by_value: HashMap<V, K>,
}

impl<K: IdIndex, V: Eq + Hash + Clone> IdMap<K, V> {
    pub(crate) fn new() -> Self {
        IdMap {
            by_id: Vec::new(),
            by_value: HashMap::default(),
        }
    }

    pub(crate) fn get_id_mut(&mut self, value: V) -> K {
        if let Some(id) = self.by_value.get(&value) {
            return *id;
        }
        let id = K::from_index(self.by_id.len());
        self.by_value.insert(value.clone(), id);
        self.by_id.push(value);
        id
    }

    pub(crate) fn get_id(&self, value: &V) -> Option<K> {
        self.by_value.get(value).copied()
    }

    #[inline]
    pub(crate) fn get_value(&self, id: K) -> &V {
        &self.by_id[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    struct Id(u32);

    impl IdIndex for Id {
        fn from_index(index: usize) -> Id {
            Id(index as u32)
        }

        fn index(self) -> usize {
            self.0 as usize
        }
    }

    #[test]
    fn test_same_value_same_id() {
        let mut map = IdMap::<Id, String>::new();
        let id1 = map.get_id_mut("foo".to_string());
        let id2 = map.get_id_mut("bar".to_string());
        let id3 = map.get_id_mut("foo".to_string());
        assert_eq!(id1, id3);
        assert_ne!(id1, id2);
        assert_eq!(map.get_value(id1), "foo");
        assert_eq!(map.get_value(id2), "bar");
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let mut map = IdMap::<Id, String>::new();
        assert_eq!(map.get_id(&"foo".to_string()), None);
        let id = map.get_id_mut("foo".to_string());
        assert_eq!(map.get_id(&"foo".to_string()), Some(id));
        assert_eq!(map.get_id(&"bar".to_string()), None);
    }
}
