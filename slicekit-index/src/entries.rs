use slicekit_types::EntityKey;
use std::collections::HashMap;
use std::collections::hash_map::Values;

/// Unique-key map holding the live entities of an index or slice.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone)]
pub struct Entries<E> {
    map: HashMap<EntityKey, E>,
}

impl<E> Default for Entries<E> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<E> Entries<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&E> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn values(&self) -> Values<'_, EntityKey, E> {
        self.map.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.map.keys()
    }

    /// Inserts or replaces, returning the previous value.
    pub(crate) fn insert(&mut self, key: EntityKey, entity: E) -> Option<E> {
        self.map.insert(key, entity)
    }

    pub(crate) fn remove(&mut self, key: &EntityKey) -> Option<E> {
        self.map.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

impl<E: Clone> Entries<E> {
    /// Cloned values, in iteration order.
    pub fn to_vec(&self) -> Vec<E> {
        self.map.values().cloned().collect()
    }
}
