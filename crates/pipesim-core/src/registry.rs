use indexmap::IndexMap;
use std::hash::Hash;

/// An entity addressable by a stable key.
pub trait Keyed {
    type Key: Clone + Eq + Hash + std::fmt::Debug;

    fn key(&self) -> &Self::Key;
}

/// Insertion-ordered collection with O(1) lookup by key.
///
/// Iteration order is insertion order, which is what the list endpoints
/// expose. Keys must not be mutated through [`Registry::get_index_mut`] or
/// [`Registry::iter_mut`].
#[derive(Debug, Clone)]
pub struct Registry<V: Keyed> {
    items: IndexMap<V::Key, V>,
}

impl<V: Keyed> Default for Registry<V> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<V: Keyed> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value`. Returns `false` (and keeps the existing item) if the key exists.
    pub fn insert(&mut self, value: V) -> bool {
        if self.items.contains_key(value.key()) {
            return false;
        }
        self.items.insert(value.key().clone(), value);
        true
    }

    pub fn get(&self, key: &V::Key) -> Option<&V> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &V::Key) -> Option<&mut V> {
        self.items.get_mut(key)
    }

    pub fn get_index(&self, index: usize) -> Option<&V> {
        self.items.get_index(index).map(|(_, v)| v)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut V> {
        self.items.get_index_mut(index).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &V::Key) -> bool {
        self.items.contains_key(key)
    }

    /// Remove by key, preserving the order of the remaining items.
    pub fn remove(&mut self, key: &V::Key) -> Option<V> {
        self.items.shift_remove(key)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, V::Key, V> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::ValuesMut<'_, V::Key, V> {
        self.items.values_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<V: Keyed + Clone> Registry<V> {
    /// Owned copy of every item in insertion order.
    pub fn snapshot(&self) -> Vec<V> {
        self.items.values().cloned().collect()
    }
}

impl<V: Keyed> FromIterator<V> for Registry<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut registry = Self::new();
        for value in iter {
            registry.insert(value);
        }
        registry
    }
}

impl<'a, V: Keyed> IntoIterator for &'a Registry<V> {
    type Item = &'a V;
    type IntoIter = indexmap::map::Values<'a, V::Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<V: Keyed> std::ops::Index<usize> for Registry<V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        &self.items[index]
    }
}
