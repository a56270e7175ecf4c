use compare::Compare;
use std::mem;
use crate::cmp::First;
use crate::tree::{Tree, Vacant};

/// An entry in a map.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub enum Entry<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),
}

impl<'a, K, V, C> Entry<'a, K, V, C> where C: Compare<K> {
    /// Returns the entry's key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.entry(1).key(), &1);
    /// assert_eq!(map.entry(2).key(), &2);
    /// ```
    pub fn key(&self) -> &K {
        match *self {
            Entry::Occupied(ref e) => e.key(),
            Entry::Vacant(ref e) => e.key(),
        }
    }

    /// Returns the entry's value, inserting the given default if the entry is vacant.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    /// Returns the entry's value, inserting the given function's result if the entry is vacant.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V where F: FnOnce() -> V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default()),
        }
    }

    /// Returns the entry's value, inserting `V::default()` if the entry is vacant.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map: rbtree::Map<&str, Vec<u32>> = rbtree::Map::new();
    ///
    /// map.entry("a").or_default().push(1);
    /// map.entry("a").or_default().push(2);
    ///
    /// assert_eq!(map[&"a"], [1, 2]);
    /// ```
    pub fn or_default(self) -> &'a mut V where V: Default {
        self.or_insert_with(V::default)
    }

    /// Modifies the entry's value with the given function if the entry is occupied.
    pub fn and_modify<F>(self, f: F) -> Self where F: FnOnce(&mut V) {
        match self {
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
            Entry::Vacant(e) => Entry::Vacant(e),
        }
    }
}

/// An occupied entry.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub struct OccupiedEntry<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    pub(super) tree: &'a mut Tree<(K, V), C, First>,
    pub(super) index: usize,
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K { &self.tree.value_at(self.index).0 }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &V { &self.tree.value_at(self.index).1 }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut V { &mut self.tree.value_at_mut(self.index).1 }

    /// Returns a mutable reference to the entry's value with the same lifetime as the map.
    pub fn into_mut(self) -> &'a mut V { &mut self.tree.value_at_mut(self.index).1 }

    /// Replaces the entry's value with the given one, returning the previous value.
    pub fn insert(&mut self, value: V) -> V { mem::replace(self.get_mut(), value) }

    /// Removes the entry from the map and returns its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::map::Entry;
    ///
    /// let mut map = rbtree::Map::new();
    /// map.insert(1, "a");
    ///
    /// if let Entry::Occupied(e) = map.entry(1) {
    ///     assert_eq!(e.remove(), "a");
    /// }
    ///
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(self) -> V { self.remove_entry().1 }

    /// Removes the entry from the map and returns its key and value.
    pub fn remove_entry(self) -> (K, V) { self.tree.take_at(self.index) }
}

/// A vacant entry.
///
/// See [`Map::entry`](struct.Map.html#method.entry) for an example.
pub struct VacantEntry<'a, K: 'a, V: 'a, C: 'a> where C: Compare<K> {
    pub(super) tree: &'a mut Tree<(K, V), C, First>,
    pub(super) vacant: Vacant,
    pub(super) key: K,
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C> where C: Compare<K> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K { &self.key }

    /// Returns the entry's key without inserting anything.
    pub fn into_key(self) -> K { self.key }

    /// Inserts the entry into the map with the given value, returning a mutable reference to
    /// the value.
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        let index = tree.insert_at(self.vacant, (self.key, value))
            .unwrap_or_else(|error| error.handle());
        &mut tree.value_at_mut(index).1
    }
}
