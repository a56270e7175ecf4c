use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter::FromIterator;
use std::ops::Bound;
use crate::cmp::First;
use crate::error::AllocError;
use crate::tree::{Cursor, Dir, NodeHandle, RevCursor, Tree};
use super::{cmp_entries, partial_cmp_entries, IntoIter, Iter, IterMut, Keys, Range, Values,
            ValuesMut};

/// An ordered map based on a red-black tree that admits several entries with equal keys.
///
/// Entries with equal keys are kept in insertion order.
///
/// # Examples
///
/// ```
/// let mut map = rbtree::MultiMap::new();
///
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.count(&"b"), 2);
/// assert_eq!(map.get(&"b"), Some(&1));
/// assert_eq!(map.get_all(&"b").map(|e| *e.1).collect::<Vec<_>>(), [1, 3]);
/// ```
#[derive(Clone)]
pub struct MultiMap<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<(K, V), C, First>,
}

impl<K, V> MultiMap<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    pub fn new() -> Self { MultiMap::with_cmp(compare::natural()) }
}

impl<K, V, C> MultiMap<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    pub fn with_cmp(cmp: C) -> Self { MultiMap { tree: Tree::with_cmp(cmp) } }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of entries in the map, counting every duplicate.
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Removes all entries from the map.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Reserves storage for at least `additional` more entries.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.tree.try_reserve(additional)
    }

    /// Inserts an entry after every entry with an equal key and returns its position.
    pub fn insert(&mut self, key: K, value: V) -> Cursor {
        self.tree.multi_insert((key, value)).unwrap_or_else(|error| error.handle())
    }

    /// Checks if the map contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        !self.tree.find(key).is_end()
    }

    /// Returns the number of entries with the given key.
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, K> {
        self.tree.count(key)
    }

    /// Returns a reference to the value of the first entry with the given key, or `None` if the
    /// map does not contain the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.get_key_value(key).map(|e| e.1)
    }

    /// Returns references to the first entry with the given key, or `None` if the map does not
    /// contain the key.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.get_at(self.tree.find_first(key))
    }

    /// Returns a mutable reference to the value of the first entry with the given key, or `None`
    /// if the map does not contain the key.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let cursor = self.tree.find_first(key);
        self.get_at_mut(cursor).map(|e| e.1)
    }

    /// Returns an iterator over every entry with the given key, in insertion order.
    pub fn get_all<Q: ?Sized>(&self, key: &Q) -> Range<'_, K, V> where C: Compare<Q, K> {
        let (first, last) = self.tree.equal_range(key);
        self.range_at(first, last)
    }

    /// Removes every entry with the given key, returning how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::MultiMap::new();
    ///
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// map.insert(1, "c");
    ///
    /// assert_eq!(map.remove(&1), 2);
    /// assert_eq!(map.remove(&1), 0);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize where C: Compare<Q, K> {
        self.tree.erase_key(key)
    }

    /// Removes and returns the first entry with the given key, or returns `None` if the map
    /// does not contain the key.
    pub fn take<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        self.tree.remove(key)
    }

    /// Returns the map's first entry, or `None` if the map is empty.
    pub fn first(&self) -> Option<(&K, &V)> { self.get_at(self.begin()) }

    /// Returns the map's last entry, or `None` if the map is empty.
    pub fn last(&self) -> Option<(&K, &V)> { self.get_at(self.rbegin()) }

    /// Removes the map's first entry and returns it, or returns `None` if the map is empty.
    pub fn remove_first(&mut self) -> Option<(K, V)> { self.tree.pop_first() }

    /// Removes the map's last entry and returns it, or returns `None` if the map is empty.
    pub fn remove_last(&mut self) -> Option<(K, V)> { self.tree.pop_last() }

    /// Returns a cursor at the map's first entry, or the end cursor if the map is empty.
    pub fn begin(&self) -> Cursor { self.tree.begin() }

    /// Returns the end cursor, one step past the map's last entry.
    pub fn end(&self) -> Cursor { self.tree.end() }

    /// Returns a reverse cursor at the map's last entry, or the end cursor if the map is empty.
    pub fn rbegin(&self) -> RevCursor { self.tree.rbegin() }

    /// Returns the reverse end cursor, one step before the map's first entry.
    pub fn rend(&self) -> RevCursor { self.tree.rend() }

    /// Advances a cursor one step in its direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn next<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.next(cursor) }

    /// Moves a cursor one step against its direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn prev<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.prev(cursor) }

    /// Returns a cursor at some entry with the given key, or the end cursor if there is none.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.find(key)
    }

    /// Returns a cursor at the first entry whose key is not less than the given key.
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.lower_bound(key)
    }

    /// Returns a cursor at the first entry whose key is greater than the given key.
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.upper_bound(key)
    }

    /// Returns the span of cursors covering every entry with the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: rbtree::MultiMap<_, _> =
    ///     vec![(1, 'a'), (2, 'b'), (2, 'c'), (2, 'd'), (3, 'e'), (5, 'f')].into_iter().collect();
    ///
    /// let (first, last) = map.equal_range(&2);
    /// assert_eq!(first, map.lower_bound(&2));
    /// assert_eq!(map.get_at(last), Some((&3, &'e')));
    /// assert_eq!(map.range_at(first, last).count(), 3);
    ///
    /// let (first, last) = map.equal_range(&4);
    /// assert_eq!(first, last);
    /// ```
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Cursor, Cursor) where C: Compare<Q, K> {
        self.tree.equal_range(key)
    }

    /// Returns references to the entry at a cursor, or `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn get_at<D>(&self, cursor: Cursor<D>) -> Option<(&K, &V)> {
        self.tree.get(cursor).map(|e| (&e.0, &e.1))
    }

    /// Returns a reference to the key and a mutable reference to the value at a cursor, or
    /// `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn get_at_mut<D>(&mut self, cursor: Cursor<D>) -> Option<(&K, &mut V)> {
        self.tree.get_mapped_mut(cursor)
    }

    /// Removes the entry at a cursor and returns a cursor at the next entry in the cursor's
    /// direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is the end cursor or refers to a removed entry.
    pub fn erase<D: Dir>(&mut self, cursor: Cursor<D>) -> Cursor<D> { self.tree.erase(cursor) }

    /// Removes every entry from `first` up to, but excluding, `last`, and returns `last`.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        self.tree.erase_range(first, last)
    }

    /// Detaches the entry at a cursor and returns it as a node handle, or returns `None` for the
    /// end cursor.
    pub fn extract<D>(&mut self, cursor: Cursor<D>) -> Option<NodeHandle<(K, V)>> {
        self.tree.extract(cursor)
    }

    /// Detaches the first entry with the given key and returns it as a node handle, or returns
    /// `None` if the map does not contain the key.
    pub fn extract_key<Q: ?Sized>(&mut self, key: &Q) -> Option<NodeHandle<(K, V)>>
        where C: Compare<Q, K> {

        let cursor = self.tree.find_first(key);
        self.tree.extract(cursor)
    }

    /// Inserts the entry held by a node handle after every entry with an equal key and returns
    /// its position.
    pub fn insert_node(&mut self, node: NodeHandle<(K, V)>) -> Cursor {
        self.tree.multi_insert_node(node).unwrap_or_else(|error| error.error.handle())
    }

    /// Moves every entry of `other` into this map, without copying or dropping the entries.
    /// `other` is left empty.
    pub fn merge<C2>(&mut self, other: &mut MultiMap<K, V, C2>) where C2: Compare<K> {
        let mut cursor = other.begin();

        while let Some(node) = other.extract(cursor) {
            self.insert_node(node);
            cursor = other.begin();
        }
    }

    /// Returns an iterator that consumes the map.
    pub fn into_iter(self) -> IntoIter<K, V> { IntoIter(self.tree.into_iter()) }

    /// Returns an iterator over the map's entries with immutable references to the values.
    pub fn iter(&self) -> Iter<'_, K, V> { Iter(self.tree.iter()) }

    /// Returns an iterator over the map's entries with mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> { IterMut(self.tree.iter_mut()) }

    /// Returns an iterator over the map's keys, repeating duplicates.
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.iter()) }

    /// Returns an iterator over the map's values.
    pub fn values(&self) -> Values<'_, K, V> { Values(self.iter()) }

    /// Returns an iterator over the map's values with mutable references.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> { ValuesMut(self.iter_mut()) }

    /// Returns an iterator over the map's entries whose keys lie in the given range.
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<'_, K, V> where C: Compare<Min, K> + Compare<Max, K> {

        Range(self.tree.range_by(min, max))
    }

    /// Returns an iterator over the entries from `first` up to, but excluding, `last`.
    pub fn range_at(&self, first: Cursor, last: Cursor) -> Range<'_, K, V> {
        Range(self.tree.range(first, last))
    }
}

impl<K, V, C> Debug for MultiMap<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for MultiMap<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { MultiMap::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for MultiMap<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for MultiMap<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(it: I) -> Self {
        let mut map: MultiMap<K, V, C> = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for MultiMap<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C> IntoIterator for &'a MultiMap<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut MultiMap<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for MultiMap<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> { self.into_iter() }
}

impl<K, V, C> PartialEq for MultiMap<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp().compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for MultiMap<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for MultiMap<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        partial_cmp_entries(self.cmp(), self.iter(), other.iter())
    }
}

impl<K, V, C> Ord for MultiMap<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_entries(self.cmp(), self.iter(), other.iter())
    }
}
