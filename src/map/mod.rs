//! Ordered maps based on a red-black tree.

mod entry;
mod iter;
mod multi;

use compare::{Compare, Natural};
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter::FromIterator;
use std::ops::{self, Bound};
use crate::cmp::First;
use crate::error::{AllocError, KeyNotFound};
use crate::tree::{Cursor, Dir, InsertReturn, NodeHandle, RevCursor, Search, Tree};

pub use self::entry::{Entry, OccupiedEntry, VacantEntry};
pub use self::iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
pub use self::multi::MultiMap;

/// An ordered map based on a red-black tree.
///
/// Every key appears at most once. See [`MultiMap`](struct.MultiMap.html) for a map that
/// admits duplicate keys.
///
/// Besides the usual key-based interface, the map exposes its positions as
/// [`Cursor`](../tree/struct.Cursor.html)s, which stay valid until the entry they denote is
/// removed, and lets whole entries move between maps as
/// [`NodeHandle`](../tree/struct.NodeHandle.html)s.
///
/// The behavior of this map is unspecified if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
#[derive(Clone)]
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<(K, V), C, First>,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = rbtree::Map::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Map { tree: Tree::with_cmp(cmp) } }

    /// Checks if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(2, "b");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(2, "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let map: rbtree::Map<i32, &str> = rbtree::Map::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: rbtree::Map<i32, &str, _> = rbtree::Map::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Removes all entries from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.iter().next(), Some((&1, &"a")));
    ///
    /// map.clear();
    ///
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.iter().next(), None);
    /// ```
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Reserves storage for at least `additional` more entries, so that that many insertions
    /// cannot fail to allocate.
    ///
    /// The insertion methods of the map treat allocation failure as fatal, the way the standard
    /// collections do; reserving first is how to handle it instead.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// if map.try_reserve(2).is_ok() {
    ///     map.insert(1, "a");
    ///     map.insert(2, "b");
    /// }
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.tree.try_reserve(additional)
    }

    /// Inserts an entry into the map, returning the previous value, if any, associated
    /// with the key.
    ///
    /// The key already in the map is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut e) => Some(e.insert(value)),
            Entry::Vacant(e) => {
                e.insert(value);
                None
            }
        }
    }

    /// Inserts an entry into the map unless its key is already present, in which case the given
    /// key and value are dropped and the map is left unchanged.
    ///
    /// Returns the position of the inserted or existing entry and whether the insertion
    /// happened.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// let (first, inserted) = map.emplace(1, "a");
    /// assert!(inserted);
    ///
    /// let (again, inserted) = map.emplace(1, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, first);
    /// assert_eq!(map.get_at(again), Some((&1, &"a")));
    /// ```
    pub fn emplace(&mut self, key: K, value: V) -> (Cursor, bool) {
        self.tree.single_insert((key, value)).unwrap_or_else(|error| error.handle())
    }

    /// Inserts an entry into the map, overwriting the value if the key is already present.
    ///
    /// Returns the position of the entry and whether a new entry was created.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// assert!(map.insert_or_assign(1, "a").1);
    /// assert!(!map.insert_or_assign(1, "b").1);
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.tree.search(&key) {
            Search::Found(index) => {
                self.tree.value_at_mut(index).1 = value;
                (self.tree.cursor_at(index), false)
            }
            Search::Vacant(vacant) => {
                let index = self.tree.insert_at(vacant, (key, value))
                    .unwrap_or_else(|error| error.handle());
                (self.tree.cursor_at(index), true)
            }
        }
    }

    /// Returns the map's entry corresponding to the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut counts = rbtree::Map::new();
    ///
    /// for s in vec!["a", "b", "a", "c", "a", "b"] {
    ///     *counts.entry(s).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(counts[&"a"], 3);
    /// assert_eq!(counts[&"b"], 2);
    /// assert_eq!(counts[&"c"], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        match self.tree.search(&key) {
            Search::Found(index) => Entry::Occupied(OccupiedEntry { tree: &mut self.tree, index: index }),
            Search::Vacant(vacant) =>
                Entry::Vacant(VacantEntry { tree: &mut self.tree, vacant: vacant, key: key }),
        }
    }

    /// Removes and returns the entry whose key is equal to the given key, returning
    /// `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        self.tree.remove(key)
    }

    /// Checks if the map contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert!(!map.contains_key(&1));
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        !self.tree.find(key).is_end()
    }

    /// Returns the number of entries with the given key: zero or one.
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, K> {
        self.contains_key(key) as usize
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.get_key_value(key).map(|e| e.1)
    }

    /// Returns references to the entry whose key is equal to the given key, or `None` if the
    /// map does not contain the key.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.get_at(self.tree.find(key))
    }

    /// Returns a mutable reference to the value associated with the given key, or `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    ///
    /// {
    ///     let value = map.get_mut(&1).unwrap();
    ///     assert_eq!(*value, "a");
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let cursor = self.tree.find(key);
        self.get_at_mut(cursor).map(|e| e.1)
    }

    /// Returns a reference to the value associated with the given key, or an error if the map
    /// does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::error::KeyNotFound;
    ///
    /// let mut map = rbtree::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(KeyNotFound));
    /// ```
    pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V, KeyNotFound> where C: Compare<Q, K> {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with the given key, or an error if
    /// the map does not contain the key.
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
        where C: Compare<Q, K> {

        self.get_mut(key).ok_or(KeyNotFound)
    }

    /// Returns a reference to the map's first key and a reference to its associated value, or
    /// `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.first(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.first(), Some((&1, &"a")));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> { self.get_at(self.begin()) }

    /// Returns a reference to the map's last key and a reference to its associated value, or
    /// `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.last(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.last(), Some((&3, &"c")));
    /// ```
    pub fn last(&self) -> Option<(&K, &V)> { self.get_at(self.rbegin()) }

    /// Removes the map's first entry and returns it, or returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.remove_first(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.remove_first(), Some((1, "a")));
    /// ```
    pub fn remove_first(&mut self) -> Option<(K, V)> { self.tree.pop_first() }

    /// Removes the map's last entry and returns it, or returns `None` if the map is empty.
    pub fn remove_last(&mut self) -> Option<(K, V)> { self.tree.pop_last() }

    /// Returns the map's entry corresponding to its first key, or `None` if the map is empty.
    pub fn first_entry(&mut self) -> Option<OccupiedEntry<'_, K, V, C>> {
        let cursor = self.begin();
        self.occupied_entry(cursor)
    }

    /// Returns the map's entry corresponding to its last key, or `None` if the map is empty.
    pub fn last_entry(&mut self) -> Option<OccupiedEntry<'_, K, V, C>> {
        let cursor = self.rbegin();
        self.occupied_entry(cursor)
    }

    fn occupied_entry<D>(&mut self, cursor: Cursor<D>) -> Option<OccupiedEntry<'_, K, V, C>> {
        let index = self.tree.index_at(cursor)?;
        Some(OccupiedEntry { tree: &mut self.tree, index: index })
    }

    fn pred_cursor<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Cursor
        where C: Compare<Q, K> {

        let bound = if inclusive { self.tree.upper_bound(key) } else { self.tree.lower_bound(key) };
        if bound == self.begin() { self.end() } else { self.tree.prev(bound) }
    }

    fn succ_cursor<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Cursor
        where C: Compare<Q, K> {

        if inclusive { self.tree.lower_bound(key) } else { self.tree.upper_bound(key) }
    }

    /// Returns a reference to the predecessor of the given key and a reference to its
    /// associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the greatest key that is strictly less than
    /// the given key. If `inclusive` is `true`, this method finds the greatest key that is less
    /// than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.pred(&0, false), None);
    /// assert_eq!(map.pred(&1, false), None);
    /// assert_eq!(map.pred(&2, false), Some((&1, &"a")));
    /// assert_eq!(map.pred(&4, false), Some((&3, &"c")));
    ///
    /// assert_eq!(map.pred(&0, true), None);
    /// assert_eq!(map.pred(&1, true), Some((&1, &"a")));
    /// assert_eq!(map.pred(&2, true), Some((&2, &"b")));
    /// assert_eq!(map.pred(&4, true), Some((&3, &"c")));
    /// ```
    pub fn pred<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.get_at(self.pred_cursor(key, inclusive))
    }

    /// Returns a reference to the predecessor of the given key and a mutable reference to its
    /// associated value, or `None` if no such key is present in the map.
    pub fn pred_mut<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(&K, &mut V)>
        where C: Compare<Q, K> {

        let cursor = self.pred_cursor(key, inclusive);
        self.get_at_mut(cursor)
    }

    /// Removes the predecessor of the given key from the map and returns it, or returns `None`
    /// if no such key is present in the map.
    pub fn remove_pred<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(K, V)>
        where C: Compare<Q, K> {

        self.pred_entry(key, inclusive).map(OccupiedEntry::remove_entry)
    }

    /// Returns the entry corresponding to the predecessor of the given key.
    pub fn pred_entry<Q: ?Sized>(&mut self, key: &Q, inclusive: bool)
        -> Option<OccupiedEntry<'_, K, V, C>> where C: Compare<Q, K> {

        let cursor = self.pred_cursor(key, inclusive);
        self.occupied_entry(cursor)
    }

    /// Returns a reference to the successor of the given key and a reference to its
    /// associated value, or `None` if no such key is present in the map.
    ///
    /// If `inclusive` is `false`, this method finds the smallest key that is strictly greater than
    /// the given key. If `inclusive` is `true`, this method finds the smallest key that is greater
    /// than or equal to the given key.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.succ(&0, false), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, false), Some((&3, &"c")));
    /// assert_eq!(map.succ(&3, false), None);
    ///
    /// assert_eq!(map.succ(&0, true), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, true), Some((&2, &"b")));
    /// assert_eq!(map.succ(&4, true), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.get_at(self.succ_cursor(key, inclusive))
    }

    /// Returns a reference to the successor of the given key and a mutable reference to its
    /// associated value, or `None` if no such key is present in the map.
    pub fn succ_mut<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(&K, &mut V)>
        where C: Compare<Q, K> {

        let cursor = self.succ_cursor(key, inclusive);
        self.get_at_mut(cursor)
    }

    /// Removes the successor of the given key from the map and returns it, or returns `None`
    /// if no such key is present in the map.
    pub fn remove_succ<Q: ?Sized>(&mut self, key: &Q, inclusive: bool) -> Option<(K, V)>
        where C: Compare<Q, K> {

        self.succ_entry(key, inclusive).map(OccupiedEntry::remove_entry)
    }

    /// Returns the entry corresponding to the successor of the given key.
    pub fn succ_entry<Q: ?Sized>(&mut self, key: &Q, inclusive: bool)
        -> Option<OccupiedEntry<'_, K, V, C>> where C: Compare<Q, K> {

        let cursor = self.succ_cursor(key, inclusive);
        self.occupied_entry(cursor)
    }

    /// Returns a cursor at the map's first entry, or the end cursor if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    /// assert_eq!(map.begin(), map.end());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let mut cursor = map.begin();
    /// assert_eq!(map.get_at(cursor), Some((&1, &"a")));
    ///
    /// cursor = map.next(cursor);
    /// assert_eq!(map.get_at(cursor), Some((&2, &"b")));
    ///
    /// cursor = map.next(cursor);
    /// assert_eq!(cursor, map.end());
    /// ```
    pub fn begin(&self) -> Cursor { self.tree.begin() }

    /// Returns the end cursor, one step past the map's last entry.
    pub fn end(&self) -> Cursor { self.tree.end() }

    /// Returns a reverse cursor at the map's last entry, or the end cursor if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let mut keys = vec![];
    /// let mut cursor = map.rbegin();
    ///
    /// while cursor != map.rend() {
    ///     keys.push(*map.get_at(cursor).unwrap().0);
    ///     cursor = map.next(cursor);
    /// }
    ///
    /// assert_eq!(keys, [2, 1]);
    /// ```
    pub fn rbegin(&self) -> RevCursor { self.tree.rbegin() }

    /// Returns the reverse end cursor, one step before the map's first entry.
    pub fn rend(&self) -> RevCursor { self.tree.rend() }

    /// Advances a cursor one step in its direction, wrapping from the end cursor to the first
    /// entry in that direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn next<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.next(cursor) }

    /// Moves a cursor one step against its direction, wrapping from the end cursor to the last
    /// entry in that direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn prev<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.prev(cursor) }

    /// Returns a cursor at the entry with the given key, or the end cursor if there is none.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.find(key)
    }

    /// Returns a cursor at the first entry whose key is not less than the given key, or the end
    /// cursor if there is none.
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.lower_bound(key)
    }

    /// Returns a cursor at the first entry whose key is greater than the given key, or the end
    /// cursor if there is none.
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        self.tree.upper_bound(key)
    }

    /// Returns the span of cursors covering the entry with the given key, which is empty if the
    /// map does not contain the key.
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
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map: rbtree::Map<_, _> = (1..6).map(|i| (i, i * 10)).collect();
    ///
    /// let mut cursor = map.begin();
    /// while let Some((&key, _)) = map.get_at(cursor) {
    ///     cursor = if key % 2 == 0 { map.erase(cursor) } else { map.next(cursor) };
    /// }
    ///
    /// assert_eq!(map.keys().cloned().collect::<Vec<_>>(), [1, 3, 5]);
    /// ```
    pub fn erase<D: Dir>(&mut self, cursor: Cursor<D>) -> Cursor<D> { self.tree.erase(cursor) }

    /// Removes every entry from `first` up to, but excluding, `last`, and returns `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map: rbtree::Map<_, _> = (1..10).map(|i| (i, ())).collect();
    ///
    /// let first = map.lower_bound(&3);
    /// let last = map.lower_bound(&7);
    /// map.erase_range(first, last);
    ///
    /// assert_eq!(map.keys().cloned().collect::<Vec<_>>(), [1, 2, 7, 8, 9]);
    /// ```
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        self.tree.erase_range(first, last)
    }

    /// Detaches the entry at a cursor and returns it as a node handle, or returns `None` for the
    /// end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed entry.
    pub fn extract<D>(&mut self, cursor: Cursor<D>) -> Option<NodeHandle<(K, V)>> {
        self.tree.extract(cursor)
    }

    /// Detaches the entry with the given key and returns it as a node handle, or returns `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut source = rbtree::Map::new();
    /// let mut target = rbtree::Map::new();
    /// source.insert(1, "a".to_string());
    ///
    /// let mut node = source.extract_key(&1).unwrap();
    /// *node.key_mut() = 2;
    ///
    /// let result = target.insert_node(node);
    /// assert!(result.inserted);
    /// assert!(source.is_empty());
    /// assert_eq!(target[&2], "a");
    /// ```
    pub fn extract_key<Q: ?Sized>(&mut self, key: &Q) -> Option<NodeHandle<(K, V)>>
        where C: Compare<Q, K> {

        let cursor = self.tree.find(key);
        self.tree.extract(cursor)
    }

    /// Inserts the entry held by a node handle unless its key is already present, in which case
    /// the handle is given back in the result.
    pub fn insert_node(&mut self, node: NodeHandle<(K, V)>) -> InsertReturn<(K, V)> {
        self.tree.insert_node(node).unwrap_or_else(|error| error.error.handle())
    }

    /// Moves every entry of `other` whose key is not present in this map into this map, without
    /// copying or dropping the entries. Entries with keys already present stay in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut a: rbtree::Map<_, _> = vec![(1, "a"), (2, "b")].into_iter().collect();
    /// let mut b: rbtree::Map<_, _> = vec![(2, "x"), (3, "c")].into_iter().collect();
    ///
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.iter().collect::<Vec<_>>(), [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// assert_eq!(b.iter().collect::<Vec<_>>(), [(&2, &"x")]);
    /// ```
    pub fn merge<C2>(&mut self, other: &mut Map<K, V, C2>) where C2: Compare<K> {
        let mut cursor = other.begin();

        while let Some((key, _)) = other.get_at(cursor) {
            let next = other.next(cursor);

            if !self.contains_key(key) {
                if let Some(node) = other.extract(cursor) { self.insert_node(node); }
            }

            cursor = next;
        }
    }

    /// Returns an iterator that consumes the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.into_iter();
    /// assert_eq!(it.next(), Some((1, "a")));
    /// assert_eq!(it.next(), Some((2, "b")));
    /// assert_eq!(it.next(), Some((3, "c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn into_iter(self) -> IntoIter<K, V> { IntoIter(self.tree.into_iter()) }

    /// Returns an iterator over the map's entries with immutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> { Iter(self.tree.iter()) }

    /// Returns an iterator over the map's entries with mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// let mut i = 1;
    ///
    /// for (_, value) in map.iter_mut() {
    ///     assert_eq!(i, *value);
    ///     *value *= 2;
    ///     i += 1;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> { IterMut(self.tree.iter_mut()) }

    /// Returns an iterator over the map's keys.
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.iter()) }

    /// Returns an iterator over the map's values.
    pub fn values(&self) -> Values<'_, K, V> { Values(self.iter()) }

    /// Returns an iterator over the map's values with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    ///
    /// for value in map.values_mut() { *value += 1; }
    ///
    /// assert_eq!(map.values().cloned().collect::<Vec<_>>(), [11, 21]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> { ValuesMut(self.iter_mut()) }

    /// Returns an iterator over the map's entries whose keys lie in the given range.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Included, Excluded};
    ///
    /// let mut map = rbtree::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// assert_eq!(map.range(Excluded(&"a"), Included(&"f")).collect::<Vec<_>>(),
    ///     [(&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Included(&"a"), Excluded(&"b")).collect::<Vec<_>>(),
    ///     [(&"a", &1)]);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<'_, K, V> where C: Compare<Min, K> + Compare<Max, K> {

        Range(self.tree.range_by(min, max))
    }

    /// Returns an iterator over the entries from `first` up to, but excluding, `last`.
    ///
    /// # Panics
    ///
    /// Panics if either cursor refers to a removed entry.
    pub fn range_at(&self, first: Cursor, last: Cursor) -> Range<'_, K, V> {
        Range(self.tree.range(first, last))
    }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for Map<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(it: I) -> Self {
        let mut map: Map<K, V, C> = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &'a Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> { self.into_iter() }
}

impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp().compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        partial_cmp_entries(self.cmp(), self.iter(), other.iter())
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_entries(self.cmp(), self.iter(), other.iter())
    }
}

/// Lexicographically compares two ordered sequences of entries, keys by `cmp` and values by
/// their partial order.
fn partial_cmp_entries<'a, K: 'a, V: 'a, C, I>(cmp: &C, mut l: I, mut r: I) -> Option<Ordering>
    where V: PartialOrd, C: Compare<K>, I: Iterator<Item = (&'a K, &'a V)> {

    loop {
        match (l.next(), r.next()) {
            (None, None) => return Some(Equal),
            (None, Some(_)) => return Some(Less),
            (Some(_), None) => return Some(Greater),
            (Some(l), Some(r)) => match cmp.compare(l.0, r.0) {
                Equal => match l.1.partial_cmp(r.1) {
                    Some(Equal) => {}
                    non_eq => return non_eq,
                },
                non_eq => return Some(non_eq),
            },
        }
    }
}

fn cmp_entries<'a, K: 'a, V: 'a, C, I>(cmp: &C, mut l: I, mut r: I) -> Ordering
    where V: Ord, C: Compare<K>, I: Iterator<Item = (&'a K, &'a V)> {

    loop {
        match (l.next(), r.next()) {
            (None, None) => return Equal,
            (None, Some(_)) => return Less,
            (Some(_), None) => return Greater,
            (Some(l), Some(r)) => match cmp.compare(l.0, r.0) {
                Equal => match l.1.cmp(r.1) {
                    Equal => {}
                    non_eq => return non_eq,
                },
                non_eq => return non_eq,
            },
        }
    }
}
