use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter::FromIterator;
use std::ops::Bound;
use crate::error::AllocError;
use crate::tree::{Cursor, Dir, NodeHandle, RevCursor, Tree};
use super::{cmp_items, eq_items, IntoIter, Iter, Range};

/// An ordered set based on a red-black tree that admits several equal items.
///
/// Equal items are kept in insertion order.
///
/// # Examples
///
/// ```
/// let mut set = rbtree::MultiSet::new();
///
/// set.insert(2);
/// set.insert(1);
/// set.insert(2);
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.count(&2), 2);
/// assert_eq!(set.iter().collect::<Vec<_>>(), [&1, &2, &2]);
/// ```
#[derive(Clone)]
pub struct MultiSet<T, C = Natural<T>> where C: Compare<T> {
    tree: Tree<T, C>,
}

impl<T> MultiSet<T> where T: Ord {
    /// Creates an empty set ordered according to the natural order of its items.
    pub fn new() -> Self { MultiSet::with_cmp(compare::natural()) }
}

impl<T, C> MultiSet<T, C> where C: Compare<T> {
    /// Creates an empty set ordered according to the given comparator.
    pub fn with_cmp(cmp: C) -> Self { MultiSet { tree: Tree::with_cmp(cmp) } }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of items in the set, counting every duplicate.
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the set's comparator.
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Removes all items from the set.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Reserves storage for at least `additional` more items.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.tree.try_reserve(additional)
    }

    /// Inserts an item after every equal item and returns its position.
    pub fn insert(&mut self, item: T) -> Cursor {
        self.tree.multi_insert(item).unwrap_or_else(|error| error.handle())
    }

    /// Checks if the set contains an item equal to the given one.
    pub fn contains<Q: ?Sized>(&self, item: &Q) -> bool where C: Compare<Q, T> {
        !self.tree.find(item).is_end()
    }

    /// Returns the number of items equal to the given one.
    pub fn count<Q: ?Sized>(&self, item: &Q) -> usize where C: Compare<Q, T> {
        self.tree.count(item)
    }

    /// Returns a reference to the first item equal to the given one, or `None` if there is none.
    pub fn get<Q: ?Sized>(&self, item: &Q) -> Option<&T> where C: Compare<Q, T> {
        self.tree.get(self.tree.find_first(item))
    }

    /// Returns an iterator over every item equal to the given one, in insertion order.
    pub fn get_all<Q: ?Sized>(&self, item: &Q) -> Range<'_, T> where C: Compare<Q, T> {
        let (first, last) = self.tree.equal_range(item);
        self.tree.range(first, last)
    }

    /// Removes every item equal to the given one, returning how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set: rbtree::MultiSet<_> = vec![1, 2, 1, 1].into_iter().collect();
    ///
    /// assert_eq!(set.remove(&1), 3);
    /// assert_eq!(set.remove(&1), 0);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, item: &Q) -> usize where C: Compare<Q, T> {
        self.tree.erase_key(item)
    }

    /// Removes and returns the first item equal to the given one, or returns `None` if there is
    /// none.
    pub fn take<Q: ?Sized>(&mut self, item: &Q) -> Option<T> where C: Compare<Q, T> {
        self.tree.remove(item)
    }

    /// Returns a reference to the set's first item, or `None` if the set is empty.
    pub fn first(&self) -> Option<&T> { self.tree.first() }

    /// Returns a reference to the set's last item, or `None` if the set is empty.
    pub fn last(&self) -> Option<&T> { self.tree.last() }

    /// Removes the set's first item and returns it, or returns `None` if the set is empty.
    pub fn remove_first(&mut self) -> Option<T> { self.tree.pop_first() }

    /// Removes the set's last item and returns it, or returns `None` if the set is empty.
    pub fn remove_last(&mut self) -> Option<T> { self.tree.pop_last() }

    /// Returns a cursor at the set's first item, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor { self.tree.begin() }

    /// Returns the end cursor, one step past the set's last item.
    pub fn end(&self) -> Cursor { self.tree.end() }

    /// Returns a reverse cursor at the set's last item, or the end cursor if the set is empty.
    pub fn rbegin(&self) -> RevCursor { self.tree.rbegin() }

    /// Returns the reverse end cursor, one step before the set's first item.
    pub fn rend(&self) -> RevCursor { self.tree.rend() }

    /// Advances a cursor one step in its direction.
    pub fn next<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.next(cursor) }

    /// Moves a cursor one step against its direction.
    pub fn prev<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.prev(cursor) }

    /// Returns a cursor at some item equal to the given one, or the end cursor if there is none.
    pub fn find<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        self.tree.find(item)
    }

    /// Returns a cursor at the first item not less than the given one.
    pub fn lower_bound<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        self.tree.lower_bound(item)
    }

    /// Returns a cursor at the first item greater than the given one.
    pub fn upper_bound<Q: ?Sized>(&self, item: &Q) -> Cursor where C: Compare<Q, T> {
        self.tree.upper_bound(item)
    }

    /// Returns the span of cursors covering every item equal to the given one.
    pub fn equal_range<Q: ?Sized>(&self, item: &Q) -> (Cursor, Cursor) where C: Compare<Q, T> {
        self.tree.equal_range(item)
    }

    /// Returns a reference to the item at a cursor, or `None` for the end cursor.
    pub fn get_at<D>(&self, cursor: Cursor<D>) -> Option<&T> { self.tree.get(cursor) }

    /// Removes the item at a cursor and returns a cursor at the next item in the cursor's
    /// direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is the end cursor or refers to a removed item.
    pub fn erase<D: Dir>(&mut self, cursor: Cursor<D>) -> Cursor<D> { self.tree.erase(cursor) }

    /// Removes every item from `first` up to, but excluding, `last`, and returns `last`.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        self.tree.erase_range(first, last)
    }

    /// Detaches the item at a cursor and returns it as a node handle.
    pub fn extract<D>(&mut self, cursor: Cursor<D>) -> Option<NodeHandle<T>> {
        self.tree.extract(cursor)
    }

    /// Detaches the first item equal to the given one and returns it as a node handle.
    pub fn extract_key<Q: ?Sized>(&mut self, item: &Q) -> Option<NodeHandle<T>>
        where C: Compare<Q, T> {

        let cursor = self.tree.find_first(item);
        self.tree.extract(cursor)
    }

    /// Inserts the item held by a node handle after every equal item and returns its position.
    pub fn insert_node(&mut self, node: NodeHandle<T>) -> Cursor {
        self.tree.multi_insert_node(node).unwrap_or_else(|error| error.error.handle())
    }

    /// Moves every item of `other` into this set. `other` is left empty.
    pub fn merge<C2>(&mut self, other: &mut MultiSet<T, C2>) where C2: Compare<T> {
        let mut cursor = other.begin();

        while let Some(node) = other.extract(cursor) {
            self.insert_node(node);
            cursor = other.begin();
        }
    }

    /// Returns an iterator that consumes the set.
    pub fn into_iter(self) -> IntoIter<T> { self.tree.into_iter() }

    /// Returns an iterator over the set, repeating duplicates.
    pub fn iter(&self) -> Iter<'_, T> { self.tree.iter() }

    /// Returns an iterator over the set's items that lie in the given range.
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<'_, T> where C: Compare<Min, T> + Compare<Max, T> {

        self.tree.range_by(min, max)
    }

    /// Returns an iterator over the items from `first` up to, but excluding, `last`.
    pub fn range_at(&self, first: Cursor, last: Cursor) -> Range<'_, T> {
        self.tree.range(first, last)
    }
}

impl<T, C> Debug for MultiSet<T, C> where T: Debug, C: Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Default for MultiSet<T, C> where C: Compare<T> + Default {
    fn default() -> Self { MultiSet::with_cmp(Default::default()) }
}

impl<T, C> Extend<T> for MultiSet<T, C> where C: Compare<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) {
        for item in it { self.insert(item); }
    }
}

impl<T, C> FromIterator<T> for MultiSet<T, C> where C: Compare<T> + Default {
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Self {
        let mut set: MultiSet<T, C> = Default::default();
        set.extend(it);
        set
    }
}

impl<T, C> Hash for MultiSet<T, C> where T: Hash, C: Compare<T> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for item in self.iter() { item.hash(h); }
    }
}

impl<'a, T, C> IntoIterator for &'a MultiSet<T, C> where C: Compare<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

impl<T, C> IntoIterator for MultiSet<T, C> where C: Compare<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> { self.into_iter() }
}

impl<T, C> PartialEq for MultiSet<T, C> where C: Compare<T> {
    fn eq(&self, other: &Self) -> bool { eq_items(self.cmp(), self.iter(), other.iter()) }
}

impl<T, C> Eq for MultiSet<T, C> where C: Compare<T> {}

impl<T, C> PartialOrd for MultiSet<T, C> where C: Compare<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(Ord::cmp(self, other)) }
}

impl<T, C> Ord for MultiSet<T, C> where C: Compare<T> {
    fn cmp(&self, other: &Self) -> Ordering { cmp_items(self.cmp(), self.iter(), other.iter()) }
}
