//! Ordered sets based on a red-black tree.

mod multi;

use compare::{Compare, Natural};
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter::FromIterator;
use std::ops::Bound;
use crate::error::AllocError;
use crate::tree::{Cursor, Dir, InsertReturn, NodeHandle, RevCursor, Tree};

pub use crate::tree::{IntoIter, Iter, Range};
pub use self::multi::MultiSet;

/// An ordered set based on a red-black tree.
///
/// Every item appears at most once. See [`MultiSet`](struct.MultiSet.html) for a set that admits
/// duplicates.
///
/// The behavior of this set is unspecified if an item's ordering relative to any other item
/// changes while the item is in the set. This is normally only possible through `Cell`,
/// `RefCell`, or unsafe code.
#[derive(Clone)]
pub struct Set<T, C = Natural<T>> where C: Compare<T> {
    tree: Tree<T, C>,
}

impl<T> Set<T> where T: Ord {
    /// Creates an empty set ordered according to the natural order of its items.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Set::with_cmp(compare::natural()) }
}

impl<T, C> Set<T, C> where C: Compare<T> {
    /// Creates an empty set ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut set = rbtree::Set::with_cmp(natural().rev());
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut it = set.iter();
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), Some(&2));
    /// assert_eq!(it.next(), Some(&1));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Set { tree: Tree::with_cmp(cmp) } }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of items in the set.
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the set's comparator.
    pub fn cmp(&self) -> &C { self.tree.cmp() }

    /// Removes all items from the set.
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Reserves storage for at least `additional` more items.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.tree.try_reserve(additional)
    }

    /// Inserts an item into the set, returning `true` if the set did not already contain an
    /// equal item. Otherwise the set is left unchanged and the given item is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    ///
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> bool { self.emplace(item).1 }

    /// Inserts an item into the set unless an equal item is present, returning the position of
    /// the inserted or existing item and whether the insertion happened.
    pub fn emplace(&mut self, item: T) -> (Cursor, bool) {
        self.tree.single_insert(item).unwrap_or_else(|error| error.handle())
    }

    /// Removes the item equal to the given one, returning `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, item: &Q) -> bool where C: Compare<Q, T> {
        self.take(item).is_some()
    }

    /// Removes and returns the item equal to the given one, or returns `None` if there is none.
    pub fn take<Q: ?Sized>(&mut self, item: &Q) -> Option<T> where C: Compare<Q, T> {
        self.tree.remove(item)
    }

    /// Checks if the set contains an item equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    /// assert!(!set.contains(&1));
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q: ?Sized>(&self, item: &Q) -> bool where C: Compare<Q, T> {
        !self.tree.find(item).is_end()
    }

    /// Returns a reference to the set's item equal to the given one, or `None` if there is none.
    pub fn get<Q: ?Sized>(&self, item: &Q) -> Option<&T> where C: Compare<Q, T> {
        self.tree.get(self.tree.find(item))
    }

    /// Returns the number of items equal to the given one: zero or one.
    pub fn count<Q: ?Sized>(&self, item: &Q) -> usize where C: Compare<Q, T> {
        self.contains(item) as usize
    }

    /// Returns a reference to the set's first item, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    /// assert_eq!(set.first(), None);
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.first(), Some(&1));
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    pub fn first(&self) -> Option<&T> { self.tree.first() }

    /// Returns a reference to the set's last item, or `None` if the set is empty.
    pub fn last(&self) -> Option<&T> { self.tree.last() }

    /// Removes the set's first item and returns it, or returns `None` if the set is empty.
    pub fn remove_first(&mut self) -> Option<T> { self.tree.pop_first() }

    /// Removes the set's last item and returns it, or returns `None` if the set is empty.
    pub fn remove_last(&mut self) -> Option<T> { self.tree.pop_last() }

    /// Returns a reference to the predecessor of the given item, or `None` if no such item is
    /// present in the set.
    ///
    /// If `inclusive` is `false`, this method finds the greatest item that is strictly less than
    /// the given item. If `inclusive` is `true`, this method finds the greatest item that is less
    /// than or equal to the given item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.pred(&1, false), None);
    /// assert_eq!(set.pred(&2, false), Some(&1));
    /// assert_eq!(set.pred(&2, true), Some(&2));
    /// assert_eq!(set.pred(&4, false), Some(&3));
    /// ```
    pub fn pred<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Option<&T>
        where C: Compare<Q, T> {

        self.tree.get(self.pred_cursor(item, inclusive))
    }

    /// Removes the predecessor of the given item from the set and returns it, or returns `None`
    /// if no such item is present in the set.
    pub fn remove_pred<Q: ?Sized>(&mut self, item: &Q, inclusive: bool) -> Option<T>
        where C: Compare<Q, T> {

        let cursor = self.pred_cursor(item, inclusive);
        self.tree.extract(cursor).map(NodeHandle::into_value)
    }

    /// Returns a reference to the successor of the given item, or `None` if no such item is
    /// present in the set.
    ///
    /// If `inclusive` is `false`, this method finds the smallest item that is strictly greater
    /// than the given item. If `inclusive` is `true`, this method finds the smallest item that is
    /// greater than or equal to the given item.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut set = rbtree::Set::new();
    ///
    /// set.insert(2);
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// assert_eq!(set.succ(&0, false), Some(&1));
    /// assert_eq!(set.succ(&2, false), Some(&3));
    /// assert_eq!(set.succ(&2, true), Some(&2));
    /// assert_eq!(set.succ(&3, false), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Option<&T>
        where C: Compare<Q, T> {

        self.tree.get(self.succ_cursor(item, inclusive))
    }

    /// Removes the successor of the given item from the set and returns it, or returns `None`
    /// if no such item is present in the set.
    pub fn remove_succ<Q: ?Sized>(&mut self, item: &Q, inclusive: bool) -> Option<T>
        where C: Compare<Q, T> {

        let cursor = self.succ_cursor(item, inclusive);
        self.tree.extract(cursor).map(NodeHandle::into_value)
    }

    fn pred_cursor<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Cursor
        where C: Compare<Q, T> {

        let bound = if inclusive { self.tree.upper_bound(item) } else { self.tree.lower_bound(item) };
        if bound == self.begin() { self.end() } else { self.tree.prev(bound) }
    }

    fn succ_cursor<Q: ?Sized>(&self, item: &Q, inclusive: bool) -> Cursor
        where C: Compare<Q, T> {

        if inclusive { self.tree.lower_bound(item) } else { self.tree.upper_bound(item) }
    }

    /// Returns a cursor at the set's first item, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor { self.tree.begin() }

    /// Returns the end cursor, one step past the set's last item.
    pub fn end(&self) -> Cursor { self.tree.end() }

    /// Returns a reverse cursor at the set's last item, or the end cursor if the set is empty.
    pub fn rbegin(&self) -> RevCursor { self.tree.rbegin() }

    /// Returns the reverse end cursor, one step before the set's first item.
    pub fn rend(&self) -> RevCursor { self.tree.rend() }

    /// Advances a cursor one step in its direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed item.
    pub fn next<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.next(cursor) }

    /// Moves a cursor one step against its direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed item.
    pub fn prev<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> { self.tree.prev(cursor) }

    /// Returns a cursor at the item equal to the given one, or the end cursor if there is none.
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

    /// Returns the span of cursors covering the item equal to the given one.
    pub fn equal_range<Q: ?Sized>(&self, item: &Q) -> (Cursor, Cursor) where C: Compare<Q, T> {
        self.tree.equal_range(item)
    }

    /// Returns a reference to the item at a cursor, or `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed item.
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

    /// Detaches the item at a cursor and returns it as a node handle, or returns `None` for the
    /// end cursor.
    pub fn extract<D>(&mut self, cursor: Cursor<D>) -> Option<NodeHandle<T>> {
        self.tree.extract(cursor)
    }

    /// Detaches the item equal to the given one and returns it as a node handle, or returns
    /// `None` if there is none.
    pub fn extract_key<Q: ?Sized>(&mut self, item: &Q) -> Option<NodeHandle<T>>
        where C: Compare<Q, T> {

        let cursor = self.tree.find(item);
        self.tree.extract(cursor)
    }

    /// Inserts the item held by a node handle unless an equal item is present, in which case the
    /// handle is given back in the result.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut a: rbtree::Set<_> = vec![1, 2].into_iter().collect();
    /// let mut b: rbtree::Set<_> = vec![2].into_iter().collect();
    ///
    /// let node = a.extract_key(&2).unwrap();
    /// let result = b.insert_node(node);
    ///
    /// assert!(!result.inserted);
    /// assert_eq!(result.node.map(|node| node.into_value()), Some(2));
    /// ```
    pub fn insert_node(&mut self, node: NodeHandle<T>) -> InsertReturn<T> {
        self.tree.insert_node(node).unwrap_or_else(|error| error.error.handle())
    }

    /// Moves every item of `other` that is not present in this set into this set. Items already
    /// present stay in `other`.
    pub fn merge<C2>(&mut self, other: &mut Set<T, C2>) where C2: Compare<T> {
        let mut cursor = other.begin();

        while let Some(item) = other.get_at(cursor) {
            let next = other.next(cursor);

            if !self.contains(item) {
                if let Some(node) = other.extract(cursor) { self.insert_node(node); }
            }

            cursor = next;
        }
    }

    /// Checks if every item of this set is also in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// let a: rbtree::Set<_> = vec![1, 2].into_iter().collect();
    /// let b: rbtree::Set<_> = vec![1, 2, 3].into_iter().collect();
    ///
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// assert!(b.is_superset(&a));
    /// ```
    pub fn is_subset(&self, other: &Set<T, C>) -> bool {
        self.len() <= other.len() && self.iter().all(|item| other.contains(item))
    }

    /// Checks if every item of `other` is also in this set.
    pub fn is_superset(&self, other: &Set<T, C>) -> bool { other.is_subset(self) }

    /// Checks if this set has no item in common with `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// let a: rbtree::Set<_> = vec![1, 3].into_iter().collect();
    /// let b: rbtree::Set<_> = vec![2, 4].into_iter().collect();
    /// let c: rbtree::Set<_> = vec![3].into_iter().collect();
    ///
    /// assert!(a.is_disjoint(&b));
    /// assert!(!a.is_disjoint(&c));
    /// ```
    pub fn is_disjoint(&self, other: &Set<T, C>) -> bool {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.iter().all(|item| !large.contains(item))
    }

    /// Returns an iterator that consumes the set.
    pub fn into_iter(self) -> IntoIter<T> { self.tree.into_iter() }

    /// Returns an iterator over the set.
    ///
    /// The iterator yields the items in ascending order according to the set's comparator.
    pub fn iter(&self) -> Iter<'_, T> { self.tree.iter() }

    /// Returns an iterator over the set's items that lie in the given range.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Excluded, Included};
    ///
    /// let set: rbtree::Set<_> = (1..8).collect();
    ///
    /// assert_eq!(set.range(Included(&3), Excluded(&6)).collect::<Vec<_>>(), [&3, &4, &5]);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<'_, T> where C: Compare<Min, T> + Compare<Max, T> {

        self.tree.range_by(min, max)
    }

    /// Returns an iterator over the items from `first` up to, but excluding, `last`.
    pub fn range_at(&self, first: Cursor, last: Cursor) -> Range<'_, T> {
        self.tree.range(first, last)
    }
}

impl<T, C> Debug for Set<T, C> where T: Debug, C: Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Default for Set<T, C> where C: Compare<T> + Default {
    fn default() -> Self { Set::with_cmp(Default::default()) }
}

impl<T, C> Extend<T> for Set<T, C> where C: Compare<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) {
        for item in it { self.insert(item); }
    }
}

impl<T, C> FromIterator<T> for Set<T, C> where C: Compare<T> + Default {
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Self {
        let mut set: Set<T, C> = Default::default();
        set.extend(it);
        set
    }
}

impl<T, C> Hash for Set<T, C> where T: Hash, C: Compare<T> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for item in self.iter() { item.hash(h); }
    }
}

impl<'a, T, C> IntoIterator for &'a Set<T, C> where C: Compare<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

impl<T, C> IntoIterator for Set<T, C> where C: Compare<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> { self.into_iter() }
}

impl<T, C> PartialEq for Set<T, C> where C: Compare<T> {
    fn eq(&self, other: &Self) -> bool { eq_items(self.cmp(), self.iter(), other.iter()) }
}

impl<T, C> Eq for Set<T, C> where C: Compare<T> {}

impl<T, C> PartialOrd for Set<T, C> where C: Compare<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(Ord::cmp(self, other)) }
}

impl<T, C> Ord for Set<T, C> where C: Compare<T> {
    fn cmp(&self, other: &Self) -> Ordering { cmp_items(self.cmp(), self.iter(), other.iter()) }
}

fn eq_items<'a, T: 'a, C>(cmp: &C, l: Iter<'a, T>, r: Iter<'a, T>) -> bool where C: Compare<T> {
    l.len() == r.len() && l.zip(r).all(|(l, r)| cmp.compares_eq(l, r))
}

/// Lexicographically compares two ordered sequences of items by `cmp`.
fn cmp_items<'a, T: 'a, C>(cmp: &C, mut l: Iter<'a, T>, mut r: Iter<'a, T>) -> Ordering
    where C: Compare<T> {

    loop {
        match (l.next(), r.next()) {
            (None, None) => return Equal,
            (None, Some(_)) => return Less,
            (Some(_), None) => return Greater,
            (Some(l), Some(r)) => match cmp.compare(l, r) {
                Equal => {}
                non_eq => return non_eq,
            },
        }
    }
}
