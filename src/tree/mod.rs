//! The red-black tree engine underlying the map and set types.
//!
//! A [`Tree`](struct.Tree.html) stores values of type `T` and orders them by the key the
//! projection `P` extracts from each value, using the key comparator `C`. It supports both
//! unique and duplicate-admitting insertion; the containers built on top of it pick one.

#[cfg(test)]
mod test;

use compare::Compare;
use log::{debug, trace};
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};
use std::ops::Bound;
use crate::cmp::{First, Identity, Project, ValueCmp};
use crate::error::{AllocError, InsertNodeError};
use crate::node::iter::Walk;
use crate::node::{Arena, Link, Side, Slot};

pub use crate::node::{Cursor, Dir, IntoIter, Iter, IterMut, Left, Range, RevCursor, Right};

/// A red-black tree of values ordered by their projected keys.
///
/// The behavior of the tree is unspecified if a key's ordering relative to any other key changes
/// while the key is in the tree. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
pub struct Tree<T, C, P = Identity> {
    arena: Arena<T>,
    cmp: ValueCmp<C, P>,
}

/// The outcome of a descent looking for a key.
pub(crate) enum Search {
    /// The node holding an equal key.
    Found(usize),
    /// The empty link at which the key would be attached.
    Vacant(Vacant),
}

/// An empty link of the tree: the root holder, or a nil child link of `parent`.
///
/// It is only meaningful until the tree is next modified.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Vacant {
    parent: Link,
    slot: Slot,
}

/// A value detached from a tree by [`Tree::extract`](struct.Tree.html#method.extract).
///
/// The handle owns the value. It can be inserted into any tree with the same value type, without
/// moving or cloning the value again; dropping the handle drops the value.
pub struct NodeHandle<T> {
    value: T,
}

impl<T> NodeHandle<T> {
    /// Returns a reference to the detached value.
    pub fn value(&self) -> &T { &self.value }

    /// Returns a mutable reference to the detached value.
    ///
    /// Unlike values still in a tree, a detached value may be changed freely, including its key.
    pub fn value_mut(&mut self) -> &mut T { &mut self.value }

    /// Consumes the handle, returning its value.
    pub fn into_value(self) -> T { self.value }
}

impl<K, V> NodeHandle<(K, V)> {
    /// Returns a reference to the detached entry's key.
    pub fn key(&self) -> &K { &self.value.0 }

    /// Returns a mutable reference to the detached entry's key.
    pub fn key_mut(&mut self) -> &mut K { &mut self.value.0 }

    /// Returns a reference to the detached entry's mapped value.
    pub fn mapped(&self) -> &V { &self.value.1 }

    /// Returns a mutable reference to the detached entry's mapped value.
    pub fn mapped_mut(&mut self) -> &mut V { &mut self.value.1 }
}

impl<T: Debug> Debug for NodeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.value).finish()
    }
}

/// The result of inserting a node handle into a tree that admits no duplicates.
#[derive(Debug)]
pub struct InsertReturn<T> {
    /// The position of the inserted value, or of the value that blocked the insertion.
    pub position: Cursor,
    /// Whether the handle's value was inserted.
    pub inserted: bool,
    /// The handle, given back unchanged if its key was already present.
    pub node: Option<NodeHandle<T>>,
}

impl<T, C, P> Tree<T, C, P> {
    /// Creates an empty tree ordered according to the given key comparator.
    pub fn with_cmp(cmp: C) -> Self {
        Tree { arena: Arena::new(), cmp: ValueCmp::new(cmp) }
    }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool { self.arena.root().is_none() }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize { self.arena.len() }

    /// Returns a reference to the tree's key comparator.
    pub fn cmp(&self) -> &C { self.cmp.key_cmp() }

    /// Returns a reference to the tree's value comparator.
    pub fn value_cmp(&self) -> &ValueCmp<C, P> { &self.cmp }

    /// Reserves storage for at least `additional` more values.
    ///
    /// After a successful reservation, that many insertions cannot fail to allocate.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.arena.reserve(additional)
    }

    /// Removes and drops every value. The node storage is kept for reuse.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} values", self.len());
        self.arena.clear();
    }

    /// Returns a cursor at the smallest value, or the end cursor if the tree is empty.
    pub fn begin(&self) -> Cursor { self.arena.cursor(self.arena.links().outermost(Side::Left)) }

    /// Returns the end cursor, one step past the greatest value.
    pub fn end(&self) -> Cursor { Cursor::end() }

    /// Returns a reverse cursor at the greatest value, or the end cursor if the tree is empty.
    pub fn rbegin(&self) -> RevCursor {
        self.arena.cursor(self.arena.links().outermost(Side::Right))
    }

    /// Returns the reverse end cursor, one step before the smallest value.
    pub fn rend(&self) -> RevCursor { Cursor::end() }

    /// Advances a cursor one step in its direction. Advancing the end cursor wraps around to the
    /// first value in that direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn next<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> {
        self.arena.advance(cursor, D::side())
    }

    /// Moves a cursor one step against its direction. Moving the end cursor back lands on the
    /// last value in that direction.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn prev<D: Dir>(&self, cursor: Cursor<D>) -> Cursor<D> {
        self.arena.advance(cursor, D::side().opposite())
    }

    /// Returns a reference to the value at a cursor, or `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn get<D>(&self, cursor: Cursor<D>) -> Option<&T> {
        self.arena.index_of(cursor).map(|index| self.arena.value(index))
    }

    /// Returns a mutable reference to the value at a cursor, or `None` for the end cursor.
    ///
    /// The value's key must not be changed in a way that alters its ordering.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn get_mut<D>(&mut self, cursor: Cursor<D>) -> Option<&mut T> {
        match self.arena.index_of(cursor) {
            Some(index) => Some(self.arena.value_mut(index)),
            None => None,
        }
    }

    /// Returns a reference to the smallest value, or `None` if the tree is empty.
    pub fn first(&self) -> Option<&T> { self.get(self.begin()) }

    /// Returns a reference to the greatest value, or `None` if the tree is empty.
    pub fn last(&self) -> Option<&T> { self.get(self.rbegin()) }

    /// Removes and returns the smallest value, or `None` if the tree is empty.
    pub fn pop_first(&mut self) -> Option<T> {
        self.arena.links().outermost(Side::Left).map(|index| self.arena.take(index))
    }

    /// Removes and returns the greatest value, or `None` if the tree is empty.
    pub fn pop_last(&mut self) -> Option<T> {
        self.arena.links().outermost(Side::Right).map(|index| self.arena.take(index))
    }

    /// Removes the value at a cursor and returns a cursor at the next value in the cursor's
    /// direction. Cursors to other values stay valid.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is the end cursor or refers to a removed value.
    pub fn erase<D: Dir>(&mut self, cursor: Cursor<D>) -> Cursor<D> {
        let index = match self.arena.index_of(cursor) {
            Some(index) => index,
            None => panic!("cannot erase the end position"),
        };

        let next = self.arena.cursor(self.arena.links().step(index, D::side()));
        self.arena.take(index);
        next
    }

    /// Removes every value from `first` up to, but excluding, `last`, and returns `last`.
    ///
    /// `first` must not come after `last`.
    ///
    /// # Panics
    ///
    /// Panics if either cursor refers to a removed value, or if the end is reached before
    /// `last`.
    pub fn erase_range(&mut self, mut first: Cursor, last: Cursor) -> Cursor {
        if first == self.begin() && last.is_end() {
            self.clear();
            return last;
        }

        let mut erased = 0;
        while first != last {
            first = self.erase(first);
            erased += 1;
        }

        trace!("erased a range of {} values", erased);
        last
    }

    /// Detaches the value at a cursor, returning it in a node handle, or returns `None` for the
    /// end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn extract<D>(&mut self, cursor: Cursor<D>) -> Option<NodeHandle<T>> {
        let index = self.arena.index_of(cursor)?;
        trace!("extracting node {}", index);
        Some(NodeHandle { value: self.arena.take(index) })
    }

    /// Returns an iterator over the tree's values.
    pub fn iter(&self) -> Iter<'_, T> { Iter::new(&self.arena) }

    /// Returns an iterator over the tree's values with mutable references.
    ///
    /// The values' keys must not be changed in a way that alters their ordering.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> { IterMut::new(&mut self.arena) }

    /// Returns an iterator over the values from `first` up to, but excluding, `last`.
    ///
    /// The range is empty if `last` comes before `first`.
    ///
    /// # Panics
    ///
    /// Panics if either cursor refers to a removed value.
    pub fn range(&self, first: Cursor, last: Cursor) -> Range<'_, T> {
        let first = self.arena.index_of(first);
        let last = self.arena.index_of(last);
        Range::new(&self.arena, Walk::between(self.arena.links(), first, last))
    }

    /// Attaches a value at a vacant link found by `search`.
    pub(crate) fn insert_at(&mut self, vacant: Vacant, value: T) -> Result<usize, AllocError> {
        let index = self.arena.alloc(value)?;
        self.arena.link(index, vacant.parent, vacant.slot);
        Ok(index)
    }

    pub(crate) fn value_at(&self, index: usize) -> &T { self.arena.value(index) }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> &mut T { self.arena.value_mut(index) }

    pub(crate) fn take_at(&mut self, index: usize) -> T { self.arena.take(index) }

    pub(crate) fn cursor_at(&self, index: usize) -> Cursor { self.arena.cursor(Some(index)) }

    pub(crate) fn index_at<D>(&self, cursor: Cursor<D>) -> Option<usize> {
        self.arena.index_of(cursor)
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> &Arena<T> { &self.arena }
}

impl<T, C, P> Tree<T, C, P> where P: Project<T> {
    /// Descends from the root, going left while `go_left` holds for a node's value and right
    /// otherwise, and returns the last node at which it went left.
    fn descend<F>(&self, mut go_left: F) -> Link where F: FnMut(&T) -> bool {
        let mut link = self.arena.root();
        let mut bound = None;

        while let Some(index) = link {
            link = if go_left(self.arena.value(index)) {
                bound = Some(index);
                self.arena.links().child(index, Side::Left)
            } else {
                self.arena.links().child(index, Side::Right)
            };
        }

        bound
    }

    fn lower_bound_index<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        self.descend(|value| self.cmp.compare_key(key, value) != Greater)
    }

    fn upper_bound_index<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        self.descend(|value| self.cmp.compare_key(key, value) == Less)
    }

    /// Looks for a value whose key is equal to `key`, returning the node or the vacant link at
    /// which such a value would be attached.
    pub(crate) fn search<Q: ?Sized>(&self, key: &Q) -> Search where C: Compare<Q, P::Key> {
        let mut vacant = Vacant { parent: None, slot: Slot::Root };
        let mut link = self.arena.root();

        while let Some(index) = link {
            let side = match self.cmp.compare_key(key, self.arena.value(index)) {
                Less => Side::Left,
                Greater => Side::Right,
                Equal => return Search::Found(index),
            };

            vacant = Vacant { parent: Some(index), slot: Slot::Child(side) };
            link = self.arena.links().child(index, side);
        }

        Search::Vacant(vacant)
    }

    /// Returns the vacant link at which a value with the given key is attached when duplicates
    /// are admitted: after every equal key.
    fn search_multi<Q: ?Sized>(&self, key: &Q) -> Vacant where C: Compare<Q, P::Key> {
        let mut vacant = Vacant { parent: None, slot: Slot::Root };
        let mut link = self.arena.root();

        while let Some(index) = link {
            let side = match self.cmp.compare_key(key, self.arena.value(index)) {
                Less => Side::Left,
                Equal | Greater => Side::Right,
            };

            vacant = Vacant { parent: Some(index), slot: Slot::Child(side) };
            link = self.arena.links().child(index, side);
        }

        vacant
    }

    /// Returns a cursor at a value whose key is equal to `key`, or the end cursor if there is
    /// none. If several values match, any one of them may be returned.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, P::Key> {
        match self.search(key) {
            Search::Found(index) => self.cursor_at(index),
            Search::Vacant(_) => self.end(),
        }
    }

    /// Returns a cursor at the first value whose key is equal to `key`, or the end cursor if
    /// there is none.
    pub fn find_first<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, P::Key> {
        self.arena.cursor(self.first_index(key))
    }

    fn first_index<Q: ?Sized>(&self, key: &Q) -> Link where C: Compare<Q, P::Key> {
        self.lower_bound_index(key)
            .filter(|&index| self.cmp.compare_key(key, self.arena.value(index)) == Equal)
    }

    /// Returns a cursor at the first value whose key is not less than `key`, or the end cursor
    /// if there is none.
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, P::Key> {
        self.arena.cursor(self.lower_bound_index(key))
    }

    /// Returns a cursor at the first value whose key is greater than `key`, or the end cursor if
    /// there is none.
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, P::Key> {
        self.arena.cursor(self.upper_bound_index(key))
    }

    /// Returns the half-open span of cursors covering every value whose key is equal to `key`.
    /// The span is empty (both cursors equal) if there is no such value.
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Cursor, Cursor)
        where C: Compare<Q, P::Key> {

        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the number of values whose key is equal to `key`.
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, P::Key> {
        let (first, last) = self.equal_range(key);
        self.range(first, last).count()
    }

    /// Inserts a value unless a value with an equal key is present, in which case the offered
    /// value is dropped.
    ///
    /// Returns the position of the inserted or blocking value and whether the insertion
    /// happened.
    pub fn single_insert(&mut self, value: T) -> Result<(Cursor, bool), AllocError>
        where C: Compare<P::Key> {

        match self.search(P::key(&value)) {
            Search::Found(index) => Ok((self.cursor_at(index), false)),
            Search::Vacant(vacant) => {
                let index = self.insert_at(vacant, value)?;
                Ok((self.cursor_at(index), true))
            }
        }
    }

    /// Inserts a value after every value with an equal key.
    pub fn multi_insert(&mut self, value: T) -> Result<Cursor, AllocError>
        where C: Compare<P::Key> {

        let vacant = self.search_multi(P::key(&value));
        let index = self.insert_at(vacant, value)?;
        Ok(self.cursor_at(index))
    }

    /// Inserts a node handle's value unless a value with an equal key is present, in which case
    /// the handle is given back.
    pub fn insert_node(&mut self, node: NodeHandle<T>)
        -> Result<InsertReturn<T>, InsertNodeError<T>> where C: Compare<P::Key> {

        match self.search(P::key(&node.value)) {
            Search::Found(index) => Ok(InsertReturn {
                position: self.cursor_at(index),
                inserted: false,
                node: Some(node),
            }),
            Search::Vacant(vacant) => {
                let index = self.link_node(vacant, node)?;
                Ok(InsertReturn { position: self.cursor_at(index), inserted: true, node: None })
            }
        }
    }

    /// Inserts a node handle's value after every value with an equal key.
    pub fn multi_insert_node(&mut self, node: NodeHandle<T>) -> Result<Cursor, InsertNodeError<T>>
        where C: Compare<P::Key> {

        let vacant = self.search_multi(P::key(&node.value));
        let index = self.link_node(vacant, node)?;
        Ok(self.cursor_at(index))
    }

    fn link_node(&mut self, vacant: Vacant, node: NodeHandle<T>)
        -> Result<usize, InsertNodeError<T>> {

        if let Err(error) = self.arena.reserve(1) {
            return Err(InsertNodeError { error: error, node: node });
        }

        let index = self.arena.put(node.value);
        self.arena.link(index, vacant.parent, vacant.slot);
        trace!("inserted node {}", index);
        Ok(index)
    }

    /// Removes and returns a value whose key is equal to `key`, or returns `None` if there is
    /// none. If several values match, the first one is removed.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<T> where C: Compare<Q, P::Key> {
        let index = self.first_index(key)?;
        Some(self.arena.take(index))
    }

    /// Removes every value whose key is equal to `key`, returning how many were removed.
    pub fn erase_key<Q: ?Sized>(&mut self, key: &Q) -> usize where C: Compare<Q, P::Key> {
        let mut count = 0;
        while self.remove(key).is_some() { count += 1; }
        count
    }

    /// Returns the span of cursors covering the values whose keys lie within the given bounds.
    pub fn bounds<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> (Cursor, Cursor)
        where C: Compare<Min, P::Key> + Compare<Max, P::Key> + Compare<P::Key> {

        let first = match min {
            Bound::Included(key) => self.lower_bound_index(key),
            Bound::Excluded(key) => self.upper_bound_index(key),
            Bound::Unbounded => self.arena.links().outermost(Side::Left),
        };

        let last = match max {
            Bound::Included(key) => self.upper_bound_index(key),
            Bound::Excluded(key) => self.lower_bound_index(key),
            Bound::Unbounded => None,
        };

        // bounds that cross each other select nothing
        let crossed = match (first, last) {
            (Some(first), Some(last)) => {
                let (first, last) = (self.arena.value(first), self.arena.value(last));
                self.cmp.compare_values(last, first) == Less
            }
            _ => false,
        };

        if crossed {
            (self.end(), self.end())
        } else {
            (self.arena.cursor(first), self.arena.cursor(last))
        }
    }

    /// Returns an iterator over the values whose keys lie within the given bounds.
    pub fn range_by<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<'_, T>
        where C: Compare<Min, P::Key> + Compare<Max, P::Key> + Compare<P::Key> {

        let (first, last) = self.bounds(min, max);
        self.range(first, last)
    }
}

impl<K, V, C> Tree<(K, V), C, First> {
    /// Returns a mutable reference to the mapped value at a cursor, or `None` for the end
    /// cursor. Unlike `get_mut`, this cannot alter the key.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed value.
    pub fn get_mapped_mut<D>(&mut self, cursor: Cursor<D>) -> Option<(&K, &mut V)> {
        self.get_mut(cursor).map(|e| (&e.0, &mut e.1))
    }
}

impl<T: Clone, C: Clone, P> Clone for Tree<T, C, P> {
    fn clone(&self) -> Self { Tree { arena: self.arena.clone(), cmp: self.cmp.clone() } }
}

impl<T: Debug, C, P> Debug for Tree<T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Default, P> Default for Tree<T, C, P> {
    fn default() -> Self { Tree::with_cmp(C::default()) }
}

impl<'a, T, C, P> IntoIterator for &'a Tree<T, C, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

impl<'a, T, C, P> IntoIterator for &'a mut Tree<T, C, P> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    fn into_iter(self) -> IterMut<'a, T> { self.iter_mut() }
}

impl<T, C, P> IntoIterator for Tree<T, C, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> { IntoIter::new(self.arena) }
}
