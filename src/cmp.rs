//! Comparators over stored values.
//!
//! A tree stores values but orders them by a key derived from each value: the value itself for
//! sets, the first tuple field for maps. [`ValueCmp`](struct.ValueCmp.html) lifts a key
//! comparator to values through such a projection.
//!
//! Lookups accept any query type `Q` the key comparator can compare against stored keys, i.e.
//! whenever `C: Compare<Q, K>`. [`Transparent`](struct.Transparent.html) is a comparator that
//! opts into this for every `Q` the key type borrows as.

use compare::Compare;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Extracts the key a value is ordered by.
pub trait Project<T> {
    /// The key type.
    type Key: ?Sized;

    /// Returns the value's key.
    fn key(value: &T) -> &Self::Key;
}

/// The projection of a value onto itself.
pub enum Identity {}

impl<T> Project<T> for Identity {
    type Key = T;
    fn key(value: &T) -> &T { value }
}

/// The projection of a pair onto its first component.
pub enum First {}

impl<K, V> Project<(K, V)> for First {
    type Key = K;
    fn key(value: &(K, V)) -> &K { &value.0 }
}

/// A key comparator applied to values through the projection `P`.
pub struct ValueCmp<C, P> {
    cmp: C,
    _project: PhantomData<fn() -> P>,
}

impl<C, P> ValueCmp<C, P> {
    pub fn new(cmp: C) -> Self { ValueCmp { cmp: cmp, _project: PhantomData } }

    /// Returns the underlying key comparator.
    pub fn key_cmp(&self) -> &C { &self.cmp }

    /// Compares two values by their keys.
    pub fn compare_values<T>(&self, l: &T, r: &T) -> Ordering
        where P: Project<T>, C: Compare<P::Key> {

        self.cmp.compare(P::key(l), P::key(r))
    }

    /// Compares a query key against a stored value's key.
    pub fn compare_key<Q: ?Sized, T>(&self, key: &Q, value: &T) -> Ordering
        where P: Project<T>, C: Compare<Q, P::Key> {

        self.cmp.compare(key, P::key(value))
    }
}

impl<C, T> Compare<T> for ValueCmp<C, Identity> where C: Compare<T> {
    fn compare(&self, l: &T, r: &T) -> Ordering { self.cmp.compare(l, r) }
}

impl<C, K, V> Compare<(K, V)> for ValueCmp<C, First> where C: Compare<K> {
    fn compare(&self, l: &(K, V), r: &(K, V)) -> Ordering { self.cmp.compare(&l.0, &r.0) }
}

impl<C: Clone, P> Clone for ValueCmp<C, P> {
    fn clone(&self) -> Self { ValueCmp::new(self.cmp.clone()) }
}

impl<C: Default, P> Default for ValueCmp<C, P> {
    fn default() -> Self { ValueCmp::new(C::default()) }
}

impl<C: fmt::Debug, P> fmt::Debug for ValueCmp<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ValueCmp").field(&self.cmp).finish()
    }
}

/// A comparator that orders keys by their natural order and accepts any query type the key
/// borrows as.
///
/// # Examples
///
/// ```
/// use rbtree::cmp::Transparent;
///
/// let mut map = rbtree::Map::with_cmp(Transparent);
/// map.insert("a".to_string(), 1);
///
/// assert_eq!(map.get("a"), Some(&1));
/// assert_eq!(map.get(&"a".to_string()), Some(&1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Transparent;

impl<Q: ?Sized, K> Compare<Q, K> for Transparent where Q: Ord, K: Borrow<Q> {
    fn compare(&self, key: &Q, stored: &K) -> Ordering { key.cmp(stored.borrow()) }
}
