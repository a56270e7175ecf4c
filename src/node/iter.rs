use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use super::{Arena, Link, Links, NodeId, Side, Slot};

/// A direction of traversal.
pub trait Dir {
    /// The opposite direction.
    type Opposite: Dir<Opposite = Self>;

    #[doc(hidden)]
    fn side() -> Side;
}

/// Traversal toward smaller elements.
pub enum Left {}

/// Traversal toward greater elements.
pub enum Right {}

impl Dir for Left {
    type Opposite = Right;
    fn side() -> Side { Side::Left }
}

impl Dir for Right {
    type Opposite = Left;
    fn side() -> Side { Side::Right }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum At {
    Node(NodeId),
    End,
}

/// A position in a tree: one of its elements, or the end sentinel one step past the last (or,
/// for a reversed cursor, before the first) element.
///
/// Cursors do not borrow the tree they came from. A cursor stays valid until the element it
/// denotes is removed; using it after that panics. The end cursor is always valid.
///
/// `D` is the direction in which [`next`](../tree/struct.Tree.html#method.next) moves.
pub struct Cursor<D = Right> {
    at: At,
    _dir: PhantomData<fn() -> D>,
}

/// A cursor that moves from the greatest element toward the smallest.
pub type RevCursor = Cursor<Left>;

impl<D> Cursor<D> {
    fn new(at: At) -> Self { Cursor { at: at, _dir: PhantomData } }

    pub(crate) fn node(id: NodeId) -> Self { Cursor::new(At::Node(id)) }

    pub(crate) fn end() -> Self { Cursor::new(At::End) }

    pub(crate) fn id(&self) -> Option<NodeId> {
        match self.at {
            At::Node(id) => Some(id),
            At::End => None,
        }
    }

    /// Checks if this is the end cursor.
    pub fn is_end(&self) -> bool { self.at == At::End }
}

impl<D: Dir> Cursor<D> {
    /// Returns a cursor at the same position that moves in the opposite direction.
    ///
    /// The end cursor stays the end cursor.
    pub fn reverse(self) -> Cursor<D::Opposite> { Cursor::new(self.at) }
}

impl<D> Clone for Cursor<D> {
    fn clone(&self) -> Self { *self }
}

impl<D> Copy for Cursor<D> {}

impl<D> PartialEq for Cursor<D> {
    fn eq(&self, other: &Self) -> bool { self.at == other.at }
}

impl<D> Eq for Cursor<D> {}

impl<D> Hash for Cursor<D> {
    fn hash<H: Hasher>(&self, h: &mut H) { self.at.hash(h) }
}

impl<D> fmt::Debug for Cursor<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.at {
            At::Node(id) => f.debug_tuple("Cursor").field(&id.index).finish(),
            At::End => f.write_str("Cursor(End)"),
        }
    }
}

impl Links {
    /// Returns the in-order neighbor of the node at `index` toward `side`, or `None` if it is
    /// the extreme node on that side.
    pub fn step(&self, mut index: usize, side: Side) -> Link {
        if let Some(child) = self.child(index, side) {
            return Some(self.extremum(child, side.opposite()));
        }

        loop {
            match self.slot(index) {
                Slot::Root => return None,
                Slot::Child(from) => {
                    let parent = self.parent(index);
                    if from != side { return parent; }
                    index = match parent {
                        Some(parent) => parent,
                        None => return None,
                    };
                }
            }
        }
    }

    /// Returns the extreme node of the whole tree toward `side`.
    pub fn outermost(&self, side: Side) -> Link {
        self.root.map(|root| self.extremum(root, side))
    }
}

impl<T> Arena<T> {
    /// Returns the live index a cursor denotes, or `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor refers to a removed element.
    pub fn index_of<D>(&self, cursor: Cursor<D>) -> Option<usize> {
        cursor.id().map(|id| match self.resolve(id) {
            Some(index) => index,
            None => panic!("cursor refers to a removed node"),
        })
    }

    pub fn cursor<D>(&self, link: Link) -> Cursor<D> {
        match link {
            Some(index) => Cursor::node(self.links.id(index)),
            None => Cursor::end(),
        }
    }

    /// Moves a cursor one step toward `side`, passing through the end sentinel: stepping from
    /// the end lands on the extreme element on the opposite side.
    pub fn advance<D>(&self, cursor: Cursor<D>, side: Side) -> Cursor<D> {
        match self.index_of(cursor) {
            Some(index) => self.cursor(self.links.step(index, side)),
            None => self.cursor(self.links.outermost(side.opposite())),
        }
    }
}

/// The raw state of a double-ended in-order walk over an inclusive span of nodes.
#[derive(Clone, Copy, Debug)]
pub struct Walk {
    front: Link,
    back: Link,
}

impl Walk {
    pub fn empty() -> Walk { Walk { front: None, back: None } }

    /// Walks the whole tree.
    pub fn all(links: &Links) -> Walk {
        Walk { front: links.outermost(Side::Left), back: links.outermost(Side::Right) }
    }

    /// Walks the half-open span from `first` up to, but excluding, `last`. The span is empty
    /// when `last` comes before `first`.
    pub fn between(links: &Links, first: Link, last: Link) -> Walk {
        let first_index = match first {
            Some(index) if first != last => index,
            _ => return Walk::empty(),
        };

        let back = match last {
            Some(last) if links.precedes(last, first_index) => return Walk::empty(),
            Some(last) => links.step(last, Side::Left),
            None => links.outermost(Side::Right),
        };

        Walk { front: first, back: back }
    }

    pub fn next(&mut self, links: &Links) -> Link {
        let index = self.front?;
        if self.front == self.back {
            *self = Walk::empty();
        } else {
            self.front = links.step(index, Side::Right);
            if self.front.is_none() { self.back = None; }
        }
        Some(index)
    }

    pub fn next_back(&mut self, links: &Links) -> Link {
        let index = self.back?;
        if self.front == self.back {
            *self = Walk::empty();
        } else {
            self.back = links.step(index, Side::Left);
            if self.back.is_none() { self.front = None; }
        }
        Some(index)
    }
}

/// An iterator over a tree's values.
///
/// The iterator yields the values in ascending order according to the tree's comparator.
pub struct Iter<'a, T: 'a> {
    arena: &'a Arena<T>,
    walk: Walk,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>) -> Self {
        Iter { arena: arena, walk: Walk::all(&arena.links), len: arena.len() }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self { Iter { arena: self.arena, walk: self.walk, len: self.len } }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.walk.next(&self.arena.links)?;
        self.len -= 1;
        Some(self.arena.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let index = self.walk.next_back(&self.arena.links)?;
        self.len -= 1;
        Some(self.arena.value(index))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// An iterator over a tree's values with mutable references.
///
/// Mutating a value must not change its ordering relative to the other values.
pub struct IterMut<'a, T: 'a> {
    links: &'a Links,
    values: *mut Option<T>,
    walk: Walk,
    len: usize,
    _mut: PhantomData<&'a mut T>,
}

unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(arena: &'a mut Arena<T>) -> Self {
        let len = arena.len();
        let (links, values) = arena.split_mut();
        IterMut { links: links, values: values, walk: Walk::all(links), len: len, _mut: PhantomData }
    }

    fn value(&self, index: usize) -> &'a mut T {
        // the walk yields each live index at most once, so the references never alias
        match unsafe { &mut *self.values.add(index) } {
            Some(value) => value,
            None => unreachable!("node {} is vacant", index),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let index = self.walk.next(self.links)?;
        self.len -= 1;
        Some(self.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        let index = self.walk.next_back(self.links)?;
        self.len -= 1;
        Some(self.value(index))
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// An iterator over the values in a span of a tree.
///
/// The iterator yields the values in ascending order according to the tree's comparator.
pub struct Range<'a, T: 'a> {
    arena: &'a Arena<T>,
    walk: Walk,
}

impl<'a, T> Range<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, walk: Walk) -> Self {
        Range { arena: arena, walk: walk }
    }
}

impl<'a, T> Clone for Range<'a, T> {
    fn clone(&self) -> Self { Range { arena: self.arena, walk: self.walk } }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.walk.next(&self.arena.links).map(|index| self.arena.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.walk.front {
            None => (0, Some(0)),
            Some(_) => (1, Some(self.arena.len())),
        }
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.walk.next_back(&self.arena.links).map(|index| self.arena.value(index))
    }
}

impl<'a, T> FusedIterator for Range<'a, T> {}

/// An iterator that consumes a tree.
///
/// The iterator yields the values in ascending order according to the tree's comparator.
pub struct IntoIter<T> {
    arena: Arena<T>,
    walk: Walk,
    len: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(arena: Arena<T>) -> Self {
        let walk = Walk::all(&arena.links);
        let len = arena.len();
        IntoIter { arena: arena, walk: walk, len: len }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.walk.next(&self.arena.links)?;
        self.len -= 1;
        self.arena.values[index].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let index = self.walk.next_back(&self.arena.links)?;
        self.len -= 1;
        self.arena.values[index].take()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
