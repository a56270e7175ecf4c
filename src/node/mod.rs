//! Red-black tree nodes stored in an index arena.
//!
//! Links are indices into the arena rather than pointers. Every node records its parent and the
//! slot (root holder, or the parent's left or right link) that currently refers to it, so that
//! rotations and transplants can rewrite "whoever points at me" without special-casing the root.

mod balance;
pub mod iter;


use crate::error::AllocError;
use log::warn;
use std::alloc::Layout;
use std::collections::TryReserveError;

pub use self::iter::{Cursor, Dir, IntoIter, Iter, IterMut, Left, Range, RevCursor, Right};

/// A link to a node of the arena, or nil.
pub type Link = Option<usize>;

/// A node's color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// One of a node's two children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The link currently holding a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Root,
    Child(Side),
}

/// A node's linkage. The value it owns lives in the arena's parallel value column.
#[derive(Clone, Debug)]
pub struct Node {
    left: Link,
    right: Link,
    parent: Link,
    slot: Slot,
    color: Color,
    generation: u32,
}

impl Node {
    fn leaf(generation: u32) -> Node {
        Node {
            left: None,
            right: None,
            parent: None,
            slot: Slot::Root,
            color: Color::Red,
            generation: generation,
        }
    }
}

/// A stable, generation-checked reference to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// The tree's shape: every node's links plus the root holder.
///
/// Kept apart from the values so that traversal can read links while values are mutably
/// borrowed.
#[derive(Clone, Debug, Default)]
pub struct Links {
    nodes: Vec<Node>,
    root: Link,
}

impl Links {
    pub fn root(&self) -> Link { self.root }

    pub fn child(&self, index: usize, side: Side) -> Link {
        match side {
            Side::Left => self.nodes[index].left,
            Side::Right => self.nodes[index].right,
        }
    }

    fn set_child(&mut self, index: usize, side: Side, link: Link) {
        match side {
            Side::Left => self.nodes[index].left = link,
            Side::Right => self.nodes[index].right = link,
        }
    }

    pub fn parent(&self, index: usize) -> Link { self.nodes[index].parent }

    pub fn slot(&self, index: usize) -> Slot { self.nodes[index].slot }

    pub fn color(&self, index: usize) -> Color { self.nodes[index].color }

    fn set_color(&mut self, index: usize, color: Color) { self.nodes[index].color = color; }

    /// Nil links count as black.
    fn is_red(&self, link: Link) -> bool {
        link.map_or(false, |index| self.nodes[index].color == Color::Red)
    }

    /// The side of its parent a non-root node hangs from.
    fn side_of(&self, index: usize) -> Side {
        match self.nodes[index].slot {
            Slot::Child(side) => side,
            Slot::Root => unreachable!("the root hangs from no side"),
        }
    }

    /// Stores `link` in `slot` of `parent` (or in the root holder) and records the new position
    /// in the linked node.
    fn attach(&mut self, link: Link, parent: Link, slot: Slot) {
        debug_assert_eq!(parent.is_none(), slot == Slot::Root);

        match (slot, parent) {
            (Slot::Child(side), Some(parent)) => self.set_child(parent, side, link),
            _ => self.root = link,
        }

        if let Some(index) = link {
            let node = &mut self.nodes[index];
            node.parent = parent;
            node.slot = slot;
        }
    }

    /// Returns the node furthest toward `side` in the subtree rooted at `index`.
    pub fn extremum(&self, mut index: usize, side: Side) -> usize {
        while let Some(child) = self.child(index, side) { index = child; }
        index
    }

    fn depth(&self, mut index: usize) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.parent(index) {
            index = parent;
            depth += 1;
        }
        depth
    }

    /// Returns `true` if node `a` comes strictly before node `b` in order.
    pub fn precedes(&self, a: usize, b: usize) -> bool {
        if a == b { return false; }

        let (mut x, mut y) = (a, b);
        let (mut dx, mut dy) = (self.depth(a), self.depth(b));
        let (mut from_x, mut from_y) = (None, None);

        while dx > dy {
            from_x = Some(self.side_of(x));
            x = self.nodes[x].parent.unwrap_or(x);
            dx -= 1;
        }
        while dy > dx {
            from_y = Some(self.side_of(y));
            y = self.nodes[y].parent.unwrap_or(y);
            dy -= 1;
        }

        if x == y {
            // one node is an ancestor of the other
            return match (from_x, from_y) {
                (Some(side), _) => side == Side::Left,
                (_, Some(side)) => side == Side::Right,
                (None, None) => false,
            };
        }

        while self.parent(x) != self.parent(y) {
            x = self.nodes[x].parent.unwrap_or(x);
            y = self.nodes[y].parent.unwrap_or(y);
        }
        self.side_of(x) == Side::Left
    }

    pub fn id(&self, index: usize) -> NodeId {
        NodeId { index: index, generation: self.nodes[index].generation }
    }
}

/// Node storage: links, deferred-init value cells, and a free list of vacant indices.
///
/// A value cell is `None` exactly while its index is on the free list. Releasing an index bumps
/// its generation so that stale `NodeId`s are recognized.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    links: Links,
    values: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena { links: Links::default(), values: Vec::new(), free: Vec::new() }
    }

    pub fn links(&self) -> &Links { &self.links }

    #[cfg(test)]
    pub fn links_mut(&mut self) -> &mut Links { &mut self.links }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize { self.values.len() - self.free.len() }

    pub fn root(&self) -> Link { self.links.root }

    pub fn value(&self, index: usize) -> &T {
        match self.values[index] {
            Some(ref value) => value,
            None => unreachable!("node {} is vacant", index),
        }
    }

    pub fn value_mut(&mut self, index: usize) -> &mut T {
        match self.values[index] {
            Some(ref mut value) => value,
            None => unreachable!("node {} is vacant", index),
        }
    }

    /// Returns the index `id` refers to, or `None` if that node has since been released.
    pub fn resolve(&self, id: NodeId) -> Option<usize> {
        match self.links.nodes.get(id.index) {
            Some(node) if node.generation == id.generation && self.values[id.index].is_some() =>
                Some(id.index),
            _ => None,
        }
    }

    /// Ensures that `additional` more nodes can be allocated without touching the global
    /// allocator. Releasing a node never allocates either: the free list always has room for
    /// every slot.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let vacant = self.free.len();
        if additional <= vacant { return Ok(()); }

        let grow = additional - vacant;
        let slots = self.values.len() + grow;

        self.links.nodes.try_reserve(grow)
            .and_then(|()| self.values.try_reserve(grow))
            .and_then(|()| self.free.try_reserve(slots - self.free.len()))
            .map_err(|cause| Self::alloc_error(grow, cause))
    }

    fn alloc_error(count: usize, cause: TryReserveError) -> AllocError {
        let layout = Layout::array::<(Node, Option<T>)>(count)
            .unwrap_or_else(|_| Layout::new::<(Node, Option<T>)>());
        warn!("could not reserve storage for {} tree node(s): {}", count, cause);
        AllocError::new(layout, cause)
    }

    /// Moves `value` into a fresh, unlinked red node and returns its index.
    pub fn alloc(&mut self, value: T) -> Result<usize, AllocError> {
        self.reserve(1)?;
        Ok(self.put(value))
    }

    /// Like `alloc`, but relies on a preceding successful `reserve`.
    pub fn put(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                let generation = self.links.nodes[index].generation;
                self.links.nodes[index] = Node::leaf(generation);
                self.values[index] = Some(value);
                index
            }
            None => {
                self.links.nodes.push(Node::leaf(0));
                self.values.push(Some(value));
                self.values.len() - 1
            }
        }
    }

    /// Releases an unlinked node, returning its value.
    pub fn release(&mut self, index: usize) -> T {
        let value = match self.values[index].take() {
            Some(value) => value,
            None => unreachable!("node {} released twice", index),
        };

        let generation = self.links.nodes[index].generation.wrapping_add(1);
        self.links.nodes[index] = Node::leaf(generation);
        self.free.push(index);
        value
    }

    /// Unlinks the node at `index`, rebalancing the tree, and releases it.
    pub fn take(&mut self, index: usize) -> T {
        self.links.unlink(index);
        self.release(index)
    }

    /// Links the unlinked node at `index` into the empty `slot` of `parent` and rebalances.
    pub fn link(&mut self, index: usize, parent: Link, slot: Slot) {
        self.links.attach(Some(index), parent, slot);
        self.links.fix_insert(index);
    }

    /// Drops every value and puts every slot on the free list, keeping the storage for reuse.
    pub fn clear(&mut self) {
        for (index, value) in self.values.iter_mut().enumerate() {
            if value.take().is_some() {
                let node = &mut self.links.nodes[index];
                *node = Node::leaf(node.generation.wrapping_add(1));
                self.free.push(index);
            }
        }

        self.links.root = None;
    }

    /// Splits the arena into its links and a pointer to its value column, for iterators that
    /// hand out mutable references to distinct values while following links.
    pub fn split_mut(&mut self) -> (&Links, *mut Option<T>) {
        (&self.links, self.values.as_mut_ptr())
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self { Arena::new() }
}
