//! Red-black rebalancing.
//!
//! A tree is valid when the root is black, no red node has a red child, and every path from a
//! node down to a nil link crosses the same number of black nodes.

use super::{Color, Link, Links, Side, Slot};

impl Links {
    /// Rotates the subtree rooted at `index` toward `side`.
    ///
    /// The child on the opposite side (the pivot) takes `index`'s place, `index` becomes the
    /// pivot's `side` child, and the pivot's former `side` subtree moves across to `index`.
    pub fn rotate(&mut self, index: usize, side: Side) {
        let up = side.opposite();
        let pivot = match self.child(index, up) {
            Some(pivot) => pivot,
            None => unreachable!("rotating node {} without a pivot", index),
        };

        let inner = self.child(pivot, side);
        self.attach(inner, Some(index), Slot::Child(up));

        let (parent, slot) = (self.parent(index), self.slot(index));
        self.attach(Some(pivot), parent, slot);
        self.attach(Some(index), Some(pivot), Slot::Child(side));
    }

    /// Restores the red-black properties after the red node at `index` was linked in.
    pub fn fix_insert(&mut self, mut index: usize) {
        loop {
            let parent = match self.parent(index) {
                Some(parent) => parent,
                None => {
                    self.set_color(index, Color::Black);
                    return;
                }
            };

            if !self.is_red(Some(index)) || !self.is_red(Some(parent)) { return; }

            let grandparent = match self.parent(parent) {
                Some(grandparent) => grandparent,
                None => {
                    self.set_color(parent, Color::Black);
                    return;
                }
            };

            let parent_side = self.side_of(parent);
            let uncle = self.child(grandparent, parent_side.opposite());

            if self.is_red(uncle) {
                // push the grandparent's blackness down and continue above it
                self.set_color(parent, Color::Black);
                if let Some(uncle) = uncle { self.set_color(uncle, Color::Black); }
                self.set_color(grandparent, Color::Red);
                index = grandparent;
            } else if self.side_of(index) == parent_side {
                self.rotate(grandparent, parent_side.opposite());
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                return;
            } else {
                // straighten the zig-zag, then handle it as the outer case
                self.rotate(parent, parent_side);
                index = parent;
            }
        }
    }

    /// Detaches the node at `index` from the tree and restores the red-black properties.
    ///
    /// Nodes never move between indices: a node with two children is replaced by its in-order
    /// successor, which is relinked into the removed node's position and takes over its color.
    pub fn unlink(&mut self, index: usize) {
        let (left, right) = (self.child(index, Side::Left), self.child(index, Side::Right));
        let (parent, slot) = (self.parent(index), self.slot(index));

        match (left, right) {
            (Some(left), Some(right)) => {
                let successor = self.extremum(right, Side::Left);
                let successor_color = self.color(successor);
                let orphan = self.child(successor, Side::Right);

                let (orphan_parent, orphan_slot) = if successor == right {
                    (Some(successor), Slot::Child(Side::Right))
                } else {
                    let hole = (self.parent(successor), self.slot(successor));
                    self.attach(orphan, hole.0, hole.1);
                    self.attach(Some(right), Some(successor), Slot::Child(Side::Right));
                    hole
                };

                self.attach(Some(successor), parent, slot);
                self.attach(Some(left), Some(successor), Slot::Child(Side::Left));
                let color = self.color(index);
                self.set_color(successor, color);

                if successor_color == Color::Black {
                    self.fix_remove(orphan, orphan_parent, orphan_slot);
                }
            }
            (child, None) | (None, child) => {
                self.attach(child, parent, slot);
                if self.color(index) == Color::Black { self.fix_remove(child, parent, slot); }
            }
        }
    }

    /// Restores the red-black properties after a black node was removed from the path through
    /// `slot` of `parent`, which now holds `link` (possibly nil).
    fn fix_remove(&mut self, mut link: Link, mut parent: Link, mut slot: Slot) {
        while let (Slot::Child(side), Some(above)) = (slot, parent) {
            if self.is_red(link) { break; }

            let far_side = side.opposite();
            let mut sibling = self.sibling(above, far_side);

            if self.is_red(Some(sibling)) {
                self.set_color(sibling, Color::Black);
                self.set_color(above, Color::Red);
                self.rotate(above, side);
                sibling = self.sibling(above, far_side);
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, far_side);

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                link = Some(above);
                parent = self.parent(above);
                slot = self.slot(above);
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near { self.set_color(near, Color::Black); }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far_side);
                sibling = self.sibling(above, far_side);
            }

            let color = self.color(above);
            self.set_color(sibling, color);
            self.set_color(above, Color::Black);
            if let Some(far) = self.child(sibling, far_side) { self.set_color(far, Color::Black); }
            self.rotate(above, side);
            link = self.root();
            break;
        }

        if let Some(index) = link { self.set_color(index, Color::Black); }
    }

    /// The child of `parent` on `side`, which the black-height property guarantees to exist
    /// while a removal is being fixed up.
    fn sibling(&self, parent: usize, side: Side) -> usize {
        match self.child(parent, side) {
            Some(sibling) => sibling,
            None => unreachable!("unbalanced black height below node {}", parent),
        }
    }
}
