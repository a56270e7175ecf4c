//! Ordered maps, multimaps, sets and multisets based on a red-black tree.
//!
//! All four containers share one engine, [`Tree`](tree/struct.Tree.html), which stores its nodes
//! in an index arena. Besides the usual key-based interface, the containers expose positions as
//! [`Cursor`](tree/struct.Cursor.html)s that survive unrelated insertions and removals, and let
//! values move between containers as [`NodeHandle`](tree/struct.NodeHandle.html)s.
//!
//! # Examples
//!
//! ```
//! let mut map = rbtree::Map::new();
//!
//! map.insert("b", 2);
//! map.insert("a", 1);
//! map.insert("c", 3);
//!
//! let cursor = map.lower_bound(&"b");
//! assert_eq!(map.get_at(cursor), Some((&"b", &2)));
//! assert_eq!(map.get_at(map.next(cursor)), Some((&"c", &3)));
//! ```

pub mod cmp;
pub mod error;
pub mod map;
mod node;
pub mod set;
pub mod tree;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;
#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use crate::map::{Map, MultiMap};
pub use crate::set::{MultiSet, Set};
pub use crate::tree::{Cursor, InsertReturn, NodeHandle, RevCursor};
