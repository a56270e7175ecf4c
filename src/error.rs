//! Error types.

use std::alloc::{self, Layout};
use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;
use crate::tree::NodeHandle;

/// The error returned when the tree could not obtain storage for a node.
///
/// The tree that reported the error is left unmodified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocError {
    layout: Layout,
    cause: TryReserveError,
}

impl AllocError {
    pub(crate) fn new(layout: Layout, cause: TryReserveError) -> Self {
        AllocError { layout: layout, cause: cause }
    }

    /// Returns the layout of the node storage that could not be obtained.
    pub fn layout(&self) -> Layout { self.layout }

    /// Diverts to the global allocation error handler, the way the standard collections react
    /// to exhausted memory.
    pub fn handle(self) -> ! {
        alloc::handle_alloc_error(self.layout)
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to allocate tree node storage ({} bytes)", self.layout.size())
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> { Some(&self.cause) }
}

/// The error returned by a strict lookup such as [`Map::at`](../map/struct.Map.html#method.at)
/// when the key is not present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("key not found") }
}

impl Error for KeyNotFound {}

/// The error returned when re-inserting a node handle failed to obtain storage.
///
/// The handle is given back untouched so that its value is not lost.
pub struct InsertNodeError<T> {
    /// The allocation failure.
    pub error: AllocError,
    /// The node handle that could not be inserted.
    pub node: NodeHandle<T>,
}

impl<T> fmt::Debug for InsertNodeError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("InsertNodeError").field("error", &self.error).finish()
    }
}

impl<T> fmt::Display for InsertNodeError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.error.fmt(f) }
}

impl<T> Error for InsertNodeError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> { Some(&self.error) }
}
