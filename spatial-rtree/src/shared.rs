//! Thread-safe handle around an [`RTree`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::rtree::{IntegrityReport, RTree, RTreeStats, SpatialResult};
use crate::spatial::Spatial;

/// A cloneable, thread-safe R-Tree handle.
///
/// Every clone refers to the same tree. Mutations take the write lock and
/// run one at a time; read-only calls take the read lock and may run
/// concurrently with each other.
///
/// # Example
///
/// ```rust
/// use spatial_rtree::{BoundingBox, RTree, SharedRTree};
///
/// let shared = SharedRTree::new(RTree::new(2, 2, 8).unwrap());
/// let writer = shared.clone();
/// std::thread::spawn(move || {
///     writer.insert(BoundingBox::from_point(&[1.0, 2.0]).unwrap()).unwrap();
/// })
/// .join()
/// .unwrap();
/// assert_eq!(shared.size(), 1);
/// ```
pub struct SharedRTree<T> {
    inner: Arc<RwLock<RTree<T>>>,
}

impl<T> Clone for SharedRTree<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for SharedRTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.inner.read();
        f.debug_struct("SharedRTree")
            .field("size", &tree.size())
            .field("height", &tree.height())
            .finish()
    }
}

impl<T> SharedRTree<T> {
    pub fn new(tree: RTree<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Run `f` with shared access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&RTree<T>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the tree. Use this to make a
    /// sequence of mutations atomic with respect to other handles.
    pub fn write<R>(&self, f: impl FnOnce(&mut RTree<T>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn height(&self) -> u32 {
        self.inner.read().height()
    }

    pub fn stats(&self) -> RTreeStats {
        self.inner.read().stats()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.inner.read().check_integrity()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<T: Spatial> SharedRTree<T> {
    pub fn insert(&self, item: T) -> SpatialResult<()> {
        self.inner.write().insert(item)
    }
}

impl<T: Spatial + PartialEq> SharedRTree<T> {
    pub fn delete(&self, item: &T) -> SpatialResult<bool> {
        self.inner.write().delete(item)
    }

    pub fn contains(&self, item: &T) -> SpatialResult<bool> {
        self.inner.read().contains(item)
    }
}

impl<T> From<RTree<T>> for SharedRTree<T> {
    fn from(tree: RTree<T>) -> Self {
        Self::new(tree)
    }
}
