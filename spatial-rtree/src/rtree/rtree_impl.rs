//! RTree implementation.
//!
//! Insertion follows section 3.2 and deletion section 3.3 of "R-trees: A
//! Dynamic Index Structure for Spatial Searching" (A. Guttman, SIGMOD 1984).

use crate::bounding_box::BoundingBox;
use crate::spatial::Spatial;

use super::integrity::{check_tree, IntegrityReport};
use super::rtree_arena::NodeArena;
use super::rtree_config::RTreeConfig;
use super::rtree_split::quadratic_split;
use super::rtree_types::{
    Entry, LeafEntry, Node, NodeId, NodeKind, RTreeStats, SpatialError, SpatialResult,
};

/// An in-memory R-Tree storing objects by their bounding boxes.
///
/// The tree is a single-writer structure: mutation takes `&mut self`. Wrap it
/// in a [`SharedRTree`](crate::SharedRTree) to share it between threads.
///
/// # Example
///
/// ```rust
/// use spatial_rtree::{BoundingBox, RTree};
///
/// let mut tree: RTree<BoundingBox> = RTree::new(2, 2, 4).unwrap();
/// let a = BoundingBox::from_point(&[1.0, 1.0]).unwrap();
/// tree.insert(a.clone()).unwrap();
/// assert_eq!(tree.size(), 1);
///
/// assert!(tree.delete(&a).unwrap());
/// assert!(!tree.delete(&a).unwrap());
/// assert!(tree.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RTree<T> {
    config: RTreeConfig,
    nodes: NodeArena<T>,
    root: NodeId,
    /// Number of levels, a lone leaf root counts as 1
    height: u32,
    /// Number of stored objects
    size: usize,
}

impl<T> RTree<T> {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidConfiguration`] if `dimensions == 0`,
    /// `min_children < 1` or `max_children < 2 * min_children`.
    pub fn new(dimensions: usize, min_children: usize, max_children: usize) -> SpatialResult<Self> {
        Self::with_config(
            RTreeConfig::new()
                .with_dimensions(dimensions)
                .with_min_children(min_children)
                .with_max_children(max_children),
        )
    }

    /// Create an empty tree from a configuration.
    pub fn with_config(config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        let mut nodes = NodeArena::new();
        let root = nodes.allocate(Node::new_leaf(None));
        log::debug!(
            "Created R-Tree with {} dimensions, branching {}..={}",
            config.dimensions(),
            config.min_children(),
            config.max_children()
        );
        Ok(Self {
            config,
            nodes,
            root,
            height: 1,
            size: 0,
        })
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions()
    }

    pub fn min_children(&self) -> usize {
        self.config.min_children()
    }

    pub fn max_children(&self) -> usize {
        self.config.max_children()
    }

    /// Number of objects currently stored in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels in the tree. An empty tree or a tree whose root is a
    /// leaf has height 1.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The box covering every stored object, or `None` for an empty tree.
    pub fn bounds(&self) -> Option<BoundingBox> {
        if self.nodes[self.root].is_empty() {
            return None;
        }
        Some(self.nodes[self.root].compute_bbox(self.dimensions()))
    }

    /// Iterate over every stored object, leaf by leaf.
    pub fn iter(&self) -> Iter<'_, T> {
        let empty: &[LeafEntry<T>] = &[];
        Iter {
            nodes: &self.nodes,
            stack: vec![self.root],
            current: empty.iter(),
        }
    }

    /// Remove every object and reset the tree to a single empty leaf.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.allocate(Node::new_leaf(None));
        self.height = 1;
        self.size = 0;
    }

    /// Get statistics about the tree's shape
    pub fn stats(&self) -> RTreeStats {
        let mut leaf_count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id].kind {
                NodeKind::Leaf { .. } => leaf_count += 1,
                NodeKind::Internal { entries, .. } => stack.extend(entries.iter().map(|e| e.child)),
            }
        }

        RTreeStats {
            total_entries: self.size,
            tree_height: self.height,
            node_count: self.nodes.len(),
            leaf_count,
            free_slots: self.nodes.free_len(),
        }
    }

    /// Walk the whole tree and report every structural invariant that does
    /// not hold. A tree only ever mutated through this API reports valid.
    pub fn check_integrity(&self) -> IntegrityReport {
        check_tree(&self.nodes, self.root, &self.config, self.height, self.size)
    }

    fn check_dimensions(&self, bbox: &BoundingBox) -> SpatialResult<()> {
        if bbox.dimensions() != self.dimensions() {
            return Err(SpatialError::DimensionMismatch {
                expected: self.dimensions(),
                actual: bbox.dimensions(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Descend from `node_id` to the node at `level` whose box needs the least
    /// enlargement to cover `bbox`. Ties go to the smaller box, then to the
    /// first entry.
    fn choose_node(&self, node_id: NodeId, bbox: &BoundingBox, level: u32) -> NodeId {
        match &self.nodes[node_id].kind {
            NodeKind::Internal {
                entries,
                level: node_level,
            } if *node_level > level => {
                let mut best_idx = 0;
                let mut best_enlargement = f64::INFINITY;
                let mut best_size = f64::INFINITY;

                for (i, entry) in entries.iter().enumerate() {
                    let enlargement = entry.bbox.enlargement(bbox);
                    let size = entry.bbox.size();

                    if enlargement < best_enlargement
                        || (enlargement == best_enlargement && size < best_size)
                    {
                        best_enlargement = enlargement;
                        best_size = size;
                        best_idx = i;
                    }
                }

                log::trace!(
                    "choose_node: node {} level {} -> entry {} (enlargement {})",
                    node_id,
                    node_level,
                    best_idx,
                    best_enlargement
                );
                self.choose_node(entries[best_idx].child, bbox, level)
            }
            _ => node_id,
        }
    }

    /// Place a leaf entry and repair the tree. Does not touch `size`.
    fn insert_leaf_entry(&mut self, entry: LeafEntry<T>) {
        let leaf = self.choose_node(self.root, &entry.bbox, 0);
        if let NodeKind::Leaf { entries } = &mut self.nodes[leaf].kind {
            entries.push(entry);
        }
        let split = self.split_if_overflowing(leaf);
        self.adjust_tree(leaf, split);
    }

    /// Hang a whole subtree back into the tree one level above its root.
    fn insert_subtree(&mut self, entry: Entry) {
        let level = self.nodes[entry.child].level() + 1;
        let target = self.choose_node(self.root, &entry.bbox, level);
        debug_assert_eq!(self.nodes[target].level(), level);

        self.nodes[entry.child].parent = Some(target);
        if let NodeKind::Internal { entries, .. } = &mut self.nodes[target].kind {
            entries.push(entry);
        }
        let split = self.split_if_overflowing(target);
        self.adjust_tree(target, split);
    }

    /// Split `node_id` if it holds more than `max_children` items. The node
    /// keeps one group, the other group moves to a new sibling with the same
    /// parent, which is returned. The sibling is not yet linked from the
    /// parent.
    fn split_if_overflowing(&mut self, node_id: NodeId) -> Option<NodeId> {
        if self.nodes[node_id].len() <= self.max_children() {
            return None;
        }

        let min_children = self.min_children();
        let node = &mut self.nodes[node_id];
        let parent = node.parent;
        let sibling_kind = match &mut node.kind {
            NodeKind::Leaf { entries } => {
                let (left, right) = quadratic_split(std::mem::take(entries), min_children);
                *entries = left;
                NodeKind::Leaf { entries: right }
            }
            NodeKind::Internal { entries, level } => {
                let (left, right) = quadratic_split(std::mem::take(entries), min_children);
                *entries = left;
                NodeKind::Internal {
                    entries: right,
                    level: *level,
                }
            }
        };

        let sibling = self.nodes.allocate(Node {
            parent,
            kind: sibling_kind,
        });
        if let NodeKind::Internal { entries, .. } = &self.nodes[sibling].kind {
            let moved: Vec<NodeId> = entries.iter().map(|e| e.child).collect();
            for child in moved {
                self.nodes[child].parent = Some(sibling);
            }
        }

        log::debug!(
            "Split node {} at level {}: {} / {} items, new sibling {}",
            node_id,
            self.nodes[node_id].level(),
            self.nodes[node_id].len(),
            self.nodes[sibling].len(),
            sibling
        );
        Some(sibling)
    }

    /// Walk from `node_id` to the root, refreshing entry boxes and linking in
    /// split siblings. A split that reaches the root grows a new root.
    fn adjust_tree(&mut self, mut node_id: NodeId, mut split: Option<NodeId>) {
        while let Some(parent_id) = self.nodes[node_id].parent {
            self.refresh_entry(parent_id, node_id);

            if let Some(sibling) = split.take() {
                let bbox = self.nodes[sibling].compute_bbox(self.dimensions());
                if let NodeKind::Internal { entries, .. } = &mut self.nodes[parent_id].kind {
                    entries.push(Entry {
                        bbox,
                        child: sibling,
                    });
                }
                split = self.split_if_overflowing(parent_id);
            }

            node_id = parent_id;
        }

        if let Some(sibling) = split {
            self.grow_root(node_id, sibling);
        }
    }

    fn grow_root(&mut self, old_root: NodeId, sibling: NodeId) {
        let dimensions = self.dimensions();
        let level = self.nodes[old_root].level() + 1;
        let entries = vec![
            Entry {
                bbox: self.nodes[old_root].compute_bbox(dimensions),
                child: old_root,
            },
            Entry {
                bbox: self.nodes[sibling].compute_bbox(dimensions),
                child: sibling,
            },
        ];

        let new_root = self.nodes.allocate(Node::new_internal(None, level, entries));
        self.nodes[old_root].parent = Some(new_root);
        self.nodes[sibling].parent = Some(new_root);
        self.root = new_root;
        self.height += 1;
        log::debug!("Root split, tree height is now {}", self.height);
    }

    /// Recompute the box of `child_id`'s entry in `parent_id`.
    fn refresh_entry(&mut self, parent_id: NodeId, child_id: NodeId) {
        let bbox = self.nodes[child_id].compute_bbox(self.dimensions());
        let parent = &mut self.nodes[parent_id];
        let Some(pos) = parent.child_position(child_id) else {
            return;
        };
        if let NodeKind::Internal { entries, .. } = &mut parent.kind {
            entries[pos].bbox = bbox;
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Walk from a leaf that just lost an item up to the root. Underfull
    /// non-root nodes are cut out of the tree and their contents reinserted,
    /// every other node on the path gets its entry box refreshed.
    fn condense_tree(&mut self, leaf: NodeId) {
        let min_children = self.min_children();
        let mut eliminated = Vec::new();
        let mut node_id = leaf;

        while let Some(parent_id) = self.nodes[node_id].parent {
            if self.nodes[node_id].len() < min_children {
                self.detach(parent_id, node_id);
                eliminated.push(node_id);
            } else {
                self.refresh_entry(parent_id, node_id);
            }
            node_id = parent_id;
        }

        if eliminated.is_empty() {
            return;
        }
        log::debug!("Condense: reinserting contents of {} underfull nodes", eliminated.len());

        for id in eliminated {
            let Some(node) = self.nodes.free(id) else {
                continue;
            };
            match node.kind {
                NodeKind::Leaf { entries } => {
                    for entry in entries {
                        self.insert_leaf_entry(entry);
                    }
                }
                NodeKind::Internal { entries, .. } => {
                    for entry in entries {
                        self.insert_subtree(entry);
                    }
                }
            }
        }
    }

    /// Remove `child_id`'s entry from `parent_id`.
    fn detach(&mut self, parent_id: NodeId, child_id: NodeId) {
        let parent = &mut self.nodes[parent_id];
        if let Some(pos) = parent.child_position(child_id) {
            if let NodeKind::Internal { entries, .. } = &mut parent.kind {
                entries.remove(pos);
            }
        }
        self.nodes[child_id].parent = None;
    }

    /// Replace an internal root holding a single entry with that entry's
    /// child.
    fn collapse_root(&mut self) {
        loop {
            let child = match &self.nodes[self.root].kind {
                NodeKind::Internal { entries, .. } if entries.len() == 1 => entries[0].child,
                _ => return,
            };
            self.nodes.free(self.root);
            self.nodes[child].parent = None;
            self.root = child;
            self.height -= 1;
            log::debug!("Root collapsed, tree height is now {}", self.height);
        }
    }
}

impl<T: Spatial> RTree<T> {
    /// Insert an object.
    ///
    /// If insertion overflows a leaf, the tree is rebalanced automatically.
    ///
    /// # Errors
    ///
    /// [`SpatialError::DimensionMismatch`] if the object's bounds do not have
    /// the tree's dimensionality. The tree is left unchanged.
    pub fn insert(&mut self, item: T) -> SpatialResult<()> {
        let bbox = item.bounds();
        self.check_dimensions(&bbox)?;

        self.insert_leaf_entry(LeafEntry { bbox, item });
        self.size += 1;
        Ok(())
    }

    /// Insert objects in order, stopping at the first one that fails.
    /// Objects inserted before the failure stay in the tree.
    pub fn insert_all<I>(&mut self, items: I) -> SpatialResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.insert(item)?;
        }
        Ok(())
    }
}

impl<T: Spatial + PartialEq> RTree<T> {
    /// Remove one occurrence of an object.
    ///
    /// Returns `Ok(false)` if no stored object equals `item`, in which case
    /// the tree is unchanged.
    ///
    /// # Errors
    ///
    /// [`SpatialError::DimensionMismatch`] if the object's bounds do not have
    /// the tree's dimensionality.
    pub fn delete(&mut self, item: &T) -> SpatialResult<bool> {
        let bbox = item.bounds();
        self.check_dimensions(&bbox)?;

        let Some((leaf, pos)) = self.find_leaf(self.root, &bbox, item) else {
            log::trace!("delete: no stored object matches {}", bbox);
            return Ok(false);
        };

        if let NodeKind::Leaf { entries } = &mut self.nodes[leaf].kind {
            entries.remove(pos);
        }
        self.condense_tree(leaf);
        self.collapse_root();
        self.size -= 1;
        Ok(true)
    }

    /// Check whether an object equal to `item` is stored.
    pub fn contains(&self, item: &T) -> SpatialResult<bool> {
        let bbox = item.bounds();
        self.check_dimensions(&bbox)?;
        Ok(self.find_leaf(self.root, &bbox, item).is_some())
    }

    /// Find the leaf slot holding `item`. Boxes of sibling subtrees may
    /// overlap, so every entry overlapping `bbox` is searched.
    fn find_leaf(&self, node_id: NodeId, bbox: &BoundingBox, item: &T) -> Option<(NodeId, usize)> {
        match &self.nodes[node_id].kind {
            NodeKind::Leaf { entries } => entries
                .iter()
                .position(|e| e.item == *item)
                .map(|pos| (node_id, pos)),
            NodeKind::Internal { entries, .. } => entries
                .iter()
                .filter(|e| e.bbox.intersects(bbox))
                .find_map(|e| self.find_leaf(e.child, bbox, item)),
        }
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Depth-first iterator over the objects stored in an [`RTree`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    nodes: &'a NodeArena<T>,
    stack: Vec<NodeId>,
    current: std::slice::Iter<'a, LeafEntry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(&entry.item);
            }
            let id = self.stack.pop()?;
            let nodes = self.nodes;
            match &nodes[id].kind {
                NodeKind::Leaf { entries } => self.current = entries.iter(),
                NodeKind::Internal { entries, .. } => {
                    self.stack.extend(entries.iter().rev().map(|e| e.child))
                }
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a RTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
