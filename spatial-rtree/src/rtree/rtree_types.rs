//! Core types and data structures for the R-Tree.
//!
//! This module defines the fundamental types used throughout the R-Tree:
//! - Error types and result types
//! - Node types (Leaf and Internal) and their entries
//! - Statistics structures

use thiserror::Error;

use crate::bounding_box::BoundingBox;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("Dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Node ID - index of a node slot in the tree's arena
pub type NodeId = usize;

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about the shape of an R-Tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    /// Number of stored objects
    pub total_entries: usize,
    /// Number of levels, a lone leaf root counts as 1
    pub tree_height: u32,
    /// Live nodes, leaves included
    pub node_count: usize,
    /// Live leaf nodes
    pub leaf_count: usize,
    /// Freed arena slots waiting for reuse
    pub free_slots: usize,
}

// ============================================================================
// Node Types
// ============================================================================

/// An entry in a leaf node: a stored object and the bounds it reported on
/// insertion.
#[derive(Debug, Clone)]
pub struct LeafEntry<T> {
    pub bbox: BoundingBox,
    pub item: T,
}

/// A child reference in an internal node
#[derive(Debug, Clone)]
pub struct Entry {
    pub bbox: BoundingBox,
    pub child: NodeId,
}

/// Node payload: objects for a leaf, child entries for an internal node
#[derive(Debug, Clone)]
pub enum NodeKind<T> {
    /// Leaf node containing stored objects
    Leaf { entries: Vec<LeafEntry<T>> },
    /// Internal node containing child references
    Internal {
        entries: Vec<Entry>,
        level: u32, // Height from leaf level (leaves are 0)
    },
}

/// A tree vertex. Only the root has no parent.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub parent: Option<NodeId>,
    pub kind: NodeKind<T>,
}

impl<T> Node<T> {
    pub fn new_leaf(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf {
                entries: Vec::new(),
            },
        }
    }

    pub fn new_internal(parent: Option<NodeId>, level: u32, entries: Vec<Entry>) -> Self {
        Self {
            parent,
            kind: NodeKind::Internal { entries, level },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn level(&self) -> u32 {
        match &self.kind {
            NodeKind::Leaf { .. } => 0,
            NodeKind::Internal { level, .. } => *level,
        }
    }

    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { entries } => entries.len(),
            NodeKind::Internal { entries, .. } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the bounding box enclosing all children/entries
    pub fn compute_bbox(&self, dimensions: usize) -> BoundingBox {
        let mut bbox = BoundingBox::empty(dimensions);
        match &self.kind {
            NodeKind::Leaf { entries } => {
                for e in entries {
                    bbox.expand(&e.bbox);
                }
            }
            NodeKind::Internal { entries, .. } => {
                for e in entries {
                    bbox.expand(&e.bbox);
                }
            }
        }
        bbox
    }

    /// Position of the entry pointing at `child`, if this is its parent
    pub fn child_position(&self, child: NodeId) -> Option<usize> {
        match &self.kind {
            NodeKind::Internal { entries, .. } => entries.iter().position(|e| e.child == child),
            NodeKind::Leaf { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(x: f64, y: f64) -> BoundingBox {
        BoundingBox::from_point_and_lengths(&[x, y], &[1.0, 1.0]).unwrap()
    }

    #[test]
    fn test_leaf_node_shape() {
        let mut node: Node<u32> = Node::new_leaf(None);
        assert!(node.is_leaf());
        assert!(node.is_empty());
        assert_eq!(node.level(), 0);

        if let NodeKind::Leaf { entries } = &mut node.kind {
            entries.push(LeafEntry { bbox: unit_box(0.0, 0.0), item: 1 });
            entries.push(LeafEntry { bbox: unit_box(3.0, 1.0), item: 2 });
        }
        assert_eq!(node.len(), 2);
        assert_eq!(
            node.compute_bbox(2),
            BoundingBox::new(vec![0.0, 0.0], vec![4.0, 2.0]).unwrap()
        );
    }

    #[test]
    fn test_internal_node_child_position() {
        let node: Node<u32> = Node::new_internal(
            Some(7),
            2,
            vec![
                Entry { bbox: unit_box(0.0, 0.0), child: 4 },
                Entry { bbox: unit_box(1.0, 0.0), child: 9 },
            ],
        );
        assert!(!node.is_leaf());
        assert_eq!(node.level(), 2);
        assert_eq!(node.parent, Some(7));
        assert_eq!(node.child_position(9), Some(1));
        assert_eq!(node.child_position(5), None);
    }

    #[test]
    fn test_error_messages() {
        let err = SpatialError::DimensionMismatch { expected: 2, actual: 3 };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 2 dimensions, got 3"
        );
        let err = SpatialError::InvalidConfiguration("min_children must be at least 1".into());
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
