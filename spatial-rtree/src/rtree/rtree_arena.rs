//! Node storage for the R-Tree.
//!
//! Every node lives in a slot of a single `Vec`. Parent and child links are
//! plain slot indices, so the tree owns all nodes and there are no reference
//! cycles. Freed slots are kept on a free list and handed out again by
//! `allocate`, which keeps the arena from growing under insert/delete churn.

use std::ops::{Index, IndexMut};

use super::rtree_types::{Node, NodeId};

#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    slots: Vec<Option<Node<T>>>,
    free_slots: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    /// Store a node, reusing a freed slot when one is available.
    pub fn allocate(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free_slots.pop() {
            self.slots[id] = Some(node);
            return id;
        }
        self.slots.push(Some(node));
        self.slots.len() - 1
    }

    /// Release a slot and return the node it held.
    pub fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.slots.get_mut(id)?.take()?;
        self.free_slots.push(id);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id)?.as_mut()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_slots.len()
    }

    pub fn free_len(&self) -> usize {
        self.free_slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_slots.clear();
    }
}

// A dangling id inside the tree means the structure is already corrupt.
impl<T> Index<NodeId> for NodeArena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("R-Tree node {} is not allocated", id),
        }
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("R-Tree node {} is not allocated", id),
        }
    }
}
