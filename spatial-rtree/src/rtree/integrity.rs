//! Structural integrity checking for the R-Tree.
//!
//! The checker walks every node reachable from the root and records each
//! invariant that does not hold instead of stopping at the first one.

use super::rtree_arena::NodeArena;
use super::rtree_config::RTreeConfig;
use super::rtree_types::{NodeId, NodeKind};

/// Result of integrity check operation
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    /// Total nodes visited
    pub nodes_checked: usize,
    /// Stored objects reachable from the root
    pub items_counted: usize,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            items_counted: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Check branching bounds, tight entry boxes, parent links, uniform leaf
/// depth, levels and the stored object count.
pub(crate) fn check_tree<T>(
    nodes: &NodeArena<T>,
    root: NodeId,
    config: &RTreeConfig,
    height: u32,
    size: usize,
) -> IntegrityReport {
    let mut report = IntegrityReport::new();

    let Some(root_node) = nodes.get(root) else {
        report.fail(format!("root {} is not allocated", root));
        return report;
    };
    if root_node.parent.is_some() {
        report.fail(format!("root {} has a parent", root));
    }
    if root_node.level() + 1 != height {
        report.fail(format!(
            "root level {} does not match height {}",
            root_node.level(),
            height
        ));
    }
    if !root_node.is_leaf() && root_node.len() < 2 {
        report.fail(format!("internal root {} has {} entries", root, root_node.len()));
    }

    // (node, expected level)
    let mut stack = vec![(root, root_node.level())];
    while let Some((id, expected_level)) = stack.pop() {
        let Some(node) = nodes.get(id) else {
            report.fail(format!("node {} is not allocated", id));
            continue;
        };
        report.nodes_checked += 1;

        if node.level() != expected_level {
            report.fail(format!(
                "node {} is at level {}, expected {}",
                id,
                node.level(),
                expected_level
            ));
        }
        if node.len() > config.max_children() {
            report.fail(format!(
                "node {} holds {} items, more than {}",
                id,
                node.len(),
                config.max_children()
            ));
        }
        if id != root && node.len() < config.min_children() {
            report.fail(format!(
                "node {} holds {} items, fewer than {}",
                id,
                node.len(),
                config.min_children()
            ));
        }

        match &node.kind {
            NodeKind::Leaf { entries } => {
                report.items_counted += entries.len();
                for entry in entries {
                    if entry.bbox.dimensions() != config.dimensions() {
                        report.fail(format!(
                            "leaf {} holds a {}-dimensional box",
                            id,
                            entry.bbox.dimensions()
                        ));
                    }
                }
            }
            NodeKind::Internal { entries, .. } => {
                for entry in entries {
                    let Some(child) = nodes.get(entry.child) else {
                        report.fail(format!("node {} points at freed node {}", id, entry.child));
                        continue;
                    };
                    if child.parent != Some(id) {
                        report.fail(format!(
                            "node {} has parent {:?}, expected {}",
                            entry.child, child.parent, id
                        ));
                    }
                    if !child.is_empty() && child.compute_bbox(config.dimensions()) != entry.bbox {
                        report.fail(format!(
                            "entry for node {} in node {} is {}, not its children's bounds",
                            entry.child, id, entry.bbox
                        ));
                    }
                    stack.push((entry.child, expected_level.saturating_sub(1)));
                }
            }
        }
    }

    if report.items_counted != size {
        report.fail(format!(
            "size is {} but {} items are reachable",
            size, report.items_counted
        ));
    }

    report
}
