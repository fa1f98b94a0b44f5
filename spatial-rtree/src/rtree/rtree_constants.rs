//! R-Tree constants

/// Default number of dimensions
pub const DEFAULT_DIMENSIONS: usize = 2;

/// Default maximum entries per node
pub const DEFAULT_MAX_CHILDREN: usize = 64;

/// Default minimum entries per non-root node
pub const DEFAULT_MIN_CHILDREN: usize = 25;

/// Smallest legal minimum fill
pub const MIN_CHILDREN_FLOOR: usize = 1;
