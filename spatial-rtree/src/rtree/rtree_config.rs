//! Construction-time configuration for an R-Tree.

use super::rtree_constants::{
    DEFAULT_DIMENSIONS, DEFAULT_MAX_CHILDREN, DEFAULT_MIN_CHILDREN, MIN_CHILDREN_FLOOR,
};
use super::rtree_types::{SpatialError, SpatialResult};

/// Dimensionality and branching factors of an R-Tree.
///
/// A split of an overflowing node (`max_children + 1` items) must be able to
/// give both halves at least `min_children` items, so a valid configuration
/// needs `1 <= min_children` and `2 * min_children <= max_children`.
///
/// # Examples
///
/// ```rust
/// use spatial_rtree::RTreeConfig;
///
/// let config = RTreeConfig::new()
///     .with_dimensions(3)
///     .with_min_children(2)
///     .with_max_children(6);
/// assert!(config.validate().is_ok());
///
/// let bad = RTreeConfig::new().with_min_children(4).with_max_children(7);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RTreeConfig {
    dimensions: usize,
    min_children: usize,
    max_children: usize,
}

impl RTreeConfig {
    /// Creates a configuration with the default 2 dimensions and 25/64
    /// branching factors.
    pub fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            min_children: DEFAULT_MIN_CHILDREN,
            max_children: DEFAULT_MAX_CHILDREN,
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_min_children(mut self, min_children: usize) -> Self {
        self.min_children = min_children;
        self
    }

    #[must_use]
    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn min_children(&self) -> usize {
        self.min_children
    }

    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Checks the branching-factor constraints.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] when there are no
    /// dimensions, `min_children < 1`, or `max_children < 2 * min_children`.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.dimensions == 0 {
            return Err(SpatialError::InvalidConfiguration(
                "dimensions must be at least 1".into(),
            ));
        }
        if self.min_children < MIN_CHILDREN_FLOOR {
            return Err(SpatialError::InvalidConfiguration(format!(
                "min_children must be at least {}, got {}",
                MIN_CHILDREN_FLOOR, self.min_children
            )));
        }
        if self.max_children < self.min_children.saturating_mul(2) {
            return Err(SpatialError::InvalidConfiguration(format!(
                "max_children ({}) must be at least twice min_children ({})",
                self.max_children, self.min_children
            )));
        }
        Ok(())
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
