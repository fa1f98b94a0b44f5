//! # Spatial R-Tree
//!
//! This crate provides an in-memory R-Tree: a balanced tree storing
//! arbitrary objects by their axis-aligned bounding boxes, in any number of
//! dimensions.
//!
//! ## Features
//!
//! - **N-Dimensional**: Dimensionality is chosen when the tree is created
//! - **Guttman Insertion**: Least-enlargement leaf choice and quadratic split
//! - **Full Rebalancing on Delete**: Underfull nodes are condensed and their
//!   contents reinserted, the root collapses when it has a single child
//! - **Any Object**: Anything implementing [`Spatial`] can be stored, including
//!   handles such as `Arc<T>` or `&T`
//! - **Integrity Checking**: [`RTree::check_integrity`] verifies every
//!   structural invariant
//! - **Thread Safe Handle**: [`SharedRTree`] for one writer / many readers
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_rtree::{BoundingBox, RTree, Spatial};
//!
//! #[derive(Debug, PartialEq)]
//! struct Place {
//!     name: &'static str,
//!     location: BoundingBox,
//! }
//!
//! impl Spatial for Place {
//!     fn bounds(&self) -> BoundingBox {
//!         self.location.clone()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 2 dimensions, 2..=4 entries per node
//! let mut tree = RTree::new(2, 2, 4)?;
//!
//! let park = Place { name: "park", location: BoundingBox::from_point(&[3.0, 4.0])? };
//! let lake = Place {
//!     name: "lake",
//!     location: BoundingBox::from_point_and_lengths(&[10.0, 10.0], &[5.0, 2.0])?,
//! };
//! tree.insert(park)?;
//! tree.insert(lake)?;
//! assert_eq!(tree.size(), 2);
//!
//! let park = Place { name: "park", location: BoundingBox::from_point(&[3.0, 4.0])? };
//! assert!(tree.contains(&park)?);
//! assert!(tree.delete(&park)?);
//! assert_eq!(tree.size(), 1);
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod rtree;
pub mod shared;
pub mod spatial;

// Re-export R-Tree types
pub use bounding_box::BoundingBox;
pub use rtree::{
    IntegrityReport, Iter, RTree, RTreeConfig, RTreeStats, SpatialError, SpatialResult,
};
pub use shared::SharedRTree;
pub use spatial::Spatial;
