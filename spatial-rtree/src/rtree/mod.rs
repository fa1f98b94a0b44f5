//! In-memory R-Tree.
//!
//! Nodes live in an arena and refer to each other by index:
//! - **Leaf nodes** hold stored objects together with their bounding boxes
//! - **Internal nodes** hold one entry per child: the child's covering box
//!   and its index
//! - **Parent links** are indices too, used only to walk back up during
//!   split and condense repairs

mod integrity;
mod rtree_arena;
mod rtree_config;
mod rtree_impl;
mod rtree_split;
pub(crate) mod rtree_types;
pub mod rtree_constants;

pub use integrity::IntegrityReport;
pub use rtree_config::RTreeConfig;
pub use rtree_impl::{Iter, RTree};
pub use rtree_types::{RTreeStats, SpatialError, SpatialResult};
