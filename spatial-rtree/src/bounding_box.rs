use std::hash::Hash;

use crate::rtree::rtree_types::{SpatialError, SpatialResult};

/// An axis-aligned bounding box in a fixed number of dimensions.
///
/// `BoundingBox` stores one closed `[min, max]` interval per axis. It's used
/// by the R-Tree both as the region of a stored object and as the covering
/// region of every subtree.
///
/// # Examples
///
/// ```rust
/// use spatial_rtree::BoundingBox;
///
/// // A 2D box from (0,0) to (10,5)
/// let bbox = BoundingBox::new(vec![0.0, 0.0], vec![10.0, 5.0]).unwrap();
/// assert_eq!(bbox.size(), 50.0);
///
/// // The same box from a corner point and side lengths
/// let other = BoundingBox::from_point_and_lengths(&[0.0, 0.0], &[10.0, 5.0]).unwrap();
/// assert_eq!(bbox, other);
/// ```
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBoundingBox"))]
pub struct BoundingBox {
    min: Vec<f64>,
    max: Vec<f64>,
}

/// Unvalidated wire form, checked through [`BoundingBox::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBoundingBox {
    min: Vec<f64>,
    max: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = SpatialError;

    fn try_from(raw: RawBoundingBox) -> SpatialResult<Self> {
        BoundingBox::new(raw.min, raw.max)
    }
}

impl Eq for BoundingBox {}

impl Hash for BoundingBox {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for v in self.min.iter().chain(self.max.iter()) {
            // -0.0 == 0.0, so both must hash alike
            let v = if *v == 0.0 { 0.0f64 } else { *v };
            v.to_bits().hash(state);
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox(")?;
        for (i, (lo, hi)) in self.min.iter().zip(self.max.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", lo, hi)?;
        }
        write!(f, ")")
    }
}

impl BoundingBox {
    /// Creates a new bounding box from its minimum and maximum corners.
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum coordinate on each axis
    /// * `max` - Maximum coordinate on each axis
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidBoundingBox`] if the corners have
    /// different lengths, no axes, non-finite coordinates, or `min > max`
    /// on some axis.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> SpatialResult<BoundingBox> {
        if min.len() != max.len() {
            return Err(SpatialError::InvalidBoundingBox(format!(
                "corner lengths differ: min has {} axes, max has {}",
                min.len(),
                max.len()
            )));
        }
        if min.is_empty() {
            return Err(SpatialError::InvalidBoundingBox(
                "bounding box needs at least one dimension".into(),
            ));
        }
        for (axis, (lo, hi)) in min.iter().zip(max.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(SpatialError::InvalidBoundingBox(format!(
                    "non-finite coordinate on axis {}",
                    axis
                )));
            }
            if lo > hi {
                return Err(SpatialError::InvalidBoundingBox(format!(
                    "min {} exceeds max {} on axis {}",
                    lo, hi, axis
                )));
            }
        }
        Ok(BoundingBox { min, max })
    }

    /// Creates a bounding box from a corner point and the side length along
    /// each axis. Zero lengths give a degenerate (zero-size) box.
    pub fn from_point_and_lengths(point: &[f64], lengths: &[f64]) -> SpatialResult<BoundingBox> {
        if point.len() != lengths.len() {
            return Err(SpatialError::InvalidBoundingBox(format!(
                "point has {} axes but {} lengths were given",
                point.len(),
                lengths.len()
            )));
        }
        if let Some(axis) = lengths.iter().position(|l| !l.is_finite() || *l < 0.0) {
            return Err(SpatialError::InvalidBoundingBox(format!(
                "side length on axis {} must be finite and non-negative",
                axis
            )));
        }
        let max = point.iter().zip(lengths).map(|(p, l)| p + l).collect();
        BoundingBox::new(point.to_vec(), max)
    }

    /// Creates a zero-size bounding box located at `point`.
    pub fn from_point(point: &[f64]) -> SpatialResult<BoundingBox> {
        BoundingBox::new(point.to_vec(), point.to_vec())
    }

    /// Box with inverted infinite extents on every axis; merging anything
    /// into it yields that thing.
    pub(crate) fn empty(dimensions: usize) -> BoundingBox {
        BoundingBox {
            min: vec![f64::INFINITY; dimensions],
            max: vec![f64::NEG_INFINITY; dimensions],
        }
    }

    /// Returns the number of axes.
    pub fn dimensions(&self) -> usize {
        self.min.len()
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Returns the side length along `axis`.
    pub fn length(&self, axis: usize) -> f64 {
        (self.max[axis] - self.min[axis]).max(0.0)
    }

    /// Returns the hyper-volume of the box (area in 2D, volume in 3D).
    /// Degenerate boxes have size zero.
    pub fn size(&self) -> f64 {
        (0..self.dimensions()).map(|axis| self.length(axis)).product()
    }

    /// Returns the sum of the side lengths.
    pub fn margin(&self) -> f64 {
        (0..self.dimensions()).map(|axis| self.length(axis)).sum()
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Vec<f64> {
        self.min
            .iter()
            .zip(self.max.iter())
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect()
    }

    /// Returns the smallest box containing both `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if the boxes have a
    /// different number of axes.
    pub fn merge(&self, other: &BoundingBox) -> SpatialResult<BoundingBox> {
        self.check_dimensions(other)?;
        let mut merged = self.clone();
        merged.expand(other);
        Ok(merged)
    }

    /// Checks if the two boxes share at least one point. Boxes that only
    /// touch on a face overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> SpatialResult<bool> {
        self.check_dimensions(other)?;
        Ok(self.intersects(other))
    }

    /// Checks if this box fully contains another box.
    pub fn contains(&self, other: &BoundingBox) -> SpatialResult<bool> {
        self.check_dimensions(other)?;
        Ok(self
            .min
            .iter()
            .zip(other.min.iter())
            .all(|(a, b)| a <= b)
            && self.max.iter().zip(other.max.iter()).all(|(a, b)| a >= b))
    }

    /// Checks if this box contains a point.
    pub fn contains_point(&self, point: &[f64]) -> SpatialResult<bool> {
        if point.len() != self.dimensions() {
            return Err(SpatialError::DimensionMismatch {
                expected: self.dimensions(),
                actual: point.len(),
            });
        }
        Ok(point
            .iter()
            .enumerate()
            .all(|(axis, p)| *p >= self.min[axis] && *p <= self.max[axis]))
    }

    fn check_dimensions(&self, other: &BoundingBox) -> SpatialResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(SpatialError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    // Unchecked variants used inside the tree, where every box has already
    // been validated against the tree's dimensionality.

    pub(crate) fn intersects(&self, other: &BoundingBox) -> bool {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.min
            .iter()
            .zip(self.max.iter())
            .zip(other.min.iter().zip(other.max.iter()))
            .all(|((a_lo, a_hi), (b_lo, b_hi))| a_lo <= b_hi && a_hi >= b_lo)
    }

    pub(crate) fn expand(&mut self, other: &BoundingBox) {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        for (lo, o) in self.min.iter_mut().zip(other.min.iter()) {
            *lo = lo.min(*o);
        }
        for (hi, o) in self.max.iter_mut().zip(other.max.iter()) {
            *hi = hi.max(*o);
        }
    }

    /// Size of the box merged with `other`, without allocating the merge.
    pub(crate) fn merged_size(&self, other: &BoundingBox) -> f64 {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        (0..self.dimensions())
            .map(|axis| {
                let lo = self.min[axis].min(other.min[axis]);
                let hi = self.max[axis].max(other.max[axis]);
                (hi - lo).max(0.0)
            })
            .product()
    }

    /// Growth in size needed for this box to also cover `other`.
    pub(crate) fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.merged_size(other) - self.size()
    }
}
