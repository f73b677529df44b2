//! Point set structure
//!
//! The ordered collection of sampled sphere points that triangle indices refer to.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single point on the unit sphere
pub type Point3 = DVec3;

/// Indices of one triangle into a [`PointSet`]
///
/// The three indices are pairwise distinct and each is `< PointSet::len()`.
pub type TriangleIndex = [u32; 3];

/// An ordered, read-only sequence of sphere points
///
/// Created once by the sampler and never mutated afterwards. Triangle indices
/// produced by the triangulators refer to positions in this sequence, so the
/// order is significant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    /// Create a point set from an ordered list of points
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Number of points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get a point by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    /// All points as a slice
    #[inline]
    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    /// Iterate over the points in order
    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    /// Consume the set and return the underlying points
    pub fn into_inner(self) -> Vec<Point3> {
        self.points
    }

    /// Resolve a triangle's indices into its three corner points
    ///
    /// Returns `None` if any index is out of range.
    pub fn triangle(&self, triangle: TriangleIndex) -> Option<[Point3; 3]> {
        let [a, b, c] = triangle;
        Some([
            self.get(a as usize)?,
            self.get(b as usize)?,
            self.get(c as usize)?,
        ])
    }
}

impl From<Vec<Point3>> for PointSet {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
