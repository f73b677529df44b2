//! Spatial indexing for nearest-point lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec3;

/// KD-tree over sphere points
///
/// Maps an arbitrary 3D position (a ray hit, a click, a hull vertex) back to
/// the id of the closest point in a [`PointSet`](crate::PointSet).
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
    len: usize,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build an index over `positions`; ids are slice positions
    ///
    /// Returns `None` for an empty slice, which has no nearest point.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_mesh::*;
    /// use glam::Vec3;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let positions = vec![Vec3::X, Vec3::Y, Vec3::Z];
    ///
    /// let index = SpatialIndex::new(&positions).unwrap();
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), 0);
    /// # }
    /// ```
    pub fn new(positions: &[Vec3]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let entries: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&entries),
            len: positions.len(),
        })
    }

    /// Build an index over a point set (positions narrowed to `f32`)
    pub fn from_points(points: &crate::PointSet) -> Option<Self> {
        let positions: Vec<Vec3> = points.iter().map(|p| p.as_vec3()).collect();
        Self::new(&positions)
    }

    /// Number of indexed points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Id of the indexed point nearest to `position`
    pub fn find_nearest(&self, position: Vec3) -> usize {
        self.find_nearest_with_distance(position).0
    }

    /// Id of the nearest point and its squared distance to `position`
    pub fn find_nearest_with_distance(&self, position: Vec3) -> (usize, f32) {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        (result.item, result.distance)
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;
    use crate::generation::generate_seeded_points;

    #[test]
    fn test_spatial_index_basic() {
        let positions = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];

        let index = SpatialIndex::new(&positions).unwrap();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());

        assert_eq!(index.find_nearest(Vec3::new(0.9, 0.1, 0.0)), 0);
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.95, 0.0)), 1);
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.1, 0.9)), 2);
        assert_eq!(index.find_nearest(Vec3::new(-0.8, 0.0, 0.0)), 3);
    }

    #[test]
    fn test_empty_index() {
        assert!(SpatialIndex::new(&[]).is_none());
    }

    #[test]
    fn test_every_point_finds_itself() {
        let points = generate_seeded_points(300, 11);
        let index = SpatialIndex::from_points(&points).unwrap();

        for (id, point) in points.iter().enumerate() {
            let (found, distance) = index.find_nearest_with_distance(point.as_vec3());
            assert_eq!(found, id);
            assert_eq!(distance, 0.0);
        }
    }
}
