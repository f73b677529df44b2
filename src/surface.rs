//! SphereSurface main structure

use std::collections::HashSet;
use std::time::Instant;

use glam::DVec3;

use crate::config::{MeshOptions, SphereMeshConfig};
use crate::generation::{generate_random_points, generate_seeded_points, generate_sphere_points, triangulate, UniformSource};
use crate::mesh::{mesh_from_triangles, MeshData};
use crate::point_set::{PointSet, TriangleIndex};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A sampled, triangulated and meshed sphere
///
/// Runs the whole pipeline once at construction (sample → triangulate →
/// build mesh) and keeps every stage's output for queries. Nothing is
/// recomputed afterwards.
///
/// # Examples
///
/// ```
/// use sphere_mesh::*;
///
/// let config = SphereMeshConfigBuilder::new()
///     .seed(42)
///     .point_count(500)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let surface = SphereSurface::generate(config);
/// println!("Generated {} triangles", surface.triangle_count());
///
/// // Hand the mesh to the renderer
/// let mesh = surface.into_mesh();
/// assert_eq!(mesh.vertex_count() % 3, 0);
/// ```
#[derive(Clone)]
pub struct SphereSurface {
    /// Configuration used to generate this surface
    config: SphereMeshConfig,

    /// Sampled points (indexed by point id)
    points: PointSet,

    /// Triangle index triples into `points`
    triangles: Vec<TriangleIndex>,

    /// Flat-shaded mesh built from `points` and `triangles`
    mesh: MeshData,

    /// Sorted ids of points sharing a triangle with each point
    neighbors: Vec<Vec<usize>>,

    /// Spatial index for position-to-point lookups (absent for an empty surface)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl SphereSurface {
    /// Generate a surface from configuration
    ///
    /// Samples with a `ChaCha8Rng` when `config.seed` is set, otherwise with
    /// the thread-local RNG. Never fails: a zero point count or degenerate
    /// geometry yields an empty mesh.
    pub fn generate(config: SphereMeshConfig) -> Self {
        let points = match config.seed {
            Some(seed) => generate_seeded_points(config.point_count, seed),
            None => generate_random_points(config.point_count),
        };
        Self::assemble(config, points)
    }

    /// Generate a surface drawing uniform values from `source`
    ///
    /// `config.seed` is ignored; the source alone decides the points.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_mesh::*;
    /// use sphere_mesh::generation::SequenceSource;
    ///
    /// let mut source = SequenceSource::new(vec![0.1, 0.9, 0.35, 0.2, 0.6, 0.5, 0.85, 0.4]);
    /// let config = SphereMeshConfigBuilder::new().point_count(4).unwrap().build().unwrap();
    /// let surface = SphereSurface::generate_with_source(config, &mut source);
    /// assert_eq!(surface.point_count(), 4);
    /// ```
    pub fn generate_with_source<S>(config: SphereMeshConfig, source: &mut S) -> Self
    where
        S: UniformSource + ?Sized,
    {
        let points = generate_sphere_points(config.point_count, source);
        Self::assemble(config, points)
    }

    /// Triangulate and mesh an existing point set
    ///
    /// The stored configuration records the point count and `options`.
    pub fn from_points(points: PointSet, options: &MeshOptions) -> Self {
        let config = SphereMeshConfig {
            point_count: points.len(),
            seed: None,
            triangulation: options.triangulation,
            normal_fallback: options.normal_fallback,
        };
        Self::assemble(config, points)
    }

    fn assemble(config: SphereMeshConfig, points: PointSet) -> Self {
        let start = Instant::now();

        let triangles = if points.len() < 3 {
            tracing::warn!(points = points.len(), "too few points to triangulate, surface will be empty");
            Vec::new()
        } else {
            triangulate(&points, config.triangulation)
        };

        if points.len() >= 3 && triangles.is_empty() {
            tracing::warn!(points = points.len(), "triangulation is degenerate, surface will be empty");
        }

        let mesh = mesh_from_triangles(&points, &triangles, config.normal_fallback);
        let neighbors = build_point_neighbors(points.len(), &triangles);

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::from_points(&points);

        tracing::debug!(
            points = points.len(),
            triangles = triangles.len(),
            elapsed = ?start.elapsed(),
            "sphere surface generated"
        );

        Self {
            config,
            points,
            triangles,
            mesh,
            neighbors,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Get the configuration used to generate this surface
    #[inline]
    pub fn config(&self) -> &SphereMeshConfig {
        &self.config
    }

    /// Get the sampled points
    #[inline]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Get the triangle index triples
    #[inline]
    pub fn triangles(&self) -> &[TriangleIndex] {
        &self.triangles
    }

    /// Get the render mesh
    #[inline]
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Get the number of sampled points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Get the number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the surface has no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get the ids of points that share a triangle with `point_id`
    ///
    /// Returns an empty slice if the id is invalid or the point is unused.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_mesh::*;
    /// # let surface = SphereSurface::generate(SphereMeshConfigBuilder::new().seed(1).build().unwrap());
    /// let neighbors = surface.neighbors(0);
    /// println!("Point 0 has {} neighbors", neighbors.len());
    /// ```
    pub fn neighbors(&self, point_id: usize) -> &[usize] {
        self.neighbors
            .get(point_id)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Find the sampled point nearest to a position (requires spatial-index feature)
    ///
    /// Uses the KD-tree for O(log n) lookup; handy for turning a ray hit on
    /// the rendered sphere back into a point id. Returns `None` for an empty
    /// surface.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_mesh::*;
    /// # use glam::DVec3;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let surface = SphereSurface::generate(SphereMeshConfigBuilder::new().seed(1).build().unwrap());
    /// let id = surface.find_nearest_point(DVec3::Z).unwrap();
    /// println!("North pole is closest to point {}", id);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_nearest_point(&self, position: DVec3) -> Option<usize> {
        self.spatial_index
            .as_ref()
            .map(|index| index.find_nearest(position.as_vec3()))
    }

    /// Find the sampled point nearest to a position by linear scan
    #[cfg(not(feature = "spatial-index"))]
    pub fn find_nearest_point(&self, position: DVec3) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(id, _)| id)
    }

    /// Consume the surface and hand its mesh to the renderer
    pub fn into_mesh(self) -> MeshData {
        self.mesh
    }
}

/// Build sorted neighbor lists from triangle connectivity
///
/// Two points are neighbors if they share at least one triangle.
fn build_point_neighbors(point_count: usize, triangles: &[TriangleIndex]) -> Vec<Vec<usize>> {
    let mut sets: Vec<HashSet<usize>> = vec![HashSet::new(); point_count];

    for tri in triangles {
        for (k, &id) in tri.iter().enumerate() {
            let Some(set) = sets.get_mut(id as usize) else {
                continue;
            };
            set.insert(tri[(k + 1) % 3] as usize);
            set.insert(tri[(k + 2) % 3] as usize);
        }
    }

    sets.into_iter()
        .map(|set| {
            let mut list: Vec<usize> = set.into_iter().collect();
            list.sort_unstable(); // Deterministic ordering
            list
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SphereMeshConfigBuilder, TriangulationMode};
    use crate::generation::SequenceSource;

    fn seeded_config(count: usize) -> SphereMeshConfig {
        SphereMeshConfigBuilder::new()
            .seed(42)
            .point_count(count)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_surface_generation() {
        let surface = SphereSurface::generate(seeded_config(500));

        assert_eq!(surface.point_count(), 500);
        assert!(surface.triangle_count() > 0);
        assert!(!surface.is_empty());
        assert_eq!(surface.mesh().triangle_count(), surface.triangle_count());
        assert_eq!(surface.mesh().flat_positions().len() % 9, 0);
        assert_eq!(surface.config().seed, Some(42));
    }

    #[test]
    fn test_seeded_surface_is_reproducible() {
        let a = SphereSurface::generate(seeded_config(300));
        let b = SphereSurface::generate(seeded_config(300));

        assert_eq!(a.points(), b.points());
        assert_eq!(a.triangles(), b.triangles());
        assert_eq!(a.mesh(), b.mesh());
    }

    #[test]
    fn test_unseeded_surface() {
        let config = SphereMeshConfigBuilder::new().point_count(100).unwrap().build().unwrap();
        let surface = SphereSurface::generate(config);
        assert_eq!(surface.point_count(), 100);
        assert!(surface.triangle_count() > 0);
    }

    #[test]
    fn test_zero_points() {
        let surface = SphereSurface::generate(seeded_config(0));
        assert_eq!(surface.point_count(), 0);
        assert!(surface.is_empty());
        assert!(surface.mesh().is_empty());
        assert!(surface.neighbors(0).is_empty());
        assert_eq!(surface.find_nearest_point(DVec3::Z), None);
    }

    #[test]
    fn test_two_points() {
        let surface = SphereSurface::generate(seeded_config(2));
        assert_eq!(surface.point_count(), 2);
        assert!(surface.mesh().is_empty());
    }

    #[test]
    fn test_generate_with_source() {
        let mut source = SequenceSource::new(vec![0.1, 0.9, 0.35, 0.2, 0.6, 0.5, 0.85, 0.4]);
        let config = SphereMeshConfigBuilder::new().point_count(4).unwrap().build().unwrap();
        let surface = SphereSurface::generate_with_source(config, &mut source);

        assert_eq!(surface.point_count(), 4);
        for point in surface.points() {
            assert!((point.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_from_points_tetrahedron() {
        let points: PointSet = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ]
        .into();

        let surface = SphereSurface::from_points(points, &MeshOptions::default());
        assert!(surface.triangle_count() >= 1);
        assert_eq!(surface.config().point_count, 4);
        assert_eq!(surface.mesh().vertex_count(), 3 * surface.triangle_count());
    }

    #[test]
    fn test_neighbor_symmetry() {
        let surface = SphereSurface::generate(seeded_config(200));

        for id in 0..surface.point_count() {
            for &neighbor in surface.neighbors(id) {
                assert_ne!(neighbor, id);
                assert!(
                    surface.neighbors(neighbor).contains(&id),
                    "Neighbor relationship should be symmetric"
                );
            }
        }
    }

    #[test]
    fn test_hull_mode_every_point_has_neighbors() {
        let config = SphereMeshConfigBuilder::new()
            .seed(9)
            .point_count(200)
            .unwrap()
            .triangulation(TriangulationMode::ConvexHull)
            .build()
            .unwrap();
        let surface = SphereSurface::generate(config);

        let used = (0..surface.point_count())
            .filter(|&id| !surface.neighbors(id).is_empty())
            .count();
        assert!(used >= surface.point_count() - 2);
        for id in 0..surface.point_count() {
            let n = surface.neighbors(id).len();
            assert!(n == 0 || n >= 3, "point {} has {} neighbors", id, n);
        }
    }

    #[test]
    fn test_invalid_point_id() {
        let surface = SphereSurface::generate(seeded_config(50));
        assert!(surface.neighbors(999_999).is_empty());
    }

    #[test]
    fn test_find_nearest_point() {
        let surface = SphereSurface::generate(seeded_config(300));

        for (id, point) in surface.points().iter().enumerate().take(20) {
            assert_eq!(surface.find_nearest_point(*point), Some(id));
        }
    }

    #[test]
    fn test_into_mesh_hands_off() {
        let surface = SphereSurface::generate(seeded_config(100));
        let expected = surface.mesh().clone();
        let mesh = surface.into_mesh();
        assert_eq!(mesh, expected);
    }
}
