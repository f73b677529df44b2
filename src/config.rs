//! Sphere mesh configuration and builder
//!
//! This module provides the configuration types consumed by
//! [`SphereSurface`](crate::SphereSurface) and the mesh builder.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Number of points sampled when nothing else is configured
pub const DEFAULT_POINT_COUNT: usize = 500;

/// Largest point count that can still be addressed by `u32` triangle indices
pub const MAX_POINT_COUNT: usize = u32::MAX as usize;

/// How the sampled points are turned into triangles
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangulationMode {
    /// Planar Delaunay triangulation of the `(x, y)` projection
    ///
    /// This is an approximation: front and back hemispheres share one plane,
    /// so the result is not a spherical triangulation and shows artifacts
    /// where the two halves overlap. It is the default because it reproduces
    /// the reference visual output.
    #[default]
    Planar,
    /// True spherical Delaunay triangulation via the 3D convex hull
    ///
    /// For points on a sphere the convex hull faces are exactly the
    /// spherical Delaunay triangles.
    ConvexHull,
}

/// Normal assigned to the vertices of a zero-area triangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NormalFallback {
    /// Unit direction from the sphere centre to the face centroid (`+Z` if the centroid is the origin)
    #[default]
    Radial,
    /// The zero vector
    Zero,
    /// A caller-supplied unit vector
    Fixed(DVec3),
}

impl NormalFallback {
    /// Resolve the fallback normal for a face with the given centroid
    ///
    /// Always returns a finite vector; every variant except `Zero` returns a
    /// unit vector.
    pub fn resolve(self, centroid: DVec3) -> DVec3 {
        match self {
            NormalFallback::Radial => centroid.try_normalize().unwrap_or(DVec3::Z),
            NormalFallback::Zero => DVec3::ZERO,
            NormalFallback::Fixed(normal) => normal,
        }
    }
}

/// Options controlling triangulation and normal generation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshOptions {
    /// Triangulation strategy
    pub triangulation: TriangulationMode,
    /// Normal used for degenerate faces
    pub normal_fallback: NormalFallback,
}

/// Configuration for sphere surface generation
///
/// With a seed set, the same configuration always produces the identical
/// point set and mesh.
///
/// # Example
///
/// ```rust
/// use sphere_mesh::*;
///
/// let config = SphereMeshConfigBuilder::new()
///     .seed(42)
///     .point_count(1000)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.point_count, 1000);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereMeshConfig {
    /// Number of points sampled on the unit sphere
    pub point_count: usize,

    /// Seed for the point sampler
    ///
    /// `None` samples from the thread-local RNG, so every run differs.
    pub seed: Option<u64>,

    /// Triangulation strategy
    pub triangulation: TriangulationMode,

    /// Normal assigned to degenerate faces
    pub normal_fallback: NormalFallback,
}

impl SphereMeshConfig {
    /// Mesh options carried by this configuration
    #[inline]
    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            triangulation: self.triangulation,
            normal_fallback: self.normal_fallback,
        }
    }

    /// Whether sampling is reproducible
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}

impl Default for SphereMeshConfig {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINT_COUNT,
            seed: None,
            triangulation: TriangulationMode::default(),
            normal_fallback: NormalFallback::default(),
        }
    }
}

/// Builder for creating a validated [`SphereMeshConfig`]
///
/// # Example
///
/// ```rust
/// use sphere_mesh::*;
///
/// let config = SphereMeshConfigBuilder::new()
///     .seed(7)
///     .triangulation(TriangulationMode::ConvexHull)
///     .normal_fallback(NormalFallback::Zero)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.triangulation, TriangulationMode::ConvexHull);
/// ```
#[derive(Debug, Clone)]
pub struct SphereMeshConfigBuilder {
    point_count: usize,
    seed: Option<u64>,
    triangulation: TriangulationMode,
    normal_fallback: NormalFallback,
}

impl SphereMeshConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - point_count: 500
    /// - seed: None (non-deterministic)
    /// - triangulation: Planar
    /// - normal_fallback: Radial
    pub fn new() -> Self {
        let defaults = SphereMeshConfig::default();
        Self {
            point_count: defaults.point_count,
            seed: defaults.seed,
            triangulation: defaults.triangulation,
            normal_fallback: defaults.normal_fallback,
        }
    }

    /// Set the seed for reproducible sampling
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of sampled points
    ///
    /// Zero is accepted and yields an empty surface.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the count cannot be addressed by `u32` indices
    pub fn point_count(mut self, count: usize) -> Result<Self> {
        if count > MAX_POINT_COUNT {
            return Err(MeshError::InvalidInput(format!(
                "point count must be <= {} (got {})",
                MAX_POINT_COUNT, count
            )));
        }
        self.point_count = count;
        Ok(self)
    }

    /// Set the triangulation strategy
    pub fn triangulation(mut self, mode: TriangulationMode) -> Self {
        self.triangulation = mode;
        self
    }

    /// Set the normal used for degenerate faces
    ///
    /// A `Fixed` vector is normalised before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a `Fixed` vector is zero or not finite
    pub fn normal_fallback(mut self, fallback: NormalFallback) -> Result<Self> {
        self.normal_fallback = match fallback {
            NormalFallback::Fixed(normal) => {
                let unit = normal.try_normalize().ok_or_else(|| {
                    MeshError::InvalidInput(format!(
                        "fixed fallback normal must be finite and non-zero (got {})",
                        normal
                    ))
                })?;
                NormalFallback::Fixed(unit)
            }
            other => other,
        };
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<SphereMeshConfig> {
        Ok(SphereMeshConfig {
            point_count: self.point_count,
            seed: self.seed,
            triangulation: self.triangulation,
            normal_fallback: self.normal_fallback,
        })
    }
}

impl Default for SphereMeshConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SphereMeshConfigBuilder::new().build().unwrap();
        assert_eq!(config.point_count, DEFAULT_POINT_COUNT);
        assert_eq!(config.seed, None);
        assert_eq!(config.triangulation, TriangulationMode::Planar);
        assert_eq!(config.normal_fallback, NormalFallback::Radial);
        assert!(!config.is_deterministic());
        assert_eq!(config, SphereMeshConfig::default());
    }

    #[test]
    fn test_builder_custom() {
        let config = SphereMeshConfigBuilder::new()
            .seed(42)
            .point_count(64)
            .unwrap()
            .triangulation(TriangulationMode::ConvexHull)
            .build()
            .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.point_count, 64);
        assert!(config.is_deterministic());
        assert_eq!(
            config.mesh_options(),
            MeshOptions {
                triangulation: TriangulationMode::ConvexHull,
                normal_fallback: NormalFallback::Radial,
            }
        );
    }

    #[test]
    fn test_zero_point_count_accepted() {
        let config = SphereMeshConfigBuilder::new().point_count(0).unwrap().build().unwrap();
        assert_eq!(config.point_count, 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_point_count_too_large() {
        let result = SphereMeshConfigBuilder::new().point_count(MAX_POINT_COUNT + 1);
        assert!(matches!(result, Err(MeshError::InvalidInput(_))));
    }

    #[test]
    fn test_fixed_fallback_is_normalized() {
        let config = SphereMeshConfigBuilder::new()
            .normal_fallback(NormalFallback::Fixed(DVec3::new(0.0, 3.0, 4.0)))
            .unwrap()
            .build()
            .unwrap();

        match config.normal_fallback {
            NormalFallback::Fixed(n) => {
                assert!((n.length() - 1.0).abs() < 1e-12);
                assert!((n.y - 0.6).abs() < 1e-12);
                assert!((n.z - 0.8).abs() < 1e-12);
            }
            other => panic!("unexpected fallback {:?}", other),
        }
    }

    #[test]
    fn test_invalid_fixed_fallback() {
        let result = SphereMeshConfigBuilder::new().normal_fallback(NormalFallback::Fixed(DVec3::ZERO));
        assert!(result.is_err());

        let result = SphereMeshConfigBuilder::new()
            .normal_fallback(NormalFallback::Fixed(DVec3::new(f64::NAN, 0.0, 1.0)));
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_resolve() {
        let centroid = DVec3::new(0.0, 0.0, 0.5);
        assert_eq!(NormalFallback::Radial.resolve(centroid), DVec3::Z);
        assert_eq!(NormalFallback::Radial.resolve(DVec3::ZERO), DVec3::Z);
        assert_eq!(NormalFallback::Zero.resolve(centroid), DVec3::ZERO);
        assert_eq!(NormalFallback::Fixed(DVec3::X).resolve(centroid), DVec3::X);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SphereMeshConfigBuilder::new()
            .seed(12345)
            .point_count(200)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: SphereMeshConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
