//! Random sphere triangulation and flat-shaded mesh generation
//!
//! Samples points uniformly on the unit sphere, triangulates them, and builds
//! a non-indexed, flat-shaded triangle mesh ready for any rendering engine.
//!
//! # Quick Start
//!
//! ```rust
//! use sphere_mesh::*;
//!
//! // Sample and mesh 500 points
//! let config = SphereMeshConfigBuilder::new()
//!     .seed(42)
//!     .point_count(500).unwrap()
//!     .build().unwrap();
//!
//! let surface = SphereSurface::generate(config);
//! println!("Generated {} triangles", surface.triangle_count());
//!
//! // Or run the stages by hand
//! let points = generation::generate_seeded_points(500, 42);
//! let mesh = build_mesh(&points);
//! assert_eq!(mesh.vertex_count(), 3 * mesh.triangle_count());
//! ```
//!
//! # Triangulation
//!
//! The default [`TriangulationMode::Planar`] runs a planar Delaunay
//! triangulation over the `(x, y)` coordinates of the points. This is an
//! approximation of a surface triangulation, kept for parity with the
//! reference output. [`TriangulationMode::ConvexHull`] gives the true
//! spherical Delaunay triangulation instead.
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-point lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, point sets and meshes

// Modules
pub mod error;
pub mod config;
pub mod point_set;
pub mod generation;
pub mod mesh;
pub mod surface;
pub mod scene;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MeshError, Result};
pub use config::{
    MeshOptions, NormalFallback, SphereMeshConfig, SphereMeshConfigBuilder, TriangulationMode,
    DEFAULT_POINT_COUNT, MAX_POINT_COUNT,
};
pub use point_set::{Point3, PointSet, TriangleIndex};
pub use mesh::{build_mesh, build_mesh_with_options, face_normal, mesh_from_triangles, try_build_mesh_with_options, MeshData};
pub use surface::SphereSurface;
pub use scene::SceneSetup;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam vectors for convenience
pub use glam::{DVec3, Vec3};
