//! Flat-shaded mesh construction
//!
//! Generates engine-agnostic, non-indexed mesh data from a triangulated
//! point set.

use glam::DVec3;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{MeshOptions, NormalFallback};
use crate::error::{MeshError, Result};
use crate::generation::triangulate;
use crate::point_set::{PointSet, TriangleIndex};

/// Faces whose doubled area (cross product length) is at or below this are degenerate
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// Engine-agnostic mesh data output
///
/// Non-indexed: every triangle owns its three vertices, so shared corners are
/// duplicated and each copy carries its own face normal (flat shading).
/// Suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with position and normal attributes
/// - wgpu: Use directly as vertex buffers
/// - three.js-style engines: `flat_positions()` is a ready position attribute
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions, three per triangle
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, parallel to `positions`
    pub normals: Vec<[f32; 3]>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as one flat coordinate buffer (9 values per triangle)
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Normals as one flat coordinate buffer (9 values per triangle)
    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flatten().copied().collect()
    }

    fn push_face(&mut self, corners: [DVec3; 3], normal: DVec3) {
        let normal = normal.as_vec3().to_array();
        for corner in corners {
            self.positions.push(corner.as_vec3().to_array());
            self.normals.push(normal);
        }
    }
}

/// Unit face normal of `(a, b, c)` following the right-hand rule
///
/// Returns `None` for degenerate faces (zero or near-zero area, or
/// non-finite corners).
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> Option<DVec3> {
    let cross = (b - a).cross(c - a);
    if !cross.is_finite() || cross.length() <= DEGENERATE_AREA_EPSILON {
        return None;
    }
    cross.try_normalize()
}

/// Build a flat-shaded mesh from a point set with default options
///
/// Uses the planar triangulation and the radial fallback normal. Fewer than
/// three points, or input that triangulates to nothing, gives an empty mesh.
///
/// # Example
///
/// ```rust
/// use sphere_mesh::*;
/// use sphere_mesh::generation::generate_seeded_points;
///
/// let points = generate_seeded_points(500, 42);
/// let mesh = build_mesh(&points);
/// assert!(mesh.triangle_count() > 0);
/// assert_eq!(mesh.flat_positions().len() % 9, 0);
/// ```
pub fn build_mesh(points: &PointSet) -> MeshData {
    build_mesh_with_options(points, &MeshOptions::default())
}

/// Build a mesh with explicit options, recovering from bad input
///
/// Any error from [`try_build_mesh_with_options`] is logged and replaced by
/// an empty mesh, so the renderer simply shows nothing.
pub fn build_mesh_with_options(points: &PointSet, options: &MeshOptions) -> MeshData {
    match try_build_mesh_with_options(points, options) {
        Ok(mesh) => mesh,
        Err(err) => {
            tracing::warn!(points = points.len(), "returning empty mesh: {}", err);
            MeshData::default()
        }
    }
}

/// Build a mesh with explicit options
///
/// # Errors
///
/// - `InvalidInput` if fewer than three points are given
/// - `DegenerateGeometry` if the triangulation produces no triangles
pub fn try_build_mesh_with_options(points: &PointSet, options: &MeshOptions) -> Result<MeshData> {
    if points.len() < 3 {
        return Err(MeshError::InvalidInput(format!(
            "at least 3 points are needed to triangulate (got {})",
            points.len()
        )));
    }

    let triangles = triangulate(points, options.triangulation);
    if triangles.is_empty() {
        return Err(MeshError::DegenerateGeometry(format!(
            "{} points produced no triangles",
            points.len()
        )));
    }

    Ok(mesh_from_triangles(points, &triangles, options.normal_fallback))
}

/// Expand triangles into flat vertex and normal buffers
///
/// For each triangle `(a, b, c)` the three points are appended in that order,
/// all sharing the face normal. Degenerate faces get `fallback` instead.
/// Triangles referencing ids outside `points` are skipped.
pub fn mesh_from_triangles(
    points: &PointSet,
    triangles: &[TriangleIndex],
    fallback: NormalFallback,
) -> MeshData {
    let start = Instant::now();
    let mut mesh = MeshData {
        positions: Vec::with_capacity(triangles.len() * 3),
        normals: Vec::with_capacity(triangles.len() * 3),
    };
    let mut degenerate = 0usize;
    let mut skipped = 0usize;

    for &triangle in triangles {
        let Some(corners) = points.triangle(triangle) else {
            skipped += 1;
            continue;
        };
        let [a, b, c] = corners;

        let normal = face_normal(a, b, c).unwrap_or_else(|| {
            degenerate += 1;
            fallback.resolve((a + b + c) / 3.0)
        });

        mesh.push_face(corners, normal);
    }

    if degenerate > 0 {
        tracing::warn!(degenerate, ?fallback, "zero-area faces given fallback normals");
    }
    if skipped > 0 {
        tracing::warn!(skipped, "triangles with out-of-range indices skipped");
    }
    tracing::debug!(
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        elapsed = ?start.elapsed(),
        "built flat-shaded mesh"
    );

    mesh
}
