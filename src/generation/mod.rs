//! Point sampling and triangulation
//!
//! Samples points uniformly on the unit sphere and triangulates them, either
//! with a planar Delaunay triangulation of the flattened points or with the
//! spherical Delaunay triangulation given by their convex hull.

mod points;
mod delaunay;
mod hull;

pub use points::{
    generate_random_points, generate_seeded_points, generate_sphere_points, sphere_point,
    SequenceSource, UniformSource,
};
pub use delaunay::{circumcenter, orientation, triangulate_planar, PlanarTriangulation, EMPTY};
pub use hull::triangulate_convex_hull;

use glam::{DVec2, DVec3};
use std::time::Instant;

use crate::config::TriangulationMode;
use crate::point_set::{PointSet, TriangleIndex};

/// Flatten sphere points into the plane used by the planar triangulation
///
/// Each point keeps its first two components `(x, y)`. Points from the front
/// and back hemispheres land on top of each other, which is why the planar
/// mode only approximates a surface triangulation.
pub fn project_xy(points: &[DVec3]) -> Vec<DVec2> {
    points.iter().map(|p| p.truncate()).collect()
}

/// Triangulate a point set with the given strategy
///
/// Points with non-finite coordinates are left out; the returned indices
/// always refer to positions in the original `points`. Every triangle has
/// three distinct indices, each `< points.len()`.
///
/// # Example
///
/// ```rust
/// use sphere_mesh::generation::{generate_seeded_points, triangulate};
/// use sphere_mesh::TriangulationMode;
///
/// let points = generate_seeded_points(100, 1);
/// let triangles = triangulate(&points, TriangulationMode::Planar);
/// assert!(!triangles.is_empty());
/// ```
pub fn triangulate(points: &PointSet, mode: TriangulationMode) -> Vec<TriangleIndex> {
    let start = Instant::now();

    // ids of usable points, so filtered triangulations can be mapped back
    let finite: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_finite())
        .map(|(i, _)| i)
        .collect();

    if finite.len() < points.len() {
        tracing::warn!(
            skipped = points.len() - finite.len(),
            "skipping points with non-finite coordinates"
        );
    }

    let usable: Vec<DVec3> = finite.iter().map(|&i| points.as_slice()[i]).collect();

    let local = match mode {
        TriangulationMode::Planar => triangulate_planar(&project_xy(&usable)).triangle_indices(),
        TriangulationMode::ConvexHull => triangulate_convex_hull(&usable),
    };

    let triangles: Vec<TriangleIndex> = if finite.len() == points.len() {
        local
    } else {
        local
            .into_iter()
            .map(|tri| tri.map(|i| finite[i as usize] as u32))
            .collect()
    };

    tracing::debug!(
        ?mode,
        points = points.len(),
        triangles = triangles.len(),
        elapsed = ?start.elapsed(),
        "triangulated point set"
    );

    triangles
}
