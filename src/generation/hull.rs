//! Spherical Delaunay triangulation via convex hull
//!
//! For points on a sphere, the Delaunay triangulation is equivalent to the
//! 3D convex hull of those points. This module wraps parry3d's convex hull
//! and maps the hull's (reordered) vertices back to ids in the input set.

use glam::{DVec3, Vec3};
use parry3d::math::Point;
use parry3d::transformation;

use crate::point_set::TriangleIndex;

/// Triangulate points on a sphere by their convex hull
///
/// Faces are wound counter-clockwise when seen from outside the sphere, so
/// their face normals point away from the centre. Fewer than three points,
/// or input the hull algorithm rejects, yields no triangles.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use sphere_mesh::generation::triangulate_convex_hull;
///
/// let tetrahedron = [
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
///     DVec3::new(-1.0, -1.0, -1.0).normalize(),
/// ];
/// assert_eq!(triangulate_convex_hull(&tetrahedron).len(), 4);
/// ```
pub fn triangulate_convex_hull(points: &[DVec3]) -> Vec<TriangleIndex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let positions: Vec<Vec3> = points.iter().map(|p| p.as_vec3()).collect();
    let hull_input: Vec<Point<f32>> = positions
        .iter()
        .map(|p| Point::new(p.x, p.y, p.z))
        .collect();

    let (vertices, faces) = match transformation::try_convex_hull(&hull_input) {
        Ok(hull) => hull,
        Err(err) => {
            tracing::warn!(points = points.len(), "convex hull failed: {:?}", err);
            return Vec::new();
        }
    };

    let lookup = VertexLookup::new(&positions);
    let ids: Vec<Option<u32>> = vertices
        .iter()
        .map(|v| lookup.find(Vec3::new(v.x, v.y, v.z)).map(|id| id as u32))
        .collect();

    faces
        .iter()
        .filter_map(|face| {
            let a = ids.get(face[0] as usize).copied().flatten()?;
            let b = ids.get(face[1] as usize).copied().flatten()?;
            let c = ids.get(face[2] as usize).copied().flatten()?;
            if a == b || b == c || a == c {
                return None;
            }
            Some(orient_outward([a, b, c], points))
        })
        .collect()
}

/// Reverse a face whose normal points towards the sphere centre
fn orient_outward(face: TriangleIndex, points: &[DVec3]) -> TriangleIndex {
    let [a, b, c] = face;
    let (pa, pb, pc) = (points[a as usize], points[b as usize], points[c as usize]);
    let normal = (pb - pa).cross(pc - pa);
    let centroid = (pa + pb + pc) / 3.0;

    if normal.dot(centroid) < 0.0 {
        [a, c, b]
    } else {
        face
    }
}

/// Maps hull vertex positions back to input ids
#[cfg(feature = "spatial-index")]
struct VertexLookup(Option<crate::spatial::SpatialIndex>);

#[cfg(feature = "spatial-index")]
impl VertexLookup {
    fn new(positions: &[Vec3]) -> Self {
        Self(crate::spatial::SpatialIndex::new(positions))
    }

    fn find(&self, position: Vec3) -> Option<usize> {
        let index = self.0.as_ref()?;
        let (id, distance) = index.find_nearest_with_distance(position);
        (distance == 0.0).then_some(id)
    }
}

/// Maps hull vertex positions back to input ids
#[cfg(not(feature = "spatial-index"))]
struct VertexLookup(std::collections::HashMap<[u32; 3], usize>);

#[cfg(not(feature = "spatial-index"))]
impl VertexLookup {
    fn new(positions: &[Vec3]) -> Self {
        let mut map = std::collections::HashMap::with_capacity(positions.len());
        for (id, p) in positions.iter().enumerate() {
            map.entry(Self::key(*p)).or_insert(id);
        }
        Self(map)
    }

    fn key(p: Vec3) -> [u32; 3] {
        [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
    }

    fn find(&self, position: Vec3) -> Option<usize> {
        self.0.get(&Self::key(position)).copied()
    }
}
