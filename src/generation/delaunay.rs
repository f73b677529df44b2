//! Planar Delaunay triangulation (sweep-hull)
//!
//! Triangulates a set of 2D points so that no point lies inside the
//! circumcircle of any triangle.
//!
//! # Algorithm
//!
//! 1. Pick a seed triangle: the point closest to the bounding-box centre, its
//!    nearest neighbour, and the third point giving the smallest circumcircle.
//! 2. Visit the remaining points in order of distance from the seed
//!    circumcentre. Each new point lies outside the current convex hull.
//! 3. Find a hull edge visible from the point (hull edges are hashed by
//!    pseudo-angle around the seed circumcentre), fan triangles from the point
//!    to every visible edge, and shrink the hull accordingly.
//! 4. After each new triangle, flip edges that break the Delaunay condition,
//!    recursing into the two edges exposed by the flip.
//!
//! Sorting dominates, so the expected running time is O(N log N).
//!
//! The triangulation is stored as flat half-edge arrays: half-edge `e` starts
//! at `triangles[e]`, belongs to triangle `e / 3`, and `halfedges[e]` is the
//! opposite half-edge in the neighbouring triangle (or [`EMPTY`] on the hull).

use glam::DVec2;
use std::cmp::Ordering;

use crate::point_set::TriangleIndex;

/// Marker for a half-edge without a twin (it lies on the convex hull)
pub const EMPTY: usize = usize::MAX;

/// Two points closer than this on both axes are treated as duplicates
const DUPLICATE_EPSILON: f64 = f64::EPSILON * 2.0;

/// Result of a planar Delaunay triangulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanarTriangulation {
    /// Point ids, three per triangle, counter-clockwise
    pub triangles: Vec<usize>,
    /// Twin half-edge for every half-edge, or [`EMPTY`]
    pub halfedges: Vec<usize>,
    /// Convex hull point ids, counter-clockwise
    pub hull: Vec<usize>,
}

impl PlanarTriangulation {
    /// Number of triangles
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Check if no triangle was produced
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles as index triples
    pub fn triangle_indices(&self) -> Vec<TriangleIndex> {
        self.triangles
            .chunks_exact(3)
            .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
            .collect()
    }

    fn with_capacity(n: usize) -> Self {
        let max_triangles = if n > 2 { 2 * n - 5 } else { 0 };
        Self {
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            hull: Vec::new(),
        }
    }

    fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize, a: usize, b: usize, c: usize) -> usize {
        let t = self.triangles.len();

        self.triangles.extend_from_slice(&[i0, i1, i2]);
        self.halfedges.extend_from_slice(&[a, b, c]);

        if a != EMPTY {
            self.halfedges[a] = t;
        }
        if b != EMPTY {
            self.halfedges[b] = t + 1;
        }
        if c != EMPTY {
            self.halfedges[c] = t + 2;
        }

        t
    }

    /// Flip edge `a` and its neighbours until the Delaunay condition holds
    ///
    /// Returns the half-edge that now closes the fan around the inserted point.
    fn legalize(&mut self, a: usize, points: &[DVec2], hull: &mut SweepHull) -> usize {
        let b = self.halfedges[a];
        let ar = prev_halfedge(a);

        if b == EMPTY {
            return ar;
        }

        //        pl                    pl
        //       /||\                  /  \
        //    al/ || \bl            al/    \a
        //     /  ||  \              /      \
        //    /  a||b  \    flip    /___ar___\
        //  p0\   ||   /p1   =>   p0\---bl---/p1
        //     \  ||  /              \      /
        //    ar\ || /br             b\    /br
        //       \||/                  \  /
        //        pr                    pr
        let al = next_halfedge(a);
        let bl = prev_halfedge(b);

        let p0 = self.triangles[ar];
        let pr = self.triangles[a];
        let pl = self.triangles[al];
        let p1 = self.triangles[bl];

        if !in_circle(points[p0], points[pr], points[pl], points[p1]) {
            return ar;
        }

        self.triangles[a] = p1;
        self.triangles[b] = p0;

        let hbl = self.halfedges[bl];
        let har = self.halfedges[ar];

        // the flipped edge was referenced by the hull; point it at the new half-edge
        if hbl == EMPTY {
            let mut e = hull.start;
            loop {
                if hull.tri[e] == bl {
                    hull.tri[e] = a;
                    break;
                }
                e = hull.prev[e];
                if e == hull.start {
                    break;
                }
            }
        }

        self.halfedges[a] = hbl;
        self.halfedges[b] = har;
        self.halfedges[ar] = bl;

        if hbl != EMPTY {
            self.halfedges[hbl] = a;
        }
        if har != EMPTY {
            self.halfedges[har] = b;
        }
        self.halfedges[bl] = ar;

        let br = next_halfedge(b);
        self.legalize(a, points, hull);
        self.legalize(br, points, hull)
    }

    /// Reverse every triangle so the output winds counter-clockwise
    ///
    /// The sweep builds clockwise triangles. Swapping the last two corners of
    /// each reverses all three of its half-edges, which moves edge slot 0 to
    /// slot 2 and back.
    fn into_counter_clockwise(mut self) -> Self {
        let remap = |e: usize| {
            if e == EMPTY {
                return EMPTY;
            }
            match e % 3 {
                0 => e + 2,
                1 => e,
                _ => e - 2,
            }
        };

        let mut triangles = Vec::with_capacity(self.triangles.len());
        let mut halfedges = vec![EMPTY; self.halfedges.len()];

        for t in self.triangles.chunks_exact(3) {
            triangles.extend_from_slice(&[t[0], t[2], t[1]]);
        }

        // Corner order [i0, i2, i1] turns edges (i0→i1, i1→i2, i2→i0)
        // into (i1→i0, i2→i1, i0→i2): old edge 0 ↦ new 2, 1 ↦ 1, 2 ↦ 0.
        for (e, &twin) in self.halfedges.iter().enumerate() {
            halfedges[remap(e)] = remap(twin);
        }

        self.hull.reverse();
        self.triangles = triangles;
        self.halfedges = halfedges;
        self
    }
}

/// Convex hull maintained during the sweep
struct SweepHull {
    prev: Vec<usize>,
    next: Vec<usize>,
    /// Hull half-edge (triangle edge) starting at each hull point
    tri: Vec<usize>,
    hash: Vec<usize>,
    start: usize,
    center: DVec2,
}

impl SweepHull {
    fn new(n: usize, center: DVec2, seed: [usize; 3], points: &[DVec2]) -> Self {
        let [i0, i1, i2] = seed;
        let hash_len = ((n as f64).sqrt().ceil() as usize).max(1);

        let mut hull = Self {
            prev: vec![0; n],
            next: vec![0; n],
            tri: vec![0; n],
            hash: vec![EMPTY; hash_len],
            start: i0,
            center,
        };

        hull.next[i0] = i1;
        hull.prev[i2] = i1;
        hull.next[i1] = i2;
        hull.prev[i0] = i2;
        hull.next[i2] = i0;
        hull.prev[i1] = i0;

        hull.tri[i0] = 0;
        hull.tri[i1] = 1;
        hull.tri[i2] = 2;

        hull.hash_edge(points[i0], i0);
        hull.hash_edge(points[i1], i1);
        hull.hash_edge(points[i2], i2);

        hull
    }

    /// Bucket of a point by its pseudo-angle around the hull centre
    fn hash_key(&self, p: DVec2) -> usize {
        let d = p - self.center;
        let k = d.x / (d.x.abs() + d.y.abs());
        let angle = (if d.y > 0.0 { 3.0 - k } else { 1.0 + k }) / 4.0;
        let len = self.hash.len();

        // NaN (point at the centre) casts to 0
        ((len as f64 * angle).floor() as usize) % len
    }

    fn hash_edge(&mut self, p: DVec2, i: usize) {
        let key = self.hash_key(p);
        self.hash[key] = i;
    }

    /// Find a hull edge visible from `p`
    ///
    /// Returns the edge start and whether the search may continue backwards,
    /// or `None` when no edge is visible (a duplicate or interior point).
    fn find_visible_edge(&self, p: DVec2, points: &[DVec2]) -> Option<(usize, bool)> {
        let key = self.hash_key(p);
        let len = self.hash.len();

        let mut start = self.start;
        for j in 0..len {
            let candidate = self.hash[(key + j) % len];
            if candidate != EMPTY && self.next[candidate] != EMPTY {
                start = candidate;
                break;
            }
        }

        start = self.prev[start];
        let mut e = start;
        while !is_counter_clockwise(p, points[e], points[self.next[e]]) {
            e = self.next[e];
            if e == start {
                return None;
            }
        }

        Some((e, e == start))
    }
}

/// Compute the Delaunay triangulation of `points`
///
/// Fewer than three points, or points that are all collinear, produce an
/// empty triangulation. Exact and near-exact duplicates are skipped, so every
/// triangle references three distinct ids.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use sphere_mesh::generation::triangulate_planar;
///
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let triangulation = triangulate_planar(&square);
/// assert_eq!(triangulation.len(), 2);
/// assert_eq!(triangulation.hull.len(), 4);
/// ```
pub fn triangulate_planar(points: &[DVec2]) -> PlanarTriangulation {
    let n = points.len();

    let Some((seed, center)) = find_seed_triangle(points) else {
        return PlanarTriangulation::default();
    };
    let [i0, i1, i2] = seed;

    let mut triangulation = PlanarTriangulation::with_capacity(n);
    triangulation.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);

    let mut order: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, center.distance_squared(*p)))
        .collect();
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut hull = SweepHull::new(n, center, seed, points);

    for k in 0..order.len() {
        let i = order[k].0;
        let p = points[i];

        if k > 0 && nearly_equal(p, points[order[k - 1].0]) {
            continue;
        }
        if i == i0 || i == i1 || i == i2 {
            continue;
        }

        let Some((mut e, walk_back)) = hull.find_visible_edge(p, points) else {
            continue;
        };

        let t = triangulation.add_triangle(e, i, hull.next[e], EMPTY, EMPTY, hull.tri[e]);

        hull.tri[i] = triangulation.legalize(t + 2, points, &mut hull);
        hull.tri[e] = t;

        // walk forward through the hull
        let mut n_edge = hull.next[e];
        loop {
            let q = hull.next[n_edge];
            if !is_counter_clockwise(p, points[n_edge], points[q]) {
                break;
            }
            let t = triangulation.add_triangle(n_edge, i, q, hull.tri[i], EMPTY, hull.tri[n_edge]);
            hull.tri[i] = triangulation.legalize(t + 2, points, &mut hull);
            hull.next[n_edge] = EMPTY;
            n_edge = q;
        }

        // walk backward from the other side
        if walk_back {
            loop {
                let q = hull.prev[e];
                if !is_counter_clockwise(p, points[q], points[e]) {
                    break;
                }
                let t = triangulation.add_triangle(q, i, e, EMPTY, hull.tri[e], hull.tri[q]);
                triangulation.legalize(t + 2, points, &mut hull);
                hull.tri[q] = t;
                hull.next[e] = EMPTY;
                e = q;
            }
        }

        hull.prev[i] = e;
        hull.next[i] = n_edge;
        hull.prev[n_edge] = i;
        hull.next[e] = i;
        hull.start = e;

        hull.hash_edge(p, i);
        hull.hash_edge(points[e], e);
    }

    let mut e = hull.start;
    loop {
        triangulation.hull.push(e);
        e = hull.next[e];
        if e == hull.start {
            break;
        }
    }

    triangulation.into_counter_clockwise()
}

/// Choose the seed triangle and its circumcentre
///
/// Returns `None` when fewer than three distinct points exist or all points
/// are collinear (every candidate circumcircle is infinite).
fn find_seed_triangle(points: &[DVec2]) -> Option<([usize; 3], DVec2)> {
    if points.len() < 3 {
        return None;
    }

    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    );
    let bbox_center = (min + max) * 0.5;

    let i0 = find_closest_point(points, bbox_center)?;
    let p0 = points[i0];

    let i1 = find_closest_point(points, p0)?;
    let p1 = points[i1];

    let mut min_radius = f64::INFINITY;
    let mut i2 = None;
    for (i, &p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let r = circumradius_squared(p0, p1, p);
        if r < min_radius {
            i2 = Some(i);
            min_radius = r;
        }
    }
    let i2 = i2?;

    // the sweep expects a clockwise seed
    let seed = if is_counter_clockwise(p0, p1, points[i2]) {
        [i0, i2, i1]
    } else {
        [i0, i1, i2]
    };
    let center = circumcenter(points[seed[0]], points[seed[1]], points[seed[2]]);

    Some((seed, center))
}

/// Index of the point nearest to `target`, excluding points exactly on it
fn find_closest_point(points: &[DVec2], target: DVec2) -> Option<usize> {
    let mut min_dist = f64::INFINITY;
    let mut closest = None;

    for (i, p) in points.iter().enumerate() {
        let d = target.distance_squared(*p);
        if d > 0.0 && d < min_dist {
            closest = Some(i);
            min_dist = d;
        }
    }

    closest
}

#[inline]
fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

#[inline]
fn prev_halfedge(e: usize) -> usize {
    if e % 3 == 0 {
        e + 2
    } else {
        e - 1
    }
}

#[inline]
fn nearly_equal(a: DVec2, b: DVec2) -> bool {
    (a.x - b.x).abs() <= DUPLICATE_EPSILON && (a.y - b.y).abs() <= DUPLICATE_EPSILON
}

/// Twice the signed area of `(p, q, r)`; positive when counter-clockwise
#[inline]
pub fn orientation(p: DVec2, q: DVec2, r: DVec2) -> f64 {
    (q - p).perp_dot(r - p)
}

#[inline]
fn is_counter_clockwise(p: DVec2, q: DVec2, r: DVec2) -> bool {
    orientation(p, q, r) > 0.0
}

/// Offset from `a` to the circumcentre of `(a, b, c)`
///
/// Infinite or NaN for collinear input.
fn circumdelta(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    let d = b - a;
    let e = c - a;

    let bl = d.length_squared();
    let cl = e.length_squared();
    let k = 0.5 / d.perp_dot(e);

    DVec2::new((e.y * bl - d.y * cl) * k, (d.x * cl - e.x * bl) * k)
}

fn circumradius_squared(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    let r = circumdelta(a, b, c).length_squared();
    // NaN never wins a `<` comparison, but normalise it anyway
    if r.is_nan() {
        f64::INFINITY
    } else {
        r
    }
}

/// Circumcentre of the triangle `(a, b, c)`
pub fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    a + circumdelta(a, b, c)
}

/// Whether `p` lies strictly inside the circumcircle of the clockwise triangle `(a, b, c)`
fn in_circle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;

    let ap = d.length_squared();
    let bp = e.length_squared();
    let cp = f.length_squared();

    d.x * (e.y * cp - bp * f.y) - d.y * (e.x * cp - bp * f.x) + ap * (e.x * f.y - e.y * f.x) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_points(count: usize, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| DVec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    /// Every half-edge twin must point back and join the same two points
    fn assert_halfedges_consistent(t: &PlanarTriangulation) {
        assert_eq!(t.triangles.len(), t.halfedges.len());
        for (e, &twin) in t.halfedges.iter().enumerate() {
            if twin == EMPTY {
                continue;
            }
            assert_eq!(t.halfedges[twin], e, "twin of twin should be itself");
            assert_eq!(t.triangles[e], t.triangles[next_halfedge(twin)]);
            assert_eq!(t.triangles[twin], t.triangles[next_halfedge(e)]);
        }
    }

    /// Brute-force empty-circumcircle check with a relative tolerance
    fn assert_delaunay(points: &[DVec2], t: &PlanarTriangulation) {
        for tri in t.triangles.chunks_exact(3) {
            let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
            let center = circumcenter(a, b, c);
            let r2 = center.distance_squared(a);
            for (i, p) in points.iter().enumerate() {
                if tri.contains(&i) {
                    continue;
                }
                assert!(
                    center.distance_squared(*p) >= r2 * (1.0 - 1e-9),
                    "point {} lies inside circumcircle of {:?}",
                    i,
                    tri
                );
            }
        }
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate_planar(&[]).is_empty());
        assert!(triangulate_planar(&[DVec2::ZERO]).is_empty());
        assert!(triangulate_planar(&[DVec2::ZERO, DVec2::X]).is_empty());
    }

    #[test]
    fn test_single_triangle() {
        let points = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)];
        let t = triangulate_planar(&points);

        assert_eq!(t.len(), 1);
        assert_eq!(t.hull.len(), 3);
        assert_eq!(t.halfedges, vec![EMPTY; 3]);

        let tri = &t.triangles;
        assert!(orientation(points[tri[0]], points[tri[1]], points[tri[2]]) > 0.0);
    }

    #[test]
    fn test_square() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let t = triangulate_planar(&points);

        assert_eq!(t.len(), 2);
        assert_eq!(t.hull.len(), 4);
        assert_halfedges_consistent(&t);
        assert_eq!(t.halfedges.iter().filter(|&&h| h != EMPTY).count(), 2);
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<DVec2> = (0..10).map(|i| DVec2::new(i as f64, 2.0 * i as f64)).collect();
        assert!(triangulate_planar(&points).is_empty());
    }

    #[test]
    fn test_all_duplicates() {
        let points = vec![DVec2::new(0.5, 0.5); 6];
        assert!(triangulate_planar(&points).is_empty());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut points = random_points(50, 1);
        points.extend_from_slice(&points.clone()[..10]);

        let t = triangulate_planar(&points);
        assert!(!t.is_empty());
        assert_halfedges_consistent(&t);

        for tri in t.triangles.chunks_exact(3) {
            assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
            for &i in tri {
                assert!(i < points.len());
            }
            let area = orientation(points[tri[0]], points[tri[1]], points[tri[2]]);
            assert!(area > 0.0, "duplicate produced a degenerate triangle");
        }
    }

    #[test]
    fn test_random_points_are_delaunay() {
        let points = random_points(300, 42);
        let t = triangulate_planar(&points);

        assert_halfedges_consistent(&t);
        assert_delaunay(&points, &t);

        // Euler: triangles = 2n - 2 - h for points in general position
        assert_eq!(t.len(), 2 * points.len() - 2 - t.hull.len());
    }

    #[test]
    fn test_triangles_counter_clockwise() {
        let points = random_points(200, 9);
        let t = triangulate_planar(&points);

        for tri in t.triangles.chunks_exact(3) {
            assert!(orientation(points[tri[0]], points[tri[1]], points[tri[2]]) > 0.0);
        }
    }

    #[test]
    fn test_hull_is_convex_and_counter_clockwise() {
        let points = random_points(200, 5);
        let t = triangulate_planar(&points);
        let h = &t.hull;

        assert!(h.len() >= 3);
        for k in 0..h.len() {
            let (a, b, c) = (points[h[k]], points[h[(k + 1) % h.len()]], points[h[(k + 2) % h.len()]]);
            assert!(orientation(a, b, c) >= 0.0, "hull turns clockwise at {}", k);
        }

        // every hull edge is a twinless half-edge
        let boundary = t.halfedges.iter().filter(|&&e| e == EMPTY).count();
        assert_eq!(boundary, h.len());
    }

    #[test]
    fn test_grid_with_cocircular_points() {
        let mut points = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                points.push(DVec2::new(x as f64, y as f64));
            }
        }
        let t = triangulate_planar(&points);

        assert_halfedges_consistent(&t);
        assert_eq!(t.len(), 2 * 5 * 5);

        let mut area = 0.0;
        for tri in t.triangles.chunks_exact(3) {
            let twice_area = orientation(points[tri[0]], points[tri[1]], points[tri[2]]);
            assert!(twice_area > 0.0);
            area += twice_area * 0.5;
        }
        assert!((area - 25.0).abs() < 1e-9, "triangles should tile the grid (area {})", area);
    }

    #[test]
    fn test_deterministic() {
        let points = random_points(500, 77);
        assert_eq!(triangulate_planar(&points), triangulate_planar(&points));
    }

    #[test]
    fn test_triangle_indices() {
        let points = random_points(20, 3);
        let t = triangulate_planar(&points);
        let indices = t.triangle_indices();

        assert_eq!(indices.len(), t.len());
        assert_eq!(indices[0][0] as usize, t.triangles[0]);
    }

    #[test]
    fn test_circumcenter() {
        let c = circumcenter(DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0), DVec2::new(0.0, 2.0));
        assert!((c - DVec2::new(1.0, 1.0)).length() < 1e-12);
    }
}
