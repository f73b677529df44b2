//! Uniform random point distribution on the unit sphere
//!
//! # Algorithm
//!
//! Each point consumes two uniform values `u, v ∈ [0, 1)`:
//! - Azimuth: `θ = 2π·u`
//! - Polar angle: `φ = acos(2v − 1)`
//!
//! Drawing `cos φ` uniformly (rather than `φ` itself) gives equal probability
//! per unit of surface area. Uniform `φ` would bunch points at the poles.

use glam::DVec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::point_set::PointSet;

/// A stream of uniform random values in `[0, 1)`
///
/// Every [`rand::RngCore`] is a source, so seeded generators plug in directly.
/// [`SequenceSource`] replays fixed values for exact assertions.
pub trait UniformSource {
    /// Next value of the stream, expected in `[0, 1)`
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed, cycling list of uniform values
///
/// # Example
///
/// ```rust
/// use sphere_mesh::generation::{generate_sphere_points, SequenceSource};
///
/// // u = 0.0, v = 1.0 lands exactly on the north pole
/// let mut source = SequenceSource::new(vec![0.0, 1.0]);
/// let points = generate_sphere_points(1, &mut source);
/// assert!((points.as_slice()[0].z - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Create a source cycling through `values`
    ///
    /// An empty list behaves like a constant stream of `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl UniformSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Map one `(u, v)` pair to a point on the unit sphere
///
/// `v` is clamped so `acos` never sees an argument outside `[-1, 1]`.
pub fn sphere_point(u: f64, v: f64) -> DVec3 {
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    DVec3::new(sin_phi * cos_theta, sin_phi * sin_theta, cos_phi)
}

/// Generate `count` points uniformly distributed over the unit sphere
///
/// A `count` of zero returns an empty set.
///
/// # Arguments
///
/// * `count` - Number of points to generate
/// * `source` - Uniform value stream (two values consumed per point)
pub fn generate_sphere_points<S>(count: usize, source: &mut S) -> PointSet
where
    S: UniformSource + ?Sized,
{
    if count == 0 {
        tracing::debug!("point sampler asked for zero points");
        return PointSet::default();
    }

    (0..count)
        .map(|_| {
            let u = source.next_uniform();
            let v = source.next_uniform();
            sphere_point(u, v)
        })
        .collect()
}

/// Generate points from a `ChaCha8Rng` seeded with `seed`
///
/// The same seed always yields the same point set.
///
/// # Example
///
/// ```rust
/// use sphere_mesh::generation::generate_seeded_points;
///
/// let points = generate_seeded_points(500, 42);
/// assert_eq!(points.len(), 500);
/// assert_eq!(points, generate_seeded_points(500, 42));
/// ```
pub fn generate_seeded_points(count: usize, seed: u64) -> PointSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_sphere_points(count, &mut rng)
}

/// Generate points from the thread-local RNG (different on every call)
pub fn generate_random_points(count: usize) -> PointSet {
    let mut rng = rand::thread_rng();
    generate_sphere_points(count, &mut rng)
}
