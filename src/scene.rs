//! Engine-agnostic scene description
//!
//! Camera, lighting and material settings for displaying a sphere surface,
//! held in one explicit value instead of engine-wide globals. The crate
//! never renders; a host application reads a [`SceneSetup`] and configures
//! its own engine from it.

use glam::{DVec3, Vec3};
use std::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::mesh::MeshData;

/// RGBA color type
pub type Rgba = [f32; 4];

/// Convert a `0xRRGGBB` color to opaque RGBA in `[0, 1]`
///
/// # Example
///
/// ```
/// use sphere_mesh::scene::rgba_from_hex;
///
/// assert_eq!(rgba_from_hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
/// ```
pub fn rgba_from_hex(hex: u32) -> Rgba {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// Perspective camera orbiting the origin
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSetup {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at (orbit centre)
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl CameraSetup {
    /// Update the aspect ratio after a viewport resize
    ///
    /// A zero height leaves the aspect unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov_y_degrees: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// One directional light plus ambient fill
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSetup {
    pub directional_color: Rgba,
    pub directional_intensity: f32,
    /// The light shines from here towards the origin
    pub directional_position: Vec3,
    pub ambient_color: Rgba,
}

impl LightSetup {
    /// Unit direction the directional light travels in
    pub fn direction(&self) -> Vec3 {
        (-self.directional_position).normalize_or_zero()
    }
}

impl Default for LightSetup {
    fn default() -> Self {
        Self {
            directional_color: rgba_from_hex(0xffffff),
            directional_intensity: 1.0,
            directional_position: Vec3::new(5.0, 5.0, 5.0),
            ambient_color: rgba_from_hex(0x404040),
        }
    }
}

/// Surface appearance
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSetup {
    pub color: Rgba,
    /// Use per-face normals (faceted look)
    pub flat_shading: bool,
    /// Draw edges only
    pub wireframe: bool,
}

impl MaterialSetup {
    /// Blue, lit, flat-shaded material for the triangulated surface
    pub fn surface() -> Self {
        Self {
            color: rgba_from_hex(0x0088ff),
            flat_shading: true,
            wireframe: false,
        }
    }

    /// Red unlit wireframe for the reference sphere
    pub fn reference() -> Self {
        Self {
            color: rgba_from_hex(0xff0000),
            flat_shading: false,
            wireframe: true,
        }
    }
}

/// UV sphere drawn behind the surface as a visual reference
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSphere {
    pub radius: f64,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl ReferenceSphere {
    /// Build the sphere's mesh
    pub fn mesh(&self) -> Result<MeshData> {
        reference_sphere_mesh(self.radius, self.width_segments, self.height_segments)
    }
}

impl Default for ReferenceSphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

/// Everything a host renderer needs besides the surface mesh
///
/// # Example
///
/// ```
/// use sphere_mesh::scene::SceneSetup;
///
/// let mut scene = SceneSetup::default();
/// scene.camera.resize(1920, 1080);
/// assert!((scene.camera.aspect - 16.0 / 9.0).abs() < 1e-6);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSetup {
    pub camera: CameraSetup,
    pub light: LightSetup,
    pub surface_material: MaterialSetup,
    pub reference_material: MaterialSetup,
    /// `None` hides the reference sphere
    pub reference_sphere: Option<ReferenceSphere>,
}

impl Default for SceneSetup {
    fn default() -> Self {
        Self {
            camera: CameraSetup::default(),
            light: LightSetup::default(),
            surface_material: MaterialSetup::surface(),
            reference_material: MaterialSetup::reference(),
            reference_sphere: Some(ReferenceSphere::default()),
        }
    }
}

/// Generate a UV sphere as non-indexed triangles with radial normals
///
/// Rows touching a pole emit one triangle per segment instead of two, so no
/// zero-area faces are produced. The triangle count is
/// `width_segments * (2 * height_segments - 2)`.
///
/// # Errors
///
/// Returns `InvalidInput` if the radius is not positive and finite, or if
/// there are fewer than 3 width or 2 height segments.
pub fn reference_sphere_mesh(radius: f64, width_segments: u32, height_segments: u32) -> Result<MeshData> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::InvalidInput(format!(
            "reference sphere radius must be positive (got {})",
            radius
        )));
    }
    if width_segments < 3 || height_segments < 2 {
        return Err(MeshError::InvalidInput(format!(
            "reference sphere needs at least 3x2 segments (got {}x{})",
            width_segments, height_segments
        )));
    }

    let direction = |ix: u32, iy: u32| -> DVec3 {
        let (sin_theta, cos_theta) = (TAU * ix as f64 / width_segments as f64).sin_cos();
        let (sin_phi, cos_phi) = (PI * iy as f64 / height_segments as f64).sin_cos();
        DVec3::new(-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi)
    };

    let triangle_count = (width_segments * (2 * height_segments - 2)) as usize;
    let mut mesh = MeshData {
        positions: Vec::with_capacity(triangle_count * 3),
        normals: Vec::with_capacity(triangle_count * 3),
    };

    let mut push = |corners: [DVec3; 3]| {
        for normal in corners {
            mesh.positions.push((normal * radius).as_vec3().to_array());
            mesh.normals.push(normal.as_vec3().to_array());
        }
    };

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = direction(ix + 1, iy);
            let b = direction(ix, iy);
            let c = direction(ix, iy + 1);
            let d = direction(ix + 1, iy + 1);

            if iy != 0 {
                push([a, b, d]);
            }
            if iy != height_segments - 1 {
                push([b, c, d]);
            }
        }
    }

    Ok(mesh)
}
