use crate::core::color::saturate;
use crate::core::math::interpolation::interpolate;
use crate::core::pipeline::{Fragment, Shader, SurfaceVarying};
use crate::pipeline::shaders::{albedo, surface_vertex};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector3};

/// Faceted diffuse shading: one normal per triangle, taken from its world-space
/// corners in counter-clockwise order.
pub struct FlatShader<'a> {
    pub mesh: &'a Mesh,
    pub camera: &'a Camera,
    pub light: Light,
    pub texture: Option<&'a Texture>,
    /// Discard fragments the light does not reach instead of writing them black.
    pub discard_unlit: bool,
}

impl<'a> FlatShader<'a> {
    pub fn new(
        mesh: &'a Mesh,
        camera: &'a Camera,
        light: Light,
        texture: Option<&'a Texture>,
    ) -> Self {
        Self {
            mesh,
            camera,
            light,
            texture,
            discard_unlit: false,
        }
    }
}

/// Outward normal of a counter-clockwise triangle, zero if it has no area.
pub fn face_normal(triangle: &[SurfaceVarying; 3]) -> Vector3<f32> {
    let [p0, p1, p2] = SurfaceVarying::world_positions(triangle);
    (p1 - p0)
        .cross(&(p2 - p0))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

impl Shader for FlatShader<'_> {
    type Varying = SurfaceVarying;

    fn vertex(&self, face: usize, corner: usize) -> (Point3<f32>, Self::Varying) {
        surface_vertex(self.mesh, self.camera, face, corner)
    }

    fn fragment(&self, triangle: &[Self::Varying; 3], bary: Vector3<f32>) -> Fragment {
        let normal = face_normal(triangle);
        let diff = normal.dot(&self.light.direction_to_light()).max(0.0);
        if diff <= 0.0 && self.discard_unlit {
            return Fragment::Discard;
        }

        let uv = interpolate(&SurfaceVarying::uvs(triangle), bary);
        let color = self.light.radiance() * diff;
        Fragment::Color(saturate(color.component_mul(&albedo(self.texture, uv))))
    }
}
