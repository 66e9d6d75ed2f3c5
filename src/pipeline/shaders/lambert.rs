use crate::core::color::saturate;
use crate::core::math::interpolation::interpolate;
use crate::core::pipeline::{Fragment, Shader, SurfaceVarying};
use crate::pipeline::shaders::{albedo, surface_vertex};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector3};

/// Diffuse-only shading with interpolated vertex normals.
pub struct LambertShader<'a> {
    pub mesh: &'a Mesh,
    pub camera: &'a Camera,
    pub light: Light,
    pub texture: Option<&'a Texture>,
}

impl<'a> LambertShader<'a> {
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
        }
    }
}

impl Shader for LambertShader<'_> {
    type Varying = SurfaceVarying;

    fn vertex(&self, face: usize, corner: usize) -> (Point3<f32>, Self::Varying) {
        surface_vertex(self.mesh, self.camera, face, corner)
    }

    fn fragment(&self, triangle: &[Self::Varying; 3], bary: Vector3<f32>) -> Fragment {
        let normal = interpolate(&SurfaceVarying::normals(triangle), bary)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let uv = interpolate(&SurfaceVarying::uvs(triangle), bary);

        let diff = normal.dot(&self.light.direction_to_light()).max(0.0);
        let color = self.light.radiance() * diff;
        Fragment::Color(saturate(color.component_mul(&albedo(self.texture, uv))))
    }
}
