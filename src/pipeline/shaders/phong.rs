use crate::core::color::saturate;
use crate::core::math::interpolation::interpolate;
use crate::core::pipeline::{Fragment, Shader, SurfaceVarying};
use crate::pipeline::shaders::{albedo, surface_vertex};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector3};

/// Strengths of the three Phong terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub shininess: f32,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            ambient_strength: 0.1,
            specular_strength: 0.5,
            shininess: 32.0,
        }
    }
}

/// A standard Phong lighting shader.
/// Calculates Ambient + Diffuse + Specular components.
pub struct PhongShader<'a> {
    pub mesh: &'a Mesh,
    pub camera: &'a Camera,
    pub light: Light,
    pub texture: Option<&'a Texture>,
    pub params: PhongParams,
}

impl<'a> PhongShader<'a> {
    pub fn new(
        mesh: &'a Mesh,
        camera: &'a Camera,
        light: Light,
        texture: Option<&'a Texture>,
        params: PhongParams,
    ) -> Self {
        Self {
            mesh,
            camera,
            light,
            texture,
            params,
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = SurfaceVarying;

    fn vertex(&self, face: usize, corner: usize) -> (Point3<f32>, Self::Varying) {
        surface_vertex(self.mesh, self.camera, face, corner)
    }

    fn fragment(&self, triangle: &[Self::Varying; 3], bary: Vector3<f32>) -> Fragment {
        // 1. Interpolate surface attributes
        let normal = interpolate(&SurfaceVarying::normals(triangle), bary)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let world_pos = interpolate(&SurfaceVarying::world_positions(triangle), bary);
        let uv = interpolate(&SurfaceVarying::uvs(triangle), bary);

        let light_dir = self.light.direction_to_light();
        let view_dir = (self.camera.position.coords - world_pos)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        // Ambient
        let ambient = self.light.color * self.params.ambient_strength;

        // Diffuse
        let diff = normal.dot(&light_dir).max(0.0);
        let diffuse = self.light.radiance() * diff;

        // Specular (only on the lit side), white regardless of the light color
        let specular = if diff > 0.0 {
            let reflect_dir = normal * (2.0 * normal.dot(&light_dir)) - light_dir;
            let spec = view_dir
                .dot(&reflect_dir)
                .max(0.0)
                .powf(self.params.shininess);
            Vector3::repeat(spec * self.params.specular_strength * self.light.intensity)
        } else {
            Vector3::zeros()
        };

        let lit = ambient + diffuse + specular;
        Fragment::Color(saturate(lit.component_mul(&albedo(self.texture, uv))))
    }
}
