pub mod flat;
pub mod lambert;
pub mod phong;

use crate::core::pipeline::SurfaceVarying;
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector2, Vector3};

/// Vertex stage shared by the built-in shaders: project the corner and carry its
/// world position, UV and smoothed normal.
pub(crate) fn surface_vertex(
    mesh: &Mesh,
    camera: &Camera,
    face: usize,
    corner: usize,
) -> (Point3<f32>, SurfaceVarying) {
    let vertex = mesh.vertex(face, corner);
    let screen = camera.project(&vertex.position);
    let varying = SurfaceVarying {
        world_pos: vertex.position,
        uv: vertex.uv_or_default(),
        normal: vertex.normal.unwrap_or_else(Vector3::zeros),
    };
    (screen, varying)
}

/// Albedo at `uv`; white when there is no texture.
pub(crate) fn albedo(texture: Option<&Texture>, uv: Vector2<f32>) -> Vector3<f32> {
    texture.map_or_else(|| Vector3::new(1.0, 1.0, 1.0), |t| t.sample(uv))
}
