use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;

/// Holds all scene resources required for rendering one frame.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub mesh: Mesh,
    pub texture: Option<Texture>,
    pub camera: Camera,
    pub light: Light,
}
