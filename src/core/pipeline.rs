use nalgebra::{Point3, Vector2, Vector3};
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
pub trait Interpolatable: Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Interpolatable for f32 {}
impl Interpolatable for Vector2<f32> {}
impl Interpolatable for Vector3<f32> {}

/// Result of the fragment stage for one covered pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fragment {
    /// Linear RGB, clamped to [0, 1] by the shader.
    Color(Vector3<f32>),
    /// Veto the write. The pixel keeps its previous color and depth even though the
    /// depth test passed.
    Discard,
}

/// Shader represents the programmable stages of the pipeline.
///
/// Per triangle the renderer calls [`Shader::vertex`] exactly three times (corners
/// 0, 1, 2) and collects the returned varyings into a `[Self::Varying; 3]` bundle.
/// The rasterizer then calls [`Shader::fragment`] once per covered pixel that passes
/// the depth test, handing the same bundle back together with the pixel's barycentric
/// weights. Shaders hold no per-triangle state of their own.
pub trait Shader {
    /// Per-vertex data the fragment stage needs (world position, UV, normal, ...).
    type Varying: Copy;

    /// Vertex shader stage.
    ///
    /// Returns the screen-space position of `corner` of face `face` (x, y in pixels,
    /// z = depth where larger means nearer) and the varying for that corner.
    fn vertex(&self, face: usize, corner: usize) -> (Point3<f32>, Self::Varying);

    /// Fragment shader stage.
    ///
    /// `bary` holds `(w, u, v)`: `w` weights `triangle[0]`, `u` weights `triangle[1]`,
    /// `v` weights `triangle[2]`. They sum to one.
    fn fragment(&self, triangle: &[Self::Varying; 3], bary: Vector3<f32>) -> Fragment;
}

/// Varying shared by the built-in shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceVarying {
    /// Position in world space.
    pub world_pos: Point3<f32>,
    /// Texture coordinates; (0, 0) when the face has none.
    pub uv: Vector2<f32>,
    /// Smoothed vertex normal in world space.
    pub normal: Vector3<f32>,
}

impl SurfaceVarying {
    pub fn world_positions(triangle: &[Self; 3]) -> [Vector3<f32>; 3] {
        triangle.map(|v| v.world_pos.coords)
    }

    pub fn uvs(triangle: &[Self; 3]) -> [Vector2<f32>; 3] {
        triangle.map(|v| v.uv)
    }

    pub fn normals(triangle: &[Self; 3]) -> [Vector3<f32>; 3] {
        triangle.map(|v| v.normal)
    }
}
