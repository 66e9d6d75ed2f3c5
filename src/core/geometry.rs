use nalgebra::{Point3, Vector2, Vector3};

/// The attributes of one triangle corner, assembled from a [`Face`] and the mesh's
/// attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in world space.
    pub position: Point3<f32>,
    /// Texture coordinates, if the face supplied them.
    pub texcoord: Option<Vector2<f32>>,
    /// Smoothed vertex normal (unit length).
    pub normal: Option<Vector3<f32>>,
}

impl Vertex {
    /// UV for shading; a missing texcoord samples at (0, 0).
    pub fn uv_or_default(&self) -> Vector2<f32> {
        self.texcoord.unwrap_or_else(Vector2::zeros)
    }
}

/// A triangle: three 0-based position indices and the parallel texcoord indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub texcoords: [Option<usize>; 3],
}

impl Face {
    pub fn new(vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            texcoords: [None; 3],
        }
    }

    pub fn with_texcoords(vertices: [usize; 3], texcoords: [usize; 3]) -> Self {
        Self {
            vertices,
            texcoords: texcoords.map(Some),
        }
    }
}
