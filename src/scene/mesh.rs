use crate::core::geometry::{Face, Vertex};
use crate::error::{RenderError, Result};
use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

/// Normal given to vertices that no non-degenerate triangle touches.
pub const FALLBACK_NORMAL: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// An indexed triangle mesh with smoothed per-vertex normals.
///
/// Indices are validated on construction, so every face refers to existing position
/// and texcoord slots for the lifetime of the mesh.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    texcoords: Vec<Vector2<f32>>,
    faces: Vec<Face>,
    normals: Vec<Vector3<f32>>,
}

impl Mesh {
    /// Builds a mesh and computes its vertex normals.
    ///
    /// Fails with [`RenderError::InvalidFaceIndex`] or
    /// [`RenderError::InvalidTexcoordIndex`] if a face points past the end of the
    /// position or texcoord arrays.
    pub fn new(
        positions: Vec<Point3<f32>>,
        texcoords: Vec<Vector2<f32>>,
        faces: Vec<Face>,
    ) -> Result<Self> {
        for (face_idx, face) in faces.iter().enumerate() {
            for &index in &face.vertices {
                if index >= positions.len() {
                    return Err(RenderError::InvalidFaceIndex {
                        face: face_idx,
                        index,
                        count: positions.len(),
                    });
                }
            }
            for &index in face.texcoords.iter().flatten() {
                if index >= texcoords.len() {
                    return Err(RenderError::InvalidTexcoordIndex {
                        face: face_idx,
                        index,
                        count: texcoords.len(),
                    });
                }
            }
        }

        let normals = compute_vertex_normals(&positions, &faces);
        Ok(Self {
            positions,
            texcoords,
            faces,
            normals,
        })
    }

    /// Creates a single triangle for testing purposes.
    ///
    /// Vertices are arranged in Counter-Clockwise (CCW) order, facing +Z.
    pub fn create_test_triangle() -> Self {
        let positions = vec![
            Point3::new(-0.5, -0.5, 0.0), // Bottom Left
            Point3::new(0.5, -0.5, 0.0),  // Bottom Right
            Point3::new(0.0, 0.5, 0.0),   // Top
        ];
        let texcoords = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.5, 1.0),
        ];
        let faces = vec![Face::with_texcoords([0, 1, 2], [0, 1, 2])];
        let normals = compute_vertex_normals(&positions, &faces);
        Self {
            positions,
            texcoords,
            faces,
            normals,
        }
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn texcoords(&self) -> &[Vector2<f32>] {
        &self.texcoords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Assembles corner `corner` (0..3) of face `face`.
    ///
    /// # Panics
    /// If `face` or `corner` is out of range.
    pub fn vertex(&self, face: usize, corner: usize) -> Vertex {
        let f = &self.faces[face];
        let index = f.vertices[corner];
        Vertex {
            position: self.positions[index],
            texcoord: f.texcoords[corner].map(|t| self.texcoords[t]),
            normal: Some(self.normals[index]),
        }
    }

    /// Recentres the mesh on its bounding box center and scales it so the largest
    /// extent becomes 1.8 (fits in [-1, 1] with a little padding).
    ///
    /// Returns the original center and the scaling factor used. Normals are unchanged
    /// since the transform is a translation plus uniform scale.
    pub fn normalize_and_center(&mut self) -> (Point3<f32>, f32) {
        if self.positions.is_empty() {
            return (Point3::origin(), 1.0);
        }

        // 1. Calculate Bounding Box
        let mut min_bound = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max_bound = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        for p in &self.positions {
            min_bound = min_bound.inf(p);
            max_bound = max_bound.sup(p);
        }

        // 2. Calculate Center and Size
        let center = nalgebra::center(&min_bound, &max_bound);
        let extent = max_bound - min_bound;
        let max_dimension = extent.x.max(extent.y).max(extent.z);

        let scale_factor = if max_dimension > 1e-6 {
            1.8 / max_dimension
        } else {
            1.0
        };

        // 3. Apply Transform to all positions
        for p in &mut self.positions {
            *p = Point3::from((*p - center) * scale_factor);
        }

        (center, scale_factor)
    }
}

/// Area-weighted smooth vertex normals.
///
/// Each triangle adds its unit normal times its area (half the edge cross product) to
/// its three vertices; the sums are normalized at the end. Vertices with no
/// contribution get [`FALLBACK_NORMAL`].
pub fn compute_vertex_normals(positions: &[Point3<f32>], faces: &[Face]) -> Vec<Vector3<f32>> {
    let mut accum = vec![Vector3::zeros(); positions.len()];

    for face in faces {
        let [i0, i1, i2] = face.vertices;
        let e1 = positions[i1] - positions[i0];
        let e2 = positions[i2] - positions[i0];
        // |e1 x e2| is twice the area, so halving it weights by area.
        let weighted = e1.cross(&e2) * 0.5;
        for &i in &face.vertices {
            accum[i] += weighted;
        }
    }

    let mut fallback = 0;
    let normals: Vec<Vector3<f32>> = accum
        .into_iter()
        .map(|n| {
            n.try_normalize(f32::EPSILON).unwrap_or_else(|| {
                fallback += 1;
                FALLBACK_NORMAL
            })
        })
        .collect();

    if fallback > 0 {
        debug!("{} vertices have no surface area, using fallback normal", fallback);
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn isolated_triangle_normals_equal_face_normal() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(0.0, 3.0, -1.0),
        ];
        let face_normal = (positions[1] - positions[0])
            .cross(&(positions[2] - positions[0]))
            .normalize();
        let mesh = Mesh::new(positions, vec![], vec![Face::new([0, 1, 2])]).unwrap();

        for n in mesh.normals() {
            assert_relative_eq!(*n, face_normal, epsilon = 1e-6);
        }
    }

    #[test]
    fn shared_vertex_weights_by_area() {
        // Big triangle facing +Z and a small one facing +X share vertex 0.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![Face::new([0, 1, 2]), Face::new([0, 3, 4])];
        let mesh = Mesh::new(positions, vec![], faces).unwrap();

        // Areas 8 and 0.5.
        let expected = Vector3::new(0.5, 0.0, 8.0).normalize();
        assert_relative_eq!(mesh.normals()[0], expected, epsilon = 1e-6);
        assert_relative_eq!(mesh.normals()[1], Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(mesh.normals()[3], Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn untouched_vertices_get_fallback_normal() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let mesh = Mesh::new(positions, vec![], vec![Face::new([0, 1, 2])]).unwrap();
        assert!(mesh.normals().iter().all(|n| *n == FALLBACK_NORMAL));
    }

    #[test]
    fn out_of_range_indices_fail_fast() {
        let positions = vec![Point3::origin(); 3];
        let err = Mesh::new(positions.clone(), vec![], vec![Face::new([0, 1, 3])]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidFaceIndex {
                face: 0,
                index: 3,
                count: 3
            }
        ));

        let face = Face::with_texcoords([0, 1, 2], [0, 0, 1]);
        let err = Mesh::new(positions, vec![Vector2::zeros()], vec![face]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidTexcoordIndex { index: 1, .. }
        ));
    }

    #[test]
    fn vertex_assembles_corner_attributes() {
        let mesh = Mesh::create_test_triangle();
        let v = mesh.vertex(0, 1);
        assert_eq!(v.position, Point3::new(0.5, -0.5, 0.0));
        assert_eq!(v.texcoord, Some(Vector2::new(1.0, 0.0)));
        assert_relative_eq!(v.normal.unwrap(), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn normalize_fits_largest_extent() {
        let positions = vec![
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(14.0, 0.0, 0.0),
            Point3::new(10.0, 2.0, 0.0),
        ];
        let mut mesh = Mesh::new(positions, vec![], vec![Face::new([0, 1, 2])]).unwrap();
        let (center, scale) = mesh.normalize_and_center();

        assert_relative_eq!(center, Point3::new(12.0, 1.0, 0.0));
        assert_relative_eq!(scale, 0.45);
        assert_relative_eq!(mesh.positions()[1], Point3::new(0.9, -0.45, 0.0), epsilon = 1e-6);
    }
}
