use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

/// Counters collected while drawing a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Faces submitted.
    pub triangles: usize,
    /// Faces skipped because their screen-space area was zero.
    pub degenerate: usize,
    /// Pixels written by the fill stage.
    pub fragments_written: usize,
}

impl std::ops::AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.triangles += other.triangles;
        self.degenerate += other.degenerate;
        self.fragments_written += other.fragments_written;
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            // Rasterizer is stateless regarding size, it relies on the framebuffer passed to it.
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Clears color to `color` and depth to empty.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color);
    }

    /// Draws every face of `mesh`, in order, through `shader`.
    pub fn draw_mesh<S: Shader>(&mut self, mesh: &Mesh, shader: &S) -> RenderStats {
        let mut stats = RenderStats::default();

        for face in 0..mesh.num_faces() {
            stats.triangles += 1;

            // 1. Vertex Processing & Primitive Assembly
            let (pos0, var0) = shader.vertex(face, 0);
            let (pos1, var1) = shader.vertex(face, 1);
            let (pos2, var2) = shader.vertex(face, 2);
            let screen = [pos0, pos1, pos2];
            let varyings = [var0, var1, var2];

            if self.rasterizer.wireframe {
                self.rasterizer
                    .wireframe_triangle(&mut self.framebuffer, &screen);
                continue;
            }

            // 2. Rasterization
            match self
                .rasterizer
                .fill_triangle(&mut self.framebuffer, shader, &screen, &varyings)
            {
                Some(written) => stats.fragments_written += written,
                None => stats.degenerate += 1,
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Face;
    use crate::core::pipeline::Fragment;
    use nalgebra::Point3;

    /// Places mesh positions directly in screen space and paints everything red.
    struct ScreenSpaceShader<'a> {
        mesh: &'a Mesh,
    }

    impl Shader for ScreenSpaceShader<'_> {
        type Varying = ();

        fn vertex(&self, face: usize, corner: usize) -> (Point3<f32>, ()) {
            (self.mesh.vertex(face, corner).position, ())
        }

        fn fragment(&self, _: &[(); 3], _: Vector3<f32>) -> Fragment {
            Fragment::Color(Vector3::x())
        }
    }

    fn mesh() -> Mesh {
        let positions = vec![
            Point3::new(1.0, 1.0, 0.5),
            Point3::new(5.0, 1.0, 0.5),
            Point3::new(1.0, 5.0, 0.5),
            Point3::new(6.0, 7.0, 0.5),
            Point3::new(7.0, 8.0, 0.5),
            Point3::new(8.0, 9.0, 0.5),
        ];
        let faces = vec![Face::new([0, 1, 2]), Face::new([3, 4, 5])];
        Mesh::new(positions, vec![], faces).unwrap()
    }

    #[test]
    fn stats_count_degenerate_faces() {
        let mesh = mesh();
        let mut renderer = Renderer::new(10, 10);
        renderer.clear(Vector3::zeros());
        let stats = renderer.draw_mesh(&mesh, &ScreenSpaceShader { mesh: &mesh });

        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.degenerate, 1);
        // Right isosceles triangle with legs of 4 pixels, edges inclusive.
        assert_eq!(stats.fragments_written, 15);
        assert_eq!(renderer.framebuffer.get_pixel(2, 2), Some([255, 0, 0]));
    }

    #[test]
    fn redraw_writes_nothing_new() {
        let mesh = mesh();
        let shader = ScreenSpaceShader { mesh: &mesh };
        let mut renderer = Renderer::new(10, 10);
        renderer.draw_mesh(&mesh, &shader);
        let first = renderer.framebuffer.clone();

        let again = renderer.draw_mesh(&mesh, &shader);
        assert_eq!(again.fragments_written, 0);
        assert_eq!(renderer.framebuffer.color_buffer(), first.color_buffer());
        assert_eq!(renderer.framebuffer.depth_buffer(), first.depth_buffer());
    }

    #[test]
    fn wireframe_skips_the_fill() {
        let mesh = mesh();
        let mut renderer = Renderer::new(10, 10);
        renderer.rasterizer.wireframe = true;
        let stats = renderer.draw_mesh(&mesh, &ScreenSpaceShader { mesh: &mesh });

        assert_eq!(stats.fragments_written, 0);
        assert_eq!(renderer.framebuffer.get_pixel(1, 1), Some([255, 255, 255]));
        assert_eq!(renderer.framebuffer.get_pixel(2, 2), Some([0, 0, 0]));
    }
}
