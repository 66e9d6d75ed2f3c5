use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{BarycentricSolver, is_inside_triangle};
use crate::core::pipeline::{Fragment, Shader};
use nalgebra::{Point2, Point3};

/// The Rasterizer is responsible for drawing geometric primitives onto the FrameBuffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    /// Draw triangle outlines instead of shaded fills.
    pub wireframe: bool,
    /// Outline color used in wireframe mode.
    pub wireframe_color: [u8; 3],
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            wireframe: false,
            wireframe_color: [255, 255, 255],
        }
    }

    /// Fills one screen-space triangle.
    ///
    /// Walks the pixel bounding box (clamped to the framebuffer), solves barycentric
    /// weights `(w, u, v)` for every integer pixel position and keeps pixels with
    /// `u >= 0, v >= 0, u + v <= 1`. Depth is interpolated as
    /// `z0 * w + z1 * u + z2 * v`; a pixel whose depth beats the stored one is shaded,
    /// and written unless the shader discards it.
    ///
    /// Returns the number of pixels written, or `None` if the triangle is degenerate
    /// and was skipped without touching the framebuffer.
    pub fn fill_triangle<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        screen: &[Point3<f32>; 3],
        varyings: &[S::Varying; 3],
    ) -> Option<usize> {
        let solver = BarycentricSolver::new(
            screen[0].xy(),
            screen[1].xy(),
            screen[2].xy(),
        )?;

        if framebuffer.width == 0 || framebuffer.height == 0 {
            return Some(0);
        }

        let (min_x, min_y, max_x, max_y) =
            compute_bounding_box(screen, framebuffer.width, framebuffer.height);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let bary = solver.weights(Point2::new(x as f32, y as f32));
                if !is_inside_triangle(bary) {
                    continue;
                }

                let depth = screen[0].z * bary.x + screen[1].z * bary.y + screen[2].z * bary.z;
                if !framebuffer.depth_test(x, y, depth) {
                    continue;
                }

                if let Fragment::Color(color) = shader.fragment(varyings, bary) {
                    framebuffer.write_fragment(x, y, color, depth);
                    written += 1;
                }
            }
        }
        Some(written)
    }

    /// Outlines a screen-space triangle with [`Rasterizer::draw_line`], ignoring depth.
    pub fn wireframe_triangle(&self, framebuffer: &mut FrameBuffer, screen: &[Point3<f32>; 3]) {
        for i in 0..3 {
            let (a, b) = (screen[i], screen[(i + 1) % 3]);
            let from = Point2::new(a.x as f64, a.y as f64);
            let to = Point2::new(b.x as f64, b.y as f64);
            self.draw_segment(framebuffer, from, to, self.wireframe_color);
        }
    }

    /// Bresenham line between two pixel positions, both endpoints included.
    /// The line is clipped to the framebuffer first, so far off-screen endpoints are fine.
    pub fn draw_line(
        &self,
        framebuffer: &mut FrameBuffer,
        from: (i32, i32),
        to: (i32, i32),
        color: [u8; 3],
    ) {
        let from = Point2::new(from.0 as f64, from.1 as f64);
        let to = Point2::new(to.0 as f64, to.1 as f64);
        self.draw_segment(framebuffer, from, to, color);
    }

    fn draw_segment(
        &self,
        framebuffer: &mut FrameBuffer,
        from: Point2<f64>,
        to: Point2<f64>,
        color: [u8; 3],
    ) {
        if framebuffer.width == 0 || framebuffer.height == 0 {
            return;
        }
        let max_x = (framebuffer.width - 1) as f64;
        let max_y = (framebuffer.height - 1) as f64;
        let Some((a, b)) = clip_line(from, to, max_x, max_y) else {
            return;
        };

        let to_pixel = |p: Point2<f64>| {
            (p.x.clamp(0.0, max_x) as i32, p.y.clamp(0.0, max_y) as i32)
        };
        bresenham(framebuffer, to_pixel(a), to_pixel(b), color);
    }
}

/// Integer Bresenham. Endpoints must already lie inside the framebuffer.
fn bresenham(framebuffer: &mut FrameBuffer, from: (i32, i32), to: (i32, i32), color: [u8; 3]) {
    let (mut x0, mut y0) = from;
    let (mut x1, mut y1) = to;

    // Iterate along the longer axis.
    let steep = (x0 - x1).abs() < (y0 - y1).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let y_step = if y0 < y1 { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = y0;

    for x in x0..=x1 {
        if steep {
            framebuffer.set_pixel(y, x, color);
        } else {
            framebuffer.set_pixel(x, y, color);
        }

        error -= dy;
        if error < 0 {
            y += y_step;
            error += dx;
        }
    }
}

const CLIP_LEFT: u8 = 1;
const CLIP_RIGHT: u8 = 2;
const CLIP_BOTTOM: u8 = 4;
const CLIP_TOP: u8 = 8;

fn outcode(p: Point2<f64>, max_x: f64, max_y: f64) -> u8 {
    let mut code = 0;
    if p.x < 0.0 {
        code |= CLIP_LEFT;
    } else if p.x > max_x {
        code |= CLIP_RIGHT;
    }
    if p.y < 0.0 {
        code |= CLIP_BOTTOM;
    } else if p.y > max_y {
        code |= CLIP_TOP;
    }
    code
}

/// Cohen-Sutherland clip of segment `a-b` to `[0, max_x] x [0, max_y]`.
/// Returns `None` when nothing of the segment is visible or a coordinate is not finite.
fn clip_line(
    mut a: Point2<f64>,
    mut b: Point2<f64>,
    max_x: f64,
    max_y: f64,
) -> Option<(Point2<f64>, Point2<f64>)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }

    let mut code_a = outcode(a, max_x, max_y);
    let mut code_b = outcode(b, max_x, max_y);

    // Each pass moves one endpoint onto a boundary; four boundaries per endpoint.
    for _ in 0..8 {
        if code_a | code_b == 0 {
            return Some((a, b));
        }
        if code_a & code_b != 0 {
            return None;
        }

        let out = if code_a != 0 { code_a } else { code_b };
        let p = if out & CLIP_TOP != 0 {
            Point2::new(a.x + (b.x - a.x) * (max_y - a.y) / (b.y - a.y), max_y)
        } else if out & CLIP_BOTTOM != 0 {
            Point2::new(a.x + (b.x - a.x) * (0.0 - a.y) / (b.y - a.y), 0.0)
        } else if out & CLIP_RIGHT != 0 {
            Point2::new(max_x, a.y + (b.y - a.y) * (max_x - a.x) / (b.x - a.x))
        } else {
            Point2::new(0.0, a.y + (b.y - a.y) * (0.0 - a.x) / (b.x - a.x))
        };

        if out == code_a {
            a = p;
            code_a = outcode(a, max_x, max_y);
        } else {
            b = p;
            code_b = outcode(b, max_x, max_y);
        }
    }
    None
}

/// Integer pixel bounds of the triangle, clamped to `[0, width-1] x [0, height-1]`.
/// `width` and `height` must be non-zero.
fn compute_bounding_box(
    points: &[Point3<f32>; 3],
    width: usize,
    height: usize,
) -> (usize, usize, usize, usize) {
    let max_x_px = width as i64 - 1;
    let max_y_px = height as i64 - 1;

    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i64;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i64;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i64;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i64;

    (
        min_x.clamp(0, max_x_px) as usize,
        min_y.clamp(0, max_y_px) as usize,
        max_x.clamp(0, max_x_px) as usize,
        max_y.clamp(0, max_y_px) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::framebuffer::EMPTY_DEPTH;
    use nalgebra::Vector3;
    use std::cell::Cell;

    /// Paints every fragment one color and counts fragment calls.
    struct SolidShader {
        color: Vector3<f32>,
        discard: bool,
        calls: Cell<usize>,
    }

    impl SolidShader {
        fn new(color: Vector3<f32>) -> Self {
            Self {
                color,
                discard: false,
                calls: Cell::new(0),
            }
        }
    }

    impl Shader for SolidShader {
        type Varying = ();

        fn vertex(&self, _face: usize, _corner: usize) -> (Point3<f32>, ()) {
            (Point3::origin(), ())
        }

        fn fragment(&self, _triangle: &[(); 3], _bary: Vector3<f32>) -> Fragment {
            self.calls.set(self.calls.get() + 1);
            if self.discard {
                Fragment::Discard
            } else {
                Fragment::Color(self.color)
            }
        }
    }

    fn tri(points: [(f32, f32, f32); 3]) -> [Point3<f32>; 3] {
        points.map(|(x, y, z)| Point3::new(x, y, z))
    }

    fn covered(fb: &FrameBuffer) -> usize {
        fb.depth_buffer().iter().filter(|&&d| d != EMPTY_DEPTH).count()
    }

    #[test]
    fn fills_right_triangle_inclusively() {
        let mut fb = FrameBuffer::new(16, 16);
        let shader = SolidShader::new(Vector3::new(1.0, 0.0, 0.0));
        let screen = tri([(0.0, 0.0, 0.5), (4.0, 0.0, 0.5), (0.0, 4.0, 0.5)]);

        let written = Rasterizer::new().fill_triangle(&mut fb, &shader, &screen, &[(); 3]);

        // x + y <= 4 on the integer grid: 5 + 4 + 3 + 2 + 1 pixels.
        assert_eq!(written, Some(15));
        assert_eq!(covered(&fb), 15);
        assert_eq!(fb.get_pixel(4, 0), Some([255, 0, 0]));
        assert_eq!(fb.get_pixel(2, 2), Some([255, 0, 0]));
        assert_eq!(fb.get_pixel(3, 2), Some([0, 0, 0]));
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let mut fb = FrameBuffer::new(8, 8);
        let shader = SolidShader::new(Vector3::new(1.0, 1.0, 1.0));
        let screen = tri([(1.0, 1.0, 0.5), (3.0, 3.0, 0.5), (6.0, 6.0, 0.5)]);

        let written = Rasterizer::new().fill_triangle(&mut fb, &shader, &screen, &[(); 3]);

        assert_eq!(written, None);
        assert_eq!(shader.calls.get(), 0);
        assert_eq!(covered(&fb), 0);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let far = tri([(0.0, 0.0, 0.2), (8.0, 0.0, 0.2), (0.0, 8.0, 0.2)]);
        let near = tri([(0.0, 0.0, 0.8), (8.0, 0.0, 0.8), (0.0, 8.0, 0.8)]);
        let red = SolidShader::new(Vector3::new(1.0, 0.0, 0.0));
        let green = SolidShader::new(Vector3::new(0.0, 1.0, 0.0));
        let rasterizer = Rasterizer::new();

        let mut fb = FrameBuffer::new(10, 10);
        rasterizer.fill_triangle(&mut fb, &green, &near, &[(); 3]);
        rasterizer.fill_triangle(&mut fb, &red, &far, &[(); 3]);
        assert_eq!(fb.get_pixel(1, 1), Some([0, 255, 0]));
        assert_eq!(red.calls.get(), 0);

        let mut fb = FrameBuffer::new(10, 10);
        rasterizer.fill_triangle(&mut fb, &red, &far, &[(); 3]);
        rasterizer.fill_triangle(&mut fb, &green, &near, &[(); 3]);
        assert_eq!(fb.get_pixel(1, 1), Some([0, 255, 0]));
    }

    #[test]
    fn second_identical_pass_changes_nothing() {
        let screen = tri([(1.0, 1.0, 0.3), (14.0, 2.0, 0.6), (5.0, 13.0, 0.9)]);
        let shader = SolidShader::new(Vector3::new(0.2, 0.4, 0.6));
        let rasterizer = Rasterizer::new();

        let mut once = FrameBuffer::new(16, 16);
        rasterizer.fill_triangle(&mut once, &shader, &screen, &[(); 3]);

        let mut twice = once.clone();
        let second = rasterizer.fill_triangle(&mut twice, &shader, &screen, &[(); 3]);

        assert_eq!(second, Some(0));
        assert_eq!(once.color_buffer(), twice.color_buffer());
        assert_eq!(once.depth_buffer(), twice.depth_buffer());
    }

    #[test]
    fn discarded_fragments_leave_buffers_untouched() {
        let mut fb = FrameBuffer::new(8, 8);
        let mut shader = SolidShader::new(Vector3::new(1.0, 1.0, 1.0));
        shader.discard = true;
        let screen = tri([(0.0, 0.0, 0.5), (6.0, 0.0, 0.5), (0.0, 6.0, 0.5)]);

        let written = Rasterizer::new().fill_triangle(&mut fb, &shader, &screen, &[(); 3]);

        assert_eq!(written, Some(0));
        assert!(shader.calls.get() > 0);
        assert_eq!(covered(&fb), 0);
        assert!(fb.color_buffer().iter().all(|&c| c == 0));
    }

    #[test]
    fn shared_edge_leaves_no_gap() {
        let mut fb = FrameBuffer::new(40, 40);
        let shader = SolidShader::new(Vector3::new(1.0, 1.0, 1.0));
        let rasterizer = Rasterizer::new();
        let lower = tri([(10.0, 10.0, 0.5), (30.0, 10.0, 0.5), (30.0, 30.0, 0.5)]);
        let upper = tri([(10.0, 10.0, 0.5), (30.0, 30.0, 0.5), (10.0, 30.0, 0.5)]);

        rasterizer.fill_triangle(&mut fb, &shader, &lower, &[(); 3]);
        rasterizer.fill_triangle(&mut fb, &shader, &upper, &[(); 3]);

        for y in 11..30 {
            for x in 11..30 {
                assert_ne!(fb.get_depth(x, y), Some(EMPTY_DEPTH), "gap at ({x}, {y})");
            }
        }
    }

    #[test]
    fn offscreen_parts_are_clipped_to_the_viewport() {
        let mut fb = FrameBuffer::new(8, 8);
        let shader = SolidShader::new(Vector3::new(1.0, 1.0, 1.0));
        let screen = tri([(-20.0, -20.0, 0.5), (40.0, -20.0, 0.5), (-20.0, 40.0, 0.5)]);

        let written = Rasterizer::new().fill_triangle(&mut fb, &shader, &screen, &[(); 3]);

        assert_eq!(written, Some(64));
    }

    #[test]
    fn lines_include_both_endpoints() {
        let mut fb = FrameBuffer::new(8, 8);
        let rasterizer = Rasterizer::new();
        rasterizer.draw_line(&mut fb, (1, 1), (6, 3), [255, 0, 0]);
        rasterizer.draw_line(&mut fb, (0, 7), (0, 0), [0, 255, 0]);

        assert_eq!(fb.get_pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(fb.get_pixel(6, 3), Some([255, 0, 0]));
        for y in 0..8 {
            assert_eq!(fb.get_pixel(0, y), Some([0, 255, 0]));
        }
    }

    #[test]
    fn wireframe_does_not_touch_depth() {
        let mut fb = FrameBuffer::new(8, 8);
        let screen = tri([(1.0, 1.0, 0.5), (6.0, 1.0, 0.5), (1.0, 6.0, 0.5)]);
        Rasterizer::new().wireframe_triangle(&mut fb, &screen);

        assert_eq!(fb.get_pixel(1, 1), Some([255, 255, 255]));
        assert_eq!(fb.get_pixel(6, 1), Some([255, 255, 255]));
        assert_eq!(fb.get_pixel(3, 4), Some([255, 255, 255]));
        assert_eq!(fb.get_pixel(2, 2), Some([0, 0, 0]));
        assert_eq!(covered(&fb), 0);
    }

    #[test]
    fn far_offscreen_edges_are_clipped() {
        let mut fb = FrameBuffer::new(16, 16);
        let screen = tri([(-5e9, 8.0, 0.5), (5e9, 8.0, 0.5), (8.0, 12.0, 0.5)]);
        Rasterizer::new().wireframe_triangle(&mut fb, &screen);

        for x in 0..16 {
            assert_eq!(fb.get_pixel(x, 8), Some([255, 255, 255]), "gap at x = {x}");
        }
        assert_eq!(fb.get_pixel(8, 4), Some([0, 0, 0]));
    }

    #[test]
    fn extreme_line_endpoints_do_not_overflow() {
        let mut fb = FrameBuffer::new(8, 8);
        let rasterizer = Rasterizer::new();
        rasterizer.draw_line(&mut fb, (i32::MIN, 3), (i32::MAX, 3), [0, 0, 255]);
        rasterizer.draw_line(&mut fb, (i32::MIN, i32::MIN), (i32::MIN, i32::MAX), [255, 0, 0]);

        for x in 0..8 {
            assert_eq!(fb.get_pixel(x, 3), Some([0, 0, 255]));
        }
        // Entirely left of the viewport.
        assert_eq!(fb.get_pixel(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn clip_keeps_visible_segments_unchanged() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(6.0, 7.0);
        assert_eq!(clip_line(a, b, 7.0, 7.0), Some((a, b)));
        assert_eq!(
            clip_line(Point2::new(-10.0, 3.0), Point2::new(-1.0, 5.0), 7.0, 7.0),
            None
        );
        assert_eq!(clip_line(Point2::new(f64::NAN, 0.0), b, 7.0, 7.0), None);
    }
}
