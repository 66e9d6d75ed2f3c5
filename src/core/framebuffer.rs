use crate::core::color::to_rgb8;
use nalgebra::Vector3;

/// Depth value of a pixel nothing has been drawn to. Any real surface wins against it.
pub const EMPTY_DEPTH: f32 = f32::MIN;

/// Color and depth storage for one rendered frame.
///
/// Pixels are addressed with the origin at the bottom-left corner (y grows upwards),
/// matching the projection output. Writers that encode standard top-left images must
/// flip rows, see [`crate::io::image`].
///
/// Depth uses the "larger is nearer" convention: the buffer starts at [`EMPTY_DEPTH`]
/// and a fragment passes the test only when its depth is strictly greater than the
/// stored one, so equal depths never replace each other.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// RGB bytes, row-major, 3 per pixel.
    color_buffer: Vec<u8>,
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![0; size * 3],
            depth_buffer: vec![EMPTY_DEPTH; size],
        }
    }

    /// Fills the color buffer with `color` and resets every depth to [`EMPTY_DEPTH`].
    pub fn clear(&mut self, color: Vector3<f32>) {
        let rgb = to_rgb8(color);
        for pixel in self.color_buffer.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
        self.depth_buffer.fill(EMPTY_DEPTH);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns true if `depth` is nearer than what is stored at (x, y).
    /// Does not modify the buffer.
    #[inline]
    pub fn depth_test(&self, x: usize, y: usize, depth: f32) -> bool {
        self.in_bounds(x, y) && depth > self.depth_buffer[self.index(x, y)]
    }

    /// Writes a shaded fragment: color and depth together.
    #[inline]
    pub fn write_fragment(&mut self, x: usize, y: usize, color: Vector3<f32>, depth: f32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.depth_buffer[idx] = depth;
            self.color_buffer[idx * 3..idx * 3 + 3].copy_from_slice(&to_rgb8(color));
        }
    }

    /// Writes a color without touching depth. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx * 3..idx * 3 + 3].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x, y) * 3;
        Some([
            self.color_buffer[idx],
            self.color_buffer[idx + 1],
            self.color_buffer[idx + 2],
        ])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    pub fn color_buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}
