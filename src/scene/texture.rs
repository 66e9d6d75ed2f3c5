use crate::core::color::from_rgb8;
use crate::error::{RenderError, Result};
use log::info;
use nalgebra::{Vector2, Vector3};
use serde::Deserialize;
use std::path::Path;

/// How [`Texture::sample`] reconstructs a color between texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Nearest texel, no filtering.
    #[default]
    Nearest,
    /// Blend of the four surrounding texels.
    Bilinear,
}

/// Represents a 2D texture map: RGB8 texels, row-major, first row at the top.
///
/// Sampling flips V so that UV (0, 0) is the bottom-left corner of the image, and both
/// axes wrap (repeat) outside [0, 1).
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
    pub filter: TextureFilter,
}

impl Texture {
    /// Decodes an image file (any format the `image` crate reads) into RGB8.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| RenderError::Image {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        info!("Loaded texture: {:?} ({}x{})", path_ref, width, height);

        Self::from_rgb(width, height, rgb.into_raw())
    }

    /// Wraps a raw RGB8 buffer of exactly `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTexture(format!(
                "texture must not be empty, got {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} RGB texture needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            filter: TextureFilter::Nearest,
        })
    }

    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Samples the texture at `uv` with the configured filter. Returns [0, 1] RGB.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        match self.filter {
            TextureFilter::Nearest => self.sample_nearest(uv),
            TextureFilter::Bilinear => self.sample_bilinear(uv),
        }
    }

    /// Nearest-texel lookup.
    pub fn sample_nearest(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let w = self.width as i32;
        let h = self.height as i32;
        let u = wrap_coord(uv.x);
        let v = wrap_coord(uv.y);

        let x = ((u * self.width as f32) as i32).clamp(0, w - 1);
        let y = (((1.0 - v) * self.height as f32) as i32).clamp(0, h - 1);
        self.texel(x, y)
    }

    /// Bilinear lookup with texel centers at half-integer positions.
    pub fn sample_bilinear(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let u = wrap_coord(uv.x);
        let v = wrap_coord(uv.y);

        // 1. Map to pixel coordinates
        // -0.5 because pixel centers are at 0.5
        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;

        // 2. Identify the 2x2 pixel block
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;

        // 3. Calculate weights
        let wx = x - x.floor();
        let wy = y - y.floor();

        // 4. Fetch colors (wrapping across the edges)
        let c00 = self.texel_wrapped(x0, y0);
        let c10 = self.texel_wrapped(x0 + 1, y0);
        let c01 = self.texel_wrapped(x0, y0 + 1);
        let c11 = self.texel_wrapped(x0 + 1, y0 + 1);

        // 5. Interpolate
        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    /// Texel at storage coordinates (row 0 at the top). Caller keeps them in range.
    fn texel(&self, x: i32, y: i32) -> Vector3<f32> {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        from_rgb8([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    fn texel_wrapped(&self, x: i32, y: i32) -> Vector3<f32> {
        self.texel(
            x.rem_euclid(self.width as i32),
            y.rem_euclid(self.height as i32),
        )
    }
}

/// Wraps a texture coordinate into [0, 1].
#[inline]
fn wrap_coord(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    if wrapped.is_finite() { wrapped } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 2x2 texture: top row red, green; bottom row blue, white.
    fn quad() -> Texture {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,     0, 255, 0,
            0, 0, 255,     255, 255, 255,
        ];
        Texture::from_rgb(2, 2, data).unwrap()
    }

    #[test]
    fn uv_origin_is_bottom_left() {
        let tex = quad();
        assert_eq!(tex.sample(Vector2::new(0.25, 0.25)), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vector2::new(0.75, 0.25)), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(tex.sample(Vector2::new(0.25, 0.75)), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(0.75, 0.75)), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn sampling_tiles_in_both_axes() {
        let tex = quad();
        for &(u, v) in &[(0.1, 0.2), (0.3, 0.9), (0.6, 0.4), (0.85, 0.55)] {
            let base = tex.sample(Vector2::new(u, v));
            assert_eq!(tex.sample(Vector2::new(u + 1.0, v)), base);
            assert_eq!(tex.sample(Vector2::new(u, v + 1.0)), base);
            assert_eq!(tex.sample(Vector2::new(u - 1.0, v - 1.0)), base);
        }
    }

    #[test]
    fn upper_edge_stays_in_bounds() {
        let tex = quad();
        assert_eq!(tex.sample(Vector2::new(0.0, 0.0)), Vector3::new(0.0, 0.0, 1.0));
        let c = tex.sample(Vector2::new(-1e-9, 0.999_999));
        assert!(c.iter().all(|ch| (0.0..=1.0).contains(ch)));
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let tex = quad().with_filter(TextureFilter::Bilinear);
        // Exactly between the two bottom texels.
        let c = tex.sample(Vector2::new(0.5, 0.25));
        assert_relative_eq!(c, Vector3::new(0.5, 0.5, 1.0), epsilon = 1e-6);
        // On a texel center, bilinear equals nearest.
        let c = tex.sample(Vector2::new(0.25, 0.75));
        assert_relative_eq!(c, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn buffer_size_must_match() {
        assert!(matches!(
            Texture::from_rgb(2, 2, vec![0; 11]),
            Err(RenderError::InvalidTexture(_))
        ));
        assert!(Texture::from_rgb(0, 4, vec![]).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Texture::load("does/not/exist.png").unwrap_err();
        assert!(matches!(err, RenderError::Image { .. }));
    }
}
