use crate::core::color::depth_to_gray;
use crate::core::framebuffer::FrameBuffer;
use crate::error::{RenderError, Result};
use image::{GrayImage, RgbImage, imageops};
use log::info;
use std::fs;
use std::path::Path;

/// Converts the color buffer to a top-left-origin RGB image.
pub fn color_image(framebuffer: &FrameBuffer) -> RgbImage {
    let mut img = RgbImage::from_fn(framebuffer.width as u32, framebuffer.height as u32, |x, y| {
        image::Rgb(
            framebuffer
                .get_pixel(x as usize, y as usize)
                .unwrap_or([0, 0, 0]),
        )
    });
    imageops::flip_vertical_in_place(&mut img);
    img
}

/// Converts the depth buffer to a top-left-origin grayscale image. Depth is clamped
/// to [0, 1]; nearer is brighter and empty pixels are black.
pub fn depth_image(framebuffer: &FrameBuffer) -> GrayImage {
    let mut img = GrayImage::from_fn(framebuffer.width as u32, framebuffer.height as u32, |x, y| {
        let depth = framebuffer
            .get_depth(x as usize, y as usize)
            .unwrap_or(0.0);
        image::Luma([depth_to_gray(depth)])
    });
    imageops::flip_vertical_in_place(&mut img);
    img
}

/// Saves the color buffer. The format follows the file extension.
pub fn save_color<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    color_image(framebuffer)
        .save(path)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Saved color buffer to {:?}", path);
    Ok(())
}

/// Saves the depth buffer as 8-bit grayscale.
pub fn save_depth<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    depth_image(framebuffer)
        .save(path)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Saved depth buffer to {:?}", path);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
