use nalgebra::Vector3;

/// Clamps a linear RGB color to [0, 1] on every channel.
pub fn saturate(color: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        color.x.clamp(0.0, 1.0),
        color.y.clamp(0.0, 1.0),
        color.z.clamp(0.0, 1.0),
    )
}

/// Converts a [0, 1] color to 8-bit RGB. Channels are clamped first and truncated,
/// so 1.0 maps to 255 and anything just below maps to 254.
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let c = saturate(color) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Converts an 8-bit RGB triple to a [0, 1] color.
pub fn from_rgb8(rgb: [u8; 3]) -> Vector3<f32> {
    Vector3::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    )
}

/// Maps a stored depth value to a grayscale level for visualisation.
/// The untouched depth sentinel (most negative float) ends up black.
pub fn depth_to_gray(depth: f32) -> u8 {
    (depth.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(to_rgb8(Vector3::new(-0.5, 2.0, 1.0)), [0, 255, 255]);
    }

    #[test]
    fn rgb8_conversion_keeps_white_and_black() {
        assert_eq!(to_rgb8(from_rgb8([255, 255, 255])), [255, 255, 255]);
        assert_eq!(to_rgb8(from_rgb8([0, 0, 0])), [0, 0, 0]);
    }

    #[test]
    fn empty_depth_renders_black() {
        assert_eq!(depth_to_gray(f32::MIN), 0);
        assert_eq!(depth_to_gray(1.0), 255);
        assert_eq!(depth_to_gray(7.0), 255);
    }
}
