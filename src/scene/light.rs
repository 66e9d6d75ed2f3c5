use nalgebra::Vector3;

/// A directional light source: infinitely far away, parallel rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Unit direction the light travels in.
    pub direction: Vector3<f32>,
    /// RGB, nominally in [0, 1] per channel.
    pub color: Vector3<f32>,
    pub intensity: f32,
}

impl Light {
    /// Creates a directional light. `direction` is normalized; a zero vector is kept
    /// as is and lights nothing.
    pub fn new(direction: Vector3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(direction),
            color,
            intensity,
        }
    }

    /// White light of unit intensity.
    pub fn white(direction: Vector3<f32>) -> Self {
        Self::new(direction, Vector3::new(1.0, 1.0, 1.0), 1.0)
    }

    /// The direction vector FROM a surface point TO the light source.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        -self.direction
    }

    /// Light color scaled by intensity.
    pub fn radiance(&self) -> Vector3<f32> {
        self.color * self.intensity
    }
}
