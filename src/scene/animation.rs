use crate::error::Result;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use nalgebra::Vector3;
use std::f32::consts::TAU;

/// One step of an animated sequence: a fresh camera and the light that goes with it.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub index: usize,
    pub camera: Camera,
    pub light: Light,
}

/// Orbits the camera once around its target while the orbit radius pulses.
///
/// The camera keeps its height above the target. The light always shines from the
/// camera toward the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitAnimation {
    pub frames: usize,
    /// Relative radius change at the peak of a pulse (0.3 = +/-30%).
    pub pulse_amplitude: f32,
    /// Pulses per full orbit.
    pub pulse_cycles: f32,
}

impl Default for OrbitAnimation {
    fn default() -> Self {
        Self {
            frames: 20,
            pulse_amplitude: 0.3,
            pulse_cycles: 2.0,
        }
    }
}

impl OrbitAnimation {
    /// Builds every frame of the orbit starting from `start`.
    pub fn frames(&self, start: &Camera) -> Result<Vec<AnimationFrame>> {
        let target = start.target;
        let offset = start.position - target;
        let height = offset.y;
        let radius = (offset.x * offset.x + offset.z * offset.z).sqrt();
        let start_angle = offset.x.atan2(offset.z);

        (0..self.frames)
            .map(|index| {
                let progress = index as f32 / self.frames as f32;
                let pulse = 1.0 + self.pulse_amplitude * (progress * self.pulse_cycles * TAU).sin();
                let angle = start_angle + TAU * progress;
                let distance = radius * pulse;

                let position =
                    target + Vector3::new(angle.sin() * distance, height, angle.cos() * distance);
                let camera = start.with_position(position)?;
                let light = Light::white(target - position);

                Ok(AnimationFrame {
                    index,
                    camera,
                    light,
                })
            })
            .collect()
    }
}
