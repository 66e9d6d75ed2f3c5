use crate::core::math::transform::{ViewBasis, linear_depth, ndc_to_screen, perspective_divide};
use crate::error::{RenderError, Result};
use nalgebra::{Point3, Vector3};

/// Perspective lens parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

/// Pinhole camera projecting world points to screen space.
///
/// Cameras are immutable: an animation builds a new one per frame, see
/// [`Camera::with_position`].
#[derive(Debug, Clone)]
pub struct Camera {
    // --- Common Parameters ---
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub lens: Perspective,
    pub width: usize,
    pub height: usize,

    // --- Cached ---
    basis: ViewBasis,
    focal: f32,
}

impl Camera {
    /// Builds a camera, rejecting configurations the projection cannot handle:
    /// `up` parallel to the view direction, eye on the target, a field of view outside
    /// (0, 180), `far <= near`, or an empty output resolution.
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        lens: Perspective,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let basis = ViewBasis::look_at(&position, &target, &up).ok_or_else(|| {
            RenderError::DegenerateCamera(format!(
                "up vector {:?} is parallel to the view direction from {:?} to {:?}",
                up, position, target
            ))
        })?;

        if !(lens.fov_y_deg > 0.0 && lens.fov_y_deg < 180.0) {
            return Err(RenderError::DegenerateCamera(format!(
                "field of view must be within (0, 180) degrees, got {}",
                lens.fov_y_deg
            )));
        }
        if !(lens.far > lens.near) {
            return Err(RenderError::DegenerateCamera(format!(
                "far plane ({}) must be beyond the near plane ({})",
                lens.far, lens.near
            )));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::DegenerateCamera(format!(
                "resolution must be non-zero, got {}x{}",
                width, height
            )));
        }

        let focal = 1.0 / (lens.fov_y_deg.to_radians() / 2.0).tan();

        Ok(Self {
            position,
            target,
            up,
            lens,
            width,
            height,
            basis,
            focal,
        })
    }

    /// Same lens, target and resolution, seen from a new position.
    pub fn with_position(&self, position: Point3<f32>) -> Result<Self> {
        Self::new(position, self.target, self.up, self.lens, self.width, self.height)
    }

    /// Projects a world point to screen space.
    ///
    /// x and y are pixel coordinates with a bottom-left origin, neither rounded nor
    /// clamped to the viewport. z is `1 - linear_depth`, in [0, 1] with larger meaning
    /// nearer. Points behind the camera or outside [near, far] still project; their
    /// depth is clamped rather than culled.
    pub fn project(&self, point: &Point3<f32>) -> Point3<f32> {
        let view = self.basis.to_view(point);
        let (px, py) = perspective_divide(&view, self.focal, self.lens.aspect_ratio);
        let depth = linear_depth(view.z, self.lens.near, self.lens.far);
        let (sx, sy) = ndc_to_screen(px, py, self.width as f32, self.height as f32);
        Point3::new(sx, sy, 1.0 - depth)
    }
}
