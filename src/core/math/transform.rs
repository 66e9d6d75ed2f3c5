use nalgebra::{Point3, Vector3};

/// Below this a view-space depth is pushed away from zero before the perspective divide.
pub const VIEW_DEPTH_EPSILON: f32 = 1e-6;

//=================================
// Look-At Basis
//=================================

/// Orthonormal right-handed camera basis. The camera looks down its local -Z axis.
///
/// Kept as three axes instead of a 4x4 view matrix: projecting a point is three dot
/// products against `point - eye`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub eye: Point3<f32>,
    /// Right.
    pub x_axis: Vector3<f32>,
    /// Up.
    pub y_axis: Vector3<f32>,
    /// Backward, pointing from the target to the eye.
    pub z_axis: Vector3<f32>,
}

impl ViewBasis {
    /// Builds the look-at basis, or `None` when it is degenerate: eye on the target,
    /// or `up` parallel to the viewing direction.
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Option<Self> {
        let z_axis = (eye - target).try_normalize(VIEW_DEPTH_EPSILON)?;
        let x_axis = up.cross(&z_axis).try_normalize(VIEW_DEPTH_EPSILON)?;
        let y_axis = z_axis.cross(&x_axis);

        Some(Self {
            eye: *eye,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    /// World space -> view space.
    #[inline]
    pub fn to_view(&self, point: &Point3<f32>) -> Vector3<f32> {
        let d = point - self.eye;
        Vector3::new(d.dot(&self.x_axis), d.dot(&self.y_axis), d.dot(&self.z_axis))
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Clamps the magnitude of a view-space depth to at least [`VIEW_DEPTH_EPSILON`],
/// keeping its sign (zero counts as positive). Stops the divide from blowing up; it
/// does not clip anything.
#[inline]
pub fn guard_view_depth(vz: f32) -> f32 {
    if vz.abs() < VIEW_DEPTH_EPSILON {
        if vz >= 0.0 {
            VIEW_DEPTH_EPSILON
        } else {
            -VIEW_DEPTH_EPSILON
        }
    } else {
        vz
    }
}

/// Perspective divide of a view-space point to normalized device x/y.
/// `focal` is `1 / tan(fov_y / 2)`.
#[inline]
pub fn perspective_divide(view: &Vector3<f32>, focal: f32, aspect_ratio: f32) -> (f32, f32) {
    let vz = guard_view_depth(view.z);
    let px = (view.x / -vz) * focal * aspect_ratio;
    let py = (view.y / -vz) * focal;
    (px, py)
}

/// Maps view distance to [0, 1] between the near and far planes, clamped.
#[inline]
pub fn linear_depth(view_z: f32, near: f32, far: f32) -> f32 {
    ((-view_z - near) / (far - near)).clamp(0.0, 1.0)
}

/// Converts NDC coordinates to screen coordinates (Viewport Transform).
/// Origin is bottom-left: NDC -1 maps to 0, +1 maps to the full width/height.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> (f32, f32) {
    ((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height)
}
