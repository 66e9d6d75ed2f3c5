use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector2, Vector3};

/// Below this the triangle's Gram determinant is treated as zero area.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Per-triangle setup for the barycentric solve.
///
/// Uses the dot-product formulation: with edges `e0 = p1 - p0`, `e1 = p2 - p0` and
/// `d = p - p0`, the weights `(u, v)` satisfy `d = u * e0 + v * e1`. The Gram
/// determinant `dot(e0,e0) * dot(e1,e1) - dot(e0,e1)^2` is computed once.
#[derive(Debug, Clone, Copy)]
pub struct BarycentricSolver {
    origin: Point2<f32>,
    e0: Vector2<f32>,
    e1: Vector2<f32>,
    dot00: f32,
    dot01: f32,
    dot11: f32,
    inv_denom: f32,
}

impl BarycentricSolver {
    /// Returns `None` if the triangle is degenerate (zero area or numerically unstable).
    pub fn new(p0: Point2<f32>, p1: Point2<f32>, p2: Point2<f32>) -> Option<Self> {
        let e0 = p1 - p0;
        let e1 = p2 - p0;

        let dot00 = e0.dot(&e0);
        let dot01 = e0.dot(&e1);
        let dot11 = e1.dot(&e1);
        let denom = dot00 * dot11 - dot01 * dot01;

        if !denom.is_finite() || denom.abs() < DEGENERATE_EPSILON {
            return None;
        }

        Some(Self {
            origin: p0,
            e0,
            e1,
            dot00,
            dot01,
            dot11,
            inv_denom: 1.0 / denom,
        })
    }

    /// Barycentric weights of `p` as `(w, u, v)`: `w` for vertex 0, `u` for vertex 1,
    /// `v` for vertex 2. They always sum to one; the point is inside when all three
    /// are non-negative.
    #[inline]
    pub fn weights(&self, p: Point2<f32>) -> Vector3<f32> {
        let d = p - self.origin;
        let dot02 = self.e0.dot(&d);
        let dot12 = self.e1.dot(&d);

        let u = (self.dot11 * dot02 - self.dot01 * dot12) * self.inv_denom;
        let v = (self.dot00 * dot12 - self.dot01 * dot02) * self.inv_denom;

        Vector3::new(1.0 - u - v, u, v)
    }
}

/// Inclusive inside test on `(w, u, v)`: `u >= 0`, `v >= 0`, `u + v <= 1`.
/// Pixels exactly on an edge count as inside.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    let (u, v) = (bary.y, bary.z);
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

/// Blends three per-vertex values with `(w, u, v)` weights, pairing `w` with
/// `values[0]`, `u` with `values[1]` and `v` with `values[2]`.
#[inline]
pub fn interpolate<T: Interpolatable>(values: &[T; 3], bary: Vector3<f32>) -> T {
    values[0] * bary.x + values[1] * bary.y + values[2] * bary.z
}
