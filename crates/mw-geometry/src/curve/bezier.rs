//! Cubic Bezier evaluation and De Casteljau subdivision.

use mw_math::{lerp, pow2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Curve;

/// Evaluate a cubic Bezier curve at `t` using the Bernstein basis.
pub fn bezier_curve(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let t_2 = pow2(t);
    let t_3 = t_2 * t;
    let t_inv = 1.0 - t;
    let t_inv_2 = pow2(t_inv);
    let t_inv_3 = t_inv_2 * t_inv;

    t_inv_3 * p0 + 3.0 * t_inv_2 * t * p1 + 3.0 * t_inv * t_2 * p2 + t_3 * p3
}

/// First derivative of a cubic Bezier curve with respect to `t`.
pub fn bezier_curve_deriv(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Vector2 {
    let t_inv = 1.0 - t;

    3.0 * pow2(t_inv) * (p1 - p0) + 6.0 * t_inv * t * (p2 - p1) + 3.0 * pow2(t) * (p3 - p2)
}

/// Second derivative of a cubic Bezier curve with respect to `t`.
pub fn bezier_curve_deriv2(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Vector2 {
    let t_inv = 1.0 - t;

    6.0 * t_inv * (p2 - 2.0 * p1 + p0) + 6.0 * t * (p3 - 2.0 * p2 + p1)
}

/// Result of splitting a cubic Bezier `q0 q1 q2 q3` at a parameter.
///
/// The left half is `q0, left_control, split_in, split` and the right half is
/// `split, split_out, right_control, q3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeCasteljauSplit {
    pub left_control: Point2,
    pub split_in: Point2,
    pub split: Point2,
    pub split_out: Point2,
    pub right_control: Point2,
}

/// Split a cubic Bezier at `t` with the De Casteljau algorithm.
pub fn de_casteljau(q0: Point2, q1: Point2, q2: Point2, q3: Point2, t: f64) -> DeCasteljauSplit {
    let mut q = [q0, q1, q2, q3];
    let mut left = [Point2::ZERO; 3];

    for j in 1..=3 {
        for i in 0..=(3 - j) {
            q[i] = lerp(q[i], q[i + 1], t);
        }
        left[j - 1] = q[0];
    }

    DeCasteljauSplit {
        left_control: left[0],
        split_in: left[1],
        split: left[2],
        split_out: q[1],
        right_control: q[2],
    }
}

/// A cubic Bezier segment, parameterized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// A straight segment whose control points coincide with the endpoints.
    pub fn degenerate(start: Point2, end: Point2) -> Self {
        Self::new(start, start, end, end)
    }

    pub fn second_deriv_at(&self, t: f64) -> Vector2 {
        bezier_curve_deriv2(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// Split into two segments that together trace the same curve.
    pub fn split_at(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let s = de_casteljau(self.p0, self.p1, self.p2, self.p3, t);
        (
            CubicBezier::new(self.p0, s.left_control, s.split_in, s.split),
            CubicBezier::new(s.split, s.split_out, s.right_control, self.p3),
        )
    }

    /// Adaptive parameter samples, see [`crate::linearize_curve`].
    pub fn linearize(&self) -> Vec<f64> {
        crate::linearize::linearize_curve(self.p0, self.p1, self.p2, self.p3)
    }
}

impl Curve for CubicBezier {
    fn point_at(&self, t: f64) -> Point2 {
        bezier_curve(self.p0, self.p1, self.p2, self.p3, t)
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        bezier_curve_deriv(self.p0, self.p1, self.p2, self.p3, t)
    }
}
