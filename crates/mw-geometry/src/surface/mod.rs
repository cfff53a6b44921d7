//! Surface traits and implementations.

mod patch;

use mw_math::{Point2, Vector2};

pub use patch::{BezierPatch, ControlPoint, PatchEdge};

/// Trait for parametric surfaces mapping `(u, v)` into the plane.
pub trait Surface: Send + Sync {
    /// Evaluate the surface at parameters `(u, v)`.
    fn point_at(&self, u: f64, v: f64) -> Point2;

    /// Partial derivatives `(dS/du, dS/dv)` at parameters `(u, v)`.
    fn partial_derivatives(&self, u: f64, v: f64) -> (Vector2, Vector2);

    /// Return the u-parameter domain `(u_min, u_max)`.
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// Return the v-parameter domain `(v_min, v_max)`.
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
