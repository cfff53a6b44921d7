//! Inverse mapping: destination point to patch-local `(u, v)`.
//!
//! The forward map of a patch has no closed-form inverse, so the local
//! position is found by minimizing the squared distance between the mapped
//! point and the target with a BFGS quasi-Newton iteration and a backtracking
//! line search.

use log::{debug, trace};
use mw_math::Point2;
use nalgebra::{Matrix2, Vector2 as NVector2};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Sufficient-decrease constant of the Armijo condition.
const ARMIJO_C1: f64 = 1e-4;
/// Line search gives up once the step fraction falls below this.
const MIN_STEP_FRACTION: f64 = 1e-12;

/// Settings of the inverse mapping solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Hard cap on quasi-Newton iterations
    pub max_iterations: usize,
    /// Stop once the gradient norm of the squared distance falls below this
    pub gradient_tolerance: f64,
    /// Length of the first trial step in `(u, v)` units
    pub initial_step: f64,
    /// Starting position
    pub start: Point2,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            gradient_tolerance: 1e-4,
            initial_step: 0.01,
            start: Point2::new(0.5, 0.5),
        }
    }
}

/// Result of [`calculate_local_pos`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPos {
    /// Patch-local coordinates of the best iterate
    pub uv: Point2,
    /// Distance between the forward-mapped `uv` and the target point
    pub residual: f64,
    pub iterations: usize,
    /// Whether the gradient test passed before the iteration budget ran out
    pub converged: bool,
}

impl LocalPos {
    /// Whether `uv` lies in `[0, 1]^2`, extended by `slack` on every side.
    pub fn is_inside(&self, slack: f64) -> bool {
        let range = -slack..=1.0 + slack;
        range.contains(&self.uv.x) && range.contains(&self.uv.y)
    }
}

/// Find the patch-local coordinates whose forward mapping lies closest to
/// `dst_point`, using the default [`SolverConfig`].
pub fn calculate_local_pos(surface: &dyn Surface, dst_point: Point2) -> LocalPos {
    calculate_local_pos_with(surface, dst_point, &SolverConfig::default())
}

/// Same as [`calculate_local_pos`] with explicit solver settings.
///
/// The last iterate is returned even when the solver did not converge;
/// callers that need a guarantee should check [`LocalPos::residual`].
pub fn calculate_local_pos_with(
    surface: &dyn Surface,
    dst_point: Point2,
    config: &SolverConfig,
) -> LocalPos {
    let objective = |x: &NVector2<f64>| -> (f64, NVector2<f64>) {
        let s = surface.point_at(x.x, x.y);
        let (du, dv) = surface.partial_derivatives(x.x, x.y);
        let diff = s - dst_point;
        let grad = NVector2::new(2.0 * diff.dot(du), 2.0 * diff.dot(dv));
        (diff.length_squared(), grad)
    };

    let mut x = NVector2::new(config.start.x, config.start.y);
    let (mut f, mut g) = objective(&x);
    let mut h = scaled_identity(config.initial_step, &g);
    let mut first_update = true;

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        if g.norm() < config.gradient_tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let mut p = -(h * g);
        if p.dot(&g) >= 0.0 {
            // Lost positive definiteness, restart from steepest descent.
            h = scaled_identity(config.initial_step, &g);
            p = -(h * g);
        }
        let slope = p.dot(&g);

        let mut alpha = 1.0;
        let accepted = loop {
            let x_new = x + p * alpha;
            let (f_new, g_new) = objective(&x_new);
            if f_new <= f + ARMIJO_C1 * alpha * slope {
                break Some((x_new, f_new, g_new));
            }
            alpha *= 0.5;
            if alpha < MIN_STEP_FRACTION {
                break None;
            }
        };

        let Some((x_new, f_new, g_new)) = accepted else {
            debug!("inverse mapping line search stalled at {:?}", (x.x, x.y));
            break;
        };

        let s = x_new - x;
        let y = g_new - g;
        let sy = s.dot(&y);

        if sy > f64::EPSILON * s.norm() * y.norm() {
            if first_update {
                h = Matrix2::identity() * (sy / y.dot(&y));
                first_update = false;
            }
            let rho = 1.0 / sy;
            let i = Matrix2::identity();
            h = (i - s * y.transpose() * rho) * h * (i - y * s.transpose() * rho)
                + s * s.transpose() * rho;
        }

        x = x_new;
        f = f_new;
        g = g_new;

        trace!(
            "iteration {}: uv = ({}, {}), grad = ({}, {}), f = {}",
            iterations,
            x.x,
            x.y,
            g.x,
            g.y,
            f
        );
    }

    let uv = Point2::new(x.x, x.y);
    let residual = surface.point_at(uv.x, uv.y).distance(dst_point);

    debug!(
        "inverse mapping of ({}, {}): uv = ({}, {}), residual = {}, iterations = {}, converged = {}",
        dst_point.x, dst_point.y, uv.x, uv.y, residual, iterations, converged
    );

    LocalPos {
        uv,
        residual,
        iterations,
        converged,
    }
}

/// Inverse Hessian guess whose first step has length `step`.
fn scaled_identity(step: f64, g: &NVector2<f64>) -> Matrix2<f64> {
    let norm = g.norm();
    let scale = if norm > f64::EPSILON { step / norm } else { step };
    Matrix2::identity() * scale
}
