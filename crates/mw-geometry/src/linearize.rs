//! Adaptive linearization of cubic Bezier curves into parameter steps.

use mw_core::Tolerance;
use mw_math::{cross_product, Point2, Vector2};

use crate::curve::{bezier_curve, bezier_curve_deriv};

/// Maximum perpendicular offset (in destination units) a chord may deviate
/// from the curve tangents before it has to be refined.
const MAX_OFFSET: f64 = 1.0;

/// Check whether the chord `p0 -> p1` approximates the curve whose tangents at
/// the chord ends are `d0` and `d1`.
///
/// A tangent `d` places the implied control point at `p + d / 3`; the segment
/// counts as linear when neither implied control point lies further than
/// [`MAX_OFFSET`] from the chord.
pub fn is_linear_segment(p0: Point2, d0: Vector2, p1: Point2, d1: Vector2) -> bool {
    let diff = p1 - p0;
    let dist = diff.length();

    if dist <= f64::EPSILON {
        return true;
    }

    let norm_coeff = 1.0 / 3.0 / dist;

    let offset0 = norm_coeff * cross_product(diff, d0);
    if offset0.abs() > MAX_OFFSET {
        return false;
    }

    let offset1 = norm_coeff * cross_product(diff, d1);
    if offset1.abs() > MAX_OFFSET {
        return false;
    }

    true
}

/// Adaptively sample the parameter range of a cubic Bezier curve.
///
/// Starting from the whole `[0, 1]` interval, the active interval is bisected
/// until its chord passes [`is_linear_segment`] or it becomes shorter than
/// `2 / chord_length(p0, p3)`. Returns the sorted accepted parameters, always
/// including `0.0` and `1.0`.
pub fn linearize_curve(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Vec<f64> {
    let chord = p0.distance(p3);
    if chord <= f64::EPSILON {
        return vec![0.0, 1.0];
    }

    let min_step_size = 2.0 / chord;

    let mut steps = vec![0.0];
    let mut stack: Vec<(Point2, Vector2, f64)> = vec![(p3, 3.0 * (p3 - p2), 1.0)];

    let mut last_p = p0;
    let mut last_d = 3.0 * (p1 - p0);
    let mut last_t = 0.0;

    while let Some(&(p, d, t)) = stack.last() {
        if t - last_t < min_step_size || is_linear_segment(last_p, last_d, p, d) {
            last_p = p;
            last_d = d;
            last_t = t;
            steps.push(t);
            stack.pop();
        } else {
            let t = 0.5 * (last_t + t);
            let p = bezier_curve(p0, p1, p2, p3, t);
            let d = bezier_curve_deriv(p0, p1, p2, p3, t);
            stack.push((p, d, t));
        }
    }

    steps
}

/// Merge two sorted step sequences, dropping values that compare equal
/// within the default [`Tolerance`].
pub fn merge_steps(a: &[f64], b: &[f64]) -> Vec<f64> {
    merge_steps_with(a, b, Tolerance::default())
}

pub fn merge_steps_with(a: &[f64], b: &[f64], tolerance: Tolerance) -> Vec<f64> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        let next = match (a.get(i), b.get(j)) {
            (Some(&x), Some(&y)) if y < x => {
                j += 1;
                y
            }
            (Some(&x), _) => {
                i += 1;
                x
            }
            (None, Some(&y)) => {
                j += 1;
                y
            }
            (None, None) => unreachable!(),
        };

        match result.last() {
            Some(&prev) if tolerance.fuzzy_eq(prev, next) => {}
            _ => result.push(next),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_math::dvec2;

    fn assert_sorted_unit_range(steps: &[f64]) {
        assert_eq!(steps.first(), Some(&0.0));
        assert_eq!(steps.last(), Some(&1.0));
        for w in steps.windows(2) {
            assert!(w[0] < w[1], "steps not strictly increasing: {:?}", steps);
        }
    }

    #[test]
    fn test_straight_segment_is_linear() {
        let p0 = dvec2(0.0, 0.0);
        let p1 = dvec2(100.0, 0.0);
        assert!(is_linear_segment(p0, dvec2(300.0, 0.0), p1, dvec2(300.0, 0.0)));
    }

    #[test]
    fn test_bent_segment_is_not_linear() {
        let p0 = dvec2(0.0, 0.0);
        let p1 = dvec2(100.0, 0.0);
        // Implied control point 10 units above the chord
        assert!(!is_linear_segment(p0, dvec2(30.0, 30.0), p1, dvec2(30.0, 0.0)));
        // Bending the other way is caught as well
        assert!(!is_linear_segment(p0, dvec2(30.0, 0.0), p1, dvec2(30.0, -30.0)));
    }

    #[test]
    fn test_linearize_straight_curve() {
        let steps = linearize_curve(
            dvec2(0.0, 0.0),
            dvec2(0.0, 0.0),
            dvec2(100.0, 0.0),
            dvec2(100.0, 0.0),
        );
        assert_eq!(steps, vec![0.0, 1.0]);
    }

    #[test]
    fn test_linearize_curved_refines() {
        let steps = linearize_curve(
            dvec2(0.0, 0.0),
            dvec2(300.0, 300.0),
            dvec2(700.0, 300.0),
            dvec2(1000.0, 0.0),
        );
        assert!(steps.len() > 4, "expected refinement, got {:?}", steps);
        assert_sorted_unit_range(&steps);
    }

    #[test]
    fn test_linearize_respects_min_step() {
        let steps = linearize_curve(
            dvec2(0.0, 0.0),
            dvec2(0.0, 500.0),
            dvec2(10.0, 500.0),
            dvec2(10.0, 0.0),
        );
        assert_sorted_unit_range(&steps);
        // minimum step is 2 / 10, so no interval can be split below 0.2 / 2
        for w in steps.windows(2) {
            assert!(w[1] - w[0] >= 0.1 - 1e-12);
        }
    }

    #[test]
    fn test_linearize_degenerate_curve() {
        let p = dvec2(5.0, 5.0);
        let steps = linearize_curve(p, dvec2(50.0, 0.0), dvec2(0.0, 50.0), p);
        assert_eq!(steps, vec![0.0, 1.0]);
    }

    #[test]
    fn test_merge_steps() {
        let merged = merge_steps(&[0.0, 0.3, 1.0], &[0.0, 0.5, 1.0]);
        assert_eq!(merged, vec![0.0, 0.3, 0.5, 1.0]);
    }

    #[test]
    fn test_merge_steps_near_duplicates() {
        let merged = merge_steps(&[0.0, 0.25, 1.0], &[0.0, 0.25 + 1e-16, 0.75, 1.0]);
        assert_eq!(merged.len(), 4);
        assert_sorted_unit_range(&merged);
    }

    #[test]
    fn test_merge_steps_loose_tolerance() {
        let merged = merge_steps_with(&[0.0, 0.5, 1.0], &[0.0, 0.5000001, 1.0], Tolerance::loose());
        assert_eq!(merged, vec![0.0, 0.5, 1.0]);
    }
}
