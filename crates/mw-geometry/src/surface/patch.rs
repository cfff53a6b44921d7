//! Bicubic Bezier patch built from four boundary curves.

use std::ops::{Index, IndexMut};

use mw_core::traits::BoundingBox;
use mw_math::{lerp, Point2, Rect, Vector2};
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::curve::{bezier_curve, bezier_curve_deriv, CubicBezier};

/// Role of each of the 12 control points of a [`BezierPatch`].
///
/// `*_HC` points are the horizontal controls (along the top/bottom curves),
/// `*_VC` points the vertical ones (along the left/right curves).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlPoint {
    TL = 0,
    TL_HC,
    TL_VC,
    TR,
    TR_HC,
    TR_VC,
    BL,
    BL_HC,
    BL_VC,
    BR,
    BR_HC,
    BR_VC,
}

impl ControlPoint {
    pub const ALL: [ControlPoint; 12] = [
        ControlPoint::TL,
        ControlPoint::TL_HC,
        ControlPoint::TL_VC,
        ControlPoint::TR,
        ControlPoint::TR_HC,
        ControlPoint::TR_VC,
        ControlPoint::BL,
        ControlPoint::BL_HC,
        ControlPoint::BL_VC,
        ControlPoint::BR,
        ControlPoint::BR_HC,
        ControlPoint::BR_VC,
    ];
}

/// One of the four boundary curves of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// A Coons patch bounded by four cubic Bezier curves.
///
/// The top and bottom curves run left to right, the left and right curves run
/// top to bottom. `src_rect` is the area of the source image the patch maps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPatch {
    pub points: [Point2; 12],
    pub src_rect: Rect,
}

impl BezierPatch {
    pub fn new(points: [Point2; 12], src_rect: Rect) -> Self {
        Self { points, src_rect }
    }

    /// An undeformed patch: destination corners equal the source rectangle
    /// corners and every control point sits on its corner.
    pub fn from_rect(rect: Rect) -> Self {
        let tl = rect.min;
        let tr = Point2::new(rect.max.x, rect.min.y);
        let bl = Point2::new(rect.min.x, rect.max.y);
        let br = rect.max;

        Self {
            points: [tl, tl, tl, tr, tr, tr, bl, bl, bl, br, br, br],
            src_rect: rect,
        }
    }

    pub fn control_point(&self, cp: ControlPoint) -> Point2 {
        self.points[cp as usize]
    }

    pub fn set_control_point(&mut self, cp: ControlPoint, p: Point2) {
        self.points[cp as usize] = p;
    }

    /// Axis-aligned bounds of all 12 destination control points.
    pub fn dst_bounding_rect(&self) -> Rect {
        let mut rect = Rect::new(self.points[0], self.points[0]);
        for &p in &self.points[1..] {
            rect.accumulate(p);
        }
        rect
    }

    pub fn src_bounding_rect(&self) -> Rect {
        self.src_rect
    }

    pub fn boundary(&self, edge: PatchEdge) -> CubicBezier {
        use ControlPoint::*;

        let [p0, p1, p2, p3] = match edge {
            PatchEdge::Top => [TL, TL_HC, TR_HC, TR],
            PatchEdge::Bottom => [BL, BL_HC, BR_HC, BR],
            PatchEdge::Left => [TL, TL_VC, BL_VC, BL],
            PatchEdge::Right => [TR, TR_VC, BR_VC, BR],
        }
        .map(|cp| self[cp]);

        CubicBezier::new(p0, p1, p2, p3)
    }

    fn curve_point(&self, cps: [ControlPoint; 4], t: f64) -> Point2 {
        bezier_curve(self[cps[0]], self[cps[1]], self[cps[2]], self[cps[3]], t)
    }

    fn curve_deriv(&self, cps: [ControlPoint; 4], t: f64) -> Vector2 {
        bezier_curve_deriv(self[cps[0]], self[cps[1]], self[cps[2]], self[cps[3]], t)
    }
}

const TOP: [ControlPoint; 4] = [
    ControlPoint::TL,
    ControlPoint::TL_HC,
    ControlPoint::TR_HC,
    ControlPoint::TR,
];
const BOTTOM: [ControlPoint; 4] = [
    ControlPoint::BL,
    ControlPoint::BL_HC,
    ControlPoint::BR_HC,
    ControlPoint::BR,
];
const LEFT: [ControlPoint; 4] = [
    ControlPoint::TL,
    ControlPoint::TL_VC,
    ControlPoint::BL_VC,
    ControlPoint::BL,
];
const RIGHT: [ControlPoint; 4] = [
    ControlPoint::TR,
    ControlPoint::TR_VC,
    ControlPoint::BR_VC,
    ControlPoint::BR,
];

impl Surface for BezierPatch {
    /// Coons blend `Sc + Sd - Sb`: the ruled surfaces between opposite
    /// boundary curves minus the bilinear interpolation of the corners.
    fn point_at(&self, u: f64, v: f64) -> Point2 {
        use ControlPoint::*;

        let sc = lerp(self.curve_point(TOP, u), self.curve_point(BOTTOM, u), v);
        let sd = lerp(self.curve_point(LEFT, v), self.curve_point(RIGHT, v), u);
        let sb = lerp(
            lerp(self[TL], self[TR], u),
            lerp(self[BL], self[BR], u),
            v,
        );

        sc + sd - sb
    }

    fn partial_derivatives(&self, u: f64, v: f64) -> (Vector2, Vector2) {
        use ControlPoint::*;

        let top_du = self.curve_deriv(TOP, u);
        let bottom_du = self.curve_deriv(BOTTOM, u);
        let du = lerp(top_du, bottom_du, v) + self.curve_point(RIGHT, v)
            - self.curve_point(LEFT, v)
            - lerp(self[TR] - self[TL], self[BR] - self[BL], v);

        let left_dv = self.curve_deriv(LEFT, v);
        let right_dv = self.curve_deriv(RIGHT, v);
        let dv = lerp(left_dv, right_dv, u) + self.curve_point(BOTTOM, u)
            - self.curve_point(TOP, u)
            - (lerp(self[BL], self[BR], u) - lerp(self[TL], self[TR], u));

        (du, dv)
    }
}

impl BoundingBox for BezierPatch {
    type Bounds = Rect;

    fn bounding_box(&self) -> Rect {
        self.dst_bounding_rect()
    }
}

impl Index<ControlPoint> for BezierPatch {
    type Output = Point2;

    fn index(&self, cp: ControlPoint) -> &Point2 {
        &self.points[cp as usize]
    }
}

impl IndexMut<ControlPoint> for BezierPatch {
    fn index_mut(&mut self, cp: ControlPoint) -> &mut Point2 {
        &mut self.points[cp as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use approx::assert_relative_eq;
    use mw_math::dvec2;

    fn bulged_patch() -> BezierPatch {
        let rect = Rect::new(dvec2(0.0, 0.0), dvec2(1000.0, 1000.0));
        let mut patch = BezierPatch::from_rect(rect);
        patch[ControlPoint::TL_HC] += dvec2(300.0, 30.0);
        patch[ControlPoint::TL_VC] += dvec2(20.0, 300.0);
        patch[ControlPoint::TR_HC] += dvec2(-300.0, 30.0);
        patch[ControlPoint::TR_VC] += dvec2(-20.0, 300.0);
        patch[ControlPoint::BL_HC] += dvec2(300.0, 30.0);
        patch[ControlPoint::BL_VC] += dvec2(20.0, -300.0);
        patch[ControlPoint::BR_HC] += dvec2(-300.0, 30.0);
        patch[ControlPoint::BR_VC] += dvec2(-20.0, -300.0);
        patch
    }

    #[test]
    fn test_from_rect_corners() {
        let rect = Rect::new(dvec2(10.0, 20.0), dvec2(110.0, 70.0));
        let patch = BezierPatch::from_rect(rect);
        assert_eq!(patch.point_at(0.0, 0.0), dvec2(10.0, 20.0));
        assert_eq!(patch.point_at(1.0, 0.0), dvec2(110.0, 20.0));
        assert_eq!(patch.point_at(0.0, 1.0), dvec2(10.0, 70.0));
        assert_eq!(patch.point_at(1.0, 1.0), dvec2(110.0, 70.0));
        assert_eq!(patch.src_bounding_rect(), rect);
        assert_eq!(patch.dst_bounding_rect(), rect);
    }

    #[test]
    fn test_dst_bounding_rect_includes_controls() {
        let patch = bulged_patch();
        let bounds = patch.bounding_box();
        assert_eq!(bounds.min, dvec2(0.0, 0.0));
        assert_eq!(bounds.max, dvec2(1000.0, 1030.0));
    }

    #[test]
    fn test_point_at_matches_boundaries() {
        let patch = bulged_patch();
        let top = patch.boundary(PatchEdge::Top);
        let bottom = patch.boundary(PatchEdge::Bottom);
        let left = patch.boundary(PatchEdge::Left);
        let right = patch.boundary(PatchEdge::Right);

        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!((patch.point_at(t, 0.0) - top.point_at(t)).length() < 1e-9);
            assert!((patch.point_at(t, 1.0) - bottom.point_at(t)).length() < 1e-9);
            assert!((patch.point_at(0.0, t) - left.point_at(t)).length() < 1e-9);
            assert!((patch.point_at(1.0, t) - right.point_at(t)).length() < 1e-9);
        }
    }

    #[test]
    fn test_partial_derivatives_match_finite_difference() {
        let patch = bulged_patch();
        let h = 1e-6;
        for &(u, v) in &[(0.5, 0.5), (0.1, 0.9), (0.75, 0.2)] {
            let (du, dv) = patch.partial_derivatives(u, v);
            let fd_u = (patch.point_at(u + h, v) - patch.point_at(u - h, v)) / (2.0 * h);
            let fd_v = (patch.point_at(u, v + h) - patch.point_at(u, v - h)) / (2.0 * h);
            assert_relative_eq!(du.x, fd_u.x, epsilon = 1e-3);
            assert_relative_eq!(du.y, fd_u.y, epsilon = 1e-3);
            assert_relative_eq!(dv.x, fd_v.x, epsilon = 1e-3);
            assert_relative_eq!(dv.y, fd_v.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_flat_patch_is_bilinear() {
        let patch = BezierPatch::new(
            [
                dvec2(0.0, 0.0),
                dvec2(0.0, 0.0),
                dvec2(0.0, 0.0),
                dvec2(100.0, 10.0),
                dvec2(100.0, 10.0),
                dvec2(100.0, 10.0),
                dvec2(-10.0, 80.0),
                dvec2(-10.0, 80.0),
                dvec2(-10.0, 80.0),
                dvec2(120.0, 120.0),
                dvec2(120.0, 120.0),
                dvec2(120.0, 120.0),
            ],
            Rect::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0)),
        );

        let bilinear = |u: f64, v: f64| {
            lerp(
                lerp(dvec2(0.0, 0.0), dvec2(100.0, 10.0), u),
                lerp(dvec2(-10.0, 80.0), dvec2(120.0, 120.0), u),
                v,
            )
        };

        // Degenerate controls reparameterize the edges, so only the corners
        // and the patch center (by symmetry of the Bernstein weights) coincide.
        for &(u, v) in &[(0.0, 0.0), (1.0, 1.0), (0.5, 0.5), (0.0, 1.0)] {
            assert!((patch.point_at(u, v) - bilinear(u, v)).length() < 1e-9);
        }
    }
}
