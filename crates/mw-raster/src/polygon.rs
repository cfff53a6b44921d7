use mw_math::{Point2, Rect};

/// Odd-even fill test. Points on the top/left edges of an axis-aligned
/// polygon count as inside, points on its bottom/right edges do not, so
/// neighbouring cells never claim the same pixel.
pub fn contains_point(polygon: &[Point2], p: Point2) -> bool {
    let Some(&last) = polygon.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    for &curr in polygon {
        if (curr.y > p.y) != (prev.y > p.y) {
            let x = curr.x + (p.y - curr.y) * (prev.x - curr.x) / (prev.y - curr.y);
            if p.x < x {
                inside = !inside;
            }
        }
        prev = curr;
    }
    inside
}

/// Inclusive pixel bounds `(left, top, right, bottom)` of a polygon.
pub fn aligned_bounds(polygon: &[Point2]) -> Option<(i64, i64, i64, i64)> {
    Rect::from_points(polygon).map(|rect| rect.to_aligned_pixels())
}
