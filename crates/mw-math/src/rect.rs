use crate::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Rectangle from an origin and a size, `Rect::from_origin_size((0, 0), (100, 50))`.
    pub fn from_origin_size(origin: Point2, size: Vector2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let mut rect = Self::new(first, first);
        for &p in rest {
            rect.accumulate(p);
        }
        Some(rect)
    }

    /// Grow the rectangle so that it contains `p`.
    pub fn accumulate(&mut self, p: Point2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vector2 {
        self.max - self.min
    }

    pub fn center(&self) -> Point2 {
        (self.min + self.max) * 0.5
    }

    /// Map a point from normalized `[0, 1]^2` coordinates into this rectangle.
    pub fn relative_to_absolute(&self, rel: Point2) -> Point2 {
        self.min + rel * self.size()
    }

    /// Map a point inside this rectangle back to normalized coordinates.
    ///
    /// A zero-sized axis maps to `0.0`.
    pub fn absolute_to_relative(&self, abs: Point2) -> Point2 {
        let size = self.size();
        let rel = |v: f64, extent: f64| if extent == 0.0 { 0.0 } else { v / extent };
        Point2::new(
            rel(abs.x - self.min.x, size.x),
            rel(abs.y - self.min.y, size.y),
        )
    }

    /// Map a normalized sub-rectangle into this rectangle.
    pub fn relative_to_absolute_rect(&self, rel: &Rect) -> Rect {
        Rect::new(
            self.relative_to_absolute(rel.min),
            self.relative_to_absolute(rel.max),
        )
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand(&self, amount: f64) -> Self {
        let offset = Vector2::splat(amount);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }

    /// Smallest integer pixel rectangle covering this one, as inclusive
    /// `(left, top, right, bottom)` pixel coordinates.
    pub fn to_aligned_pixels(&self) -> (i64, i64, i64, i64) {
        let left = self.min.x.floor() as i64;
        let top = self.min.y.floor() as i64;
        let right = (self.max.x.ceil() as i64 - 1).max(left);
        let bottom = (self.max.y.ceil() as i64 - 1).max(top);
        (left, top, right, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn test_from_points() {
        let pts = vec![dvec2(1.0, 2.0), dvec2(-1.0, 5.0), dvec2(3.0, -1.0)];
        let rect = Rect::from_points(&pts).unwrap();
        assert_eq!(rect.min, dvec2(-1.0, -1.0));
        assert_eq!(rect.max, dvec2(3.0, 5.0));
        assert!(Rect::from_points(&[]).is_none());
    }

    #[test]
    fn test_relative_to_absolute() {
        let rect = Rect::from_origin_size(dvec2(10.0, 20.0), dvec2(100.0, 50.0));
        assert_eq!(rect.relative_to_absolute(dvec2(0.0, 0.0)), dvec2(10.0, 20.0));
        assert_eq!(rect.relative_to_absolute(dvec2(0.5, 1.0)), dvec2(60.0, 70.0));
        assert_eq!(rect.absolute_to_relative(dvec2(60.0, 70.0)), dvec2(0.5, 1.0));
    }

    #[test]
    fn test_relative_rect() {
        let rect = Rect::from_origin_size(dvec2(0.0, 0.0), dvec2(200.0, 100.0));
        let sub = rect.relative_to_absolute_rect(&Rect::new(dvec2(0.25, 0.5), dvec2(0.5, 1.0)));
        assert_eq!(sub.min, dvec2(50.0, 50.0));
        assert_eq!(sub.max, dvec2(100.0, 100.0));
    }

    #[test]
    fn test_contains_and_intersects() {
        let a = Rect::new(dvec2(0.0, 0.0), dvec2(2.0, 2.0));
        let b = Rect::new(dvec2(1.0, 1.0), dvec2(3.0, 3.0));
        let c = Rect::new(dvec2(5.0, 5.0), dvec2(6.0, 6.0));
        assert!(a.contains_point(dvec2(0.5, 0.5)));
        assert!(!a.contains_point(dvec2(2.5, 0.5)));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_aligned_pixels() {
        let rect = Rect::new(dvec2(0.5, 1.0), dvec2(10.2, 4.0));
        assert_eq!(rect.to_aligned_pixels(), (0, 1, 10, 3));
    }
}
