//! Scalar and planar helpers shared by the curve and raster code.

use std::ops::{Add, Mul, Sub};

use crate::Vector2;

#[inline]
pub fn pow2<T: Mul<Output = T> + Copy>(x: T) -> T {
    x * x
}

#[inline]
pub fn pow3<T: Mul<Output = T> + Copy>(x: T) -> T {
    x * x * x
}

/// Linear interpolation `a + (b - a) * t`, usable for scalars and points alike.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f64) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    a + (b - a) * t
}

/// Z component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross_product(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn test_lerp_scalar_and_point() {
        assert_relative_eq!(lerp(2.0, 4.0, 0.25), 2.5);
        let p = lerp(dvec2(0.0, 0.0), dvec2(10.0, -4.0), 0.5);
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, -2.0);
    }

    #[test]
    fn test_cross_product_sign() {
        assert_relative_eq!(cross_product(dvec2(1.0, 0.0), dvec2(0.0, 1.0)), 1.0);
        assert_relative_eq!(cross_product(dvec2(0.0, 1.0), dvec2(1.0, 0.0)), -1.0);
        assert_relative_eq!(cross_product(dvec2(2.0, 2.0), dvec2(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_powers() {
        assert_eq!(pow2(3.0), 9.0);
        assert_eq!(pow3(-2.0), -8.0);
    }
}
