use mw_math::{cross_product, lerp, pow2, Point2, Vector2};

const EPSILON: f64 = 1e-10;

/// Maps points of a destination quadrilateral back into a source
/// quadrilateral by inverting the bilinear map of the destination.
///
/// Both polygons are ordered top-left, top-right, bottom-right, bottom-left.
/// A destination point `p0 + a*mu + c*nu + d*mu*nu` resolves to the source
/// point with the same `(mu, nu)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourPointInterpolatorBackward {
    dst_base: Point2,
    a: Vector2,
    c: Vector2,
    d: Vector2,
    qa: f64,

    src_base: Point2,
    h0: Vector2,
    h1: Vector2,
    v0: Vector2,
}

impl FourPointInterpolatorBackward {
    pub fn new(src: &[Point2; 4], dst: &[Point2; 4]) -> Self {
        let a = dst[1] - dst[0];
        let c = dst[3] - dst[0];
        let d = dst[2] - dst[1] - c;

        Self {
            dst_base: dst[0],
            a,
            c,
            d,
            qa: cross_product(c, d),

            src_base: src[0],
            h0: src[1] - src[0],
            h1: src[2] - src[3],
            v0: src[3] - src[0],
        }
    }

    /// Solve for the bilinear coordinates `(mu, nu)` of `p`.
    pub fn local_coords(&self, p: Point2) -> (f64, f64) {
        let q = p - self.dst_base;
        let qb = cross_product(self.c, self.a) - cross_product(q, self.d);
        let qc = -cross_product(q, self.a);

        let nu = if self.qa.abs() < EPSILON {
            if qb.abs() < EPSILON {
                0.0
            } else {
                -qc / qb
            }
        } else {
            let discriminant = pow2(qb) - 4.0 * self.qa * qc;
            if discriminant < 0.0 {
                0.0
            } else {
                let sqrt_d = discriminant.sqrt();
                let first = (-qb - sqrt_d) / (2.0 * self.qa);
                let second = (-qb + sqrt_d) / (2.0 * self.qa);
                if (0.0..=1.0).contains(&first) {
                    first
                } else if (0.0..=1.0).contains(&second) {
                    second
                } else {
                    first.clamp(0.0, 1.0)
                }
            }
        };

        let x_denominator = self.a.x + nu * self.d.x;
        let y_denominator = self.a.y + nu * self.d.y;
        let mu = if x_denominator.abs() > EPSILON {
            (q.x - nu * self.c.x) / x_denominator
        } else if y_denominator.abs() > EPSILON {
            (q.y - nu * self.c.y) / y_denominator
        } else {
            0.0
        };

        (mu, nu)
    }

    /// Source point corresponding to destination point `p`.
    pub fn map(&self, p: Point2) -> Point2 {
        let (mu, nu) = self.local_coords(p);
        self.src_base + lerp(self.h0, self.h1, nu) * mu + self.v0 * nu
    }
}
