//! Stock polygon operations: pixel remap and four-corner gradient fill.

use image::Rgba;
use mw_math::{dvec2, Point2, Vector2};

use crate::grid::PolygonOp;
use crate::interpolator::FourPointInterpolatorBackward;
use crate::polygon::{aligned_bounds, contains_point};
use crate::raster::{lerp_color, PixelBuffer};

/// Visit every integer destination pixel covered by `clip` (or `dst` when
/// no clip polygon is given), passing the pixel and its source position.
fn for_each_covered_pixel(
    src: &[Point2; 4],
    dst: &[Point2; 4],
    clip: Option<&[Point2]>,
    mut f: impl FnMut(Point2, Point2),
) {
    let clip = clip.unwrap_or(dst);
    let Some((left, top, right, bottom)) = aligned_bounds(clip) else {
        return;
    };
    let interp = FourPointInterpolatorBackward::new(src, dst);

    for y in top..=bottom {
        for x in left..=right {
            let dst_point = dvec2(x as f64, y as f64);
            if contains_point(clip, dst_point) {
                f(dst_point, interp.map(dst_point));
            }
        }
    }
}

fn to_pixel(p: Point2) -> (i64, i64) {
    (p.x.round() as i64, p.y.round() as i64)
}

/// Copies source pixels into the destination through the per-cell
/// inverse bilinear map. Offsets give the position of each buffer's
/// `(0, 0)` pixel in source and destination space respectively.
pub struct ImagePolygonOp<'a, S, D> {
    src: &'a S,
    dst: &'a mut D,
    src_offset: Vector2,
    dst_offset: Vector2,
}

impl<'a, S, D> ImagePolygonOp<'a, S, D>
where
    S: PixelBuffer,
    D: PixelBuffer<Pixel = S::Pixel>,
{
    pub fn new(src: &'a S, dst: &'a mut D, src_offset: Vector2, dst_offset: Vector2) -> Self {
        Self {
            src,
            dst,
            src_offset,
            dst_offset,
        }
    }
}

impl<'a, S, D> PolygonOp for ImagePolygonOp<'a, S, D>
where
    S: PixelBuffer,
    D: PixelBuffer<Pixel = S::Pixel>,
{
    fn process(&mut self, src: &[Point2; 4], dst: &[Point2; 4], clip: Option<&[Point2]>) {
        let Self {
            src: src_buf,
            dst: dst_buf,
            src_offset,
            dst_offset,
        } = self;

        for_each_covered_pixel(src, dst, clip, |dst_point, src_point| {
            let (sx, sy) = to_pixel(src_point - *src_offset);
            let Some(pixel) = src_buf.pixel(sx, sy) else {
                return;
            };
            let (dx, dy) = to_pixel(dst_point - *dst_offset);
            dst_buf.set_pixel(dx, dy, pixel);
        });
    }
}

/// Fills cells with a bilinear blend of four corner colors, ordered
/// top-left, top-right, bottom-left, bottom-right. The source grid is
/// expected to span the unit square; source positions are the blend weights.
pub struct GradientOp<'a, D> {
    colors: [Rgba<u8>; 4],
    dst: &'a mut D,
    dst_offset: Vector2,
}

impl<'a, D> GradientOp<'a, D>
where
    D: PixelBuffer<Pixel = Rgba<u8>>,
{
    pub fn new(colors: [Rgba<u8>; 4], dst: &'a mut D, dst_offset: Vector2) -> Self {
        Self {
            colors,
            dst,
            dst_offset,
        }
    }
}

impl<'a, D> PolygonOp for GradientOp<'a, D>
where
    D: PixelBuffer<Pixel = Rgba<u8>>,
{
    fn process(&mut self, src: &[Point2; 4], dst: &[Point2; 4], clip: Option<&[Point2]>) {
        let Self {
            colors,
            dst: dst_buf,
            dst_offset,
        } = self;

        for_each_covered_pixel(src, dst, clip, |dst_point, weights| {
            let (dx, dy) = to_pixel(dst_point - *dst_offset);
            if !dst_buf.contains(dx, dy) {
                return;
            }

            let u = weights.x.clamp(0.0, 1.0);
            let v = weights.y.clamp(0.0, 1.0);
            let top = lerp_color(colors[0], colors[1], u);
            let bottom = lerp_color(colors[2], colors[3], u);
            dst_buf.set_pixel(dx, dy, lerp_color(top, bottom, v));
        });
    }
}
