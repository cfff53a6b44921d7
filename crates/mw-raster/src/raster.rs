//! Minimal raster interface used by the polygon operations.

use std::ops::{Deref, DerefMut};

use image::{ImageBuffer, Pixel, Rgba};

/// A 2D pixel buffer with bounds-checked access.
pub trait PixelBuffer {
    type Pixel: Copy;

    fn dimensions(&self) -> (u32, u32);

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    fn pixel(&self, x: i64, y: i64) -> Option<Self::Pixel>;

    /// Write a pixel. Returns `false` when `(x, y)` is outside the buffer.
    fn set_pixel(&mut self, x: i64, y: i64, pixel: Self::Pixel) -> bool;

    fn contains(&self, x: i64, y: i64) -> bool {
        let (width, height) = self.dimensions();
        x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height)
    }
}

impl<P, C> PixelBuffer for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]> + DerefMut,
{
    type Pixel = P;

    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel(&self, x: i64, y: i64) -> Option<P> {
        self.contains(x, y)
            .then(|| *self.get_pixel(x as u32, y as u32))
    }

    fn set_pixel(&mut self, x: i64, y: i64, pixel: P) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.put_pixel(x as u32, y as u32, pixel);
        true
    }
}

/// Per-channel linear interpolation between two colors.
pub fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for (c, out) in out.iter_mut().enumerate() {
        let from = f64::from(a.0[c]);
        let to = f64::from(b.0[c]);
        *out = (from + (to - from) * t).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
