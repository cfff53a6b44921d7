use image::{ImageBuffer, Pixel};
use log::debug;
use mw_core::error::{MwError, Result};
use mw_geometry::SamplingMode;
use mw_math::{dvec2, Vector2};
use mw_mesh::BezierMesh;

use crate::grid::{iterate_through_grid, PolygonOp};
use crate::ops::ImagePolygonOp;
use crate::raster::PixelBuffer;

/// Renders a source raster through a deformed mesh.
///
/// Patches are sampled in parallel; painting runs patch by patch in
/// row-major order so the output is deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshTransformWorker {
    pub mode: SamplingMode,
}

impl MeshTransformWorker {
    pub fn new(mode: SamplingMode) -> Self {
        Self { mode }
    }

    /// Drive `op` over every cell of every patch of `mesh`.
    pub fn run_op<Op: PolygonOp + ?Sized>(&self, mesh: &BezierMesh, op: &mut Op) -> Result<()> {
        let grids = mesh.sample_patches_par(self.mode)?;
        let cells: usize = grids.iter().map(|g| g.size.cell_count()).sum();
        debug!(
            "mesh transform: {} patches, {} cells, mode {:?}",
            grids.len(),
            cells,
            self.mode
        );

        for grid in &grids {
            iterate_through_grid(op, grid)?;
        }
        Ok(())
    }

    /// Remap `src` into `dst`. Offsets are the positions of each buffer's
    /// `(0, 0)` pixel in source and destination space.
    pub fn run<S, D>(
        &self,
        mesh: &BezierMesh,
        src: &S,
        dst: &mut D,
        src_offset: Vector2,
        dst_offset: Vector2,
    ) -> Result<()>
    where
        S: PixelBuffer,
        D: PixelBuffer<Pixel = S::Pixel>,
    {
        let mut op = ImagePolygonOp::new(src, dst, src_offset, dst_offset);
        self.run_op(mesh, &mut op)
    }

    /// Render `src`, whose `(0, 0)` pixel sits at the origin of source space,
    /// into a new buffer covering the mesh's destination bounds. Returns the
    /// buffer and the destination position of its `(0, 0)` pixel.
    pub fn render<P>(
        &self,
        mesh: &BezierMesh,
        src: &ImageBuffer<P, Vec<P::Subpixel>>,
    ) -> Result<(ImageBuffer<P, Vec<P::Subpixel>>, Vector2)>
    where
        P: Pixel,
    {
        let (left, top, right, bottom) = mesh.dst_bounding_rect().to_aligned_pixels();
        let extent = |len: i64| {
            u32::try_from(len).map_err(|_| {
                MwError::Geometry(format!("destination extent {} does not fit a raster", len))
            })
        };
        let width = extent(right - left + 1)?;
        let height = extent(bottom - top + 1)?;

        let mut dst = ImageBuffer::new(width, height);
        let dst_offset = dvec2(left as f64, top as f64);
        self.run(mesh, src, &mut dst, Vector2::ZERO, dst_offset)?;
        Ok((dst, dst_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use mw_geometry::GridSize;
    use mw_math::Rect;

    fn pattern(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, ((x + y) % 7) as u8, 255])
        })
    }

    #[test]
    fn test_undeformed_mesh_reproduces_source() {
        let src = pattern(20, 20);
        let mesh = BezierMesh::new(
            Rect::new(dvec2(0.0, 0.0), dvec2(20.0, 20.0)),
            GridSize::new(3, 3),
        )
        .unwrap();

        let (dst, offset) = MeshTransformWorker::default().render(&mesh, &src).unwrap();
        assert_eq!(offset, Vector2::ZERO);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_translated_mesh_moves_image() {
        let src = pattern(20, 20);
        let mut mesh = BezierMesh::with_rect(Rect::new(dvec2(0.0, 0.0), dvec2(20.0, 20.0)));
        for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            mesh.translate_node(col, row, dvec2(5.0, 3.0)).unwrap();
        }

        let (dst, offset) = MeshTransformWorker::default().render(&mesh, &src).unwrap();
        assert_eq!(offset, dvec2(5.0, 3.0));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_regular_mode_rejects_bad_step() {
        let src = pattern(4, 4);
        let mesh = BezierMesh::with_rect(Rect::new(dvec2(0.0, 0.0), dvec2(4.0, 4.0)));
        let worker = MeshTransformWorker::new(SamplingMode::Regular {
            step: dvec2(0.0, 1.0),
        });
        let mut dst = RgbaImage::new(4, 4);
        assert!(matches!(
            worker.run(&mesh, &src, &mut dst, Vector2::ZERO, Vector2::ZERO),
            Err(MwError::InvalidParameter(_))
        ));
    }
}
