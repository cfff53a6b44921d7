//! Walking a sampled grid as a sequence of quadrilateral cells.

use mw_core::error::{MwError, Result};
use mw_geometry::{GridSize, SampledGrid};
use mw_math::Point2;

/// Row-major point indexes of the cell whose top-left point is `(col, row)`,
/// in polygon order: top-left, top-right, bottom-right, bottom-left.
pub fn calculate_cell_indexes(col: usize, row: usize, size: GridSize) -> [usize; 4] {
    let tl = row * size.width + col;
    let bl = (row + 1) * size.width + col;
    [tl, tl + 1, bl + 1, bl]
}

/// One grid cell with its source and destination quadrilaterals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
    pub src: [Point2; 4],
    pub dst: [Point2; 4],
}

/// All cells of `grid` in row-major order.
pub fn grid_cells(grid: &SampledGrid) -> impl Iterator<Item = GridCell> + '_ {
    let size = grid.size;
    let cols = size.width.saturating_sub(1);
    let rows = size.height.saturating_sub(1);

    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| {
            let idx = calculate_cell_indexes(col, row, size);
            GridCell {
                col,
                row,
                src: idx.map(|i| grid.src_points[i]),
                dst: idx.map(|i| grid.dst_points[i]),
            }
        })
    })
}

/// Per-cell operation driven by [`iterate_through_grid`].
pub trait PolygonOp {
    /// Handle one cell. `clip`, when present, restricts the destination
    /// pixels touched to that polygon instead of `dst`.
    fn process(&mut self, src: &[Point2; 4], dst: &[Point2; 4], clip: Option<&[Point2]>);
}

impl<T: PolygonOp + ?Sized> PolygonOp for &mut T {
    fn process(&mut self, src: &[Point2; 4], dst: &[Point2; 4], clip: Option<&[Point2]>) {
        (**self).process(src, dst, clip)
    }
}

/// Run `op` over every cell of `grid`, sequentially in row-major order.
pub fn iterate_through_grid<Op: PolygonOp + ?Sized>(op: &mut Op, grid: &SampledGrid) -> Result<()> {
    let expected = grid.size.point_count();
    if grid.src_points.len() != expected || grid.dst_points.len() != expected {
        return Err(MwError::InvalidGrid(format!(
            "grid {}x{} needs {} points, got {} source and {} destination",
            grid.size.width,
            grid.size.height,
            expected,
            grid.src_points.len(),
            grid.dst_points.len()
        )));
    }

    for cell in grid_cells(grid) {
        op.process(&cell.src, &cell.dst, None);
    }
    Ok(())
}
