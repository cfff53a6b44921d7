//! Mesh warp rasterization: walks sampled patch grids cell by cell and
//! paints destination pixels through a backward four-point interpolator.

pub mod grid;
pub mod interpolator;
pub mod ops;
pub mod polygon;
pub mod raster;
pub mod worker;

pub use grid::{calculate_cell_indexes, grid_cells, iterate_through_grid, GridCell, PolygonOp};
pub use interpolator::FourPointInterpolatorBackward;
pub use ops::{GradientOp, ImagePolygonOp};
pub use raster::{lerp_color, PixelBuffer};
pub use worker::MeshTransformWorker;
