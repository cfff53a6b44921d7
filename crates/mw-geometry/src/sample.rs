//! Sampling a Bezier patch into a grid of source/destination point pairs.

use log::debug;
use mw_core::{MwError, Result};
use mw_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::linearize::{linearize_curve, merge_steps};
use crate::surface::{BezierPatch, ControlPoint, Surface};

/// Logical size of a sampled grid, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn point_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of quadrilateral cells between the grid points.
    pub fn cell_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }
}

/// How a patch is turned into a grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Adaptive steps from linearizing the boundary curves.
    #[default]
    Irregular,
    /// Uniform steps, roughly `step` destination units apart.
    Regular { step: Vector2 },
}

/// Parallel source and destination point sequences, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledGrid {
    pub size: GridSize,
    pub src_points: Vec<Point2>,
    pub dst_points: Vec<Point2>,
}

impl SampledGrid {
    pub fn point_index(&self, col: usize, row: usize) -> usize {
        row * self.size.width + col
    }

    pub fn src_point(&self, col: usize, row: usize) -> Point2 {
        self.src_points[self.point_index(col, row)]
    }

    pub fn dst_point(&self, col: usize, row: usize) -> Point2 {
        self.dst_points[self.point_index(col, row)]
    }
}

impl BezierPatch {
    /// Sample the patch on the union of the adaptive steps of its boundary
    /// curves, so that opposite edges share one sampling lattice.
    pub fn sample_irregular_grid(&self) -> SampledGrid {
        use ControlPoint::*;

        let top_steps = linearize_curve(self[TL], self[TL_HC], self[TR_HC], self[TR]);
        let bottom_steps = linearize_curve(self[BL], self[BL_HC], self[BR_HC], self[BR]);
        let horizontal_steps = merge_steps(&top_steps, &bottom_steps);

        let left_steps = linearize_curve(self[TL], self[TL_VC], self[BL_VC], self[BL]);
        let right_steps = linearize_curve(self[TR], self[TR_VC], self[BR_VC], self[BR]);
        let vertical_steps = merge_steps(&left_steps, &right_steps);

        let grid = self.sample_steps(&horizontal_steps, &vertical_steps);
        debug!("sampled irregular grid {}x{}", grid.size.width, grid.size.height);
        grid
    }

    /// Sample the patch on a uniform grid whose resolution is the destination
    /// bounds divided by `dst_step`. Each dimension is at least 2.
    pub fn sample_regular_grid(&self, dst_step: Vector2) -> Result<SampledGrid> {
        if !(dst_step.x > 0.0 && dst_step.y > 0.0) {
            return Err(MwError::InvalidParameter(format!(
                "sampling step must be positive, got ({}, {})",
                dst_step.x, dst_step.y
            )));
        }

        let bounds = self.dst_bounding_rect();
        let width = ((bounds.width() / dst_step.x).ceil() as usize).max(2);
        let height = ((bounds.height() / dst_step.y).ceil() as usize).max(2);

        let uniform = |n: usize| -> Vec<f64> {
            (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
        };

        let grid = self.sample_steps(&uniform(width), &uniform(height));
        debug!("sampled regular grid {}x{}", grid.size.width, grid.size.height);
        Ok(grid)
    }

    pub fn sample(&self, mode: SamplingMode) -> Result<SampledGrid> {
        match mode {
            SamplingMode::Irregular => Ok(self.sample_irregular_grid()),
            SamplingMode::Regular { step } => self.sample_regular_grid(step),
        }
    }

    fn sample_steps(&self, horizontal: &[f64], vertical: &[f64]) -> SampledGrid {
        let size = GridSize::new(horizontal.len(), vertical.len());
        let mut src_points = Vec::with_capacity(size.point_count());
        let mut dst_points = Vec::with_capacity(size.point_count());

        for &y in vertical {
            for &x in horizontal {
                src_points.push(self.src_rect.relative_to_absolute(Point2::new(x, y)));
                dst_points.push(self.point_at(x, y));
            }
        }

        SampledGrid {
            size,
            src_points,
            dst_points,
        }
    }
}
