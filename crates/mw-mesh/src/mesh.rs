use log::{debug, warn};
use mw_core::error::{MwError, Result};
use mw_core::traits::BoundingBox;
use mw_core::Tolerance;
use mw_geometry::{BezierPatch, ControlPoint, GridSize, SampledGrid, SamplingMode};
use mw_math::{Point2, Rect, Vector2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::iter::PatchIter;
use crate::node::{split_curve_horizontally, split_curve_vertically, Node};

/// A grid of [`Node`]s joined by cubic Bezier curves.
///
/// Nodes are stored row-major. `columns` and `rows` hold the parametric
/// position of every node column/row inside `original_rect`; both start at
/// `0.0`, end at `1.0` and are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierMesh {
    pub(crate) nodes: Vec<Node>,
    pub(crate) rows: Vec<f64>,
    pub(crate) columns: Vec<f64>,
    pub(crate) size: GridSize,
    pub(crate) original_rect: Rect,
    pub(crate) tolerance: Tolerance,
}

impl BezierMesh {
    /// Build an undeformed mesh of `size` nodes evenly covering `original_rect`.
    pub fn new(original_rect: Rect, size: GridSize) -> Result<Self> {
        if size.width < 2 || size.height < 2 {
            return Err(MwError::InvalidGrid(format!(
                "mesh needs at least 2x2 nodes, got {}x{}",
                size.width, size.height
            )));
        }

        let columns: Vec<f64> = (0..size.width)
            .map(|col| col as f64 / (size.width - 1) as f64)
            .collect();
        let rows: Vec<f64> = (0..size.height)
            .map(|row| row as f64 / (size.height - 1) as f64)
            .collect();

        let mut nodes = Vec::with_capacity(size.point_count());
        for &y in &rows {
            for &x in &columns {
                nodes.push(Node::new(
                    original_rect.relative_to_absolute(Point2::new(x, y)),
                ));
            }
        }

        Ok(Self {
            nodes,
            rows,
            columns,
            size,
            original_rect,
            tolerance: Tolerance::default(),
        })
    }

    /// Same as [`BezierMesh::new`] with a 2x2 grid.
    pub fn with_rect(original_rect: Rect) -> Self {
        let corners = [
            original_rect.min,
            Point2::new(original_rect.max.x, original_rect.min.y),
            Point2::new(original_rect.min.x, original_rect.max.y),
            original_rect.max,
        ];

        Self {
            nodes: corners.into_iter().map(Node::new).collect(),
            rows: vec![0.0, 1.0],
            columns: vec![0.0, 1.0],
            size: GridSize::new(2, 2),
            original_rect,
            tolerance: Tolerance::default(),
        }
    }

    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.tolerance = tolerance;
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    pub fn original_rect(&self) -> Rect {
        self.original_rect
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn node_index(&self, col: usize, row: usize) -> Result<usize> {
        if col >= self.size.width || row >= self.size.height {
            return Err(self.out_of_bounds(col, row));
        }
        Ok(row * self.size.width + col)
    }

    fn out_of_bounds(&self, col: usize, row: usize) -> MwError {
        MwError::OutOfBounds {
            col,
            row,
            width: self.size.width,
            height: self.size.height,
        }
    }

    pub fn node(&self, col: usize, row: usize) -> Result<&Node> {
        let idx = self.node_index(col, row)?;
        Ok(&self.nodes[idx])
    }

    pub fn node_mut(&mut self, col: usize, row: usize) -> Result<&mut Node> {
        let idx = self.node_index(col, row)?;
        Ok(&mut self.nodes[idx])
    }

    /// Move a node together with its four controls.
    pub fn translate_node(&mut self, col: usize, row: usize, offset: Vector2) -> Result<()> {
        self.node_mut(col, row)?.translate(offset);
        Ok(())
    }

    /// Insert a new row of nodes at parametric position `t`.
    ///
    /// Returns `Ok(false)` without touching the mesh when `t` matches `0.0`,
    /// `1.0` or an existing row, and an error when `t` lies outside `(0, 1)`.
    pub fn subdivide_row(&mut self, t: f64) -> Result<bool> {
        let Some(top_row) = self.find_insertion_span(&self.rows, t, "row")? else {
            return Ok(false);
        };
        let bottom_row = top_row + 1;
        let rel_t = (t - self.rows[top_row]) / (self.rows[bottom_row] - self.rows[top_row]);

        let width = self.size.width;
        let mut new_row = Vec::with_capacity(width);
        for col in 0..width {
            let top_idx = top_row * width + col;
            let bottom_idx = bottom_row * width + col;
            let (head, tail) = self.nodes.split_at_mut(bottom_idx);
            new_row.push(split_curve_vertically(&mut head[top_idx], &mut tail[0], rel_t));
        }

        let offset = bottom_row * width;
        self.nodes.splice(offset..offset, new_row);
        self.rows.insert(bottom_row, t);
        self.size.height += 1;

        debug!(
            "subdivided row at {} (relative {} in span {}), mesh is now {}x{}",
            t, rel_t, top_row, self.size.width, self.size.height
        );
        Ok(true)
    }

    /// Insert a new column of nodes at parametric position `t`.
    ///
    /// Same contract as [`BezierMesh::subdivide_row`].
    pub fn subdivide_column(&mut self, t: f64) -> Result<bool> {
        let Some(left_col) = self.find_insertion_span(&self.columns, t, "column")? else {
            return Ok(false);
        };
        let right_col = left_col + 1;
        let rel_t =
            (t - self.columns[left_col]) / (self.columns[right_col] - self.columns[left_col]);

        let width = self.size.width;
        let mut nodes = Vec::with_capacity(self.nodes.len() + self.size.height);
        for row in self.nodes.chunks_mut(width) {
            let (head, tail) = row.split_at_mut(right_col);
            let new_node = split_curve_horizontally(&mut head[left_col], &mut tail[0], rel_t);

            nodes.extend_from_slice(head);
            nodes.push(new_node);
            nodes.extend_from_slice(tail);
        }

        self.nodes = nodes;
        self.columns.insert(right_col, t);
        self.size.width += 1;

        debug!(
            "subdivided column at {} (relative {} in span {}), mesh is now {}x{}",
            t, rel_t, left_col, self.size.width, self.size.height
        );
        Ok(true)
    }

    /// Locate the span of `positions` that strictly contains `t`.
    fn find_insertion_span(&self, positions: &[f64], t: f64, axis: &str) -> Result<Option<usize>> {
        if self.tolerance.fuzzy_eq(t, 0.0) || self.tolerance.fuzzy_eq(t, 1.0) {
            return Ok(None);
        }

        if !(t > 0.0 && t < 1.0) {
            warn!("ignoring {} subdivision outside (0, 1): {}", axis, t);
            return Err(MwError::InvalidParameter(format!(
                "{} subdivision parameter must lie in (0, 1), got {}",
                axis, t
            )));
        }

        let upper = positions.partition_point(|&p| p <= t);
        let span = upper - 1;

        if self.tolerance.fuzzy_eq(positions[span], t)
            || self.tolerance.fuzzy_eq(positions[upper], t)
        {
            return Ok(None);
        }

        Ok(Some(span))
    }

    pub fn patch_count(&self) -> usize {
        self.size.cell_count()
    }

    /// `(col, row)` of the patch with row-major index `index`.
    pub fn patch_position(&self, index: usize) -> (usize, usize) {
        let patches_per_row = self.size.width - 1;
        (index % patches_per_row, index / patches_per_row)
    }

    pub fn patch_at_index(&self, index: usize) -> Result<BezierPatch> {
        let (col, row) = self.patch_position(index);
        self.make_patch(col, row)
    }

    /// Assemble the patch whose top-left node is `(col, row)`.
    pub fn make_patch(&self, col: usize, row: usize) -> Result<BezierPatch> {
        if col + 1 >= self.size.width || row + 1 >= self.size.height {
            return Err(self.out_of_bounds(col, row));
        }

        let tl = self.node(col, row)?;
        let tr = self.node(col + 1, row)?;
        let bl = self.node(col, row + 1)?;
        let br = self.node(col + 1, row + 1)?;

        let mut points = [Point2::ZERO; 12];
        let mut set = |cp: ControlPoint, p: Point2| points[cp as usize] = p;

        set(ControlPoint::TL, tl.node);
        set(ControlPoint::TL_HC, tl.right_control);
        set(ControlPoint::TL_VC, tl.bottom_control);

        set(ControlPoint::TR, tr.node);
        set(ControlPoint::TR_HC, tr.left_control);
        set(ControlPoint::TR_VC, tr.bottom_control);

        set(ControlPoint::BL, bl.node);
        set(ControlPoint::BL_HC, bl.right_control);
        set(ControlPoint::BL_VC, bl.top_control);

        set(ControlPoint::BR, br.node);
        set(ControlPoint::BR_HC, br.left_control);
        set(ControlPoint::BR_VC, br.top_control);

        let rel_rect = Rect::new(
            Point2::new(self.columns[col], self.rows[row]),
            Point2::new(self.columns[col + 1], self.rows[row + 1]),
        );

        Ok(BezierPatch::new(
            points,
            self.original_rect.relative_to_absolute_rect(&rel_rect),
        ))
    }

    /// All patches in row-major order.
    pub fn patches(&self) -> PatchIter<'_> {
        PatchIter::new(self)
    }

    /// Union of the destination bounds of every patch.
    pub fn dst_bounding_rect(&self) -> Rect {
        self.patches()
            .map(|patch| patch.dst_bounding_rect())
            .reduce(|a, b| a.merge(&b))
            .unwrap_or(self.original_rect)
    }

    /// Sample every patch in parallel, results in row-major patch order.
    pub fn sample_patches_par(&self, mode: SamplingMode) -> Result<Vec<SampledGrid>> {
        (0..self.patch_count())
            .into_par_iter()
            .map(|index| self.patch_at_index(index)?.sample(mode))
            .collect()
    }
}

impl BoundingBox for BezierMesh {
    type Bounds = Rect;

    fn bounding_box(&self) -> Rect {
        self.dst_bounding_rect()
    }
}
