use mw_core::error::{MwError, Result};
use mw_core::traits::Validate;

use crate::mesh::BezierMesh;

fn check_positions(positions: &[f64], expected_len: usize, axis: &str) -> Result<()> {
    if positions.len() != expected_len {
        return Err(MwError::Validation(format!(
            "{} positions: expected {}, found {}",
            axis,
            expected_len,
            positions.len()
        )));
    }

    if positions.first() != Some(&0.0) || positions.last() != Some(&1.0) {
        return Err(MwError::Validation(format!(
            "{} positions must start at 0 and end at 1",
            axis
        )));
    }

    if let Some(pair) = positions.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(MwError::Validation(format!(
            "{} positions are not strictly increasing: {} then {}",
            axis, pair[0], pair[1]
        )));
    }

    Ok(())
}

impl Validate for BezierMesh {
    fn validate(&self) -> Result<()> {
        if self.size.width < 2 || self.size.height < 2 {
            return Err(MwError::Validation(format!(
                "mesh is {}x{}, at least 2x2 required",
                self.size.width, self.size.height
            )));
        }

        if self.nodes.len() != self.size.point_count() {
            return Err(MwError::Validation(format!(
                "node storage holds {} nodes, grid is {}x{}",
                self.nodes.len(),
                self.size.width,
                self.size.height
            )));
        }

        check_positions(&self.columns, self.size.width, "column")?;
        check_positions(&self.rows, self.size.height, "row")?;

        if let Some(idx) = self.nodes.iter().position(|n| !n.node.is_finite()) {
            return Err(MwError::Validation(format!(
                "node {} has a non-finite position",
                idx
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_geometry::GridSize;
    use mw_math::{dvec2, Rect};

    fn mesh() -> BezierMesh {
        BezierMesh::new(
            Rect::new(dvec2(0.0, 0.0), dvec2(10.0, 10.0)),
            GridSize::new(3, 3),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_mesh_is_valid() {
        mesh().validate().unwrap();
    }

    #[test]
    fn test_subdivided_mesh_is_valid() {
        let mut m = mesh();
        m.subdivide_row(0.3).unwrap();
        m.subdivide_column(0.9).unwrap();
        m.validate().unwrap();
    }

    #[test]
    fn test_unsorted_positions_rejected() {
        let mut m = mesh();
        m.columns.swap(0, 1);
        assert!(matches!(m.validate(), Err(MwError::Validation(_))));
    }

    #[test]
    fn test_storage_mismatch_rejected() {
        let mut m = mesh();
        m.nodes.pop();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_non_finite_node_rejected() {
        let mut m = mesh();
        m.node_mut(1, 1).unwrap().node.x = f64::NAN;
        assert!(m.validate().is_err());
    }
}
