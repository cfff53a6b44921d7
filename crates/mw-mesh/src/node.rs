use mw_geometry::curve::de_casteljau;
use mw_math::{lerp, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A mesh vertex and the control points of the four curves leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub left_control: Point2,
    pub top_control: Point2,
    pub node: Point2,
    pub right_control: Point2,
    pub bottom_control: Point2,
}

impl Node {
    /// A node whose four controls coincide with the vertex (straight edges).
    pub fn new(node: Point2) -> Self {
        Self {
            left_control: node,
            top_control: node,
            node,
            right_control: node,
            bottom_control: node,
        }
    }

    /// Move the vertex together with its controls.
    pub fn translate(&mut self, offset: Vector2) {
        self.left_control += offset;
        self.top_control += offset;
        self.node += offset;
        self.right_control += offset;
        self.bottom_control += offset;
    }

    pub fn is_flat(&self) -> bool {
        self.left_control == self.node
            && self.top_control == self.node
            && self.right_control == self.node
            && self.bottom_control == self.node
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Point2::ZERO)
    }
}

/// Split the horizontal curve between `left` and `right` at `t`.
///
/// The outgoing controls of `left` and `right` are rewritten so that the two
/// halves reproduce the original curve. The vertical controls of the new node
/// interpolate the vertical control offsets of both ends.
pub fn split_curve_horizontally(left: &mut Node, right: &mut Node, t: f64) -> Node {
    let s = de_casteljau(left.node, left.right_control, right.left_control, right.node, t);

    left.right_control = s.left_control;
    right.left_control = s.right_control;

    Node {
        left_control: s.split_in,
        node: s.split,
        right_control: s.split_out,
        top_control: s.split
            + lerp(left.top_control - left.node, right.top_control - right.node, t),
        bottom_control: s.split
            + lerp(left.bottom_control - left.node, right.bottom_control - right.node, t),
    }
}

/// Split the vertical curve between `top` and `bottom` at `t`.
///
/// Mirror image of [`split_curve_horizontally`].
pub fn split_curve_vertically(top: &mut Node, bottom: &mut Node, t: f64) -> Node {
    let s = de_casteljau(top.node, top.bottom_control, bottom.top_control, bottom.node, t);

    top.bottom_control = s.left_control;
    bottom.top_control = s.right_control;

    Node {
        top_control: s.split_in,
        node: s.split,
        bottom_control: s.split_out,
        left_control: s.split
            + lerp(top.left_control - top.node, bottom.left_control - bottom.node, t),
        right_control: s.split
            + lerp(top.right_control - top.node, bottom.right_control - bottom.node, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_geometry::curve::bezier_curve;
    use mw_math::dvec2;

    #[test]
    fn test_new_node_is_flat() {
        let n = Node::new(dvec2(3.0, 4.0));
        assert!(n.is_flat());
        assert_eq!(n.top_control, dvec2(3.0, 4.0));
    }

    #[test]
    fn test_translate_moves_controls() {
        let mut n = Node::new(dvec2(0.0, 0.0));
        n.right_control = dvec2(10.0, 0.0);
        n.translate(dvec2(1.0, 2.0));
        assert_eq!(n.node, dvec2(1.0, 2.0));
        assert_eq!(n.right_control, dvec2(11.0, 2.0));
        assert!(!n.is_flat());
    }

    #[test]
    fn test_split_horizontally_preserves_curve() {
        let mut left = Node::new(dvec2(0.0, 0.0));
        left.right_control = dvec2(30.0, 40.0);
        left.bottom_control = dvec2(0.0, 10.0);
        let mut right = Node::new(dvec2(100.0, 0.0));
        right.left_control = dvec2(70.0, -20.0);
        right.bottom_control = dvec2(100.0, 30.0);

        let (p0, p1, p2, p3) = (left.node, left.right_control, right.left_control, right.node);
        let t = 0.4;
        let new_node = split_curve_horizontally(&mut left, &mut right, t);

        assert!((new_node.node - bezier_curve(p0, p1, p2, p3, t)).length() < 1e-10);

        // Left half covers [0, t] of the original curve
        let on_left = bezier_curve(left.node, left.right_control, new_node.left_control, new_node.node, 0.5);
        assert!((on_left - bezier_curve(p0, p1, p2, p3, 0.5 * t)).length() < 1e-10);

        // Right half covers [t, 1]
        let on_right = bezier_curve(new_node.node, new_node.right_control, right.left_control, right.node, 0.5);
        assert!((on_right - bezier_curve(p0, p1, p2, p3, t + 0.5 * (1.0 - t))).length() < 1e-10);

        // Bottom control offset is interpolated between (0, 10) and (0, 30)
        assert!((new_node.bottom_control - new_node.node - dvec2(0.0, 18.0)).length() < 1e-10);
        assert_eq!(new_node.top_control, new_node.node);
    }

    #[test]
    fn test_split_vertically_flat_midpoint() {
        let mut top = Node::new(dvec2(0.0, 0.0));
        let mut bottom = Node::new(dvec2(0.0, 100.0));
        let new_node = split_curve_vertically(&mut top, &mut bottom, 0.5);
        assert!((new_node.node - dvec2(0.0, 50.0)).length() < 1e-12);
        assert!(top.bottom_control == top.node);
        assert!(bottom.top_control == bottom.node);
    }
}
