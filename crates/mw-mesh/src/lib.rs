//! Mesh warp Bezier mesh: a grid of nodes joined by cubic Bezier curves.

mod iter;
pub mod mesh;
pub mod node;
mod validate;

pub use hit_test::PatchHit;
pub use iter::PatchIter;
pub use mesh::BezierMesh;
pub use node::Node;
