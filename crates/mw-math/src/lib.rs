pub mod algebra;
pub mod rect;

pub use glam::{dvec2, DVec2};
pub use algebra::{cross_product, lerp, pow2, pow3};
pub use rect::Rect;

pub type Point2 = DVec2;
pub type Vector2 = DVec2;
