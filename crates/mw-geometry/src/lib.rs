//! Mesh warp geometry: cubic Bezier curves, Bezier patches, sampling and inverse mapping.

pub mod curve;
pub mod inverse;
pub mod linearize;
pub mod sample;
pub mod surface;

pub use curve::{CubicBezier, Curve};
pub use inverse::{calculate_local_pos, calculate_local_pos_with, LocalPos, SolverConfig};
pub use linearize::{is_linear_segment, linearize_curve, merge_steps, merge_steps_with};
pub use sample::{GridSize, SampledGrid, SamplingMode};
pub use surface::{BezierPatch, ControlPoint, PatchEdge, Surface};
