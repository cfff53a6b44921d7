pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{MwError, Result};
pub use tolerance::Tolerance;
