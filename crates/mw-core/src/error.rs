use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MwError {
    #[error("Index out of bounds: ({col}, {row}) in a {width}x{height} grid")]
    OutOfBounds {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, MwError>;
