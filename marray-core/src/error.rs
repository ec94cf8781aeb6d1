use thiserror::Error;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub type Result<T> = core::result::Result<T, MarrayError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarrayError {
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Partition out of range: {0}")]
    RangeError(String),

    #[error("Failed to allocate a {rows}x{cols} matrix")]
    AllocationFailure { rows: usize, cols: usize },

    #[error("Matrix is singular at column {column}: system has no unique solution")]
    SingularMatrix { column: usize },
}

impl MarrayError {
    /// Shorthand for the shape check shared by every binary operation.
    pub(crate) fn shape_mismatch(
        op: &str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch(format!(
            "{} requires equal shapes, got {}x{} and {}x{}",
            op, lhs.0, lhs.1, rhs.0, rhs.1
        ))
    }
}

#[cfg(feature = "wasm")]
impl From<MarrayError> for wasm_bindgen::JsValue {
    fn from(err: MarrayError) -> Self {
        Self::from_str(&err.to_string())
    }
}
