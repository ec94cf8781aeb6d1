//! # Matrix Core Library
//!
//! Provides the dense `f64` matrix type together with elementwise arithmetic,
//! tolerance comparison, partitioning and the matrix product engine.

// Declare modules
pub mod close;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod partition;
pub mod product;
pub mod traits;

// Re-export public types
pub use close::{close, close_all, is_close, machine_epsilon, ElementMask, Tolerance};
pub use error::{MarrayError, Result};
pub use matrix::DenseMatrix;
pub use partition::Quadrants;
pub use product::{product, product_general, product_recursive, ProductStrategy};

pub use traits::Matrix;
