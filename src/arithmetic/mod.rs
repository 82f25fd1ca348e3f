//! Finite-field arithmetic and the linear algebra built on it.
//!
//! - [`field::FiniteField`]: GF(q) for prime powers q
//! - [`linalg`]: dense matrices, null spaces and uniform kernel sampling

pub mod field;
pub mod linalg;

pub use field::{FieldElement, FiniteField};
pub use linalg::{DenseMatrix, sample_from_kernel, sample_nonzero_from_kernel};
