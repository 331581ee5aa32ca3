//! # Error Types
//!
//! This module defines the error taxonomy of the optimization core. Every
//! violation is reported synchronously at the point where it is detected, and
//! no operation leaves a caller's population partially modified.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use seaopt::error::{OptimizationError, Result};
//!
//! fn check_dimension(x: &[f64]) -> Result<()> {
//!     if x.len() != 3 {
//!         return Err(OptimizationError::DimensionMismatch {
//!             expected: 3,
//!             found: x.len(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_dimension(&[1.0, 2.0, 3.0]).is_ok());
//! assert!(check_dimension(&[1.0]).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use seaopt::error::{OptimizationError, OptionExt};
//!
//! fn first_fitness(fitness: &[f64]) -> seaopt::error::Result<f64> {
//!     fitness.first().copied().ok_or_else_opt(|| OptimizationError::EmptyPopulation)
//! }
//!
//! assert!(first_fitness(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur in the optimization core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizationError {
    /// Bad construction parameters or an argument outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A vector's length disagrees with the dimension the problem expects.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// An index exceeds the size of the population.
    #[error("Index {index} is out of range for a population of size {size}")]
    OutOfRange { index: usize, size: usize },

    /// An operation that needs at least one individual met an empty population.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A snapshot could not be restored.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// A specialized Result type for optimization operations.
pub type Result<T> = std::result::Result<T, OptimizationError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, OptimizationError>` using
    /// a closure to generate the error.
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_opt<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> OptimizationError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Shorthand for an `InvalidArgument` error.
pub(crate) fn invalid_argument(message: impl Into<String>) -> OptimizationError {
    OptimizationError::InvalidArgument(message.into())
}
