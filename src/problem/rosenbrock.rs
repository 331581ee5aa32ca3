//! The generalised n-dimensional Rosenbrock function.
//!
//! ```text
//! F(x) = sum_{i=1}^{n-1} [ 100 (x_i^2 - x_{i+1})^2 + (x_i - 1)^2 ],   x_i in [-5, 10]
//! ```
//!
//! The global minimum is `F(1, ..., 1) = 0`.

use crate::error::{invalid_argument, Result};
use crate::snapshot::{Field, FieldReader};

use super::UserProblem;

/// Box-constrained, continuous, single-objective quadratic valley.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rosenbrock {
    dim: usize,
}

impl Rosenbrock {
    pub const TAG: &'static str = "rosenbrock";

    /// Creates the function in `dim` dimensions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `dim < 2`.
    pub fn new(dim: usize) -> Result<Self> {
        if dim < 2 {
            return Err(invalid_argument(format!(
                "Rosenbrock Function must have minimum 2 dimensions, {} requested",
                dim
            )));
        }
        Ok(Self { dim })
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub(crate) fn restore(reader: &mut FieldReader<'_>) -> Result<Box<dyn UserProblem>> {
        let dim = reader.next_usize("dim")?;
        Ok(Box::new(Self::new(dim)?))
    }
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self { dim: 2 }
    }
}

impl UserProblem for Rosenbrock {
    fn fitness(&self, x: &[f64]) -> Vec<f64> {
        let value = x
            .windows(2)
            .map(|w| {
                let a = w[0] * w[0] - w[1];
                let b = w[0] - 1.0;
                100.0 * a * a + b * b
            })
            .sum();
        vec![value]
    }

    fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![-5.0; self.dim], vec![10.0; self.dim])
    }

    fn name(&self) -> String {
        "Multidimensional Rosenbrock Function".to_string()
    }

    fn extra_info(&self) -> String {
        format!("\n\tDimension: {}", self.dim)
    }

    fn best_known(&self) -> Option<Vec<f64>> {
        Some(vec![1.0; self.dim])
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn snapshot_fields(&self) -> Vec<Field> {
        vec![Field::UInt(self.dim as u64)]
    }
}
