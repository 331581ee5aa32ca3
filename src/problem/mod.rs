//! # Problems
//!
//! A problem defines what is being optimized: a fitness function over a box of
//! real decision variables. Concrete problems implement [`UserProblem`]; the
//! rest of the crate only ever sees the type-erased [`Problem`] wrapper, so any
//! problem can be plugged in without recompiling callers.
//!
//! ## Example
//!
//! ```rust
//! use seaopt::problem::{Problem, Rosenbrock};
//!
//! let mut problem = Problem::new(Rosenbrock::new(3).unwrap()).unwrap();
//! assert_eq!(problem.get_dimension(), 3);
//! assert_eq!(problem.fitness(&[1.0, 1.0, 1.0]).unwrap(), vec![0.0]);
//! assert_eq!(problem.get_fevals(), 1);
//! ```
//!
//! ## Implementing the Trait
//!
//! ```rust
//! use seaopt::problem::{Problem, UserProblem};
//! use seaopt::snapshot::Field;
//!
//! #[derive(Clone, Debug)]
//! struct Sphere {
//!     dim: usize,
//! }
//!
//! impl UserProblem for Sphere {
//!     fn fitness(&self, x: &[f64]) -> Vec<f64> {
//!         vec![x.iter().map(|v| v * v).sum()]
//!     }
//!
//!     fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
//!         (vec![-1.0; self.dim], vec![1.0; self.dim])
//!     }
//!
//!     fn name(&self) -> String {
//!         "Sphere".to_string()
//!     }
//!
//!     fn type_tag(&self) -> &'static str {
//!         "sphere"
//!     }
//!
//!     fn snapshot_fields(&self) -> Vec<Field> {
//!         vec![Field::UInt(self.dim as u64)]
//!     }
//! }
//!
//! let problem = Problem::new(Sphere { dim: 4 }).unwrap();
//! assert_eq!(problem.get_name(), "Sphere");
//! ```

pub mod inventory;
pub mod rosenbrock;

use std::any::Any;
use std::fmt::{self, Debug};

use crate::error::{invalid_argument, OptimizationError, Result};
use crate::snapshot::{Field, ProblemSnapshot};

pub use inventory::Inventory;
pub use rosenbrock::Rosenbrock;

/// The capability set of a concrete problem.
///
/// `fitness` is called only with vectors whose length equals the dimension
/// implied by `bounds`; the [`Problem`] wrapper checks this before calling.
/// Types implementing this trait must also implement `Clone`, which provides
/// the [`ProblemBase`] plumbing automatically.
pub trait UserProblem: ProblemBase + Debug + Send + Sync {
    /// Evaluates a decision vector. The result has `nobj()` entries.
    fn fitness(&self, x: &[f64]) -> Vec<f64>;

    /// Lower and upper bounds, one entry per decision variable.
    fn bounds(&self) -> (Vec<f64>, Vec<f64>);

    /// Number of objectives.
    fn nobj(&self) -> usize {
        1
    }

    /// Display name.
    fn name(&self) -> String;

    fn extra_info(&self) -> String {
        String::new()
    }

    /// The best known decision vector, if the problem has one.
    fn best_known(&self) -> Option<Vec<f64>> {
        None
    }

    /// Whether `fitness` depends on an internal seed.
    fn is_stochastic(&self) -> bool {
        false
    }

    /// Reseeds a stochastic problem. Deterministic problems ignore it.
    fn set_seed(&mut self, _seed: u64) {}

    /// Stable tag used to dispatch snapshot restores.
    fn type_tag(&self) -> &'static str;

    /// The problem's own state as an ordered field sequence.
    fn snapshot_fields(&self) -> Vec<Field>;
}

/// Object-safe plumbing for [`UserProblem`], implemented for every
/// `Clone + 'static` problem.
pub trait ProblemBase {
    fn clone_box(&self) -> Box<dyn UserProblem>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> ProblemBase for T
where
    T: UserProblem + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn UserProblem> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A validated search box.
///
/// Both sequences have the same, non-zero, length; every entry is finite,
/// `lower[i] <= upper[i]`, and every width `upper[i] - lower[i]` is finite.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds from a lower and an upper sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sequences are empty, differ in length,
    /// contain non-finite values, if some `lower[i] > upper[i]`, or if some
    /// width `upper[i] - lower[i]` overflows to infinity.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.is_empty() {
            return Err(invalid_argument("bounds must have at least one dimension"));
        }
        if lower.len() != upper.len() {
            return Err(invalid_argument(format!(
                "lower bounds have length {} but upper bounds have length {}",
                lower.len(),
                upper.len()
            )));
        }
        for (i, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(invalid_argument(format!(
                    "bounds of variable {} are not finite: [{}, {}]",
                    i, lo, hi
                )));
            }
            if lo > hi {
                return Err(invalid_argument(format!(
                    "lower bound {} exceeds upper bound {} for variable {}",
                    lo, hi, i
                )));
            }
            if !(hi - lo).is_finite() {
                return Err(invalid_argument(format!(
                    "width of variable {} overflows: [{}, {}]",
                    i, lo, hi
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Whether every coordinate of `x` lies within the box.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dimension()
            && x
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

/// Type-erased problem with an evaluation counter.
///
/// Bounds and objective count are read from the concrete problem once and
/// validated at construction, so a degenerate problem fails here instead of at
/// first use.
pub struct Problem {
    inner: Box<dyn UserProblem>,
    bounds: Bounds,
    nobj: usize,
    fevals: u64,
}

impl Problem {
    /// Wraps a concrete problem.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the problem's bounds are invalid or it
    /// declares zero objectives.
    pub fn new<T: UserProblem + 'static>(problem: T) -> Result<Self> {
        Self::from_boxed(Box::new(problem))
    }

    /// Wraps an already boxed concrete problem.
    pub fn from_boxed(inner: Box<dyn UserProblem>) -> Result<Self> {
        let (lower, upper) = inner.bounds();
        let bounds = Bounds::new(lower, upper)?;
        let nobj = inner.nobj();
        if nobj == 0 {
            return Err(invalid_argument(format!(
                "problem '{}' declares zero objectives",
                inner.name()
            )));
        }
        Ok(Self {
            inner,
            bounds,
            nobj,
            fevals: 0,
        })
    }

    /// Evaluates `x` and increments the evaluation counter.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `x` does not have the problem's dimension.
    /// - `InvalidArgument` if the concrete problem returns the wrong number of
    ///   objectives or a NaN.
    pub fn fitness(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.get_dimension() {
            return Err(OptimizationError::DimensionMismatch {
                expected: self.get_dimension(),
                found: x.len(),
            });
        }
        let f = self.inner.fitness(x);
        self.fevals += 1;
        if f.len() != self.nobj {
            return Err(invalid_argument(format!(
                "problem '{}' returned {} objective(s), {} expected",
                self.inner.name(),
                f.len(),
                self.nobj
            )));
        }
        if f.iter().any(|v| v.is_nan()) {
            return Err(invalid_argument(format!(
                "problem '{}' returned a NaN fitness",
                self.inner.name()
            )));
        }
        Ok(f)
    }

    pub fn get_bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn get_dimension(&self) -> usize {
        self.bounds.dimension()
    }

    pub fn get_nobj(&self) -> usize {
        self.nobj
    }

    pub fn get_name(&self) -> String {
        self.inner.name()
    }

    pub fn get_extra_info(&self) -> String {
        self.inner.extra_info()
    }

    /// Number of `fitness` calls made through this wrapper.
    pub fn get_fevals(&self) -> u64 {
        self.fevals
    }

    pub fn best_known(&self) -> Option<Vec<f64>> {
        self.inner.best_known()
    }

    pub fn is_stochastic(&self) -> bool {
        self.inner.is_stochastic()
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.inner.set_seed(seed);
    }

    pub fn type_tag(&self) -> &'static str {
        self.inner.type_tag()
    }

    /// Returns the concrete problem if it has type `T`.
    pub fn extract<T: UserProblem + 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    pub fn is<T: UserProblem + 'static>(&self) -> bool {
        self.extract::<T>().is_some()
    }

    pub fn snapshot(&self) -> ProblemSnapshot {
        ProblemSnapshot {
            tag: self.type_tag().to_string(),
            fields: self.inner.snapshot_fields(),
            fevals: self.fevals,
        }
    }

    pub(crate) fn with_fevals(mut self, fevals: u64) -> Self {
        self.fevals = fevals;
        self
    }
}

impl Clone for Problem {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
            bounds: self.bounds.clone(),
            nobj: self.nobj,
            fevals: self.fevals,
        }
    }
}

impl Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("inner", &self.inner)
            .field("fevals", &self.fevals)
            .finish()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem name: {}", self.get_name())?;
        writeln!(f, "\tGlobal dimension: {}", self.get_dimension())?;
        writeln!(f, "\tFitness dimension: {}", self.nobj)?;
        writeln!(f, "\tLower bounds: {:?}", self.bounds.lower())?;
        writeln!(f, "\tUpper bounds: {:?}", self.bounds.upper())?;
        writeln!(f, "\tFitness evaluations: {}", self.fevals)?;
        writeln!(
            f,
            "\tStochastic: {}",
            if self.is_stochastic() { "yes" } else { "no" }
        )?;
        let extra = self.get_extra_info();
        if !extra.is_empty() {
            writeln!(f, "\nExtra info:{}", extra)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct BrokenBounds;

    impl UserProblem for BrokenBounds {
        fn fitness(&self, _x: &[f64]) -> Vec<f64> {
            vec![0.0]
        }

        fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
            (vec![1.0, 0.0], vec![0.0, 1.0])
        }

        fn name(&self) -> String {
            "Broken".to_string()
        }

        fn type_tag(&self) -> &'static str {
            "broken"
        }

        fn snapshot_fields(&self) -> Vec<Field> {
            Vec::new()
        }
    }

    #[derive(Clone, Debug)]
    struct WrongObjectives;

    impl UserProblem for WrongObjectives {
        fn fitness(&self, _x: &[f64]) -> Vec<f64> {
            vec![0.0, 1.0]
        }

        fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
            (vec![0.0], vec![1.0])
        }

        fn name(&self) -> String {
            "Wrong".to_string()
        }

        fn type_tag(&self) -> &'static str {
            "wrong"
        }

        fn snapshot_fields(&self) -> Vec<Field> {
            Vec::new()
        }
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(vec![0.0, -1.0], vec![1.0, 1.0]).is_ok());
        assert!(Bounds::new(vec![], vec![]).is_err());
        assert!(Bounds::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(Bounds::new(vec![2.0], vec![1.0]).is_err());
        assert!(Bounds::new(vec![f64::NEG_INFINITY], vec![1.0]).is_err());
        // Degenerate but valid
        assert!(Bounds::new(vec![1.0], vec![1.0]).is_ok());
    }

    #[test]
    fn test_bounds_reject_overflowing_width() {
        match Bounds::new(vec![0.0, -f64::MAX], vec![1.0, f64::MAX]) {
            Err(OptimizationError::InvalidArgument(msg)) => assert!(msg.contains("variable 1")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert!(Bounds::new(vec![-f64::MAX / 2.0], vec![f64::MAX / 2.0]).is_ok());
    }

    #[test]
    fn test_overflowing_problem_bounds_fail_at_construction() {
        #[derive(Clone, Debug)]
        struct Unbounded;

        impl UserProblem for Unbounded {
            fn fitness(&self, x: &[f64]) -> Vec<f64> {
                vec![x[0].abs()]
            }

            fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
                (vec![-f64::MAX], vec![f64::MAX])
            }

            fn name(&self) -> String {
                "Unbounded".to_string()
            }

            fn type_tag(&self) -> &'static str {
                "unbounded"
            }

            fn snapshot_fields(&self) -> Vec<Field> {
                Vec::new()
            }
        }

        assert!(matches!(
            Problem::new(Unbounded),
            Err(OptimizationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(vec![-1.0, 0.0], vec![1.0, 2.0]).unwrap();
        assert!(bounds.contains(&[-1.0, 2.0]));
        assert!(!bounds.contains(&[-1.5, 1.0]));
        assert!(!bounds.contains(&[0.0]));
    }

    #[test]
    fn test_invalid_bounds_fail_at_construction() {
        assert!(matches!(
            Problem::new(BrokenBounds),
            Err(OptimizationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fitness_checks_dimension() {
        let mut problem = Problem::new(Rosenbrock::new(4).unwrap()).unwrap();
        assert_eq!(
            problem.fitness(&[1.0, 1.0]),
            Err(OptimizationError::DimensionMismatch {
                expected: 4,
                found: 2
            })
        );
        assert_eq!(problem.get_fevals(), 0);
    }

    #[test]
    fn test_fitness_checks_objective_count() {
        let mut problem = Problem::new(WrongObjectives).unwrap();
        assert!(matches!(
            problem.fitness(&[0.5]),
            Err(OptimizationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fitness_rejects_nan() {
        #[derive(Clone, Debug)]
        struct Undefined;

        impl UserProblem for Undefined {
            fn fitness(&self, _x: &[f64]) -> Vec<f64> {
                vec![f64::NAN]
            }

            fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
                (vec![0.0], vec![1.0])
            }

            fn name(&self) -> String {
                "Undefined".to_string()
            }

            fn type_tag(&self) -> &'static str {
                "undefined"
            }

            fn snapshot_fields(&self) -> Vec<Field> {
                Vec::new()
            }
        }

        let mut problem = Problem::new(Undefined).unwrap();
        match problem.fitness(&[0.5]) {
            Err(OptimizationError::InvalidArgument(msg)) => assert!(msg.contains("NaN")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert_eq!(problem.get_fevals(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut problem = Problem::new(Rosenbrock::new(2).unwrap()).unwrap();
        let copy = problem.clone();
        problem.fitness(&[0.0, 0.0]).unwrap();
        assert_eq!(problem.get_fevals(), 1);
        assert_eq!(copy.get_fevals(), 0);
    }

    #[test]
    fn test_extract() {
        let problem = Problem::new(Rosenbrock::new(5).unwrap()).unwrap();
        assert!(problem.is::<Rosenbrock>());
        assert!(!problem.is::<Inventory>());
        assert_eq!(problem.extract::<Rosenbrock>().unwrap().dimension(), 5);
    }

    #[test]
    fn test_display_mentions_name_and_dimension() {
        let problem = Problem::new(Rosenbrock::new(3).unwrap()).unwrap();
        let text = problem.to_string();
        assert!(text.contains("Multidimensional Rosenbrock Function"));
        assert!(text.contains("Global dimension: 3"));
    }
}
