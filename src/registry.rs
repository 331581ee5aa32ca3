//! # Registry
//!
//! Resolves snapshot type tags to restore functions, so a snapshot of any
//! registered problem or algorithm can be turned back into a live value.
//!
//! ```rust
//! use seaopt::population::Population;
//! use seaopt::problem::{Problem, Rosenbrock};
//! use seaopt::registry::Registry;
//!
//! let problem = Problem::new(Rosenbrock::new(4).unwrap()).unwrap();
//! let population = Population::new(problem, 3, 1).unwrap();
//!
//! let registry = Registry::with_builtins();
//! let restored = Population::restore(&population.snapshot(), &registry).unwrap();
//! assert_eq!(restored.snapshot(), population.snapshot());
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::algorithm::{Algorithm, NullAlgorithm, Sea, UserAlgorithm};
use crate::error::{OptimizationError, Result};
use crate::problem::{Inventory, Problem, Rosenbrock, UserProblem};
use crate::snapshot::{AlgorithmSnapshot, FieldReader, ProblemSnapshot};

/// Rebuilds a concrete problem from its fields.
pub type ProblemRestoreFn = fn(&mut FieldReader<'_>) -> Result<Box<dyn UserProblem>>;

/// Rebuilds a concrete algorithm from its fields.
pub type AlgorithmRestoreFn = fn(&mut FieldReader<'_>) -> Result<Box<dyn UserAlgorithm>>;

/// Tag-to-constructor tables for problems and algorithms.
#[derive(Clone, Default)]
pub struct Registry {
    problems: HashMap<String, ProblemRestoreFn>,
    algorithms: HashMap<String, AlgorithmRestoreFn>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut problems: Vec<&String> = self.problems.keys().collect();
        let mut algorithms: Vec<&String> = self.algorithms.keys().collect();
        problems.sort();
        algorithms.sort();
        f.debug_struct("Registry")
            .field("problems", &problems)
            .field("algorithms", &algorithms)
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that knows every problem and algorithm of this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_problem(Rosenbrock::TAG, Rosenbrock::restore);
        registry.register_problem(Inventory::TAG, Inventory::restore);
        registry.register_algorithm(Sea::TAG, Sea::restore);
        registry.register_algorithm(NullAlgorithm::TAG, NullAlgorithm::restore);
        registry
    }

    /// Registers a problem type, replacing any previous entry with the same tag.
    pub fn register_problem(&mut self, tag: &str, restore: ProblemRestoreFn) {
        self.problems.insert(tag.to_string(), restore);
    }

    /// Registers an algorithm type, replacing any previous entry with the same tag.
    pub fn register_algorithm(&mut self, tag: &str, restore: AlgorithmRestoreFn) {
        self.algorithms.insert(tag.to_string(), restore);
    }

    pub fn contains_problem(&self, tag: &str) -> bool {
        self.problems.contains_key(tag)
    }

    pub fn contains_algorithm(&self, tag: &str) -> bool {
        self.algorithms.contains_key(tag)
    }

    /// Restores a problem, including its evaluation counter.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if the tag is unknown or the fields are malformed,
    /// and propagates construction errors of the concrete problem.
    pub fn restore_problem(&self, snapshot: &ProblemSnapshot) -> Result<Problem> {
        let restore = self.problems.get(&snapshot.tag).ok_or_else(|| {
            warn!(tag = %snapshot.tag, "unknown problem tag in snapshot");
            OptimizationError::Snapshot(format!("unknown problem type '{}'", snapshot.tag))
        })?;
        let mut reader = FieldReader::new(&snapshot.tag, &snapshot.fields);
        let inner = restore(&mut reader)?;
        reader.finish()?;
        Ok(Problem::from_boxed(inner)?.with_fevals(snapshot.fevals))
    }

    /// Restores an algorithm, including its random stream and log.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if the tag is unknown or the fields are malformed.
    pub fn restore_algorithm(&self, snapshot: &AlgorithmSnapshot) -> Result<Algorithm> {
        let restore = self.algorithms.get(&snapshot.tag).ok_or_else(|| {
            warn!(tag = %snapshot.tag, "unknown algorithm tag in snapshot");
            OptimizationError::Snapshot(format!("unknown algorithm type '{}'", snapshot.tag))
        })?;
        let mut reader = FieldReader::new(&snapshot.tag, &snapshot.fields);
        let inner = restore(&mut reader)?;
        reader.finish()?;
        Ok(Algorithm::from_boxed(inner))
    }
}
