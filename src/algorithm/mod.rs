//! # Algorithms
//!
//! An algorithm turns one population into an improved one. Concrete search
//! strategies implement [`UserAlgorithm`]; callers hold the type-erased
//! [`Algorithm`] wrapper and reach a concrete strategy's specifics (such as the
//! SEA log) through [`Algorithm::extract`].
//!
//! `evolve` takes the population by reference and returns a new value: the
//! caller's population is never modified.
//!
//! ## Example
//!
//! ```rust
//! use seaopt::algorithm::{Algorithm, Sea};
//! use seaopt::population::Population;
//! use seaopt::problem::{Problem, Rosenbrock};
//!
//! let problem = Problem::new(Rosenbrock::new(25).unwrap()).unwrap();
//! let population = Population::new(problem, 5, 23).unwrap();
//!
//! let mut algorithm = Algorithm::new(Sea::new(10, 23).unwrap());
//! algorithm.set_verbosity(1);
//! let evolved = algorithm.evolve(&population).unwrap();
//!
//! let log = algorithm.extract::<Sea>().unwrap().get_log();
//! assert_eq!(log.len(), 10);
//! assert!(evolved.champion_fitness().unwrap() <= population.champion_fitness().unwrap());
//! ```

pub mod null;
pub mod options;
pub mod sea;

use std::any::Any;
use std::fmt::{self, Debug};

use crate::error::Result;
use crate::population::Population;
use crate::snapshot::{AlgorithmSnapshot, Field};

pub use null::NullAlgorithm;
pub use options::{SeaOptions, SeaOptionsBuilder};
pub use sea::{Sea, SeaLogLine};

/// The capability set of a concrete search strategy.
///
/// Types implementing this trait must also implement `Clone`, which provides
/// the [`AlgorithmBase`] plumbing automatically.
pub trait UserAlgorithm: AlgorithmBase + Debug + Send + Sync {
    /// Produces a new population from `population`, leaving the input untouched.
    fn evolve(&mut self, population: &Population) -> Result<Population>;

    fn name(&self) -> String;

    fn extra_info(&self) -> String {
        String::new()
    }

    /// Reseeds the algorithm's private random stream, if it has one.
    fn set_seed(&mut self, _seed: u64) {}

    /// Sets how often the algorithm records a log entry, if it keeps a log.
    fn set_verbosity(&mut self, _verbosity: u32) {}

    /// Stable tag used to dispatch snapshot restores.
    fn type_tag(&self) -> &'static str;

    /// The algorithm's own state as an ordered field sequence.
    fn snapshot_fields(&self) -> Vec<Field>;
}

/// Object-safe plumbing for [`UserAlgorithm`], implemented for every
/// `Clone + 'static` algorithm.
pub trait AlgorithmBase {
    fn clone_box(&self) -> Box<dyn UserAlgorithm>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> AlgorithmBase for T
where
    T: UserAlgorithm + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn UserAlgorithm> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Type-erased search strategy.
pub struct Algorithm {
    inner: Box<dyn UserAlgorithm>,
}

impl Algorithm {
    pub fn new<T: UserAlgorithm + 'static>(algorithm: T) -> Self {
        Self::from_boxed(Box::new(algorithm))
    }

    pub fn from_boxed(inner: Box<dyn UserAlgorithm>) -> Self {
        Self { inner }
    }

    /// Runs the wrapped strategy on a copy of `population`.
    pub fn evolve(&mut self, population: &Population) -> Result<Population> {
        self.inner.evolve(population)
    }

    pub fn get_name(&self) -> String {
        self.inner.name()
    }

    pub fn get_extra_info(&self) -> String {
        self.inner.extra_info()
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.inner.set_seed(seed);
    }

    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.inner.set_verbosity(verbosity);
    }

    pub fn type_tag(&self) -> &'static str {
        self.inner.type_tag()
    }

    /// Returns the concrete strategy if it has type `T`.
    pub fn extract<T: UserAlgorithm + 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    pub fn extract_mut<T: UserAlgorithm + 'static>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: UserAlgorithm + 'static>(&self) -> bool {
        self.extract::<T>().is_some()
    }

    pub fn snapshot(&self) -> AlgorithmSnapshot {
        AlgorithmSnapshot {
            tag: self.type_tag().to_string(),
            fields: self.inner.snapshot_fields(),
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::new(NullAlgorithm)
    }
}

impl Clone for Algorithm {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("inner", &self.inner)
            .finish()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm name: {}", self.get_name())?;
        let extra = self.get_extra_info();
        if !extra.is_empty() {
            writeln!(f, "\nExtra info:\n{}", extra)?;
        }
        Ok(())
    }
}
