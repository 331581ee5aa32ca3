pub mod algorithm;
pub mod error;
pub mod mutation;
pub mod population;
pub mod problem;
pub mod registry;
pub mod rng;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use algorithm::{Algorithm, NullAlgorithm, Sea, SeaLogLine, SeaOptions, UserAlgorithm};
pub use error::{OptimizationError, OptionExt, Result};
pub use population::{Individual, Population};
pub use problem::{Bounds, Inventory, Problem, Rosenbrock, UserProblem};
pub use registry::Registry;
