//! # SeaOptions
//!
//! Configuration of the simple evolutionary algorithm: how many generations
//! to run, how often to log, and how the Gaussian mutation step is sized.
//!
//! ## Example
//!
//! ```rust
//! use seaopt::algorithm::options::SeaOptions;
//!
//! // Shorthand with defaults for everything but the generation count
//! let options = SeaOptions::new(100).unwrap();
//! assert_eq!(options.get_verbosity(), 0);
//!
//! // Builder with validation
//! let options = SeaOptions::builder()
//!     .generations(200)
//!     .verbosity(10)
//!     .initial_sigma(0.25)
//!     .sigma_bounds(1e-4, 0.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.get_generations(), 200);
//!
//! assert!(SeaOptions::builder().generations(0).build().is_err());
//! ```
//!
//! ## Fields
//!
//! - `generations`: number of perturb-evaluate-select cycles per `evolve` call (>= 1).
//! - `verbosity`: a log entry is recorded every `verbosity` generations; 0 disables the log.
//! - `initial_sigma`: Gaussian step as a fraction of each variable's bound width, in (0, 1].
//! - `sigma_bounds`: range the adaptive step is clamped to, `0 < min <= max <= 1`.

use crate::error::{invalid_argument, Result};

const DEFAULT_GENERATIONS: u32 = 1;
const DEFAULT_VERBOSITY: u32 = 0;
const DEFAULT_INITIAL_SIGMA: f64 = 0.1;
const DEFAULT_SIGMA_MIN: f64 = 1e-6;
const DEFAULT_SIGMA_MAX: f64 = 1.0;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SeaOptions {
    generations: u32,
    verbosity: u32,
    initial_sigma: f64,
    sigma_min: f64,
    sigma_max: f64,
}

impl SeaOptions {
    /// Creates options for `generations` generations with every other knob at
    /// its default.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `generations` is 0.
    pub fn new(generations: u32) -> Result<Self> {
        Self::builder().generations(generations).build()
    }

    pub fn get_generations(&self) -> u32 {
        self.generations
    }

    pub fn get_verbosity(&self) -> u32 {
        self.verbosity
    }

    pub fn get_initial_sigma(&self) -> f64 {
        self.initial_sigma
    }

    /// Returns `(min, max)` of the adaptive step.
    pub fn get_sigma_bounds(&self) -> (f64, f64) {
        (self.sigma_min, self.sigma_max)
    }

    /// Sets the log frequency. Any value is valid; 0 disables the log.
    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.verbosity = verbosity;
    }

    /// Returns a builder for creating a `SeaOptions` instance.
    pub fn builder() -> SeaOptionsBuilder {
        SeaOptionsBuilder::default()
    }
}

impl Default for SeaOptions {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            verbosity: DEFAULT_VERBOSITY,
            initial_sigma: DEFAULT_INITIAL_SIGMA,
            sigma_min: DEFAULT_SIGMA_MIN,
            sigma_max: DEFAULT_SIGMA_MAX,
        }
    }
}

/// Builder for `SeaOptions`.
///
/// Provides a fluent interface; every field is validated in [`SeaOptionsBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct SeaOptionsBuilder {
    generations: Option<u32>,
    verbosity: Option<u32>,
    initial_sigma: Option<f64>,
    sigma_bounds: Option<(f64, f64)>,
}

impl SeaOptionsBuilder {
    /// Sets the number of generations.
    pub fn generations(mut self, value: u32) -> Self {
        self.generations = Some(value);
        self
    }

    /// Sets the log frequency.
    pub fn verbosity(mut self, value: u32) -> Self {
        self.verbosity = Some(value);
        self
    }

    /// Sets the initial Gaussian step, relative to the bound width.
    pub fn initial_sigma(mut self, value: f64) -> Self {
        self.initial_sigma = Some(value);
        self
    }

    /// Sets the range of the adaptive step.
    pub fn sigma_bounds(mut self, min: f64, max: f64) -> Self {
        self.sigma_bounds = Some((min, max));
        self
    }

    /// Builds the `SeaOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if generations is 0, if the sigma range is
    /// not `0 < min <= max <= 1`, or if the initial sigma lies outside it.
    pub fn build(self) -> Result<SeaOptions> {
        let generations = self.generations.unwrap_or(DEFAULT_GENERATIONS);
        let verbosity = self.verbosity.unwrap_or(DEFAULT_VERBOSITY);
        let initial_sigma = self.initial_sigma.unwrap_or(DEFAULT_INITIAL_SIGMA);
        let (sigma_min, sigma_max) = self
            .sigma_bounds
            .unwrap_or((DEFAULT_SIGMA_MIN, DEFAULT_SIGMA_MAX));

        if generations == 0 {
            return Err(invalid_argument("the number of generations must be at least 1"));
        }
        if !(sigma_min > 0.0 && sigma_min <= sigma_max && sigma_max <= 1.0) {
            return Err(invalid_argument(format!(
                "sigma bounds must satisfy 0 < min <= max <= 1, got [{}, {}]",
                sigma_min, sigma_max
            )));
        }
        if !(sigma_min..=sigma_max).contains(&initial_sigma) {
            return Err(invalid_argument(format!(
                "initial sigma {} lies outside [{}, {}]",
                initial_sigma, sigma_min, sigma_max
            )));
        }

        Ok(SeaOptions {
            generations,
            verbosity,
            initial_sigma,
            sigma_min,
            sigma_max,
        })
    }
}
