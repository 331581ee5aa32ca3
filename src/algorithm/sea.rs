//! # Simple Evolutionary Algorithm
//!
//! A generational loop with per-slot greedy acceptance. Each generation, every
//! individual produces one mutant (Gaussian perturbation of about one
//! coordinate, reflected into the bounds); the mutant replaces its parent only
//! if its fitness is strictly lower. The mutation step adapts after each
//! generation by the one-fifth success rule.
//!
//! All mutation and reseeding decisions draw from the algorithm's own stream,
//! seeded at construction. Together with the population's seed this fully
//! determines a run, for stochastic problems too: before each generation a
//! stochastic problem is reseeded from the algorithm's stream and the whole
//! population is re-evaluated.

use tracing::{debug, info, trace};

use crate::error::{invalid_argument, OptimizationError, Result};
use crate::mutation;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::snapshot::{Field, FieldReader};

use super::options::SeaOptions;
use super::UserAlgorithm;

const SUCCESS_TARGET: f64 = 0.2;
const SIGMA_FACTOR: f64 = 1.5;
/// Generation, fevals, then the real columns packed in one field.
const FIELDS_PER_LOG_LINE: usize = 3;

/// One log entry, recorded every `verbosity` generations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeaLogLine {
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Fitness evaluations made so far in this `evolve` call.
    pub fevals: u64,
    /// Champion fitness after the generation.
    pub best: f64,
    /// Drop in champion fitness since the previous entry (or since the start
    /// of the call for the first entry).
    pub improvement: f64,
    /// Mutation step after this generation's adaptation.
    pub sigma: f64,
}

/// The simple evolutionary algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Sea {
    options: SeaOptions,
    seed: u64,
    rng: RandomNumberGenerator,
    log: Vec<SeaLogLine>,
}

impl Sea {
    pub const TAG: &'static str = "sea";

    /// Creates the algorithm with default options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `generations` is 0.
    pub fn new(generations: u32, seed: u64) -> Result<Self> {
        Ok(Self::with_options(SeaOptions::new(generations)?, seed))
    }

    pub fn with_options(options: SeaOptions, seed: u64) -> Self {
        Self {
            options,
            seed,
            rng: RandomNumberGenerator::from_seed(seed),
            log: Vec::new(),
        }
    }

    pub fn get_gen(&self) -> u32 {
        self.options.get_generations()
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    /// Reseeds the private random stream.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = RandomNumberGenerator::from_seed(seed);
    }

    pub fn get_verbosity(&self) -> u32 {
        self.options.get_verbosity()
    }

    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.options.set_verbosity(verbosity);
    }

    pub fn get_options(&self) -> &SeaOptions {
        &self.options
    }

    /// Log of the most recent `evolve` call; empty before the first call.
    pub fn get_log(&self) -> &[SeaLogLine] {
        &self.log
    }

    pub(crate) fn restore(reader: &mut FieldReader<'_>) -> Result<Box<dyn UserAlgorithm>> {
        let generations = reader.next_u32("generations")?;
        let verbosity = reader.next_u32("verbosity")?;
        let initial_sigma = reader.next_real("initial_sigma")?;
        let sigma_min = reader.next_real("sigma_min")?;
        let sigma_max = reader.next_real("sigma_max")?;
        let options = SeaOptions::builder()
            .generations(generations)
            .verbosity(verbosity)
            .initial_sigma(initial_sigma)
            .sigma_bounds(sigma_min, sigma_max)
            .build()
            .map_err(|e| OptimizationError::Snapshot(format!("sea: {}", e)))?;
        let seed = reader.next_uint("seed")?;
        let stream = reader.next_stream("rng")?;
        let entries = reader.next_usize("log_length")?;
        if entries.checked_mul(FIELDS_PER_LOG_LINE) != Some(reader.remaining()) {
            return Err(OptimizationError::Snapshot(format!(
                "sea: log of {} line(s) does not match the {} remaining field(s)",
                entries,
                reader.remaining()
            )));
        }

        let mut log = Vec::with_capacity(entries);
        for _ in 0..entries {
            let generation = reader.next_u32("generation")?;
            let fevals = reader.next_uint("fevals")?;
            let reals = reader.next_reals("reals")?;
            let [best, improvement, sigma] = reals[..] else {
                return Err(OptimizationError::Snapshot(format!(
                    "sea: log line holds {} real(s), 3 expected",
                    reals.len()
                )));
            };
            log.push(SeaLogLine {
                generation,
                fevals,
                best,
                improvement,
                sigma,
            });
        }

        Ok(Box::new(Self {
            options,
            seed,
            rng: RandomNumberGenerator::from_state(&stream),
            log,
        }))
    }

    fn adapt_sigma(&self, sigma: f64, successes: usize, trials: usize) -> f64 {
        let (sigma_min, sigma_max) = self.options.get_sigma_bounds();
        let ratio = successes as f64 / trials as f64;
        let adapted = if ratio > SUCCESS_TARGET {
            sigma * SIGMA_FACTOR
        } else if ratio < SUCCESS_TARGET {
            sigma / SIGMA_FACTOR
        } else {
            sigma
        };
        adapted.clamp(sigma_min, sigma_max)
    }
}

impl UserAlgorithm for Sea {
    fn evolve(&mut self, population: &Population) -> Result<Population> {
        if population.is_empty() {
            return Err(OptimizationError::EmptyPopulation);
        }
        population.require_single_objective()?;
        if self.options.get_generations() == 0 {
            return Err(invalid_argument("the number of generations must be at least 1"));
        }

        let mut pop = population.clone();
        let bounds = pop.get_problem().get_bounds().clone();
        let fevals_start = pop.get_problem().get_fevals();
        let verbosity = self.options.get_verbosity();
        let mut sigma = self.options.get_initial_sigma();
        let mut last_best = pop.champion_fitness()?[0];
        let mut log = Vec::new();

        for generation in 1..=self.options.get_generations() {
            if pop.get_problem().is_stochastic() {
                let problem_seed = self.rng.next_seed();
                pop.reseed_problem(problem_seed)?;
            }

            let mut successes = 0;
            for slot in 0..pop.size() {
                let incumbent = &pop.individuals()[slot];
                let incumbent_f = incumbent.fitness_vector()[0];
                let mut candidate = incumbent.decision_vector().to_vec();
                mutation::mutate_coordinates(&mut candidate, sigma, &bounds, &mut self.rng);

                let f = pop.evaluate(&candidate)?;
                if f[0] < incumbent_f {
                    trace!(generation, slot, from = incumbent_f, to = f[0], "improvement accepted");
                    pop.replace_evaluated(slot, candidate, f);
                    successes += 1;
                }
            }
            sigma = self.adapt_sigma(sigma, successes, pop.size());

            if verbosity > 0 && generation % verbosity == 0 {
                let best = pop.champion_fitness()?[0];
                let line = SeaLogLine {
                    generation,
                    fevals: pop.get_problem().get_fevals() - fevals_start,
                    best,
                    improvement: last_best - best,
                    sigma,
                };
                debug!(
                    generation = line.generation,
                    fevals = line.fevals,
                    best = line.best,
                    improvement = line.improvement,
                    sigma = line.sigma,
                    "sea generation"
                );
                log.push(line);
                last_best = best;
            }
        }

        info!(
            generations = self.options.get_generations(),
            fevals = pop.get_problem().get_fevals() - fevals_start,
            best = pop.champion_fitness()?[0],
            "sea evolution finished"
        );
        self.log = log;
        Ok(pop)
    }

    fn name(&self) -> String {
        "SEA: Simple Evolutionary Algorithm".to_string()
    }

    fn extra_info(&self) -> String {
        let (sigma_min, sigma_max) = self.options.get_sigma_bounds();
        format!(
            "\tGenerations: {}\n\tVerbosity: {}\n\tSeed: {}\n\tInitial sigma: {}\n\tSigma bounds: [{}, {}]",
            self.options.get_generations(),
            self.options.get_verbosity(),
            self.seed,
            self.options.get_initial_sigma(),
            sigma_min,
            sigma_max
        )
    }

    fn set_seed(&mut self, seed: u64) {
        Sea::set_seed(self, seed);
    }

    fn set_verbosity(&mut self, verbosity: u32) {
        Sea::set_verbosity(self, verbosity);
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn snapshot_fields(&self) -> Vec<Field> {
        let (sigma_min, sigma_max) = self.options.get_sigma_bounds();
        let mut fields = vec![
            Field::UInt(self.options.get_generations() as u64),
            Field::UInt(self.options.get_verbosity() as u64),
            Field::Real(self.options.get_initial_sigma()),
            Field::Real(sigma_min),
            Field::Real(sigma_max),
            Field::UInt(self.seed),
            Field::Stream(self.rng.state()),
            Field::UInt(self.log.len() as u64),
        ];
        for line in &self.log {
            fields.extend([
                Field::UInt(line.generation as u64),
                Field::UInt(line.fevals),
                Field::Reals(vec![line.best, line.improvement, line.sigma]),
            ]);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Problem, Rosenbrock};

    fn population(dim: usize, size: usize, seed: u64) -> Population {
        let problem = Problem::new(Rosenbrock::new(dim).unwrap()).unwrap();
        Population::new(problem, size, seed).unwrap()
    }

    #[test]
    fn test_construction() {
        let sea = Sea::new(1234, 42).unwrap();
        assert_eq!(sea.get_gen(), 1234);
        assert_eq!(sea.get_verbosity(), 0);
        assert_eq!(sea.get_seed(), 42);
        assert!(sea.get_log().is_empty());
    }

    #[test]
    fn test_zero_generations_rejected() {
        assert!(matches!(
            Sea::new(0, 42),
            Err(OptimizationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_evolve_leaves_input_untouched() {
        let pop = population(5, 4, 1);
        let before = pop.snapshot();
        let mut sea = Sea::new(20, 7).unwrap();
        let evolved = sea.evolve(&pop).unwrap();
        assert_eq!(pop.snapshot(), before);
        assert_eq!(evolved.size(), pop.size());
        assert_eq!(evolved.get_problem().get_fevals(), 4 + 20 * 4);
    }

    #[test]
    fn test_no_log_without_verbosity() {
        let mut sea = Sea::new(10, 7).unwrap();
        sea.evolve(&population(3, 4, 1)).unwrap();
        assert!(sea.get_log().is_empty());
    }

    #[test]
    fn test_log_frequency() {
        let mut sea = Sea::new(10, 7).unwrap();
        sea.set_verbosity(3);
        sea.evolve(&population(3, 4, 1)).unwrap();
        let generations: Vec<u32> = sea.get_log().iter().map(|l| l.generation).collect();
        assert_eq!(generations, vec![3, 6, 9]);
        assert_eq!(sea.get_log()[0].fevals, 12);
        assert_eq!(sea.get_log()[2].fevals, 36);
    }

    #[test]
    fn test_log_is_replaced_each_call() {
        let mut sea = Sea::new(5, 7).unwrap();
        sea.set_verbosity(1);
        let pop = sea.evolve(&population(3, 4, 1)).unwrap();
        assert_eq!(sea.get_log().len(), 5);
        sea.evolve(&pop).unwrap();
        assert_eq!(sea.get_log().len(), 5);
        assert_eq!(sea.get_log()[0].generation, 1);
        assert_eq!(sea.get_log()[0].fevals, 4);
    }

    #[test]
    fn test_improvements_add_up() {
        let pop = population(6, 5, 3);
        let start = pop.champion_fitness().unwrap()[0];
        let mut sea = Sea::new(30, 3).unwrap();
        sea.set_verbosity(1);
        let evolved = sea.evolve(&pop).unwrap();

        let log = sea.get_log();
        let mut previous = start;
        for line in log {
            assert_eq!(line.improvement, previous - line.best);
            assert!(line.improvement >= 0.0);
            previous = line.best;
        }
        assert_eq!(log.last().unwrap().best, evolved.champion_fitness().unwrap()[0]);
    }

    #[test]
    fn test_sigma_stays_within_bounds() {
        let options = SeaOptions::builder()
            .generations(50)
            .verbosity(1)
            .initial_sigma(0.05)
            .sigma_bounds(0.01, 0.2)
            .build()
            .unwrap();
        let mut sea = Sea::with_options(options, 5);
        sea.evolve(&population(4, 6, 5)).unwrap();
        for line in sea.get_log() {
            assert!((0.01..=0.2).contains(&line.sigma));
        }
    }

    #[test]
    fn test_adapt_sigma_one_fifth_rule() {
        let sea = Sea::new(1, 1).unwrap();
        assert_eq!(sea.adapt_sigma(0.1, 5, 10), 0.1 * SIGMA_FACTOR);
        assert_eq!(sea.adapt_sigma(0.1, 0, 10), 0.1 / SIGMA_FACTOR);
        assert_eq!(sea.adapt_sigma(0.1, 2, 10), 0.1);
        assert_eq!(sea.adapt_sigma(0.9, 10, 10), 1.0);
    }

    #[test]
    fn test_empty_population_rejected() {
        let mut sea = Sea::new(3, 1).unwrap();
        assert_eq!(
            sea.evolve(&population(3, 0, 1)).err(),
            Some(OptimizationError::EmptyPopulation)
        );
    }

    #[test]
    fn test_set_seed_restarts_stream() {
        let pop = population(4, 4, 2);
        let mut sea1 = Sea::new(10, 1).unwrap();
        sea1.set_verbosity(1);
        sea1.evolve(&pop).unwrap();
        sea1.set_seed(1);
        sea1.evolve(&pop).unwrap();

        let mut sea2 = Sea::new(10, 1).unwrap();
        sea2.set_verbosity(1);
        sea2.evolve(&pop).unwrap();

        assert_eq!(sea1.get_log(), sea2.get_log());
    }
}
