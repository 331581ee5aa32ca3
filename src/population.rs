//! # Population
//!
//! A `Population` is a fixed-size, ordered collection of [`Individual`]s bound to
//! one [`Problem`], plus the population's own seeded random stream.
//!
//! Every individual's decision vector lies within the problem's bounds and its
//! fitness vector is the cached result of evaluating that decision vector. The
//! population keeps this invariant itself: decision vectors only enter through
//! construction or [`Population::set_individual`], both of which evaluate.
//!
//! ## Example
//!
//! ```rust
//! use seaopt::population::Population;
//! use seaopt::problem::{Problem, Rosenbrock};
//!
//! let problem = Problem::new(Rosenbrock::new(25).unwrap()).unwrap();
//! let population = Population::new(problem, 5, 23).unwrap();
//!
//! assert_eq!(population.size(), 5);
//! assert_eq!(population.get_problem().get_fevals(), 5);
//! let best = population.best_index().unwrap();
//! assert_eq!(
//!     population.champion_fitness().unwrap(),
//!     population.get_individual(best).unwrap().fitness_vector()
//! );
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{invalid_argument, OptimizationError, OptionExt, Result};
use crate::mutation;
use crate::problem::Problem;
use crate::registry::Registry;
use crate::rng::RandomNumberGenerator;
use crate::snapshot::PopulationSnapshot;

/// One candidate solution and its cached fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    decision_vector: Vec<f64>,
    fitness_vector: Vec<f64>,
}

impl Individual {
    pub fn decision_vector(&self) -> &[f64] {
        &self.decision_vector
    }

    pub fn fitness_vector(&self) -> &[f64] {
        &self.fitness_vector
    }
}

/// A fixed-size collection of evaluated individuals bound to a problem.
#[derive(Debug, Clone)]
pub struct Population {
    problem: Problem,
    individuals: Vec<Individual>,
    seed: u64,
    rng: RandomNumberGenerator,
}

impl Population {
    /// Draws `size` decision vectors uniformly within the problem's bounds and
    /// evaluates them.
    ///
    /// Identical `(problem, size, seed)` triples always yield bit-identical
    /// populations.
    ///
    /// # Errors
    ///
    /// Propagates any evaluation error from the problem.
    pub fn new(problem: Problem, size: usize, seed: u64) -> Result<Self> {
        let mut population = Self {
            problem,
            individuals: Vec::with_capacity(size),
            seed,
            rng: RandomNumberGenerator::from_seed(seed),
        };
        for _ in 0..size {
            let x = population.random_decision_vector();
            let f = population.problem.fitness(&x)?;
            population.individuals.push(Individual {
                decision_vector: x,
                fitness_vector: f,
            });
        }
        debug!(
            problem = %population.problem.get_name(),
            size,
            seed,
            "population initialized"
        );
        Ok(population)
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The seed the population's random stream was created from.
    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_problem(&self) -> &Problem {
        &self.problem
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `index >= size()`.
    pub fn get_individual(&self, index: usize) -> Result<&Individual> {
        self.individuals
            .get(index)
            .ok_or_else_opt(|| OptimizationError::OutOfRange {
                index,
                size: self.size(),
            })
    }

    pub fn decision_vectors(&self) -> Vec<Vec<f64>> {
        self.individuals
            .iter()
            .map(|ind| ind.decision_vector.clone())
            .collect()
    }

    pub fn fitness_vectors(&self) -> Vec<Vec<f64>> {
        self.individuals
            .iter()
            .map(|ind| ind.fitness_vector.clone())
            .collect()
    }

    /// Index of the individual with the lowest fitness, ties broken by lowest index.
    ///
    /// # Errors
    ///
    /// - `EmptyPopulation` if the population has no individuals.
    /// - `InvalidArgument` if the problem has more than one objective.
    pub fn best_index(&self) -> Result<usize> {
        self.extreme_index(|candidate, incumbent| candidate < incumbent)
    }

    /// Index of the individual with the highest fitness, ties broken by lowest index.
    ///
    /// # Errors
    ///
    /// Same as [`Population::best_index`].
    pub fn worst_index(&self) -> Result<usize> {
        self.extreme_index(|candidate, incumbent| candidate > incumbent)
    }

    fn extreme_index<F>(&self, replaces: F) -> Result<usize>
    where
        F: Fn(f64, f64) -> bool,
    {
        self.require_single_objective()?;
        let mut iter = self.individuals.iter().enumerate();
        let (mut index, first) = iter
            .next()
            .ok_or_else_opt(|| OptimizationError::EmptyPopulation)?;
        let mut value = first.fitness_vector[0];
        for (i, individual) in iter {
            if replaces(individual.fitness_vector[0], value) {
                index = i;
                value = individual.fitness_vector[0];
            }
        }
        Ok(index)
    }

    pub fn champion_fitness(&self) -> Result<Vec<f64>> {
        let best = self.best_index()?;
        Ok(self.individuals[best].fitness_vector.clone())
    }

    pub fn champion_decision_vector(&self) -> Result<Vec<f64>> {
        let best = self.best_index()?;
        Ok(self.individuals[best].decision_vector.clone())
    }

    /// Replaces the decision vector at `index` and re-evaluates it.
    ///
    /// Nothing is modified if any check or the evaluation fails.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `index >= size()`.
    /// - `DimensionMismatch` if `x` does not have the problem's dimension.
    /// - `InvalidArgument` if `x` lies outside the problem's bounds.
    pub fn set_individual(&mut self, index: usize, x: Vec<f64>) -> Result<()> {
        if index >= self.size() {
            return Err(OptimizationError::OutOfRange {
                index,
                size: self.size(),
            });
        }
        if x.len() != self.problem.get_dimension() {
            return Err(OptimizationError::DimensionMismatch {
                expected: self.problem.get_dimension(),
                found: x.len(),
            });
        }
        if !self.problem.get_bounds().contains(&x) {
            return Err(invalid_argument(format!(
                "decision vector for individual {} lies outside the problem bounds",
                index
            )));
        }
        let f = self.problem.fitness(&x)?;
        self.individuals[index] = Individual {
            decision_vector: x,
            fitness_vector: f,
        };
        Ok(())
    }

    /// Draws a decision vector uniformly within the bounds from the
    /// population's own random stream.
    pub fn random_decision_vector(&mut self) -> Vec<f64> {
        let bounds = self.problem.get_bounds();
        let mut x = bounds.lower().to_vec();
        for index in 0..x.len() {
            mutation::resample_uniform(&mut x, index, bounds, &mut self.rng);
        }
        x
    }

    /// Reseeds a stochastic problem and re-evaluates every individual against
    /// the new scenarios.
    pub fn reseed_problem(&mut self, seed: u64) -> Result<()> {
        let mut problem = self.problem.clone();
        problem.set_seed(seed);
        let fitness = self
            .individuals
            .iter()
            .map(|ind| problem.fitness(&ind.decision_vector))
            .collect::<Result<Vec<_>>>()?;
        for (individual, f) in self.individuals.iter_mut().zip(fitness) {
            individual.fitness_vector = f;
        }
        self.problem = problem;
        Ok(())
    }

    /// Evaluates `x` with the population's problem without storing it.
    pub(crate) fn evaluate(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        self.problem.fitness(x)
    }

    /// Stores an individual whose fitness was just computed by [`Population::evaluate`].
    pub(crate) fn replace_evaluated(&mut self, index: usize, x: Vec<f64>, f: Vec<f64>) {
        self.individuals[index] = Individual {
            decision_vector: x,
            fitness_vector: f,
        };
    }

    pub(crate) fn require_single_objective(&self) -> Result<()> {
        if self.problem.get_nobj() != 1 {
            return Err(invalid_argument(format!(
                "a single-objective problem is required, '{}' has {} objectives",
                self.problem.get_name(),
                self.problem.get_nobj()
            )));
        }
        Ok(())
    }

    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            problem: self.problem.snapshot(),
            individuals: self.individuals.clone(),
            seed: self.seed,
            rng: self.rng.state(),
        }
    }

    /// Rebuilds a population from a snapshot without re-evaluating it.
    ///
    /// # Errors
    ///
    /// - `Snapshot` if the problem tag is unknown or its fields are malformed.
    /// - `Snapshot` if an individual's vectors disagree with the problem's
    ///   dimension, objective count or bounds.
    pub fn restore(snapshot: &PopulationSnapshot, registry: &Registry) -> Result<Self> {
        let problem = registry.restore_problem(&snapshot.problem)?;
        for (i, individual) in snapshot.individuals.iter().enumerate() {
            if !problem.get_bounds().contains(&individual.decision_vector) {
                return Err(OptimizationError::Snapshot(format!(
                    "individual {} has an invalid decision vector",
                    i
                )));
            }
            if individual.fitness_vector.len() != problem.get_nobj() {
                return Err(OptimizationError::Snapshot(format!(
                    "individual {} has {} objective(s), {} expected",
                    i,
                    individual.fitness_vector.len(),
                    problem.get_nobj()
                )));
            }
        }
        Ok(Self {
            problem,
            individuals: snapshot.individuals.clone(),
            seed: snapshot.seed,
            rng: RandomNumberGenerator::from_state(&snapshot.rng),
        })
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.problem)?;
        writeln!(f, "\nPopulation size: {}", self.size())?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "\nList of individuals:")?;
        for (i, individual) in self.individuals.iter().enumerate() {
            writeln!(f, "#{}:", i)?;
            writeln!(f, "\tDecision vector: {:?}", individual.decision_vector)?;
            writeln!(f, "\tFitness vector: {:?}", individual.fitness_vector)?;
        }
        if let (Ok(x), Ok(fit)) = (self.champion_decision_vector(), self.champion_fitness()) {
            writeln!(f, "\nChampion decision vector: {:?}", x)?;
            writeln!(f, "Champion fitness: {:?}", fit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Inventory, Rosenbrock};

    fn rosenbrock(dim: usize) -> Problem {
        Problem::new(Rosenbrock::new(dim).unwrap()).unwrap()
    }

    #[test]
    fn test_construction_is_deterministic() {
        let pop1 = Population::new(rosenbrock(25), 5, 23).unwrap();
        let pop2 = Population::new(rosenbrock(25), 5, 23).unwrap();
        assert_eq!(pop1.individuals(), pop2.individuals());

        let pop3 = Population::new(rosenbrock(25), 5, 24).unwrap();
        assert_ne!(pop1.individuals(), pop3.individuals());
    }

    #[test]
    fn test_individuals_are_within_bounds_and_evaluated() {
        let pop = Population::new(rosenbrock(10), 20, 1).unwrap();
        let mut problem = rosenbrock(10);
        for individual in pop.individuals() {
            assert!(pop.get_problem().get_bounds().contains(individual.decision_vector()));
            assert_eq!(
                individual.fitness_vector(),
                problem.fitness(individual.decision_vector()).unwrap()
            );
        }
        assert_eq!(pop.get_problem().get_fevals(), 20);
    }

    #[test]
    fn test_best_and_worst_index() {
        let mut pop = Population::new(rosenbrock(2), 4, 3).unwrap();
        pop.set_individual(0, vec![3.0, 3.0]).unwrap();
        pop.set_individual(1, vec![1.0, 1.0]).unwrap();
        pop.set_individual(2, vec![1.0, 1.0]).unwrap();
        pop.set_individual(3, vec![10.0, -5.0]).unwrap();

        // Ties broken by lowest index
        assert_eq!(pop.best_index().unwrap(), 1);
        assert_eq!(pop.worst_index().unwrap(), 3);
        assert_eq!(pop.champion_fitness().unwrap(), vec![0.0]);
        assert_eq!(pop.champion_decision_vector().unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_empty_population() {
        let pop = Population::new(rosenbrock(2), 0, 3).unwrap();
        assert!(pop.is_empty());
        assert_eq!(pop.best_index(), Err(OptimizationError::EmptyPopulation));
        assert!(pop.champion_fitness().is_err());
    }

    #[test]
    fn test_set_individual_errors_leave_population_untouched() {
        let mut pop = Population::new(rosenbrock(3), 2, 9).unwrap();
        let before = pop.individuals().to_vec();
        let fevals = pop.get_problem().get_fevals();

        assert_eq!(
            pop.set_individual(2, vec![0.0; 3]),
            Err(OptimizationError::OutOfRange { index: 2, size: 2 })
        );
        assert_eq!(
            pop.set_individual(0, vec![0.0; 2]),
            Err(OptimizationError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            pop.set_individual(0, vec![0.0, 0.0, 11.0]),
            Err(OptimizationError::InvalidArgument(_))
        ));

        assert_eq!(pop.individuals(), &before[..]);
        assert_eq!(pop.get_problem().get_fevals(), fevals);
    }

    #[test]
    fn test_set_individual_re_evaluates() {
        let mut pop = Population::new(rosenbrock(2), 2, 9).unwrap();
        pop.set_individual(1, vec![0.0, 0.0]).unwrap();
        let individual = pop.get_individual(1).unwrap();
        assert_eq!(individual.decision_vector(), &[0.0, 0.0]);
        assert_eq!(individual.fitness_vector(), &[1.0]);
    }

    #[test]
    fn test_get_individual_out_of_range() {
        let pop = Population::new(rosenbrock(2), 2, 9).unwrap();
        assert_eq!(
            pop.get_individual(5).err(),
            Some(OptimizationError::OutOfRange { index: 5, size: 2 })
        );
    }

    #[test]
    fn test_reseed_problem_re_evaluates() {
        let problem = Problem::new(Inventory::new(5, 3, 1432).unwrap()).unwrap();
        let mut pop = Population::new(problem, 3, 23).unwrap();
        let before = pop.fitness_vectors();
        pop.reseed_problem(77).unwrap();
        assert_ne!(before, pop.fitness_vectors());
        assert_eq!(
            pop.get_problem().extract::<Inventory>().unwrap().seed(),
            77
        );
        assert_eq!(pop.get_problem().get_fevals(), 6);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let pop = Population::new(rosenbrock(2), 3, 5).unwrap();
        let mut copy = pop.clone();
        copy.set_individual(0, vec![1.0, 1.0]).unwrap();
        assert_ne!(pop.individuals()[0], copy.individuals()[0]);
        assert_eq!(pop.get_problem().get_fevals(), 3);
    }

    #[test]
    fn test_restore_rejects_inconsistent_individuals() {
        let registry = Registry::with_builtins();
        let pop = Population::new(rosenbrock(3), 2, 5).unwrap();
        assert!(Population::restore(&pop.snapshot(), &registry).is_ok());

        let corruptions: [fn(&mut Individual); 4] = [
            |ind| ind.decision_vector[0] = 11.0,
            |ind| {
                ind.decision_vector.pop();
            },
            |ind| ind.fitness_vector.push(0.0),
            |ind| ind.fitness_vector.clear(),
        ];
        for corrupt in corruptions {
            let mut snapshot = pop.snapshot();
            corrupt(&mut snapshot.individuals[1]);
            match Population::restore(&snapshot, &registry) {
                Err(OptimizationError::Snapshot(msg)) => assert!(msg.contains("individual 1")),
                other => panic!("Expected Snapshot error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_display_lists_individuals() {
        let pop = Population::new(rosenbrock(2), 2, 5).unwrap();
        let text = pop.to_string();
        assert!(text.contains("Population size: 2"));
        assert!(text.contains("#1:"));
        assert!(text.contains("Champion fitness"));
    }
}
