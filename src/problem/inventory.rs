//! A stochastic inventory-planning problem.
//!
//! Decision variable `x[j]` is the number of units ordered in week `j`. Weekly
//! demand is drawn uniformly from `[0, 100)`. Each week costs the purchase price
//! of the order, a back-order penalty on unmet demand and a holding cost on the
//! stock carried over. The fitness is the total cost averaged over
//! `sample_size` demand scenarios.
//!
//! The demand stream is re-seeded from the problem's seed on every evaluation,
//! so for a fixed seed the fitness is a pure function of `x`. Changing the seed
//! with [`UserProblem::set_seed`] changes the scenarios.

use crate::error::{invalid_argument, Result};
use crate::rng::RandomNumberGenerator;
use crate::snapshot::{Field, FieldReader};

use super::UserProblem;

const UNIT_COST: f64 = 1.0;
const BACKORDER_COST: f64 = 1.5;
const HOLDING_COST: f64 = 0.1;
const MAX_DEMAND: f64 = 100.0;
const MAX_ORDER: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    weeks: usize,
    sample_size: usize,
    seed: u64,
}

impl Inventory {
    pub const TAG: &'static str = "inventory";

    /// Creates the problem over `weeks` weeks, averaging `sample_size` scenarios.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `weeks` or `sample_size` is 0.
    pub fn new(weeks: usize, sample_size: usize, seed: u64) -> Result<Self> {
        if weeks == 0 {
            return Err(invalid_argument("Inventory problem needs at least 1 week"));
        }
        if sample_size == 0 {
            return Err(invalid_argument(
                "Inventory problem needs a sample size of at least 1",
            ));
        }
        Ok(Self {
            weeks,
            sample_size,
            seed,
        })
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn restore(reader: &mut FieldReader<'_>) -> Result<Box<dyn UserProblem>> {
        let weeks = reader.next_usize("weeks")?;
        let sample_size = reader.next_usize("sample_size")?;
        let seed = reader.next_uint("seed")?;
        Ok(Box::new(Self::new(weeks, sample_size, seed)?))
    }
}

impl UserProblem for Inventory {
    fn fitness(&self, x: &[f64]) -> Vec<f64> {
        let mut rng = RandomNumberGenerator::from_seed(self.seed);
        let mut total = 0.0;
        for _ in 0..self.sample_size {
            let mut stock = 0.0;
            for &order in x {
                let demand = rng.probability() * MAX_DEMAND;
                total += UNIT_COST * order
                    + BACKORDER_COST * f64::max(demand - stock - order, 0.0)
                    + HOLDING_COST * f64::max(stock + order - demand, 0.0);
                stock = f64::max(0.0, stock + order - demand);
            }
        }
        vec![total / self.sample_size as f64]
    }

    fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![0.0; self.weeks], vec![MAX_ORDER; self.weeks])
    }

    fn name(&self) -> String {
        "Inventory problem".to_string()
    }

    fn extra_info(&self) -> String {
        format!(
            "\n\tWeeks: {}\n\tSample size: {}\n\tSeed: {}",
            self.weeks, self.sample_size, self.seed
        )
    }

    fn is_stochastic(&self) -> bool {
        true
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn snapshot_fields(&self) -> Vec<Field> {
        vec![
            Field::UInt(self.weeks as u64),
            Field::UInt(self.sample_size as u64),
            Field::UInt(self.seed),
        ]
    }
}
