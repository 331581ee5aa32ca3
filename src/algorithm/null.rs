use crate::error::Result;
use crate::population::Population;
use crate::snapshot::{Field, FieldReader};

use super::UserAlgorithm;

/// An algorithm that returns an unchanged copy of the population.
///
/// It is the default [`super::Algorithm`] and the blank value a snapshot is
/// typically restored over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullAlgorithm;

impl NullAlgorithm {
    pub const TAG: &'static str = "null_algorithm";

    pub(crate) fn restore(_reader: &mut FieldReader<'_>) -> Result<Box<dyn UserAlgorithm>> {
        Ok(Box::new(NullAlgorithm))
    }
}

impl UserAlgorithm for NullAlgorithm {
    fn evolve(&mut self, population: &Population) -> Result<Population> {
        Ok(population.clone())
    }

    fn name(&self) -> String {
        "Null algorithm".to_string()
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn snapshot_fields(&self) -> Vec<Field> {
        Vec::new()
    }
}
