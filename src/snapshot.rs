//! # Snapshots
//!
//! Every entity of the optimization core can be saved to, and restored from, an
//! ordered sequence of [`Field`]s. A restored entity behaves bit-identically to
//! the one it was saved from, including the continuation of its random stream.
//!
//! Concrete problems and algorithms write their own fields in a fixed order and
//! read them back with a [`FieldReader`]. The snapshot records carry the type
//! tag used by [`crate::registry::Registry`] to dispatch the restore.
//!
//! Equality on fields compares reals by their bit patterns, so a round trip is
//! only equal when it is exact.

use crate::error::{OptimizationError, Result};
use crate::population::Individual;
use crate::rng::RngState;

/// One entry of an ordered snapshot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub enum Field {
    UInt(u64),
    Real(f64),
    Reals(Vec<f64>),
    Stream(RngState),
}

impl Field {
    fn kind(&self) -> &'static str {
        match self {
            Field::UInt(_) => "unsigned integer",
            Field::Real(_) => "real",
            Field::Reals(_) => "real sequence",
            Field::Stream(_) => "random stream",
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::UInt(a), Field::UInt(b)) => a == b,
            (Field::Real(a), Field::Real(b)) => a.to_bits() == b.to_bits(),
            (Field::Reals(a), Field::Reals(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Field::Stream(a), Field::Stream(b)) => a == b,
            _ => false,
        }
    }
}

/// Snapshot of a [`crate::problem::Problem`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSnapshot {
    /// Registry tag of the concrete problem.
    pub tag: String,
    /// The concrete problem's own fields.
    pub fields: Vec<Field>,
    /// Number of fitness evaluations performed so far.
    pub fevals: u64,
}

/// Snapshot of a [`crate::population::Population`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSnapshot {
    pub problem: ProblemSnapshot,
    pub individuals: Vec<Individual>,
    pub seed: u64,
    pub rng: RngState,
}

/// Snapshot of a [`crate::algorithm::Algorithm`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSnapshot {
    /// Registry tag of the concrete algorithm.
    pub tag: String,
    /// The concrete algorithm's own fields, log included.
    pub fields: Vec<Field>,
}

/// Cursor over an ordered field sequence.
///
/// Each `next_*` call consumes one field and fails with
/// [`OptimizationError::Snapshot`] when the sequence is exhausted or the field
/// has another kind.
#[derive(Debug)]
pub struct FieldReader<'a> {
    owner: &'a str,
    fields: &'a [Field],
    position: usize,
}

impl<'a> FieldReader<'a> {
    /// Creates a reader over `fields`; `owner` names the entity in error messages.
    pub fn new(owner: &'a str, fields: &'a [Field]) -> Self {
        Self {
            owner,
            fields,
            position: 0,
        }
    }

    fn next(&mut self, name: &str) -> Result<&'a Field> {
        let field = self.fields.get(self.position).ok_or_else(|| {
            OptimizationError::Snapshot(format!(
                "{}: missing field '{}' at position {}",
                self.owner, name, self.position
            ))
        })?;
        self.position += 1;
        Ok(field)
    }

    fn mismatch(&self, name: &str, expected: &str, found: &Field) -> OptimizationError {
        OptimizationError::Snapshot(format!(
            "{}: field '{}' should be a {}, found a {}",
            self.owner,
            name,
            expected,
            found.kind()
        ))
    }

    pub fn next_uint(&mut self, name: &str) -> Result<u64> {
        match self.next(name)? {
            Field::UInt(value) => Ok(*value),
            other => Err(self.mismatch(name, "unsigned integer", other)),
        }
    }

    pub fn next_usize(&mut self, name: &str) -> Result<usize> {
        let value = self.next_uint(name)?;
        usize::try_from(value).map_err(|_| {
            OptimizationError::Snapshot(format!(
                "{}: field '{}' does not fit in usize: {}",
                self.owner, name, value
            ))
        })
    }

    pub fn next_u32(&mut self, name: &str) -> Result<u32> {
        let value = self.next_uint(name)?;
        u32::try_from(value).map_err(|_| {
            OptimizationError::Snapshot(format!(
                "{}: field '{}' does not fit in u32: {}",
                self.owner, name, value
            ))
        })
    }

    pub fn next_real(&mut self, name: &str) -> Result<f64> {
        match self.next(name)? {
            Field::Real(value) => Ok(*value),
            other => Err(self.mismatch(name, "real", other)),
        }
    }

    pub fn next_reals(&mut self, name: &str) -> Result<Vec<f64>> {
        match self.next(name)? {
            Field::Reals(values) => Ok(values.clone()),
            other => Err(self.mismatch(name, "real sequence", other)),
        }
    }

    pub fn next_stream(&mut self, name: &str) -> Result<RngState> {
        match self.next(name)? {
            Field::Stream(state) => Ok(*state),
            other => Err(self.mismatch(name, "random stream", other)),
        }
    }

    /// Number of fields not read yet.
    pub fn remaining(&self) -> usize {
        self.fields.len() - self.position
    }

    /// Fails if fields remain unread.
    pub fn finish(self) -> Result<()> {
        if self.position != self.fields.len() {
            return Err(OptimizationError::Snapshot(format!(
                "{}: {} unexpected trailing field(s)",
                self.owner,
                self.fields.len() - self.position
            )));
        }
        Ok(())
    }
}
