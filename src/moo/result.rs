use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sample_set::SampleSet;
use crate::surrogate::BankSnapshot;
use crate::types::DesignPoint;

/// Outcome of [`Moo::optimize`](crate::Moo::optimize).
///
/// For multi-objective problems `x` and `f` are the Pareto set and front
/// found by the genetic search on the final surrogates. For single-objective
/// problems they hold the single best observed point.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    /// Pareto set (design space).
    pub x: Vec<DesignPoint>,
    /// Pareto front (objective space); row `i` belongs to `x[i]`.
    pub f: Vec<Vec<f64>>,
    /// Every evaluated sample, the initial design first.
    pub samples: SampleSet,
    /// The final surrogate snapshot; absent on the single-objective path.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub surrogates: Option<Arc<BankSnapshot>>,
}

impl OptimizationResult {
    /// Number of solutions in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if no solution was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterates over `(x, f)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DesignPoint, &Vec<f64>)> {
        self.x.iter().zip(&self.f)
    }
}
