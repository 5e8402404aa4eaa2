//! Population-based multi-objective search over cheap problems.
//!
//! The refinement loop hands the trained surrogates to a [`GeneticSolver`] as a
//! [`MultiObjectiveProblem`] and gets back an approximate Pareto set. The
//! default solver is [`Nsga2`].

mod nsga2;
mod operators;

pub use nsga2::Nsga2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Bounds, DesignPoint};

/// A cheap vector-valued function to minimize.
pub trait MultiObjectiveProblem {
    /// Number of objectives returned by [`evaluate`](Self::evaluate).
    fn n_obj(&self) -> usize;

    /// Objective values at `x`.
    fn evaluate(&self, x: &[f64]) -> Vec<f64>;
}

/// Non-dominated design points and their objective vectors.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParetoSet {
    /// Pareto set (design space).
    pub x: Vec<DesignPoint>,
    /// Pareto front (objective space), row `i` belongs to `x[i]`.
    pub f: Vec<Vec<f64>>,
}

impl ParetoSet {
    /// Number of solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the set holds no solution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// A multi-objective search returning an approximate Pareto set.
pub trait GeneticSolver: Send + Sync {
    /// Evolves a population of `pop_size` for `n_gen` generations.
    ///
    /// All randomness must derive from `seed`. Every returned point lies
    /// inside `bounds`.
    ///
    /// # Errors
    ///
    /// Implementations report invalid settings or internal failures; the
    /// refinement loop aborts on error.
    fn solve(
        &self,
        problem: &dyn MultiObjectiveProblem,
        bounds: &Bounds,
        pop_size: usize,
        n_gen: usize,
        seed: u64,
    ) -> Result<ParetoSet>;
}
