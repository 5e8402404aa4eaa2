//! Genetic search on the trained surrogates.

use std::sync::Arc;

use crate::error::Result;
use crate::genetic::{GeneticSolver, MultiObjectiveProblem, ParetoSet};
use crate::rng_util;
use crate::surrogate::BankSnapshot;
use crate::types::Bounds;

/// The surrogate means of a snapshot, as a cheap multi-objective problem.
#[derive(Clone, Debug)]
pub struct SurrogateProblem {
    snapshot: Arc<BankSnapshot>,
}

impl SurrogateProblem {
    /// Wraps `snapshot`.
    #[must_use]
    pub fn new(snapshot: Arc<BankSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl MultiObjectiveProblem for SurrogateProblem {
    fn n_obj(&self) -> usize {
        self.snapshot.n_obj()
    }

    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        self.snapshot.predict_means(x)
    }
}

/// Runs a [`GeneticSolver`] over a [`SurrogateProblem`] with a seed drawn
/// from the run's random stream.
pub struct ParetoSolver<'a> {
    solver: &'a dyn GeneticSolver,
    bounds: &'a Bounds,
    pop_size: usize,
    n_gen: usize,
}

impl<'a> ParetoSolver<'a> {
    /// Creates a solver over `bounds` with the given population and
    /// generation budget.
    #[must_use]
    pub fn new(
        solver: &'a dyn GeneticSolver,
        bounds: &'a Bounds,
        pop_size: usize,
        n_gen: usize,
    ) -> Self {
        Self {
            solver,
            bounds,
            pop_size,
            n_gen,
        }
    }

    /// Approximates the Pareto set of the surrogate means.
    ///
    /// Draws exactly one seed from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates the genetic solver's error.
    pub fn solve(&self, snapshot: &Arc<BankSnapshot>, rng: &mut fastrand::Rng) -> Result<ParetoSet> {
        let seed = rng_util::child_seed(rng);
        let problem = SurrogateProblem::new(Arc::clone(snapshot));
        let mut set = self
            .solver
            .solve(&problem, self.bounds, self.pop_size, self.n_gen, seed)?;
        // Solvers must stay in the box; enforce it for user-supplied ones.
        for x in &mut set.x {
            *x = self.bounds.clamp(x);
        }
        Ok(set)
    }
}
