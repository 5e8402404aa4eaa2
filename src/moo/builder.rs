use std::sync::Arc;

use parking_lot::Mutex;

use super::{Moo, MooConfig};
use crate::doe::{InitialSampler, LatinHypercube};
use crate::ego::{Ego, SingleObjectiveStrategy};
use crate::genetic::{GeneticSolver, Nsga2};
use crate::minimize::{BoundedMinimizer, Cobyla};
use crate::surrogate::{GpBuilder, SurrogateBuilder};
use crate::types::{Bounds, DesignPoint, InfillCriterion, RunPhase};

/// A builder for [`Moo`] with a fluent API.
///
/// Created via [`Moo::builder()`]. Every option of [`MooConfig`] has a
/// setter; the collaborators of the loop can be replaced as well.
///
/// # Defaults
///
/// - Options: [`MooConfig::default()`]
/// - Surrogate: [`GpBuilder`]
/// - Genetic solver: [`Nsga2`]
/// - Bounded minimizer: [`Cobyla`]
/// - Initial sampler: [`LatinHypercube`]
/// - Single-objective strategy: [`Ego`]
///
/// # Examples
///
/// ```
/// use egomoo::{Bounds, InfillCriterion, Moo};
///
/// let moo = Moo::builder()
///     .criterion(InfillCriterion::Ehvi)
///     .xlimits(Bounds::new(vec![(0.0, 1.0); 2]).unwrap())
///     .n_iter(5)
///     .random_state(42)
///     .build();
///
/// assert_eq!(moo.config().criterion, InfillCriterion::Ehvi);
/// assert_eq!(moo.config().n_iter, 5);
/// ```
pub struct MooBuilder {
    config: MooConfig,
    surrogate: Option<Arc<dyn SurrogateBuilder>>,
    solver: Option<Box<dyn GeneticSolver>>,
    minimizer: Option<Box<dyn BoundedMinimizer>>,
    sampler: Option<Box<dyn InitialSampler>>,
    single_objective: Option<Box<dyn SingleObjectiveStrategy>>,
}

impl MooBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: MooConfig::default(),
            surrogate: None,
            solver: None,
            minimizer: None,
            sampler: None,
            single_objective: None,
        }
    }

    /// Replace every option at once.
    #[must_use]
    pub fn config(mut self, config: MooConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the acquisition policy.
    #[must_use]
    pub fn criterion(mut self, criterion: InfillCriterion) -> Self {
        self.config.criterion = criterion;
        self
    }

    /// Set the number of refinement iterations.
    #[must_use]
    pub fn n_iter(mut self, n: usize) -> Self {
        self.config.n_iter = n;
        self
    }

    /// Set the design-space bounds.
    #[must_use]
    pub fn xlimits(mut self, bounds: Bounds) -> Self {
        self.config.xlimits = Some(bounds);
        self
    }

    /// Set the size of the sampled initial design.
    #[must_use]
    pub fn n_start(mut self, n: usize) -> Self {
        self.config.n_start = n;
        self
    }

    /// Set the population size of the genetic searches.
    #[must_use]
    pub fn pop_size(mut self, n: usize) -> Self {
        self.config.pop_size = n;
        self
    }

    /// Set the number of generations of the genetic searches.
    #[must_use]
    pub fn n_gen(mut self, n: usize) -> Self {
        self.config.n_gen = n;
        self
    }

    /// Set the GA dispersion weight of the design-space term.
    #[must_use]
    pub fn q(mut self, q: f64) -> Self {
        self.config.q = q;
        self
    }

    /// Supply an evaluated initial design; `n_start` is then ignored.
    #[must_use]
    pub fn doe(mut self, xdoe: Vec<DesignPoint>, ydoe: Vec<Vec<f64>>) -> Self {
        self.config.xdoe = Some(xdoe);
        self.config.ydoe = Some(ydoe);
        self
    }

    /// Seed the run for reproducible results.
    #[must_use]
    pub fn random_state(mut self, seed: u64) -> Self {
        self.config.random_state = Some(seed);
        self
    }

    /// Log progress at info level (requires the `tracing` feature).
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the WB2S scaling weight.
    #[must_use]
    pub fn beta(mut self, beta: f64) -> Self {
        self.config.beta = beta;
        self
    }

    /// Set the Monte-Carlo draws per objective.
    #[must_use]
    pub fn mc_points_per_objective(mut self, n: usize) -> Self {
        self.config.mc_points_per_objective = n;
        self
    }

    /// Set the batch size of the single-objective strategy.
    #[must_use]
    pub fn n_parallel(mut self, n: usize) -> Self {
        self.config.n_parallel = n;
        self
    }

    /// Set the surrogate trained on each objective.
    #[must_use]
    pub fn surrogate(mut self, builder: impl SurrogateBuilder + 'static) -> Self {
        self.surrogate = Some(Arc::new(builder));
        self
    }

    /// Set the genetic solver.
    #[must_use]
    pub fn genetic_solver(mut self, solver: impl GeneticSolver + 'static) -> Self {
        self.solver = Some(Box::new(solver));
        self
    }

    /// Set the bounded minimizer used on the acquisition criteria.
    #[must_use]
    pub fn minimizer(mut self, minimizer: impl BoundedMinimizer + 'static) -> Self {
        self.minimizer = Some(Box::new(minimizer));
        self
    }

    /// Set the space-filling sampler of the initial design.
    #[must_use]
    pub fn initial_sampler(mut self, sampler: impl InitialSampler + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    /// Set the strategy used when the objective has a single output.
    #[must_use]
    pub fn single_objective(mut self, strategy: impl SingleObjectiveStrategy + 'static) -> Self {
        self.single_objective = Some(Box::new(strategy));
        self
    }

    /// Build the optimizer. Options are validated when it runs.
    #[must_use]
    pub fn build(self) -> Moo {
        Moo {
            config: self.config,
            surrogate: self
                .surrogate
                .unwrap_or_else(|| Arc::new(GpBuilder::new())),
            solver: self.solver.unwrap_or_else(|| Box::new(Nsga2::new())),
            minimizer: self
                .minimizer
                .unwrap_or_else(|| Box::new(Cobyla::new())),
            sampler: self.sampler.unwrap_or_else(|| Box::new(LatinHypercube)),
            single_objective: self
                .single_objective
                .unwrap_or_else(|| Box::new(Ego::new())),
            phase: Mutex::new(RunPhase::Uninitialized),
        }
    }
}
