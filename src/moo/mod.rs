//! The refinement loop.
//!
//! [`Moo`] seeds a sample set, trains one surrogate per objective, adds one
//! point per iteration chosen by the acquisition criterion, and finally runs
//! a genetic search on the refined surrogates. Objectives with a single output
//! are delegated to the single-objective strategy.
//!
//! ```text
//! Uninitialized -> Sampling -> Modeling -> (Iterating -> Modeling)* -> Solving -> Done
//!                          \-> SingleObjective -> Done
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::doe::InitialSampler;
use crate::ego::SingleObjectiveStrategy;
use crate::genetic::GeneticSolver;
use crate::minimize::BoundedMinimizer;
use crate::surrogate::SurrogateBuilder;
use crate::types::RunPhase;

mod builder;
mod config;
mod optimize;
mod result;

pub use builder::MooBuilder;
pub use config::MooConfig;
pub use result::OptimizationResult;

/// Surrogate-assisted multi-objective optimizer.
///
/// # Examples
///
/// ```
/// use egomoo::{Bounds, DesignPoint, Moo};
///
/// let fun = |x: &[DesignPoint]| {
///     Ok::<_, String>(
///         x.iter()
///             .map(|p| vec![p[0] * p[0], (p[0] - 1.0).powi(2) + p[1]])
///             .collect::<Vec<_>>(),
///     )
/// };
///
/// let moo = Moo::builder()
///     .xlimits(Bounds::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap())
///     .n_start(6)
///     .n_iter(2)
///     .pop_size(20)
///     .n_gen(10)
///     .random_state(0)
///     .build();
///
/// let result = moo.optimize(&fun).unwrap();
/// assert_eq!(result.samples.len(), 8);
/// assert!(!result.is_empty());
/// ```
pub struct Moo {
    config: MooConfig,
    surrogate: Arc<dyn SurrogateBuilder>,
    solver: Box<dyn GeneticSolver>,
    minimizer: Box<dyn BoundedMinimizer>,
    sampler: Box<dyn InitialSampler>,
    single_objective: Box<dyn SingleObjectiveStrategy>,
    phase: Mutex<RunPhase>,
}

impl Moo {
    /// Creates an optimizer with the given options and default collaborators.
    #[must_use]
    pub fn new(config: MooConfig) -> Self {
        MooBuilder::new().config(config).build()
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> MooBuilder {
        MooBuilder::new()
    }

    /// The run options.
    #[must_use]
    pub fn config(&self) -> &MooConfig {
        &self.config
    }

    /// The loop state of the current (or last) run: [`RunPhase::Done`] or
    /// [`RunPhase::Failed`] once `optimize` has returned.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.phase.lock()
    }

    fn set_phase(&self, phase: RunPhase) {
        *self.phase.lock() = phase;
    }
}

impl Default for Moo {
    fn default() -> Self {
        Self::new(MooConfig::default())
    }
}
