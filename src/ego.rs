//! Single-objective strategy.
//!
//! When the objective returns one value per point, the refinement loop hands
//! the initial design to a [`SingleObjectiveStrategy`] instead of running the
//! multi-objective machinery. The default is [`Ego`]: efficient global
//! optimization with Expected Improvement.

use crate::error::{Error, Result};
use crate::minimize::{BoundedMinimizer, Cobyla};
use crate::rng_util;
use crate::sample_set::SampleSet;
use crate::stats::{norm_cdf, norm_pdf};
use crate::surrogate::{GpBuilder, Surrogate, SurrogateBuilder};
use crate::types::{Bounds, DesignPoint};

/// Shape-checked evaluation of the expensive objective: one row per point.
pub type Evaluator<'a> = &'a dyn Fn(&[DesignPoint]) -> Result<Vec<Vec<f64>>>;

/// Everything a single-objective strategy needs for one run.
pub struct SingleObjectiveRun<'a> {
    /// The expensive objective.
    pub evaluate: Evaluator<'a>,
    /// Design-space bounds.
    pub bounds: &'a Bounds,
    /// The initial design, already evaluated.
    pub samples: SampleSet,
    /// Number of iterations.
    pub n_iter: usize,
    /// Points evaluated per iteration.
    pub n_parallel: usize,
    /// Log progress at info level.
    pub verbose: bool,
}

/// Result of a single-objective run.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleObjectiveOutcome {
    /// Best observed point.
    pub x_opt: DesignPoint,
    /// Objective value at `x_opt`.
    pub y_opt: f64,
    /// Every evaluated sample, the initial design first.
    pub samples: SampleSet,
}

/// Optimizes a scalar objective from an evaluated initial design.
pub trait SingleObjectiveStrategy: Send + Sync {
    /// Runs the strategy. All randomness must come from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates objective and surrogate failures.
    fn optimize(
        &self,
        run: SingleObjectiveRun<'_>,
        rng: &mut fastrand::Rng,
    ) -> Result<SingleObjectiveOutcome>;
}

/// Efficient global optimization with Expected Improvement.
///
/// Each iteration fits a surrogate on the samples, maximizes EI with one
/// bounded local search from a random start and evaluates the result. With
/// `n_parallel > 1` a batch is built with the kriging-believer heuristic: each
/// chosen point is added to the training data with its predicted mean as a
/// virtual observation before the next point is chosen.
pub struct Ego {
    surrogate: Box<dyn SurrogateBuilder>,
    minimizer: Box<dyn BoundedMinimizer>,
}

impl Ego {
    /// A Gaussian process with COBYLA maximization of EI.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surrogate: Box::new(GpBuilder::new()),
            minimizer: Box::new(Cobyla::new()),
        }
    }

    /// Replaces the surrogate.
    #[must_use]
    pub fn surrogate(mut self, builder: impl SurrogateBuilder + 'static) -> Self {
        self.surrogate = Box::new(builder);
        self
    }

    /// Replaces the EI maximizer.
    #[must_use]
    pub fn minimizer(mut self, minimizer: impl BoundedMinimizer + 'static) -> Self {
        self.minimizer = Box::new(minimizer);
        self
    }

    fn fit(&self, samples: &SampleSet, bounds: &Bounds) -> Result<Box<dyn Surrogate>> {
        self.surrogate
            .train(samples.x(), &samples.column(0), bounds)
            .map_err(|reason| Error::SurrogateTraining {
                objective: 0,
                reason,
            })
    }

    /// Chooses `batch_size` points with the kriging-believer heuristic.
    fn propose_batch(
        &self,
        samples: &SampleSet,
        bounds: &Bounds,
        batch_size: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<DesignPoint>> {
        let mut believed = samples.clone();
        let mut batch = Vec::with_capacity(batch_size);

        for _ in 0..batch_size {
            let model = self.fit(&believed, bounds)?;
            let f_best = believed
                .column(0)
                .into_iter()
                .fold(f64::INFINITY, f64::min);

            let start = rng_util::uniform_point(rng, bounds);
            let negated_ei = |x: &[f64]| {
                let (mean, var) = model.predict(x);
                -expected_improvement(mean, var.max(0.0).sqrt(), f_best)
            };
            let x = bounds.clamp(&self.minimizer.minimize(&negated_ei, &start, bounds));

            believed.push(x.clone(), vec![model.predict_mean(&x)])?;
            batch.push(x);
        }
        Ok(batch)
    }
}

impl Default for Ego {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleObjectiveStrategy for Ego {
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn optimize(
        &self,
        run: SingleObjectiveRun<'_>,
        rng: &mut fastrand::Rng,
    ) -> Result<SingleObjectiveOutcome> {
        let mut samples = run.samples;
        let batch_size = run.n_parallel.max(1);

        for iteration in 0..run.n_iter {
            let batch = self.propose_batch(&samples, run.bounds, batch_size, rng)?;
            let y = (run.evaluate)(batch.as_slice())?;
            for (x, y) in batch.into_iter().zip(y) {
                samples.push(x, y)?;
            }
            trace_verbose!(
                run.verbose,
                iteration = iteration + 1,
                n_samples = samples.len(),
                "EGO iteration done"
            );
        }

        let best = samples.best_index(0).ok_or(Error::EmptyDesign)?;
        Ok(SingleObjectiveOutcome {
            x_opt: samples.x()[best].clone(),
            y_opt: samples.y()[best][0],
            samples,
        })
    }
}

/// `EI(x) = (f_best - mean) Φ(z) + std φ(z)` with `z = (f_best - mean) / std`.
fn expected_improvement(mean: f64, std: f64, f_best: f64) -> f64 {
    if std < 1e-12 {
        return (f_best - mean).max(0.0);
    }
    let z = (f_best - mean) / std;
    ((f_best - mean) * norm_cdf(z) + std * norm_pdf(z)).max(0.0)
}
