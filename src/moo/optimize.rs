use std::sync::Arc;

use super::{Moo, OptimizationResult};
use crate::doe::initial_design;
use crate::ego::SingleObjectiveRun;
use crate::error::Result;
use crate::objective::{Objective, evaluate_checked};
use crate::pareto_solver::ParetoSolver;
use crate::sample_set::SampleSet;
use crate::selector::{NextPointSelector, SelectorSettings};
use crate::surrogate::SurrogateBank;
use crate::types::{Bounds, DesignPoint, RunPhase};

impl Moo {
    /// Runs the optimization on `objective`.
    ///
    /// The objective is evaluated once on the initial design (unless one is
    /// supplied) and then once per iteration on a single point. With a single
    /// objective the run is handed to the single-objective strategy and the
    /// result holds the best observed point.
    ///
    /// # Errors
    ///
    /// - Configuration errors ([`Error::is_configuration`](crate::Error::is_configuration))
    ///   before the objective is called.
    /// - [`Error::Evaluation`](crate::Error::Evaluation) and
    ///   [`Error::ObjectiveDimensionMismatch`](crate::Error::ObjectiveDimensionMismatch)
    ///   from the objective.
    /// - [`Error::SurrogateTraining`](crate::Error::SurrogateTraining) when a
    ///   surrogate cannot be fitted.
    ///
    /// On error [`Moo::phase`] is left at [`RunPhase::Failed`].
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn optimize<O: Objective + ?Sized>(&self, objective: &O) -> Result<OptimizationResult> {
        let result = self.run(objective);
        match &result {
            Ok(out) => {
                self.set_phase(RunPhase::Done);
                trace_info!(n_solutions = out.len(), "optimization finished");
            }
            Err(err) => {
                self.set_phase(RunPhase::Failed);
                trace_info!(error = %err, "optimization failed");
            }
        }
        result
    }

    fn run<O: Objective + ?Sized>(&self, objective: &O) -> Result<OptimizationResult> {
        self.config.validate()?;
        let bounds = self.config.resolve_bounds(objective.xlimits())?;
        let mut rng = self
            .config
            .random_state
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "optimize",
            criterion = ?self.config.criterion,
            n_iter = self.config.n_iter,
            ndim = bounds.ndim()
        )
        .entered();

        self.set_phase(RunPhase::Sampling);
        let samples = initial_design(
            objective,
            &bounds,
            self.config.doe(),
            self.config.n_start,
            self.sampler.as_ref(),
            &mut rng,
        )?;
        trace_info!(
            n_samples = samples.len(),
            n_obj = samples.n_obj(),
            "initial design ready"
        );

        if samples.n_obj() == 1 {
            self.optimize_single(objective, &bounds, samples, &mut rng)
        } else {
            self.optimize_multi(objective, &bounds, samples, &mut rng)
        }
    }

    fn optimize_single<O: Objective + ?Sized>(
        &self,
        objective: &O,
        bounds: &Bounds,
        samples: SampleSet,
        rng: &mut fastrand::Rng,
    ) -> Result<OptimizationResult> {
        self.set_phase(RunPhase::SingleObjective);
        trace_verbose!(
            self.config.verbose,
            "single objective, delegating to the single-objective strategy"
        );
        let evaluate = |x: &[DesignPoint]| evaluate_checked(objective, x, Some(1));
        let outcome = self.single_objective.optimize(
            SingleObjectiveRun {
                evaluate: &evaluate,
                bounds,
                samples,
                n_iter: self.config.n_iter,
                n_parallel: self.config.n_parallel,
                verbose: self.config.verbose,
            },
            rng,
        )?;

        Ok(OptimizationResult {
            x: vec![outcome.x_opt],
            f: vec![vec![outcome.y_opt]],
            samples: outcome.samples,
            surrogates: None,
        })
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn optimize_multi<O: Objective + ?Sized>(
        &self,
        objective: &O,
        bounds: &Bounds,
        mut samples: SampleSet,
        rng: &mut fastrand::Rng,
    ) -> Result<OptimizationResult> {
        let n_obj = samples.n_obj();
        let bank = SurrogateBank::new(Arc::clone(&self.surrogate), bounds.clone());

        self.set_phase(RunPhase::Modeling);
        let mut snapshot = bank.retrain(&samples)?;

        let selector = NextPointSelector::new(
            SelectorSettings {
                criterion: self.config.criterion,
                q: self.config.q,
                beta: self.config.beta,
                mc_points_per_objective: self.config.mc_points_per_objective,
                pop_size: self.config.pop_size,
                n_gen: self.config.n_gen,
                verbose: self.config.verbose,
            },
            bounds,
            self.minimizer.as_ref(),
            self.solver.as_ref(),
        );

        for iteration in 0..self.config.n_iter {
            self.set_phase(RunPhase::Iterating);
            let proposal = selector.select(&snapshot, rng)?;
            let y = evaluate_checked(objective, core::slice::from_ref(&proposal.x), Some(n_obj))?;
            for row in y {
                samples.push(proposal.x.clone(), row)?;
            }

            self.set_phase(RunPhase::Modeling);
            snapshot = bank.retrain(&samples)?;
            trace_verbose!(
                self.config.verbose,
                iteration = iteration + 1,
                n_samples = samples.len(),
                version = snapshot.version(),
                "iteration done"
            );
        }

        self.set_phase(RunPhase::Solving);
        let front = ParetoSolver::new(
            self.solver.as_ref(),
            bounds,
            self.config.pop_size,
            self.config.n_gen,
        )
        .solve(&snapshot, rng)?;
        trace_debug!(n_solutions = front.len(), "final Pareto search done");

        Ok(OptimizationResult {
            x: front.x,
            f: front.f,
            samples,
            surrogates: Some(snapshot),
        })
    }
}
