//! Choice of the next point to evaluate.
//!
//! Every call builds the acquisition criterion afresh from the current bank
//! snapshot, optimizes it and returns one design point inside the bounds.
//! The only state shared across calls is the run's random generator.

use std::sync::Arc;

use crate::criterion::{
    Acquisition, Dispersion, ExpectedHypervolumeImprovement, MonteCarloCriterion,
    ProbabilityOfImprovement, Wb2s, wb2s_scale,
};
use crate::error::{Error, Result};
use crate::genetic::GeneticSolver;
use crate::minimize::BoundedMinimizer;
use crate::pareto_solver::ParetoSolver;
use crate::rng_util;
use crate::surrogate::BankSnapshot;
use crate::types::{Bounds, DesignPoint, InfillCriterion};

/// A proposed design point and its criterion value.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    /// The point to evaluate next.
    pub x: DesignPoint,
    /// Criterion value at `x`.
    pub value: f64,
}

/// Settings of the selector, taken from the run configuration.
#[derive(Clone, Debug)]
pub struct SelectorSettings {
    /// Acquisition policy.
    pub criterion: InfillCriterion,
    /// GA dispersion weight of the design-space term.
    pub q: f64,
    /// WB2S scaling weight.
    pub beta: f64,
    /// Monte-Carlo draws per objective.
    pub mc_points_per_objective: usize,
    /// Genetic population size (GA policy).
    pub pop_size: usize,
    /// Genetic generations (GA policy).
    pub n_gen: usize,
    /// Log the chosen point at info level.
    pub verbose: bool,
}

/// Builds and optimizes the acquisition criterion.
pub struct NextPointSelector<'a> {
    settings: SelectorSettings,
    bounds: &'a Bounds,
    minimizer: &'a dyn BoundedMinimizer,
    solver: &'a dyn GeneticSolver,
}

impl<'a> NextPointSelector<'a> {
    /// Creates a selector over `bounds` with the given collaborators.
    #[must_use]
    pub fn new(
        settings: SelectorSettings,
        bounds: &'a Bounds,
        minimizer: &'a dyn BoundedMinimizer,
        solver: &'a dyn GeneticSolver,
    ) -> Self {
        Self {
            settings,
            bounds,
            minimizer,
            solver,
        }
    }

    /// Proposes one design point from `snapshot`.
    ///
    /// # Errors
    ///
    /// Propagates genetic solver failures (GA policy) and reports an empty
    /// candidate set as [`Error::Internal`].
    pub fn select(
        &self,
        snapshot: &Arc<BankSnapshot>,
        rng: &mut fastrand::Rng,
    ) -> Result<Proposal> {
        let proposal = match self.settings.criterion {
            InfillCriterion::Pi => {
                let criterion = self.probability_of_improvement(snapshot, rng);
                self.maximize(criterion.as_ref(), rng)
            }
            InfillCriterion::Ehvi => {
                let criterion = self.hypervolume_improvement(snapshot, rng);
                self.maximize(criterion.as_ref(), rng)
            }
            InfillCriterion::Wb2s => self.select_wb2s(snapshot, rng),
            InfillCriterion::Ga => self.select_dispersion(snapshot, rng)?,
        };

        let proposal = Proposal {
            x: self.bounds.clamp(&proposal.x),
            value: proposal.value,
        };
        trace_verbose!(
            self.settings.verbose,
            x = ?proposal.x,
            value = proposal.value,
            "next point selected"
        );
        Ok(proposal)
    }

    fn n_samples(&self, snapshot: &BankSnapshot) -> usize {
        self.settings.mc_points_per_objective * snapshot.n_obj()
    }

    fn probability_of_improvement(
        &self,
        snapshot: &Arc<BankSnapshot>,
        rng: &mut fastrand::Rng,
    ) -> Box<dyn Acquisition> {
        if snapshot.n_obj() == 2 {
            Box::new(ProbabilityOfImprovement::new(Arc::clone(snapshot)))
        } else {
            Box::new(MonteCarloCriterion::probability(
                Arc::clone(snapshot),
                self.n_samples(snapshot),
                rng_util::child_seed(rng),
            ))
        }
    }

    fn hypervolume_improvement(
        &self,
        snapshot: &Arc<BankSnapshot>,
        rng: &mut fastrand::Rng,
    ) -> Box<dyn Acquisition> {
        if snapshot.n_obj() == 2 {
            Box::new(ExpectedHypervolumeImprovement::new(Arc::clone(snapshot)))
        } else {
            Box::new(MonteCarloCriterion::hypervolume_improvement(
                Arc::clone(snapshot),
                self.n_samples(snapshot),
                rng_util::child_seed(rng),
            ))
        }
    }

    /// One bounded local search on `-criterion` from a uniform random start.
    fn maximize(&self, criterion: &dyn Acquisition, rng: &mut fastrand::Rng) -> Proposal {
        let start = rng_util::uniform_point(rng, self.bounds);
        let negated = |x: &[f64]| -criterion.evaluate(x);
        let x = self.minimizer.minimize(&negated, &start, self.bounds);
        let value = criterion.evaluate(&x);
        Proposal { x, value }
    }

    fn select_wb2s(&self, snapshot: &Arc<BankSnapshot>, rng: &mut fastrand::Rng) -> Proposal {
        let ehvi = self.hypervolume_improvement(snapshot, rng);
        let best_ehvi = self.maximize(ehvi.as_ref(), rng);
        let abs_mean_sum: f64 = snapshot
            .predict_means(&best_ehvi.x)
            .iter()
            .map(|m| m.abs())
            .sum();
        let scale = wb2s_scale(best_ehvi.value, abs_mean_sum, self.settings.beta);
        trace_verbose!(
            self.settings.verbose,
            ehvi_max = best_ehvi.value,
            scale,
            "WB2S scale computed"
        );

        let wb2s = Wb2s::new(Arc::clone(snapshot), ehvi, scale);
        self.maximize(&wb2s, rng)
    }

    fn select_dispersion(
        &self,
        snapshot: &Arc<BankSnapshot>,
        rng: &mut fastrand::Rng,
    ) -> Result<Proposal> {
        let candidates = ParetoSolver::new(
            self.solver,
            self.bounds,
            self.settings.pop_size,
            self.settings.n_gen,
        )
        .solve(snapshot, rng)?;

        let dispersion = Dispersion::new(Arc::clone(snapshot), candidates, self.settings.q);
        let index = dispersion
            .select()
            .ok_or(Error::Internal("genetic solver returned no candidate"))?;
        let x = dispersion.candidates().x[index].clone();
        let value = dispersion.evaluate(&x);
        Ok(Proposal { x, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::testing;
    use crate::genetic::Nsga2;
    use crate::minimize::Cobyla;
    use crate::sample_set::SampleSet;
    use crate::surrogate::{GpBuilder, SurrogateBank};

    fn settings(criterion: InfillCriterion) -> SelectorSettings {
        SelectorSettings {
            criterion,
            q: 0.5,
            beta: 100.0,
            mc_points_per_objective: 20,
            pop_size: 16,
            n_gen: 5,
            verbose: false,
        }
    }

    fn snapshot(n_obj: usize) -> (Bounds, Arc<BankSnapshot>) {
        let bounds = Bounds::new(vec![(-1.0, 2.0), (0.0, 1.0)]).unwrap();
        let x = vec![
            vec![-1.0, 0.0],
            vec![0.0, 0.5],
            vec![1.0, 1.0],
            vec![2.0, 0.2],
            vec![0.5, 0.9],
        ];
        let y = x
            .iter()
            .map(|p| {
                (0..n_obj)
                    .map(|k| (p[0] - k as f64 * 0.5).powi(2) + p[1])
                    .collect()
            })
            .collect();
        let samples = SampleSet::new(x, y).unwrap();
        let bank = SurrogateBank::new(Arc::new(GpBuilder::new()), bounds.clone());
        let snap = bank.retrain(&samples).unwrap();
        (bounds, snap)
    }

    #[test]
    fn test_every_policy_stays_in_bounds() {
        let minimizer = Cobyla::new();
        let solver = Nsga2::new();
        for n_obj in [2, 3] {
            let (bounds, snap) = snapshot(n_obj);
            for criterion in [
                InfillCriterion::Pi,
                InfillCriterion::Ehvi,
                InfillCriterion::Ga,
                InfillCriterion::Wb2s,
            ] {
                let selector =
                    NextPointSelector::new(settings(criterion), &bounds, &minimizer, &solver);
                let mut rng = fastrand::Rng::with_seed(11);
                let p = selector.select(&snap, &mut rng).unwrap();
                assert!(bounds.contains(&p.x), "{criterion:?}/{n_obj}: {:?}", p.x);
                assert!(p.value.is_finite());
            }
        }
    }

    #[test]
    fn test_wb2s_with_zero_variance_reduces_to_means() {
        let samples = SampleSet::new(
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .unwrap();
        // Both objectives predict x[0] with no uncertainty, so EHVI is zero
        // everywhere and the scale falls back to one.
        let snap = testing::snapshot(&samples, vec![(1.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let bounds = Bounds::new(vec![(-1.0, 2.0), (0.0, 1.0)]).unwrap();
        let minimizer = Cobyla::new();
        let solver = Nsga2::new();
        let selector =
            NextPointSelector::new(settings(InfillCriterion::Wb2s), &bounds, &minimizer, &solver);

        let p = selector.select(&snap, &mut fastrand::Rng::with_seed(2)).unwrap();
        assert!(bounds.contains(&p.x), "x = {:?}", p.x);
        assert!((p.value + 2.0 * p.x[0]).abs() < 1e-12, "value = {}", p.value);
        assert!(p.x[0] < -0.9, "x = {:?}", p.x);
    }

    #[test]
    fn test_same_seed_same_proposal() {
        let minimizer = Cobyla::new();
        let solver = Nsga2::new();
        let (bounds, snap) = snapshot(3);
        let selector =
            NextPointSelector::new(settings(InfillCriterion::Ehvi), &bounds, &minimizer, &solver);
        let a = selector.select(&snap, &mut fastrand::Rng::with_seed(5)).unwrap();
        let b = selector.select(&snap, &mut fastrand::Rng::with_seed(5)).unwrap();
        assert_eq!(a, b);
    }
}
