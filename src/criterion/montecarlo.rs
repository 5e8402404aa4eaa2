use std::sync::Arc;

use super::{Acquisition, reference_point};
use crate::pareto::{hypervolume, is_dominated};
use crate::rng_util::standard_normal;
use crate::surrogate::BankSnapshot;

#[derive(Clone, Debug)]
enum Estimate {
    /// Fraction of draws not dominated by the front.
    Probability,
    /// Mean hypervolume gain of a draw over the front.
    HypervolumeImprovement { reference: Vec<f64>, base: f64 },
}

/// Monte-Carlo estimates of PI and EHVI for any number of objectives.
///
/// Each evaluation draws `n_samples` objective vectors from the independent
/// Gaussian predictions at `x`. The sampling seed is fixed when the criterion
/// is built, so the score is a deterministic function of `x`.
///
/// Points whose optimistic prediction `μ - 3σ` is already dominated by the
/// front score zero without sampling.
pub struct MonteCarloCriterion {
    snapshot: Arc<BankSnapshot>,
    front: Vec<Vec<f64>>,
    estimate: Estimate,
    n_samples: usize,
    seed: u64,
}

impl MonteCarloCriterion {
    /// Monte-Carlo probability of improvement.
    #[must_use]
    pub fn probability(snapshot: Arc<BankSnapshot>, n_samples: usize, seed: u64) -> Self {
        let front = snapshot.training().pareto_front();
        Self {
            snapshot,
            front,
            estimate: Estimate::Probability,
            n_samples,
            seed,
        }
    }

    /// Monte-Carlo expected hypervolume improvement, with the reference point
    /// at the observed maximum plus one.
    #[must_use]
    pub fn hypervolume_improvement(
        snapshot: Arc<BankSnapshot>,
        n_samples: usize,
        seed: u64,
    ) -> Self {
        let front = snapshot.training().pareto_front();
        let reference = reference_point(snapshot.training());
        let base = hypervolume(&front, &reference);
        Self {
            snapshot,
            front,
            estimate: Estimate::HypervolumeImprovement { reference, base },
            n_samples,
            seed,
        }
    }

    /// The hypervolume reference point, for the EHVI estimate.
    #[must_use]
    pub fn reference(&self) -> Option<&[f64]> {
        match &self.estimate {
            Estimate::Probability => None,
            Estimate::HypervolumeImprovement { reference, .. } => Some(reference),
        }
    }

    fn score(&self, draw: &[f64]) -> f64 {
        match &self.estimate {
            Estimate::Probability => {
                if is_dominated(draw, &self.front) {
                    0.0
                } else {
                    1.0
                }
            }
            Estimate::HypervolumeImprovement { reference, base } => {
                if is_dominated(draw, &self.front) {
                    return 0.0;
                }
                let mut extended = self.front.clone();
                extended.push(draw.to_vec());
                (hypervolume(&extended, reference) - base).max(0.0)
            }
        }
    }
}

impl Acquisition for MonteCarloCriterion {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, x: &[f64]) -> f64 {
        if self.n_samples == 0 {
            return 0.0;
        }
        let (mu, sigma) = self.snapshot.predict_mean_std(x);

        let optimistic: Vec<f64> = mu.iter().zip(&sigma).map(|(m, s)| m - 3.0 * s).collect();
        if is_dominated(&optimistic, &self.front) {
            return 0.0;
        }

        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut draw = vec![0.0; mu.len()];
        let mut total = 0.0;
        for _ in 0..self.n_samples {
            for (k, d) in draw.iter_mut().enumerate() {
                *d = mu[k] + sigma[k] * standard_normal(&mut rng);
            }
            total += self.score(&draw);
        }
        total / self.n_samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::testing::snapshot;
    use crate::sample_set::SampleSet;

    fn samples() -> SampleSet {
        SampleSet::new(
            vec![vec![0.0], vec![0.5], vec![1.0]],
            vec![
                vec![0.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0],
                vec![1.0, 1.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn three(mean: f64, variance: f64) -> Vec<(f64, f64, f64)> {
        vec![(0.0, mean, variance); 3]
    }

    #[test]
    fn test_reference_point_three_objectives() {
        let snap = snapshot(&samples(), three(0.0, 1.0));
        let c = MonteCarloCriterion::hypervolume_improvement(snap, 300, 1);
        let r = c.reference().unwrap();
        for row in samples().y() {
            assert!(row.iter().zip(r).all(|(y, r)| y < r));
        }
    }

    #[test]
    fn test_dominated_optimistic_point_scores_zero() {
        let snap = snapshot(&samples(), three(5.0, 0.01));
        let pi = MonteCarloCriterion::probability(Arc::clone(&snap), 300, 1);
        let ehvi = MonteCarloCriterion::hypervolume_improvement(snap, 300, 1);
        assert!(pi.evaluate(&[0.4]).abs() < f64::EPSILON);
        assert!(ehvi.evaluate(&[0.4]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear_improvement() {
        let snap = snapshot(&samples(), three(-5.0, 1e-6));
        let pi = MonteCarloCriterion::probability(Arc::clone(&snap), 300, 1);
        assert!((pi.evaluate(&[0.4]) - 1.0).abs() < f64::EPSILON);

        // A near-certain point at (-5, -5, -5) dominates the whole front.
        let ehvi = MonteCarloCriterion::hypervolume_improvement(snap, 300, 1);
        let expected = 7.0_f64.powi(3) - hypervolume(&samples().pareto_front(), &[2.0, 2.0, 2.0]);
        let got = ehvi.evaluate(&[0.4]);
        assert!((got - expected).abs() < 0.5, "{got} vs {expected}");
    }

    #[test]
    fn test_deterministic_in_x() {
        let snap = snapshot(&samples(), three(0.5, 0.5));
        let pi = MonteCarloCriterion::probability(snap, 300, 42);
        let a = pi.evaluate(&[0.3]);
        let b = pi.evaluate(&[0.3]);
        assert!((a - b).abs() < f64::EPSILON);
        assert!(a > 0.0 && a < 1.0);
    }
}
