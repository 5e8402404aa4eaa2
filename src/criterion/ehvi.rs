use std::sync::Arc;

use super::{Acquisition, reference_point, sorted_front};
use crate::stats::{norm_cdf, norm_pdf};
use crate::surrogate::BankSnapshot;

/// Analytic bi-objective expected hypervolume improvement.
///
/// The region not dominated by the observed front and bounded by the
/// reference point is split into vertical strips between consecutive front
/// points; the improvement inside each strip factorizes over the two
/// independent Gaussian predictions (Emmerich et al., 2006).
pub struct ExpectedHypervolumeImprovement {
    snapshot: Arc<BankSnapshot>,
    front: Vec<Vec<f64>>,
    reference: Vec<f64>,
}

impl ExpectedHypervolumeImprovement {
    /// Builds the criterion over the training front of `snapshot`, with the
    /// reference point at the observed maximum plus one.
    ///
    /// The snapshot must hold exactly two objectives.
    #[must_use]
    pub fn new(snapshot: Arc<BankSnapshot>) -> Self {
        debug_assert_eq!(snapshot.n_obj(), 2);
        let front = sorted_front(snapshot.training());
        let reference = reference_point(snapshot.training());
        Self {
            snapshot,
            front,
            reference,
        }
    }

    /// The hypervolume reference point.
    #[must_use]
    pub fn reference(&self) -> &[f64] {
        &self.reference
    }
}

/// `E[(a - Y) 1{Y < b}]`-style partial moment: `σ φ((b-μ)/σ) + (a-μ) Φ((b-μ)/σ)`.
fn psi(a: f64, b: f64, mu: f64, sigma: f64) -> f64 {
    let z = (b - mu) / sigma;
    sigma * norm_pdf(z) + (a - mu) * norm_cdf(z)
}

impl Acquisition for ExpectedHypervolumeImprovement {
    fn evaluate(&self, x: &[f64]) -> f64 {
        let (mu, sigma) = self.snapshot.predict_mean_std(x);
        if sigma[0] < 1e-12 || sigma[1] < 1e-12 {
            return 0.0;
        }
        let (mu1, mu2, s1, s2) = (mu[0], mu[1], sigma[0], sigma[1]);
        let m = self.front.len();

        let mut ehvi = 0.0;
        for i in 0..=m {
            let upper1 = if i < m {
                self.front[i][0]
            } else {
                self.reference[0]
            };
            let upper2 = if i == 0 {
                self.reference[1]
            } else {
                self.front[i - 1][1]
            };

            let along1 = if i == 0 {
                psi(upper1, upper1, mu1, s1)
            } else {
                let lower1 = self.front[i - 1][0];
                (upper1 - lower1) * norm_cdf((lower1 - mu1) / s1) + psi(upper1, upper1, mu1, s1)
                    - psi(upper1, lower1, mu1, s1)
            };
            ehvi += along1 * psi(upper2, upper2, mu2, s2);
        }
        ehvi.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::testing::snapshot;
    use crate::pareto::hypervolume;
    use crate::sample_set::SampleSet;

    fn samples() -> SampleSet {
        SampleSet::new(
            vec![vec![0.0], vec![0.5], vec![1.0]],
            vec![vec![0.0, 2.0], vec![1.0, 1.0], vec![2.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_reference_point_two_objectives() {
        let snap = snapshot(&samples(), vec![(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)]);
        let ehvi = ExpectedHypervolumeImprovement::new(snap);
        assert_eq!(ehvi.reference(), &[3.0, 3.0]);
    }

    #[test]
    fn test_near_deterministic_matches_hypervolume_gain() {
        // Mean at (0.5, 0.5) with a tiny spread: EHVI ~ HV gain of that point.
        let snap = snapshot(&samples(), vec![(0.0, 0.5, 1e-10), (0.0, 0.5, 1e-10)]);
        let ehvi = ExpectedHypervolumeImprovement::new(snap).evaluate(&[0.2]);

        let front = vec![vec![0.0, 2.0], vec![1.0, 1.0], vec![2.0, 0.0]];
        let mut with_point = front.clone();
        with_point.push(vec![0.5, 0.5]);
        let gain = hypervolume(&with_point, &[3.0, 3.0]) - hypervolume(&front, &[3.0, 3.0]);
        assert!((ehvi - gain).abs() < 1e-3, "{ehvi} vs {gain}");
    }

    #[test]
    fn test_dominated_mean_still_positive_with_spread() {
        let snap = snapshot(&samples(), vec![(0.0, 2.5, 1.0), (0.0, 2.5, 1.0)]);
        let ehvi = ExpectedHypervolumeImprovement::new(snap).evaluate(&[0.2]);
        assert!(ehvi > 0.0);
    }

    #[test]
    fn test_zero_variance_scores_zero() {
        let snap = snapshot(&samples(), vec![(0.0, -1.0, 0.0), (0.0, -1.0, 0.0)]);
        let ehvi = ExpectedHypervolumeImprovement::new(snap).evaluate(&[0.2]);
        assert!(ehvi.abs() < f64::EPSILON);
    }

    #[test]
    fn test_more_uncertainty_more_improvement_when_dominated() {
        let tight = snapshot(&samples(), vec![(0.0, 2.5, 0.01), (0.0, 2.5, 0.01)]);
        let wide = snapshot(&samples(), vec![(0.0, 2.5, 1.0), (0.0, 2.5, 1.0)]);
        let a = ExpectedHypervolumeImprovement::new(tight).evaluate(&[0.0]);
        let b = ExpectedHypervolumeImprovement::new(wide).evaluate(&[0.0]);
        assert!(b > a);
    }
}
