use std::sync::Arc;

use super::{Acquisition, sorted_front};
use crate::stats::norm_cdf;
use crate::surrogate::BankSnapshot;

/// Analytic bi-objective probability of improvement.
///
/// The probability that the predicted objective vector at `x` is not
/// dominated by the observed Pareto front `y^(1), ..., y^(m)` (sorted by the
/// first objective), with independent Gaussian predictions:
///
/// ```text
/// PI = Φ1(y1^(1))
///    + Σ_{i<m} [Φ1(y1^(i+1)) - Φ1(y1^(i))] Φ2(y2^(i))
///    + [1 - Φ1(y1^(m))] Φ2(y2^(m))
/// ```
///
/// where `Φk(v) = Φ((v - μk(x)) / σk(x))`. Zero where either predicted
/// standard deviation vanishes (at training points).
pub struct ProbabilityOfImprovement {
    snapshot: Arc<BankSnapshot>,
    front: Vec<Vec<f64>>,
}

impl ProbabilityOfImprovement {
    /// Builds the criterion over the training front of `snapshot`.
    ///
    /// The snapshot must hold exactly two objectives.
    #[must_use]
    pub fn new(snapshot: Arc<BankSnapshot>) -> Self {
        debug_assert_eq!(snapshot.n_obj(), 2);
        let front = sorted_front(snapshot.training());
        Self { snapshot, front }
    }
}

impl Acquisition for ProbabilityOfImprovement {
    fn evaluate(&self, x: &[f64]) -> f64 {
        let (mu, sigma) = self.snapshot.predict_mean_std(x);
        if sigma[0] < 1e-12 || sigma[1] < 1e-12 || self.front.is_empty() {
            return 0.0;
        }
        let phi1 = |v: f64| norm_cdf((v - mu[0]) / sigma[0]);
        let phi2 = |v: f64| norm_cdf((v - mu[1]) / sigma[1]);

        let m = self.front.len();
        let mut pi = phi1(self.front[0][0]);
        for pair in self.front.windows(2) {
            pi += (phi1(pair[1][0]) - phi1(pair[0][0])) * phi2(pair[0][1]);
        }
        pi += (1.0 - phi1(self.front[m - 1][0])) * phi2(self.front[m - 1][1]);
        pi.clamp(0.0, 1.0)
    }
}
