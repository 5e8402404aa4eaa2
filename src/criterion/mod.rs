//! Acquisition criteria: scalar scores over the design space, maximized to
//! choose the next point to evaluate.
//!
//! Every criterion is a value object built from one
//! [`BankSnapshot`](crate::surrogate::BankSnapshot) and
//! rebuilt after each retraining.
//!
//! | Criterion | Objectives | Type |
//! |-----------|------------|------|
//! | Probability of improvement | 2 | [`ProbabilityOfImprovement`] |
//! | Probability of improvement | 3+ | [`MonteCarloCriterion::probability`] |
//! | Expected hypervolume improvement | 2 | [`ExpectedHypervolumeImprovement`] |
//! | Expected hypervolume improvement | 3+ | [`MonteCarloCriterion::hypervolume_improvement`] |
//! | WB2S | any | [`Wb2s`] |
//! | GA dispersion | any | [`Dispersion`] |

mod dispersion;
mod ehvi;
mod montecarlo;
mod pi;
mod wb2s;

pub use dispersion::Dispersion;
pub use ehvi::ExpectedHypervolumeImprovement;
pub use montecarlo::MonteCarloCriterion;
pub use pi::ProbabilityOfImprovement;
pub use wb2s::{Wb2s, wb2s_scale};

use crate::sample_set::SampleSet;

/// A scalar score over the design space; larger is better.
pub trait Acquisition: Send + Sync {
    /// Score of the design point `x`.
    fn evaluate(&self, x: &[f64]) -> f64;
}

/// Hypervolume reference point: the per-objective maximum of the observed
/// values plus one, or the next representable value above the maximum when
/// adding one is absorbed by rounding.
///
/// ```
/// use egomoo::SampleSet;
/// use egomoo::criterion::reference_point;
///
/// let samples = SampleSet::new(
///     vec![vec![0.0], vec![1.0]],
///     vec![vec![1.0, 4.0, -2.0], vec![3.0, 0.5, -7.0]],
/// )
/// .unwrap();
/// assert_eq!(reference_point(&samples), vec![4.0, 5.0, -1.0]);
/// ```
#[must_use]
pub fn reference_point(samples: &SampleSet) -> Vec<f64> {
    samples
        .max_per_objective()
        .into_iter()
        .map(|m| (m + 1.0).max(m.next_up()))
        .collect()
}

/// Observed Pareto front sorted by the first objective.
pub(crate) fn sorted_front(samples: &SampleSet) -> Vec<Vec<f64>> {
    let mut front = samples.pareto_front();
    front.sort_by(|a, b| a[0].total_cmp(&b[0]));
    front.dedup();
    front
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixed-output surrogates for criterion tests.

    use std::sync::Arc;

    use crate::sample_set::SampleSet;
    use crate::surrogate::{BankSnapshot, Surrogate, SurrogateBank, SurrogateBuilder};
    use crate::types::{Bounds, DesignPoint};

    /// Surrogate whose mean is `slope * x[0] + offset` with constant variance.
    pub(crate) struct Linear {
        pub(crate) slope: f64,
        pub(crate) offset: f64,
        pub(crate) variance: f64,
    }

    impl Surrogate for Linear {
        fn predict_mean(&self, x: &[f64]) -> f64 {
            self.slope * x[0] + self.offset
        }

        fn predict_variance(&self, _x: &[f64]) -> f64 {
            self.variance
        }
    }

    /// Hands out one [`Linear`] per objective, in order.
    pub(crate) struct LinearBuilder {
        pub(crate) params: Vec<(f64, f64, f64)>,
        pub(crate) next: std::sync::atomic::AtomicUsize,
    }

    impl SurrogateBuilder for LinearBuilder {
        fn train(
            &self,
            _x: &[DesignPoint],
            _y: &[f64],
            _bounds: &Bounds,
        ) -> Result<Box<dyn Surrogate>, String> {
            let i = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let (slope, offset, variance) = self.params[i % self.params.len()];
            Ok(Box::new(Linear {
                slope,
                offset,
                variance,
            }))
        }
    }

    /// Snapshot with linear surrogates `(slope, offset, variance)` per
    /// objective, trained on the given samples.
    pub(crate) fn snapshot(
        samples: &SampleSet,
        params: Vec<(f64, f64, f64)>,
    ) -> Arc<BankSnapshot> {
        let builder = LinearBuilder {
            params,
            next: std::sync::atomic::AtomicUsize::new(0),
        };
        let ndim = samples.x()[0].len();
        let bounds = Bounds::new(vec![(0.0, 1.0); ndim]).unwrap();
        SurrogateBank::new(Arc::new(builder), bounds)
            .retrain(samples)
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_point_strictly_above_observations() {
        let samples = SampleSet::new(
            vec![vec![0.0]; 3],
            vec![vec![1.0, 2.0], vec![-1.0, 5.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let r = reference_point(&samples);
        for row in samples.y() {
            assert!(row.iter().zip(&r).all(|(y, r)| y < r));
        }
    }

    #[test]
    fn test_reference_point_above_large_observations() {
        let samples = SampleSet::new(
            vec![vec![0.0]; 2],
            vec![vec![1e17, 2.0], vec![-3e20, 1.0]],
        )
        .unwrap();
        let r = reference_point(&samples);
        assert!(r[0] > 1e17, "r = {r:?}");
        assert!((r[1] - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sorted_front_order() {
        let samples = SampleSet::new(
            vec![vec![0.0]; 4],
            vec![vec![3.0, 1.0], vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 3.0]],
        )
        .unwrap();
        assert_eq!(
            sorted_front(&samples),
            vec![vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]]
        );
    }
}
