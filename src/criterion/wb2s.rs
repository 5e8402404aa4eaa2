use std::sync::Arc;

use super::Acquisition;
use crate::surrogate::BankSnapshot;

/// Scaling factor `s` of the WB2S criterion.
///
/// `beta * Σ|μ_i(x_ehvi)| / ehvi_max`, where `x_ehvi` maximizes EHVI and
/// `ehvi_max` is its value. Exactly `1.0` when `ehvi_max` is zero.
///
/// ```
/// use egomoo::criterion::wb2s_scale;
///
/// assert_eq!(wb2s_scale(0.0, 12.0, 100.0), 1.0);
/// assert_eq!(wb2s_scale(2.0, 3.0, 100.0), 150.0);
/// ```
#[must_use]
pub fn wb2s_scale(ehvi_max: f64, abs_mean_sum: f64, beta: f64) -> f64 {
    if ehvi_max > 0.0 {
        beta * abs_mean_sum / ehvi_max
    } else {
        1.0
    }
}

/// Multi-objective WB2S: `s * EHVI(x) - Σ μ_i(x)`.
///
/// Trades the expected hypervolume improvement against the predicted
/// objective values. `ehvi` is the analytic criterion for two objectives or
/// its Monte-Carlo estimate otherwise.
pub struct Wb2s {
    snapshot: Arc<BankSnapshot>,
    ehvi: Box<dyn Acquisition>,
    scale: f64,
}

impl Wb2s {
    /// Combines `ehvi` with the surrogate means of `snapshot`, using the
    /// factor from [`wb2s_scale`].
    #[must_use]
    pub fn new(snapshot: Arc<BankSnapshot>, ehvi: Box<dyn Acquisition>, scale: f64) -> Self {
        Self {
            snapshot,
            ehvi,
            scale,
        }
    }

    /// The scaling factor `s`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Acquisition for Wb2s {
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mean_sum: f64 = self.snapshot.predict_means(x).iter().sum();
        self.scale * self.ehvi.evaluate(x) - mean_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::testing::snapshot;
    use crate::sample_set::SampleSet;

    struct Constant(f64);

    impl Acquisition for Constant {
        fn evaluate(&self, _x: &[f64]) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_zero_ehvi_max_gives_unit_scale() {
        assert!((wb2s_scale(0.0, 1e6, 100.0) - 1.0).abs() < f64::EPSILON);
        assert!((wb2s_scale(0.0, 0.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_uses_beta() {
        assert!((wb2s_scale(0.5, 4.0, 10.0) - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_combines_ehvi_and_means() {
        let samples =
            SampleSet::new(vec![vec![0.0], vec![1.0]], vec![vec![0.0, 1.0], vec![1.0, 0.0]])
                .unwrap();
        // Means: 2x + 1 and -x.
        let snap = snapshot(&samples, vec![(2.0, 1.0, 1.0), (-1.0, 0.0, 1.0)]);
        let wb2s = Wb2s::new(snap, Box::new(Constant(0.25)), 4.0);
        let v = wb2s.evaluate(&[0.5]);
        assert!((v - (4.0 * 0.25 - (2.0 - 0.5))).abs() < 1e-12, "{v}");
    }
}
