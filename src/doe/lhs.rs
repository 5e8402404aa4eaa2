use super::InitialSampler;
use crate::rng_util;
use crate::types::{Bounds, DesignPoint};

/// Latin hypercube sampler.
///
/// Each dimension is cut into `n` equal strata and every stratum receives
/// exactly one point, at a uniformly random position inside it. Strata are
/// paired across dimensions by independent random permutations.
///
/// # Examples
///
/// ```
/// use egomoo::doe::{InitialSampler, LatinHypercube};
/// use egomoo::Bounds;
///
/// let bounds = Bounds::new(vec![(0.0, 1.0), (10.0, 20.0)]).unwrap();
/// let mut rng = fastrand::Rng::with_seed(3);
/// let points = LatinHypercube.sample(&bounds, 8, &mut rng);
/// assert_eq!(points.len(), 8);
/// assert!(points.iter().all(|p| bounds.contains(p)));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LatinHypercube;

impl InitialSampler for LatinHypercube {
    #[allow(clippy::cast_precision_loss)]
    fn sample(&self, bounds: &Bounds, n: usize, rng: &mut fastrand::Rng) -> Vec<DesignPoint> {
        if n == 0 {
            return Vec::new();
        }
        let mut points = vec![Vec::with_capacity(bounds.ndim()); n];
        let width = 1.0 / n as f64;

        for &(lo, hi) in bounds.limits() {
            let mut strata: Vec<usize> = (0..n).collect();
            rng.shuffle(&mut strata);
            for (point, &k) in points.iter_mut().zip(&strata) {
                let u = (k as f64 + rng_util::f64_range(rng, 0.0, 1.0)) * width;
                point.push((lo + u * (hi - lo)).clamp(lo, hi));
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn test_one_point_per_stratum() {
        let bounds = Bounds::new(vec![(0.0, 1.0), (-1.0, 1.0), (5.0, 6.0)]).unwrap();
        let mut rng = fastrand::Rng::with_seed(42);
        let n = 10;
        let points = LatinHypercube.sample(&bounds, n, &mut rng);

        for (d, &(lo, hi)) in bounds.limits().iter().enumerate() {
            let mut seen = vec![false; n];
            for p in &points {
                let u = (p[d] - lo) / (hi - lo);
                let k = ((u * n as f64) as usize).min(n - 1);
                assert!(!seen[k], "stratum {k} of dimension {d} hit twice");
                seen[k] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let bounds = Bounds::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap();
        let a = LatinHypercube.sample(&bounds, 5, &mut fastrand::Rng::with_seed(9));
        let b = LatinHypercube.sample(&bounds, 5, &mut fastrand::Rng::with_seed(9));
        assert_eq!(a, b);
    }
}
