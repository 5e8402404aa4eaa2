//! Gaussian process surrogate with a Matérn 5/2 kernel.
//!
//! Inputs are normalized to the unit cube with the design-space bounds,
//! outputs are standardized (zero mean, unit variance). ARD lengthscales are
//! set to the per-dimension standard deviation of the normalized training
//! inputs and the GP is fitted by Cholesky decomposition of `K + σ²I`.
//! Predictions are returned on the original output scale.
//!
//! # Examples
//!
//! ```
//! use egomoo::surrogate::{GpBuilder, Surrogate, SurrogateBuilder};
//! use egomoo::Bounds;
//!
//! let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
//! let x: Vec<Vec<f64>> = (0..6).map(|i| vec![f64::from(i) / 5.0]).collect();
//! let y: Vec<f64> = x.iter().map(|p| (6.0 * p[0]).sin()).collect();
//!
//! let gp = GpBuilder::new().train(&x, &y, &bounds).unwrap();
//! let (mean, var) = gp.predict(&[0.4]);
//! assert!((mean - (6.0_f64 * 0.4).sin()).abs() < 1e-3);
//! assert!(var < 1e-3);
//! ```

use nalgebra::{DMatrix, DVector};

use super::{Surrogate, SurrogateBuilder};
use crate::types::{Bounds, DesignPoint};

/// Default observation noise variance (on the standardized scale).
const DEFAULT_NOISE_VAR: f64 = 1e-6;

/// Number of noise levels tried (×10 each) when the factorization fails.
const MAX_JITTER_STEPS: i32 = 5;

/// Precomputed √5 constant.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Builder for [`GaussianProcess`] surrogates.
///
/// - `noise_variance`: 1e-6
#[derive(Clone, Debug)]
pub struct GpBuilder {
    noise_variance: f64,
}

impl GpBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            noise_variance: DEFAULT_NOISE_VAR,
        }
    }

    /// Sets the observation noise variance added to the kernel diagonal.
    ///
    /// Larger values make the GP smoother and the fit more robust to
    /// near-duplicate inputs.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = v;
        self
    }
}

impl Default for GpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SurrogateBuilder for GpBuilder {
    fn train(
        &self,
        x: &[DesignPoint],
        y: &[f64],
        bounds: &Bounds,
    ) -> core::result::Result<Box<dyn Surrogate>, String> {
        GaussianProcess::fit(x, y, bounds, self.noise_variance)
            .map(|gp| Box::new(gp) as Box<dyn Surrogate>)
    }
}

/// A fitted Gaussian process.
pub struct GaussianProcess {
    /// Cholesky factor L of K + σ²I.
    cholesky: nalgebra::linalg::Cholesky<f64, nalgebra::Dyn>,
    /// α = (K + σ²I)^{-1} y.
    alpha: DVector<f64>,
    /// Training inputs normalized to [0, 1].
    x_train: Vec<Vec<f64>>,
    lengthscales: Vec<f64>,
    signal_var: f64,
    bounds: Bounds,
    y_mean: f64,
    y_std: f64,
}

impl GaussianProcess {
    /// Fits a GP on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails on empty or mismatched data, non-finite outputs, or when the
    /// kernel matrix is not positive definite.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(
        x: &[DesignPoint],
        y: &[f64],
        bounds: &Bounds,
        noise_var: f64,
    ) -> core::result::Result<Self, String> {
        let n = y.len();
        if n == 0 {
            return Err("no training data".into());
        }
        if x.len() != n {
            return Err(format!("{} inputs for {n} outputs", x.len()));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err("non-finite training output".into());
        }

        let y_mean = y.iter().sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            y.iter().map(|&v| (v - y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            1.0
        };
        // Constant outputs keep a unit scale.
        let y_std = if y_var > 1e-20 { y_var.sqrt() } else { 1.0 };
        let y_standardized: Vec<f64> = y.iter().map(|&v| (v - y_mean) / y_std).collect();

        let x_train: Vec<Vec<f64>> = x.iter().map(|p| normalize(p, bounds)).collect();

        let d = bounds.ndim();
        let lengthscales: Vec<f64> = (0..d)
            .map(|j| {
                let mean_j = x_train.iter().map(|p| p[j]).sum::<f64>() / n as f64;
                let var_j =
                    x_train.iter().map(|p| (p[j] - mean_j).powi(2)).sum::<f64>() / n as f64;
                var_j.sqrt().max(0.01)
            })
            .collect();

        let signal_var = 1.0;

        // Near-duplicate inputs: retry with growing jitter before giving up.
        let cholesky = (0..MAX_JITTER_STEPS)
            .map(|step| noise_var * 10f64.powi(step))
            .find_map(|jitter| {
                let k = kernel_matrix(&x_train, &lengthscales, signal_var, jitter);
                nalgebra::linalg::Cholesky::new(k)
            })
            .ok_or_else(|| "kernel matrix is not positive definite".to_string())?;

        let alpha = cholesky.solve(&DVector::from_column_slice(&y_standardized));

        Ok(Self {
            cholesky,
            alpha,
            x_train,
            lengthscales,
            signal_var,
            bounds: bounds.clone(),
            y_mean,
            y_std,
        })
    }

    /// Mean and variance on the standardized scale.
    fn predict_standardized(&self, x: &[f64]) -> (f64, f64) {
        let x = normalize(x, &self.bounds);
        let k_star = DVector::from_fn(self.x_train.len(), |i, _| {
            matern52(&x, &self.x_train[i], &self.lengthscales, self.signal_var)
        });

        let mean = k_star.dot(&self.alpha);
        let v = self.cholesky.solve(&k_star);
        let var = (self.signal_var - k_star.dot(&v)).max(0.0);
        (mean, var)
    }
}

impl Surrogate for GaussianProcess {
    fn predict_mean(&self, x: &[f64]) -> f64 {
        self.y_mean + self.y_std * self.predict_standardized(x).0
    }

    fn predict_variance(&self, x: &[f64]) -> f64 {
        self.y_std * self.y_std * self.predict_standardized(x).1
    }

    fn predict(&self, x: &[f64]) -> (f64, f64) {
        let (mean, var) = self.predict_standardized(x);
        (self.y_mean + self.y_std * mean, self.y_std * self.y_std * var)
    }
}

/// Map a point of the design space to the unit cube.
fn normalize(x: &[f64], bounds: &Bounds) -> Vec<f64> {
    x.iter()
        .zip(bounds.limits())
        .map(|(&v, &(lo, hi))| {
            if (hi - lo).abs() < 1e-15 {
                0.5
            } else {
                (v - lo) / (hi - lo)
            }
        })
        .collect()
}

/// Matérn 5/2 kernel with ARD lengthscales:
/// `σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`.
fn matern52(x1: &[f64], x2: &[f64], lengthscales: &[f64], signal_var: f64) -> f64 {
    let r_sq: f64 = x1
        .iter()
        .zip(x2)
        .zip(lengthscales)
        .map(|((a, b), l)| ((a - b) / l).powi(2))
        .sum();
    let scaled = SQRT_5 * r_sq.sqrt();
    signal_var * (1.0 + scaled + 5.0 / 3.0 * r_sq) * (-scaled).exp()
}

/// Symmetric training covariance with `jitter` on the diagonal.
fn kernel_matrix(
    x: &[DesignPoint],
    lengthscales: &[f64],
    signal_var: f64,
    jitter: f64,
) -> DMatrix<f64> {
    let n = x.len();
    let mut k = DMatrix::from_element(n, n, 0.0);
    for i in 0..n {
        k[(i, i)] = signal_var + jitter;
        for j in 0..i {
            let v = matern52(&x[i], &x[j], lengthscales, signal_var);
            k[(i, j)] = v;
            k[(j, i)] = v;
        }
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds(d: usize) -> Bounds {
        Bounds::new(vec![(0.0, 1.0); d]).unwrap()
    }

    #[test]
    fn test_interpolates_training_points() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]];
        let y: Vec<f64> = x.iter().map(|p| p[0] * 3.0 - p[1]).collect();
        let gp = GaussianProcess::fit(&x, &y, &unit_bounds(2), 1e-8).unwrap();

        for (p, &v) in x.iter().zip(&y) {
            let (mean, var) = gp.predict(p);
            assert!((mean - v).abs() < 1e-3, "mean {mean} vs {v}");
            assert!(var < 1e-4, "variance at training point {var}");
        }
    }

    #[test]
    fn test_variance_grows_away_from_data() {
        let x = vec![vec![0.0], vec![0.1], vec![0.2]];
        let y = vec![1.0, 2.0, 1.5];
        let gp = GaussianProcess::fit(&x, &y, &unit_bounds(1), 1e-6).unwrap();
        assert!(gp.predict_variance(&[0.9]) > gp.predict_variance(&[0.1]));
    }

    #[test]
    fn test_constant_outputs_fit() {
        let x = vec![vec![0.2], vec![0.8]];
        let y = vec![4.0, 4.0];
        let gp = GaussianProcess::fit(&x, &y, &unit_bounds(1), 1e-6).unwrap();
        assert!((gp.predict_mean(&[0.5]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_bad_data() {
        let b = unit_bounds(1);
        assert!(GaussianProcess::fit(&[], &[], &b, 1e-6).is_err());
        assert!(GaussianProcess::fit(&[vec![0.0]], &[f64::NAN], &b, 1e-6).is_err());
        assert!(GaussianProcess::fit(&[vec![0.0]], &[1.0, 2.0], &b, 1e-6).is_err());
    }

    #[test]
    fn test_original_scale_predictions() {
        let x = vec![vec![0.0], vec![5.0], vec![10.0]];
        let y = vec![100.0, 200.0, 300.0];
        let b = Bounds::new(vec![(0.0, 10.0)]).unwrap();
        let gp = GaussianProcess::fit(&x, &y, &b, 1e-8).unwrap();
        assert!((gp.predict_mean(&[5.0]) - 200.0).abs() < 0.1);
    }
}
