//! Surrogate models of the expensive objectives.
//!
//! A [`SurrogateBuilder`] fits one [`Surrogate`] on the samples of one
//! objective. The [`SurrogateBank`] owns one surrogate per objective and
//! publishes them as an immutable, versioned [`BankSnapshot`] that acquisition
//! criteria and the genetic solver read from.
//!
//! The default builder is [`GpBuilder`], a Gaussian process with a Matérn 5/2
//! kernel.

mod bank;
mod gp;

pub use bank::{BankSnapshot, SurrogateBank};
pub use gp::{GaussianProcess, GpBuilder};

use crate::types::{Bounds, DesignPoint};

/// A trained, cheap approximation of one objective.
pub trait Surrogate: Send + Sync {
    /// Predicted mean at `x`.
    fn predict_mean(&self, x: &[f64]) -> f64;

    /// Predicted variance at `x` (non-negative).
    fn predict_variance(&self, x: &[f64]) -> f64;

    /// Predicted mean and variance at `x`.
    fn predict(&self, x: &[f64]) -> (f64, f64) {
        (self.predict_mean(x), self.predict_variance(x))
    }
}

/// Fits a [`Surrogate`] on `(x, y)` pairs of one objective.
pub trait SurrogateBuilder: Send + Sync {
    /// Trains a new surrogate.
    ///
    /// `bounds` are the design-space bounds the inputs live in.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure when the model cannot be fitted;
    /// the bank reports it as [`Error::SurrogateTraining`](crate::Error::SurrogateTraining).
    fn train(
        &self,
        x: &[DesignPoint],
        y: &[f64],
        bounds: &Bounds,
    ) -> core::result::Result<Box<dyn Surrogate>, String>;
}
