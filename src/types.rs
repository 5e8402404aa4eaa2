//! Core types shared across the crate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point of the design space, one coordinate per dimension.
pub type DesignPoint = Vec<f64>;

/// Box bounds of the design space: one `(low, high)` pair per dimension.
///
/// # Examples
///
/// ```
/// use egomoo::Bounds;
///
/// let xlimits = Bounds::new(vec![(0.0, 1.0), (-5.0, 5.0)]).unwrap();
/// assert_eq!(xlimits.ndim(), 2);
/// assert!(xlimits.contains(&[0.5, 4.0]));
/// assert_eq!(xlimits.clamp(&[2.0, -9.0]), vec![1.0, -5.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    limits: Vec<(f64, f64)>,
}

impl Bounds {
    /// Creates bounds from `(low, high)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBounds`] for zero dimensions and
    /// [`Error::InvalidBounds`] if a pair is not finite or `low > high`.
    pub fn new(limits: Vec<(f64, f64)>) -> Result<Self> {
        let bounds = Self { limits };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that the bounds describe a non-empty box.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bounds::new`].
    pub fn validate(&self) -> Result<()> {
        if self.limits.is_empty() {
            return Err(Error::EmptyBounds);
        }
        for (dim, &(low, high)) in self.limits.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() || low > high {
                return Err(Error::InvalidBounds { dim, low, high });
            }
        }
        Ok(())
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.limits.len()
    }

    /// The `(low, high)` pairs.
    #[must_use]
    pub fn limits(&self) -> &[(f64, f64)] {
        &self.limits
    }

    /// Lower bounds, one per dimension.
    #[must_use]
    pub fn lower(&self) -> Vec<f64> {
        self.limits.iter().map(|&(lo, _)| lo).collect()
    }

    /// Upper bounds, one per dimension.
    #[must_use]
    pub fn upper(&self) -> Vec<f64> {
        self.limits.iter().map(|&(_, hi)| hi).collect()
    }

    /// Returns `true` if `x` has the right dimension and lies inside the box.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.ndim()
            && x
                .iter()
                .zip(&self.limits)
                .all(|(&v, &(lo, hi))| v >= lo && v <= hi)
    }

    /// Projects `x` componentwise onto the box.
    #[must_use]
    pub fn clamp(&self, x: &[f64]) -> DesignPoint {
        x.iter()
            .zip(&self.limits)
            .map(|(&v, &(lo, hi))| v.clamp(lo, hi))
            .collect()
    }

    /// Checks that `x` has the dimension of the box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_dim(&self, x: &[f64]) -> Result<()> {
        if x.len() == self.ndim() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.ndim(),
                got: x.len(),
            })
        }
    }
}

impl TryFrom<&[[f64; 2]]> for Bounds {
    type Error = Error;

    fn try_from(value: &[[f64; 2]]) -> Result<Self> {
        Self::new(value.iter().map(|&[lo, hi]| (lo, hi)).collect())
    }
}

/// The acquisition policy used to choose the next point to evaluate.
///
/// Fixed for the lifetime of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InfillCriterion {
    /// Probability of improving on the current Pareto front.
    #[default]
    Pi,
    /// Expected hypervolume improvement.
    Ehvi,
    /// Dispersion-based pick among genetic-algorithm candidates.
    Ga,
    /// Watson-Barnes-2 scaled blend of EHVI and surrogate means.
    Wb2s,
}

/// State of the refinement loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    /// `optimize` has not been called yet.
    Uninitialized,
    /// Building the initial design.
    Sampling,
    /// Retraining the surrogate bank.
    Modeling,
    /// Choosing, evaluating and appending one new point.
    Iterating,
    /// Running the genetic solver on the final surrogates.
    Solving,
    /// Delegated to the single-objective strategy.
    SingleObjective,
    /// The result has been produced.
    Done,
    /// The last run returned an error.
    Failed,
}
