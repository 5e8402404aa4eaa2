//! The [`Objective`] trait defines the expensive function being optimized.
//!
//! An objective takes a batch of design points and returns one row of
//! objective values per point. A row of length 1 makes the problem
//! single-objective; longer rows make it multi-objective. Every objective is
//! minimized.
//!
//! Closures returning `Result<Vec<Vec<f64>>, E>` implement [`Objective`]
//! directly:
//!
//! ```
//! use egomoo::{DesignPoint, Objective};
//!
//! let fun = |x: &[DesignPoint]| {
//!     Ok::<_, String>(x.iter().map(|p| vec![p[0], 1.0 - p[0]]).collect::<Vec<_>>())
//! };
//! let y = fun.evaluate(&[vec![0.25]]).unwrap();
//! assert_eq!(y, vec![vec![0.25, 0.75]]);
//! ```
//!
//! Implement the trait on a struct to declare the design-space bounds next to
//! the function, so they do not have to be configured separately:
//!
//! ```
//! use egomoo::{Bounds, DesignPoint, Objective};
//!
//! struct Schaffer;
//!
//! impl Objective for Schaffer {
//!     type Error = String;
//!
//!     fn evaluate(&self, x: &[DesignPoint]) -> Result<Vec<Vec<f64>>, String> {
//!         Ok(x.iter().map(|p| vec![p[0] * p[0], (p[0] - 2.0).powi(2)]).collect())
//!     }
//!
//!     fn xlimits(&self) -> Option<Bounds> {
//!         Bounds::new(vec![(-10.0, 10.0)]).ok()
//!     }
//! }
//!
//! assert_eq!(Schaffer.xlimits().unwrap().ndim(), 1);
//! ```

use crate::error::{Error, Result};
use crate::types::{Bounds, DesignPoint};

/// An expensive, vector-valued black-box function to minimize.
pub trait Objective {
    /// The error type returned by [`evaluate`](Objective::evaluate).
    type Error: ToString;

    /// Evaluates the function on a batch of points.
    ///
    /// Must return exactly one row per input point, every row with the same
    /// number of objective values.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`; it aborts the run.
    fn evaluate(&self, x: &[DesignPoint]) -> core::result::Result<Vec<Vec<f64>>, Self::Error>;

    /// Bounds declared by the function itself, used when none are configured.
    fn xlimits(&self) -> Option<Bounds> {
        None
    }
}

impl<F, E> Objective for F
where
    F: Fn(&[DesignPoint]) -> core::result::Result<Vec<Vec<f64>>, E>,
    E: ToString,
{
    type Error = E;

    fn evaluate(&self, x: &[DesignPoint]) -> core::result::Result<Vec<Vec<f64>>, E> {
        self(x)
    }
}

/// An objective paired with its declared bounds.
///
/// Created by [`with_bounds`].
pub struct Bounded<O> {
    inner: O,
    bounds: Bounds,
}

impl<O: Objective> Objective for Bounded<O> {
    type Error = O::Error;

    fn evaluate(&self, x: &[DesignPoint]) -> core::result::Result<Vec<Vec<f64>>, O::Error> {
        self.inner.evaluate(x)
    }

    fn xlimits(&self) -> Option<Bounds> {
        Some(self.bounds.clone())
    }
}

/// Attaches declared bounds to an objective (typically a closure).
///
/// ```
/// use egomoo::objective::with_bounds;
/// use egomoo::{Bounds, DesignPoint, Objective};
///
/// let fun = with_bounds(
///     |x: &[DesignPoint]| Ok::<_, String>(x.iter().map(|p| vec![p[0], -p[0]]).collect::<Vec<_>>()),
///     Bounds::new(vec![(0.0, 1.0)]).unwrap(),
/// );
/// assert!(fun.xlimits().is_some());
/// ```
pub fn with_bounds<O: Objective>(objective: O, bounds: Bounds) -> Bounded<O> {
    Bounded {
        inner: objective,
        bounds,
    }
}

/// Evaluates `objective` and checks the shape of its output.
///
/// `n_obj` is the expected row length, or `None` to accept any consistent
/// non-zero length.
pub(crate) fn evaluate_checked<O: Objective + ?Sized>(
    objective: &O,
    x: &[DesignPoint],
    n_obj: Option<usize>,
) -> Result<Vec<Vec<f64>>> {
    let y = objective
        .evaluate(x)
        .map_err(|e| Error::Evaluation(e.to_string()))?;

    if y.len() != x.len() {
        return Err(Error::ObjectiveDimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let expected = n_obj.or_else(|| y.first().map(Vec::len)).unwrap_or(1);
    if let Some(bad) = y.iter().find(|row| row.len() != expected || row.is_empty()) {
        return Err(Error::ObjectiveDimensionMismatch {
            expected: expected.max(1),
            got: bad.len(),
        });
    }
    Ok(y)
}
