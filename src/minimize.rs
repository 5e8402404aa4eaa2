//! Bounded local minimization of cheap scalar functions.
//!
//! Acquisition criteria are maximized by minimizing their negation with a
//! [`BoundedMinimizer`] from a single start point. The default is [`Cobyla`],
//! the derivative-free trust-region solver of the `cobyla` crate. Acquisition
//! surfaces are often flat far from the data, so no gradient is taken.
//!
//! ```
//! use egomoo::Bounds;
//! use egomoo::minimize::{BoundedMinimizer, Cobyla};
//!
//! let bounds = Bounds::new(vec![(-1.0, 1.0), (-1.0, 1.0)]).unwrap();
//! let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] + 0.2).powi(2);
//! let x = Cobyla::new().minimize(&f, &[0.9, 0.9], &bounds);
//! assert!((x[0] - 0.3).abs() < 1e-3 && (x[1] + 0.2).abs() < 1e-3);
//! ```

use cobyla::{Func, RhoBeg, StopTols};

use crate::types::{Bounds, DesignPoint};

/// Minimizes a scalar function inside a box from one start point.
pub trait BoundedMinimizer: Send + Sync {
    /// Returns a point inside `bounds` with `f` no larger than at the
    /// projection of `x0`.
    fn minimize(&self, f: &dyn Fn(&[f64]) -> f64, x0: &[f64], bounds: &Bounds) -> DesignPoint;
}

const DEFAULT_MAX_EVAL: usize = 200;
const DEFAULT_FTOL_REL: f64 = 1e-8;
const DEFAULT_FTOL_ABS: f64 = 1e-12;
const DEFAULT_RHOBEG: f64 = 0.25;

/// COBYLA bounded minimizer.
///
/// - `max_eval`: 200 function evaluations
/// - `ftol_rel`: 1e-8, `ftol_abs`: 1e-12
/// - `rhobeg`: 0.25 of the widest dimension
///
/// The solver only ever sees the function through a projection onto the box,
/// so `f` is never evaluated outside `bounds`. A non-finite value is reported
/// to the solver as `+inf`.
#[derive(Clone, Debug)]
pub struct Cobyla {
    max_eval: usize,
    ftol_rel: f64,
    ftol_abs: f64,
    rhobeg: f64,
}

impl Cobyla {
    /// Creates a minimizer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_eval: DEFAULT_MAX_EVAL,
            ftol_rel: DEFAULT_FTOL_REL,
            ftol_abs: DEFAULT_FTOL_ABS,
            rhobeg: DEFAULT_RHOBEG,
        }
    }

    /// Sets the cap on function evaluations.
    #[must_use]
    pub fn max_eval(mut self, n: usize) -> Self {
        self.max_eval = n;
        self
    }

    /// Sets the relative and absolute stopping tolerances on `f`.
    #[must_use]
    pub fn ftol(mut self, rel: f64, abs: f64) -> Self {
        self.ftol_rel = rel;
        self.ftol_abs = abs;
        self
    }

    /// Sets the initial trust-region radius as a fraction of the widest
    /// dimension.
    #[must_use]
    pub fn rhobeg(mut self, fraction: f64) -> Self {
        self.rhobeg = fraction;
        self
    }
}

impl Default for Cobyla {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedMinimizer for Cobyla {
    fn minimize(&self, f: &dyn Fn(&[f64]) -> f64, x0: &[f64], bounds: &Bounds) -> DesignPoint {
        let start = bounds.clamp(x0);
        let f_start = f(&start);
        let width = bounds
            .limits()
            .iter()
            .map(|&(lo, hi)| hi - lo)
            .fold(0.0, f64::max);
        if !f_start.is_finite() || width <= 0.0 || self.max_eval == 0 {
            return start;
        }

        let objective = |x: &[f64], _: &mut ()| {
            if x.iter().any(|v| v.is_nan()) {
                return f64::INFINITY;
            }
            let v = f(&bounds.clamp(x));
            if v.is_finite() { v } else { f64::INFINITY }
        };
        let cons: Vec<&dyn Func<()>> = Vec::new();

        let x_opt = match cobyla::minimize(
            objective,
            &start,
            bounds.limits(),
            &cons,
            (),
            self.max_eval,
            RhoBeg::All(self.rhobeg * width),
            Some(StopTols {
                ftol_rel: self.ftol_rel,
                ftol_abs: self.ftol_abs,
                ..StopTols::default()
            }),
        ) {
            Ok((_, x, _)) | Err((_, x, _)) => x,
        };

        let candidate = bounds.clamp(&x_opt);
        let f_candidate = f(&candidate);
        if f_candidate.is_finite() && f_candidate <= f_start {
            candidate
        } else {
            start
        }
    }
}
