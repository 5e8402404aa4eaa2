//! Initial design of experiments.
//!
//! Before any surrogate can be trained the loop needs a first batch of
//! evaluated points. Either the caller supplies them (`xdoe` / `ydoe`), or a
//! space-filling [`InitialSampler`] draws `n_start` points over the bounds and
//! the objective is evaluated once on the whole batch.
//!
//! | Sampler | Method | Feature flag |
//! |---------|--------|--------------|
//! | [`LatinHypercube`] | Latin hypercube, one stratum per point and dimension | — |
//! | [`SobolSampler`] | Scrambled Sobol sequence (Burley 2020) | `sobol` |

mod lhs;
#[cfg(feature = "sobol")]
mod sobol;

pub use lhs::LatinHypercube;
#[cfg(feature = "sobol")]
pub use sobol::SobolSampler;

use crate::error::{Error, Result};
use crate::objective::{Objective, evaluate_checked};
use crate::sample_set::SampleSet;
use crate::types::{Bounds, DesignPoint};

/// A space-filling sampler over a box.
pub trait InitialSampler: Send + Sync {
    /// Draws `n` points inside `bounds`.
    ///
    /// All randomness must come from `rng` so that runs are reproducible.
    fn sample(&self, bounds: &Bounds, n: usize, rng: &mut fastrand::Rng) -> Vec<DesignPoint>;
}

/// Builds the starting sample set.
///
/// Uses `doe` verbatim when supplied (the objective is not called).
/// Otherwise draws `n_start` points with `sampler` and evaluates them in one
/// call.
pub(crate) fn initial_design<O: Objective + ?Sized>(
    objective: &O,
    bounds: &Bounds,
    doe: Option<(&[DesignPoint], &[Vec<f64>])>,
    n_start: usize,
    sampler: &dyn InitialSampler,
    rng: &mut fastrand::Rng,
) -> Result<SampleSet> {
    if let Some((xdoe, ydoe)) = doe {
        let samples = SampleSet::new(xdoe.to_vec(), ydoe.to_vec())?;
        if samples.is_empty() {
            return Err(Error::EmptyDesign);
        }
        if let Some((row, x)) = samples
            .x()
            .iter()
            .enumerate()
            .find(|(_, x)| x.len() != bounds.ndim())
        {
            return Err(Error::DoeDimensionMismatch {
                row,
                expected: bounds.ndim(),
                got: x.len(),
            });
        }
        trace_debug!(n = samples.len(), "using supplied initial design");
        return Ok(samples);
    }

    if n_start == 0 {
        return Err(Error::EmptyDesign);
    }

    let x = sampler.sample(bounds, n_start, rng);
    let y = evaluate_checked(objective, &x, None)?;
    trace_debug!(n = x.len(), "initial design evaluated");
    SampleSet::new(x, y)
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(vec![(0.0, 1.0), (-2.0, 2.0)]).unwrap()
    }

    #[test]
    fn test_supplied_doe_skips_evaluation() {
        let calls = Cell::new(0);
        let fun = |x: &[DesignPoint]| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(x.iter().map(|p| vec![p[0], p[1]]).collect())
        };
        let xdoe = vec![vec![0.1, 0.0], vec![0.9, 1.0]];
        let ydoe = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let mut rng = fastrand::Rng::with_seed(1);

        let set = initial_design(
            &fun,
            &bounds(),
            Some((xdoe.as_slice(), ydoe.as_slice())),
            20,
            &LatinHypercube,
            &mut rng,
        )
        .unwrap();

        assert_eq!(calls.get(), 0);
        assert_eq!(set.x(), xdoe.as_slice());
        assert_eq!(set.y(), ydoe.as_slice());
    }

    #[test]
    fn test_sampled_design_evaluates_once() {
        let calls = Cell::new(0);
        let fun = |x: &[DesignPoint]| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(x.iter().map(|p| vec![p[0] + p[1]]).collect())
        };
        let mut rng = fastrand::Rng::with_seed(7);

        let set = initial_design(&fun, &bounds(), None, 12, &LatinHypercube, &mut rng).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(set.len(), 12);
        assert!(set.x().iter().all(|x| bounds().contains(x)));
    }

    #[test]
    fn test_zero_start_is_rejected() {
        let fun = |x: &[DesignPoint]| Ok::<_, String>(x.iter().map(|_| vec![0.0]).collect());
        let mut rng = fastrand::Rng::with_seed(0);
        let err = initial_design(&fun, &bounds(), None, 0, &LatinHypercube, &mut rng).unwrap_err();
        assert!(matches!(err, Error::EmptyDesign));
    }

    #[test]
    fn test_supplied_doe_with_wrong_dimension() {
        let fun = |x: &[DesignPoint]| Ok::<_, String>(x.iter().map(|_| vec![0.0]).collect());
        let xdoe = vec![vec![0.1, 0.5], vec![0.1]];
        let ydoe = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let mut rng = fastrand::Rng::with_seed(0);
        let err = initial_design(
            &fun,
            &bounds(),
            Some((xdoe.as_slice(), ydoe.as_slice())),
            5,
            &LatinHypercube,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DoeDimensionMismatch {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
        assert!(err.is_configuration());
    }
}
