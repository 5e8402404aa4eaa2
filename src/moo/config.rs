#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Bounds, DesignPoint, InfillCriterion};

/// Options of one optimization run.
///
/// # Defaults
///
/// | Option | Default |
/// |--------|---------|
/// | `criterion` | [`InfillCriterion::Pi`] |
/// | `n_iter` | 10 |
/// | `xlimits` | none (taken from the objective) |
/// | `n_start` | 20 |
/// | `pop_size` / `n_gen` | 100 / 100 |
/// | `q` | 0.5 |
/// | `xdoe` / `ydoe` | none |
/// | `random_state` | none (entropy-seeded) |
/// | `verbose` | `false` |
/// | `beta` | 100.0 |
/// | `mc_points_per_objective` | 100 |
/// | `n_parallel` | 1 |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MooConfig {
    /// Acquisition policy used to choose each new point.
    pub criterion: InfillCriterion,
    /// Number of refinement iterations.
    pub n_iter: usize,
    /// Design-space bounds; falls back to [`Objective::xlimits`](crate::Objective::xlimits).
    pub xlimits: Option<Bounds>,
    /// Size of the sampled initial design.
    pub n_start: usize,
    /// Population size of the genetic searches.
    pub pop_size: usize,
    /// Generations of the genetic searches.
    pub n_gen: usize,
    /// GA dispersion weight of the design-space term, in `[0, 1]`.
    pub q: f64,
    /// Initial design inputs; used only together with `ydoe`.
    pub xdoe: Option<Vec<DesignPoint>>,
    /// Initial design outputs; used only together with `xdoe`.
    pub ydoe: Option<Vec<Vec<f64>>>,
    /// Seed of the run's random stream.
    pub random_state: Option<u64>,
    /// Log progress at info level.
    pub verbose: bool,
    /// WB2S scaling weight.
    pub beta: f64,
    /// Monte-Carlo draws per objective for PI/EHVI with three or more objectives.
    pub mc_points_per_objective: usize,
    /// Points evaluated per iteration on the single-objective path.
    pub n_parallel: usize,
}

impl Default for MooConfig {
    fn default() -> Self {
        Self {
            criterion: InfillCriterion::Pi,
            n_iter: 10,
            xlimits: None,
            n_start: 20,
            pop_size: 100,
            n_gen: 100,
            q: 0.5,
            xdoe: None,
            ydoe: None,
            random_state: None,
            verbose: false,
            beta: 100.0,
            mc_points_per_objective: 100,
            n_parallel: 1,
        }
    }
}

impl MooConfig {
    /// Checks the options that do not depend on the objective.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWeight`] for `q` outside `[0, 1]`,
    /// [`Error::InvalidPopulationSize`] for an empty population, and the
    /// [`Bounds`] errors for invalid `xlimits`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.q) {
            return Err(Error::InvalidWeight(self.q));
        }
        if self.pop_size == 0 {
            return Err(Error::InvalidPopulationSize(self.pop_size));
        }
        if let Some(bounds) = &self.xlimits {
            bounds.validate()?;
        }
        Ok(())
    }

    /// The configured bounds, else the ones `declared` by the objective.
    ///
    /// # Errors
    ///
    /// [`Error::MissingBounds`] when neither is available.
    pub(crate) fn resolve_bounds(&self, declared: Option<Bounds>) -> Result<Bounds> {
        let bounds = self
            .xlimits
            .clone()
            .or(declared)
            .ok_or(Error::MissingBounds)?;
        bounds.validate()?;
        Ok(bounds)
    }

    /// The supplied initial design, when both halves are present.
    pub(crate) fn doe(&self) -> Option<(&[DesignPoint], &[Vec<f64>])> {
        match (&self.xdoe, &self.ydoe) {
            (Some(x), Some(y)) => Some((x.as_slice(), y.as_slice())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = MooConfig::default();
        assert_eq!(c.criterion, InfillCriterion::Pi);
        assert_eq!((c.n_iter, c.n_start, c.pop_size, c.n_gen), (10, 20, 100, 100));
        assert!((c.q - 0.5).abs() < f64::EPSILON);
        assert!((c.beta - 100.0).abs() < f64::EPSILON);
        assert!(c.random_state.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_weight_out_of_range() {
        let c = MooConfig {
            q: 1.5,
            ..MooConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidWeight(_))));
    }

    #[test]
    fn test_bounds_resolution_order() {
        let configured = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let declared = Bounds::new(vec![(-1.0, 1.0), (0.0, 2.0)]).unwrap();

        let c = MooConfig {
            xlimits: Some(configured.clone()),
            ..MooConfig::default()
        };
        assert_eq!(c.resolve_bounds(Some(declared.clone())).unwrap(), configured);

        let c = MooConfig::default();
        assert_eq!(c.resolve_bounds(Some(declared.clone())).unwrap(), declared);
        assert!(matches!(c.resolve_bounds(None), Err(Error::MissingBounds)));
    }

    #[test]
    fn test_half_doe_is_ignored() {
        let c = MooConfig {
            xdoe: Some(vec![vec![0.0]]),
            ..MooConfig::default()
        };
        assert!(c.doe().is_none());
    }
}
