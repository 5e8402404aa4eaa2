//! Accumulated evaluations of the expensive objective.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pareto;
use crate::types::DesignPoint;

/// Ordered `(x, y)` pairs: design points and their objective vectors.
///
/// Append-only; every row of `y` has the same number of objectives.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleSet {
    x: Vec<DesignPoint>,
    y: Vec<Vec<f64>>,
}

impl SampleSet {
    /// Builds a sample set from matching input and output rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DoeShapeMismatch`] when the row counts differ and
    /// [`Error::ObjectiveDimensionMismatch`] when the output rows do not all
    /// have the same length.
    pub fn new(x: Vec<DesignPoint>, y: Vec<Vec<f64>>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DoeShapeMismatch {
                n_x: x.len(),
                n_y: y.len(),
            });
        }
        if let Some(first) = y.first() {
            let n_obj = first.len();
            if let Some(bad) = y.iter().find(|row| row.len() != n_obj || row.is_empty()) {
                return Err(Error::ObjectiveDimensionMismatch {
                    expected: n_obj.max(1),
                    got: bad.len(),
                });
            }
        }
        Ok(Self { x, y })
    }

    /// Appends one evaluated point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectiveDimensionMismatch`] if `y` does not have
    /// [`n_obj`](Self::n_obj) values.
    pub fn push(&mut self, x: DesignPoint, y: Vec<f64>) -> Result<()> {
        if !self.y.is_empty() && y.len() != self.n_obj() {
            return Err(Error::ObjectiveDimensionMismatch {
                expected: self.n_obj(),
                got: y.len(),
            });
        }
        self.x.push(x);
        self.y.push(y);
        Ok(())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` when no sample has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Number of objectives (0 when empty).
    #[must_use]
    pub fn n_obj(&self) -> usize {
        self.y.first().map_or(0, Vec::len)
    }

    /// Design points, in insertion order.
    #[must_use]
    pub fn x(&self) -> &[DesignPoint] {
        &self.x
    }

    /// Objective vectors, in insertion order.
    #[must_use]
    pub fn y(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// The values of one objective across all samples.
    #[must_use]
    pub fn column(&self, objective: usize) -> Vec<f64> {
        self.y.iter().map(|row| row[objective]).collect()
    }

    /// Per-objective maximum of the observed values.
    #[must_use]
    pub fn max_per_objective(&self) -> Vec<f64> {
        (0..self.n_obj())
            .map(|j| {
                self.y
                    .iter()
                    .map(|row| row[j])
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }

    /// Non-dominated observed objective vectors.
    #[must_use]
    pub fn pareto_front(&self) -> Vec<Vec<f64>> {
        pareto::pareto_front(&self.y)
    }

    /// Index of the sample with the lowest value of `objective`.
    #[must_use]
    pub fn best_index(&self, objective: usize) -> Option<usize> {
        self.y
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a[objective].total_cmp(&b[objective]))
            .map(|(i, _)| i)
    }
}
