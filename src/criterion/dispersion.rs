use std::sync::Arc;

use super::Acquisition;
use crate::genetic::ParetoSet;
use crate::stats::{euclidean, mean, variance};
use crate::surrogate::BankSnapshot;

/// GA dispersion criterion.
///
/// Scores genetic-algorithm candidates by how far they sit from the training
/// data, in the design space and in the objective space:
///
/// ```text
/// score(x) = q (d_x(x) - mean_x) / var_x + (1 - q) (d_f(x) - mean_f) / var_f
/// ```
///
/// where `d_x` is the mean distance to the training inputs, `d_f` the mean
/// distance of the predicted objectives to the training outputs, and the
/// mean and (population) variance are taken over the candidate set.
pub struct Dispersion {
    snapshot: Arc<BankSnapshot>,
    q: f64,
    candidates: ParetoSet,
    design_terms: Vec<f64>,
    objective_terms: Vec<f64>,
    design_stats: (f64, f64),
    objective_stats: (f64, f64),
}

impl Dispersion {
    /// Builds the criterion over `candidates` (design points with their
    /// predicted objective vectors) and the weight `q` in `[0, 1]`.
    #[must_use]
    pub fn new(snapshot: Arc<BankSnapshot>, candidates: ParetoSet, q: f64) -> Self {
        let (design_terms, objective_terms): (Vec<f64>, Vec<f64>) = candidates
            .x
            .iter()
            .zip(&candidates.f)
            .map(|(x, f)| distances(&snapshot, x, f))
            .unzip();
        let design_stats = (mean(&design_terms), variance(&design_terms));
        let objective_stats = (mean(&objective_terms), variance(&objective_terms));
        Self {
            snapshot,
            q,
            candidates,
            design_terms,
            objective_terms,
            design_stats,
            objective_stats,
        }
    }

    /// `true` when either term is constant over the candidates and the
    /// standardized score is undefined.
    ///
    /// Terms that are equal up to rounding of their mean count as constant.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        is_constant(self.design_stats) || is_constant(self.objective_stats)
    }

    fn combine(&self, design: f64, objective: f64) -> f64 {
        let (mx, vx) = self.design_stats;
        let (mf, vf) = self.objective_stats;
        self.q * (design - mx) / vx + (1.0 - self.q) * (objective - mf) / vf
    }

    /// Index of the best candidate; the first one when the criterion is
    /// degenerate. `None` for an empty candidate set.
    #[must_use]
    pub fn select(&self) -> Option<usize> {
        if self.candidates.is_empty() {
            return None;
        }
        if self.is_degenerate() {
            return Some(0);
        }
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, (&dx, &df)) in self
            .design_terms
            .iter()
            .zip(&self.objective_terms)
            .enumerate()
        {
            let score = self.combine(dx, df);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        Some(best)
    }

    /// The candidate set.
    #[must_use]
    pub fn candidates(&self) -> &ParetoSet {
        &self.candidates
    }
}

impl Acquisition for Dispersion {
    fn evaluate(&self, x: &[f64]) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let f = self.snapshot.predict_means(x);
        let (dx, df) = distances(&self.snapshot, x, &f);
        self.combine(dx, df)
    }
}

/// Variance at or below the rounding noise of the mean.
fn is_constant((mean, var): (f64, f64)) -> bool {
    var <= (4.0 * f64::EPSILON * mean.abs()).powi(2)
}

/// Mean distance of `x` to the training inputs and of `f` to the training
/// outputs.
fn distances(snapshot: &BankSnapshot, x: &[f64], f: &[f64]) -> (f64, f64) {
    let training = snapshot.training();
    let dx: Vec<f64> = training.x().iter().map(|t| euclidean(x, t)).collect();
    let df: Vec<f64> = training.y().iter().map(|t| euclidean(f, t)).collect();
    (mean(&dx), mean(&df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::testing::snapshot;
    use crate::sample_set::SampleSet;

    fn samples() -> SampleSet {
        SampleSet::new(
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_equidistant_candidates_pick_first() {
        let snap = snapshot(&samples(), vec![(0.0, 0.5, 1.0), (0.0, 0.5, 1.0)]);
        // Both candidates are at the same distance from the training data in
        // both spaces.
        let candidates = ParetoSet {
            x: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            f: vec![vec![0.5, 0.5], vec![0.5, 0.5]],
        };
        let d = Dispersion::new(snap, candidates, 0.5);
        assert!(d.is_degenerate());
        assert_eq!(d.select(), Some(0));
        assert!(d.evaluate(&[0.3, 0.3]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_equal_distances_up_to_rounding_pick_first() {
        let training = SampleSet::new(vec![vec![0.0, 0.0]], vec![vec![0.0, 0.0]]).unwrap();
        let snap = snapshot(&training, vec![(0.0, 0.0, 1.0); 2]);
        // Every candidate sits exactly 0.1 away from the single training
        // point; the mean of the distances is not exactly 0.1.
        let candidates = ParetoSet {
            x: vec![vec![0.1, 0.0], vec![0.0, 0.1], vec![-0.1, 0.0]],
            f: vec![vec![0.1, 0.1], vec![5.0, 5.0], vec![1.0, 1.0]],
        };
        let d = Dispersion::new(snap, candidates, 0.0);
        assert!(d.is_degenerate());
        assert_eq!(d.select(), Some(0));
    }

    #[test]
    fn test_design_weight_prefers_remote_point() {
        let snap = snapshot(&samples(), vec![(1.0, 0.0, 1.0), (1.0, 0.0, 1.0)]);
        let candidates = ParetoSet {
            x: vec![vec![0.5, 0.5], vec![3.0, 3.0], vec![0.2, 0.1]],
            f: vec![vec![0.4, 0.6], vec![0.9, 0.2], vec![0.1, 0.3]],
        };
        let d = Dispersion::new(snap, candidates, 1.0);
        assert!(!d.is_degenerate());
        assert_eq!(d.select(), Some(1));
    }

    #[test]
    fn test_objective_weight_prefers_remote_prediction() {
        let snap = snapshot(&samples(), vec![(1.0, 0.0, 1.0), (1.0, 0.0, 1.0)]);
        let candidates = ParetoSet {
            x: vec![vec![0.5, 0.5], vec![3.0, 3.0], vec![0.2, 0.1]],
            f: vec![vec![0.4, 0.6], vec![0.9, 0.2], vec![5.0, -4.0]],
        };
        let d = Dispersion::new(snap, candidates, 0.0);
        assert_eq!(d.select(), Some(2));
    }

    #[test]
    fn test_empty_candidates() {
        let snap = snapshot(&samples(), vec![(0.0, 0.0, 1.0); 2]);
        let d = Dispersion::new(snap, ParetoSet::default(), 0.5);
        assert_eq!(d.select(), None);
    }
}
