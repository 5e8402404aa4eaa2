//! Pareto front analysis for minimization problems.
//!
//! Every objective is minimized. A solution **dominates** another if it is no
//! worse in every objective and strictly better in at least one.
//!
//! | Function | Purpose |
//! |---|---|
//! | [`dominates`] | Pairwise Pareto dominance |
//! | [`is_dominated`] | Is a point dominated by any member of a front |
//! | [`non_dominated_sort`] | Rank solutions into successive fronts (front 0, 1, …) |
//! | [`pareto_front_indices`] | Filter to non-dominated solutions only |
//! | [`crowding_distance`] | Spread of the solutions within one front |
//! | [`hypervolume`] | Volume dominated by a front and bounded by a reference point |
//!
//! # Example
//!
//! ```
//! use egomoo::pareto::{hypervolume, non_dominated_sort, pareto_front_indices};
//!
//! let solutions = vec![
//!     vec![1.0, 5.0],
//!     vec![5.0, 1.0],
//!     vec![3.0, 3.0],
//!     vec![4.0, 4.0], // dominated by (3, 3)
//! ];
//!
//! let fronts = non_dominated_sort(&solutions);
//! assert_eq!(fronts.len(), 2);
//!
//! let mut front = pareto_front_indices(&solutions);
//! front.sort_unstable();
//! assert_eq!(front, vec![0, 1, 2]);
//!
//! let values: Vec<_> = front.iter().map(|&i| solutions[i].clone()).collect();
//! assert!(hypervolume(&values, &[6.0, 6.0]) > 0.0);
//! ```

/// Returns `true` if `a` Pareto-dominates `b` under minimization.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());

    let mut strictly_better = false;
    for (&av, &bv) in a.iter().zip(b) {
        if av > bv {
            return false;
        }
        if av < bv {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Returns `true` if any member of `front` dominates `point`.
#[must_use]
pub fn is_dominated(point: &[f64], front: &[Vec<f64>]) -> bool {
    front.iter().any(|z| dominates(z, point))
}

/// Fast non-dominated sorting (Deb et al., 2002).
///
/// Returns `fronts` where `fronts[0]` is the Pareto front and each inner vec
/// holds indices into `values`. Complexity: O(M * N^2).
#[must_use]
pub fn non_dominated_sort(values: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    // S_p: set of solutions dominated by p
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    // n_p: domination count for p
    let mut domination_count: Vec<usize> = vec![0; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&values[i], &values[j]) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&values[j], &values[i]) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current_front: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current_front.is_empty() {
        let mut next_front: Vec<usize> = Vec::new();
        for &p in &current_front {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next_front.push(q);
                }
            }
        }
        fronts.push(current_front);
        current_front = next_front;
    }

    fronts
}

/// Indices of the non-dominated solutions, in ascending index order.
#[must_use]
pub fn pareto_front_indices(values: &[Vec<f64>]) -> Vec<usize> {
    let mut front = non_dominated_sort(values)
        .into_iter()
        .next()
        .unwrap_or_default();
    front.sort_unstable();
    front
}

/// The non-dominated subset of `values`, in original order.
#[must_use]
pub fn pareto_front(values: &[Vec<f64>]) -> Vec<Vec<f64>> {
    pareto_front_indices(values)
        .into_iter()
        .map(|i| values[i].clone())
        .collect()
}

/// Crowding distance for the members of one front given by index.
///
/// Boundary solutions get `f64::INFINITY`. One value per entry of
/// `front_indices`, same order.
pub(crate) fn crowding_distance_indexed(front_indices: &[usize], values: &[Vec<f64>]) -> Vec<f64> {
    let n = front_indices.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = values[front_indices[0]].len();
    let mut distances = vec![0.0_f64; n];

    let val = |front_pos: usize, obj: usize| -> f64 { values[front_indices[front_pos]][obj] };

    for obj in 0..m {
        let mut sorted: Vec<usize> = (0..n).collect();
        sorted.sort_by(|&a, &b| val(a, obj).total_cmp(&val(b, obj)));

        distances[sorted[0]] = f64::INFINITY;
        distances[sorted[n - 1]] = f64::INFINITY;

        let range = val(sorted[n - 1], obj) - val(sorted[0], obj);
        if range > 0.0 {
            for i in 1..(n - 1) {
                distances[sorted[i]] += (val(sorted[i + 1], obj) - val(sorted[i - 1], obj)) / range;
            }
        }
    }

    distances
}

/// Crowding distance of every solution in `front`.
///
/// Boundary solutions (extreme in any objective) receive [`f64::INFINITY`].
#[must_use]
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let indices: Vec<usize> = (0..front.len()).collect();
    crowding_distance_indexed(&indices, front)
}

/// Hypervolume dominated by `front` and bounded by `reference_point`.
///
/// Points that do not strictly dominate the reference point are ignored.
/// Uses recursive slicing on the last objective.
#[must_use]
pub fn hypervolume(front: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let d = reference_point.len();
    debug_assert!(front.iter().all(|p| p.len() == d));

    let filtered: Vec<Vec<f64>> = front
        .iter()
        .filter(|p| p.iter().zip(reference_point).all(|(&pv, &rv)| pv < rv))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return 0.0;
    }

    hv_recursive(&filtered, reference_point)
}

/// Recursive hypervolume via slicing on the last objective.
///
/// All points are dominated by `reference`.
fn hv_recursive(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let d = reference.len();

    if d == 1 {
        let min_val = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - min_val).max(0.0);
    }

    if points.len() == 1 {
        return points[0]
            .iter()
            .zip(reference)
            .map(|(&p, &r)| (r - p).max(0.0))
            .product();
    }

    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[d - 1].total_cmp(&b[d - 1]));

    let sub_ref = &reference[..d - 1];
    let mut result = 0.0;

    for i in 0..sorted.len() {
        let height = if i + 1 < sorted.len() {
            sorted[i + 1][d - 1] - sorted[i][d - 1]
        } else {
            reference[d - 1] - sorted[i][d - 1]
        };

        if height <= 0.0 {
            continue;
        }

        // Project points[0..=i] onto the first d-1 objectives and keep the
        // non-dominated subset.
        let projected: Vec<Vec<f64>> = sorted[..=i].iter().map(|p| p[..d - 1].to_vec()).collect();
        let non_dom = pareto_front(&projected);

        if !non_dom.is_empty() {
            result += height * hv_recursive(&non_dom, sub_ref);
        }
    }

    result
}
