//! Variation operators on real-coded individuals.

use crate::rng_util;
use crate::types::{Bounds, DesignPoint};

/// Binary tournament: lower rank wins, ties go to the larger crowding distance.
pub(super) fn tournament_select(rng: &mut fastrand::Rng, ranks: &[usize], crowding: &[f64]) -> usize {
    let n = ranks.len();
    let a = rng.usize(0..n);
    let b = rng.usize(0..n);

    if ranks[a] != ranks[b] {
        if ranks[a] < ranks[b] { a } else { b }
    } else if crowding[a] >= crowding[b] {
        a
    } else {
        b
    }
}

/// Simulated binary crossover applied dimension by dimension with
/// probability `crossover_prob` per pair.
pub(super) fn sbx_crossover(
    rng: &mut fastrand::Rng,
    parent1: &[f64],
    parent2: &[f64],
    bounds: &Bounds,
    crossover_prob: f64,
    eta: f64,
) -> (DesignPoint, DesignPoint) {
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();

    if rng.f64() > crossover_prob {
        return (child1, child2);
    }

    for (i, &(low, high)) in bounds.limits().iter().enumerate() {
        let (p1, p2) = (parent1[i], parent2[i]);
        if (p1 - p2).abs() < 1e-14 {
            continue;
        }
        let u = rng.f64();
        let beta = if u <= 0.5 {
            (2.0 * u).powf(1.0 / (eta + 1.0))
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(1.0 / (eta + 1.0))
        };
        child1[i] = (0.5 * ((1.0 + beta) * p1 + (1.0 - beta) * p2)).clamp(low, high);
        child2[i] = (0.5 * ((1.0 - beta) * p1 + (1.0 + beta) * p2)).clamp(low, high);
    }

    (child1, child2)
}

/// Polynomial mutation; each coordinate mutates with probability `1 / ndim`.
#[allow(clippy::cast_precision_loss)]
pub(super) fn polynomial_mutation(
    rng: &mut fastrand::Rng,
    individual: &mut [f64],
    bounds: &Bounds,
    eta: f64,
) {
    let n = individual.len();
    if n == 0 {
        return;
    }
    let mutation_prob = 1.0 / n as f64;

    for (x, &(low, high)) in individual.iter_mut().zip(bounds.limits()) {
        if rng_util::f64_range(rng, 0.0, 1.0) >= mutation_prob {
            continue;
        }
        let range = high - low;
        if range <= 0.0 {
            continue;
        }

        let u = rng.f64();
        let delta_q = if u < 0.5 {
            let xy = 1.0 - (*x - low) / range;
            let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
            val.powf(1.0 / (eta + 1.0)) - 1.0
        } else {
            let xy = 1.0 - (high - *x) / range;
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
            1.0 - val.powf(1.0 / (eta + 1.0))
        };
        *x = (*x + delta_q * range).clamp(low, high);
    }
}
