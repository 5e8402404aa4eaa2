use crate::types::{Bounds, DesignPoint};

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw one point uniformly inside `bounds`, one coordinate per dimension in order.
pub(crate) fn uniform_point(rng: &mut fastrand::Rng, bounds: &Bounds) -> DesignPoint {
    bounds
        .limits()
        .iter()
        .map(|&(lo, hi)| f64_range(rng, lo, hi))
        .collect()
}

/// Draw a child seed from the shared stream.
#[inline]
pub(crate) fn child_seed(rng: &mut fastrand::Rng) -> u64 {
    rng.u64(..)
}

/// Standard normal draw (Box-Muller).
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    let u1 = rng.f64().max(f64::MIN_POSITIVE);
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (core::f64::consts::TAU * u2).cos()
}
