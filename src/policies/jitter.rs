//! Randomization helpers for jittered and randomized policies.
//!
//! Jitter spreads the retries of many concurrent callers so they do not
//! synchronize into storms. Fraction jitter perturbs a computed delay
//! multiplicatively; the uniform draw picks a delay inside a fixed range.
//!
//! Jitter output never feeds back into subsequent calculations: each
//! attempt derives its base delay independently from the attempt number.

use rand::Rng;
use std::time::Duration;

/// Applies fraction jitter: `delay × (1 ± fraction)` drawn uniformly.
///
/// A fraction of `0.0` returns the delay unchanged. The fraction is assumed
/// to be validated (finite, within `[0.0, 1.0]`) by the policy.
pub(super) fn apply_fraction(delay: Duration, fraction: f64) -> Duration {
    if fraction == 0.0 {
        return delay;
    }
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }

    let lo = (ms as f64 * (1.0 - fraction)) as u64;
    let hi = ((ms as f64 * (1.0 + fraction)).ceil() as u64).max(lo);

    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(lo..=hi))
}

/// Draws a delay uniformly from `[min, max]`.
///
/// Degenerate ranges (`min >= max`) return `min` without consulting the RNG.
pub(super) fn uniform_between(min: Duration, max: Duration) -> Duration {
    let lo = min.as_millis() as u64;
    let hi = max.as_millis() as u64;
    if lo >= hi {
        return min;
    }

    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(lo..=hi))
}
