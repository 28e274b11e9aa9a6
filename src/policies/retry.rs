//! # Retry policy evaluation.
//!
//! [`RetryPolicy`] is a sum type: exactly one retry shape is active per
//! policy value, enforced at compile time. Policies are configuration
//! values, built once at startup and read concurrently by any number of
//! retrying operations.
//!
//! [`RetryPolicy::evaluate`] turns a policy plus an [`AttemptContext`] into
//! a [`RetryDecision`]: the delay to wait before the next attempt and
//! whether the attempt budget is exhausted.
//!
//! ## Rules
//! - A present [`AttemptContext::server_hint`] is the delay verbatim; the
//!   policy's own formula is skipped. [`RetryPolicy::Hybrid`] delegates to
//!   its active phase, which applies the hint.
//! - `max_attempts == 0` means unlimited attempts (never exhausted).
//! - The exponential term for attempt `n` is `base × coefficient^n`, clamped
//!   to `max`; attempt 0 yields `base` (`coefficient^0 = 1`). Jittered
//!   variants re-cap at `max` after jitter.
//! - Malformed fields produce a [`PolicyError`], never a default delay.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retrykit::{AttemptContext, RetryPolicy};
//!
//! let policy = RetryPolicy::ExponentialBackoff {
//!     base: Duration::from_secs(1),
//!     max: Duration::from_secs(10),
//!     coefficient: 2.0,
//!     max_attempts: 5,
//! };
//!
//! let d = policy.evaluate(&AttemptContext::new(3)).unwrap();
//! assert_eq!(d.delay, Duration::from_secs(8));
//! assert!(!d.exhausted);
//!
//! // Attempt 4 would be 16s, capped at 10s.
//! let d = policy.evaluate(&AttemptContext::new(4)).unwrap();
//! assert_eq!(d.delay, Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::error::PolicyError;
use crate::policies::attempt::AttemptContext;
use crate::policies::jitter;

/// Outcome of one retry decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryDecision {
    /// Delay to wait before the next attempt.
    pub delay: Duration,
    /// True when the attempt budget is spent and the caller must stop.
    ///
    /// The delay is still populated so callers that log the decision see a
    /// consistent value, but it must not be slept on.
    pub exhausted: bool,
}

/// Retry policy: how long to wait between attempts, and how many attempts
/// are allowed.
///
/// Every variant carries its own `max_attempts` budget; `0` is the
/// "unlimited" sentinel. Intervals are plain [`Duration`]s, jitter fractions
/// are in `[0.0, 1.0]`.
#[derive(Clone, Debug, PartialEq)]
pub enum RetryPolicy {
    /// Constant delay between attempts.
    FixedInterval {
        /// Fixed delay between attempts.
        interval: Duration,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },

    /// Constant delay perturbed by `interval × (1 ± jitter)`.
    FixedIntervalWithJitter {
        /// Base delay between attempts.
        interval: Duration,
        /// Jitter fraction in `[0.0, 1.0]`.
        jitter: f64,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },

    /// Delay grows as `base × coefficient^attempt`, capped at `max`.
    ExponentialBackoff {
        /// Delay before the first retry.
        base: Duration,
        /// Cap on the computed delay.
        max: Duration,
        /// Multiplicative growth factor. Values below `1.0` behave as a
        /// fixed interval; use [`RetryPolicy::FixedInterval`] for that case.
        coefficient: f64,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },

    /// Exponential growth with fraction jitter, re-capped at `max`.
    ExponentialBackoffWithJitter {
        /// Delay before the first retry.
        base: Duration,
        /// Cap on the computed delay, applied before and after jitter.
        max: Duration,
        /// Multiplicative growth factor.
        coefficient: f64,
        /// Jitter fraction in `[0.0, 1.0]`.
        jitter: f64,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },

    /// Uniform random delay in `[min, max]`.
    RandomizedInterval {
        /// Lower bound of the draw.
        min: Duration,
        /// Upper bound of the draw.
        max: Duration,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },

    /// Two-phase policy: `phase1` up to and including `cutoff`, `phase2`
    /// after. Exhaustion is governed by the hybrid's own `max_attempts`,
    /// never by the phases'.
    Hybrid {
        /// Policy for attempts `<= cutoff`.
        phase1: Box<RetryPolicy>,
        /// Policy for attempts `> cutoff`.
        phase2: Box<RetryPolicy>,
        /// Last attempt number served by `phase1`. Must be below
        /// `max_attempts` for `phase2` to ever activate.
        cutoff: u32,
        /// Attempt budget (`0` = unlimited).
        max_attempts: u32,
    },
}

impl RetryPolicy {
    /// Returns the policy's own attempt budget (`0` = unlimited).
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::FixedInterval { max_attempts, .. }
            | Self::FixedIntervalWithJitter { max_attempts, .. }
            | Self::ExponentialBackoff { max_attempts, .. }
            | Self::ExponentialBackoffWithJitter { max_attempts, .. }
            | Self::RandomizedInterval { max_attempts, .. }
            | Self::Hybrid { max_attempts, .. } => *max_attempts,
        }
    }

    /// Checks the variant's fields without evaluating anything.
    ///
    /// Intended for startup-time config validation. [`evaluate`](Self::evaluate)
    /// performs the same checks, so a policy that skipped `validate` still
    /// cannot produce an arbitrary delay.
    pub fn validate(&self) -> Result<(), PolicyError> {
        match self {
            Self::FixedInterval { .. } => Ok(()),
            Self::FixedIntervalWithJitter { jitter, .. } => check_fraction(*jitter),
            Self::ExponentialBackoff {
                base,
                max,
                coefficient,
                ..
            } => {
                check_coefficient(*coefficient)?;
                check_ordered(*base, *max)
            }
            Self::ExponentialBackoffWithJitter {
                base,
                max,
                coefficient,
                jitter,
                ..
            } => {
                check_coefficient(*coefficient)?;
                check_ordered(*base, *max)?;
                check_fraction(*jitter)
            }
            Self::RandomizedInterval { min, max, .. } => check_ordered(*min, *max),
            Self::Hybrid { phase1, phase2, .. } => {
                phase1.validate()?;
                phase2.validate()
            }
        }
    }

    /// Computes the delay before the next attempt and whether the budget is
    /// exhausted.
    ///
    /// `ctx.attempt` is the 0-indexed number of the attempt that just
    /// failed; negative attempt numbers cannot be expressed. Returns a
    /// [`PolicyError`] if the policy is malformed.
    pub fn evaluate(&self, ctx: &AttemptContext) -> Result<RetryDecision, PolicyError> {
        self.validate()?;
        Ok(RetryDecision {
            delay: self.delay(ctx),
            exhausted: budget_spent(self.max_attempts(), ctx.attempt),
        })
    }

    /// Delay computation, post-validation. A server hint wins over the
    /// formula for every leaf variant; `Hybrid` delegates to the active
    /// phase so the hint applies there.
    fn delay(&self, ctx: &AttemptContext) -> Duration {
        if let Self::Hybrid {
            phase1,
            phase2,
            cutoff,
            ..
        } = self
        {
            let phase = if ctx.attempt <= *cutoff { phase1 } else { phase2 };
            return phase.delay(ctx);
        }

        if let Some(hint) = ctx.server_hint {
            return hint;
        }

        match self {
            Self::FixedInterval { interval, .. } => *interval,
            Self::FixedIntervalWithJitter {
                interval, jitter, ..
            } => jitter::apply_fraction(*interval, *jitter),
            Self::ExponentialBackoff {
                base,
                max,
                coefficient,
                ..
            } => exponential(*base, *max, *coefficient, ctx.attempt),
            Self::ExponentialBackoffWithJitter {
                base,
                max,
                coefficient,
                jitter: fraction,
                ..
            } => {
                let capped = exponential(*base, *max, *coefficient, ctx.attempt);
                jitter::apply_fraction(capped, *fraction).min(*max)
            }
            Self::RandomizedInterval { min, max, .. } => jitter::uniform_between(*min, *max),
            Self::Hybrid { .. } => unreachable!("handled above"),
        }
    }
}

/// `base × coefficient^attempt`, clamped to `max`.
///
/// Non-finite or negative intermediates clamp to `max` (huge attempt counts
/// overflow the f64 math long before they overflow a `Duration`).
fn exponential(base: Duration, max: Duration, coefficient: f64, attempt: u32) -> Duration {
    let factor = coefficient.max(1.0);
    let exp = attempt.min(i32::MAX as u32) as i32;
    let unclamped = base.as_secs_f64() * factor.powi(exp);

    if !unclamped.is_finite() || unclamped < 0.0 || unclamped > max.as_secs_f64() {
        max
    } else {
        Duration::from_secs_f64(unclamped)
    }
}

fn budget_spent(max_attempts: u32, attempt: u32) -> bool {
    max_attempts != 0 && attempt >= max_attempts
}

fn check_fraction(fraction: f64) -> Result<(), PolicyError> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(PolicyError::InvalidJitter(fraction))
    }
}

fn check_coefficient(coefficient: f64) -> Result<(), PolicyError> {
    if coefficient.is_finite() && coefficient > 0.0 {
        Ok(())
    } else {
        Err(PolicyError::InvalidCoefficient(coefficient))
    }
}

fn check_ordered(lower: Duration, upper: Duration) -> Result<(), PolicyError> {
    if lower > upper {
        Err(PolicyError::InvalidRange { lower, upper })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(policy: &RetryPolicy, attempt: u32) -> RetryDecision {
        policy.evaluate(&AttemptContext::new(attempt)).unwrap()
    }

    #[test]
    fn fixed_interval_is_constant() {
        let policy = RetryPolicy::FixedInterval {
            interval: Duration::from_secs(2),
            max_attempts: 0,
        };
        for attempt in 0..10 {
            assert_eq!(eval(&policy, attempt).delay, Duration::from_secs(2));
        }
    }

    #[test]
    fn exponential_doubles_then_caps() {
        let policy = RetryPolicy::ExponentialBackoff {
            base: Duration::from_secs(1),
            max: Duration::from_secs(10),
            coefficient: 2.0,
            max_attempts: 0,
        };
        assert_eq!(eval(&policy, 0).delay, Duration::from_secs(1));
        assert_eq!(eval(&policy, 1).delay, Duration::from_secs(2));
        assert_eq!(eval(&policy, 2).delay, Duration::from_secs(4));
        assert_eq!(eval(&policy, 3).delay, Duration::from_secs(8));
        // 16s uncapped, clamped to 10s.
        assert_eq!(eval(&policy, 4).delay, Duration::from_secs(10));
    }

    #[test]
    fn exponential_huge_attempt_clamps_to_max() {
        let policy = RetryPolicy::ExponentialBackoff {
            base: Duration::from_millis(100),
            max: Duration::from_secs(60),
            coefficient: 2.0,
            max_attempts: 0,
        };
        assert_eq!(eval(&policy, 100).delay, Duration::from_secs(60));
        assert_eq!(eval(&policy, u32::MAX).delay, Duration::from_secs(60));
    }

    #[test]
    fn sub_unit_coefficient_behaves_as_fixed() {
        let policy = RetryPolicy::ExponentialBackoff {
            base: Duration::from_secs(3),
            max: Duration::from_secs(30),
            coefficient: 0.5,
            max_attempts: 0,
        };
        for attempt in 0..8 {
            assert_eq!(eval(&policy, attempt).delay, Duration::from_secs(3));
        }
    }

    #[test]
    fn jittered_exponential_never_exceeds_cap() {
        let policy = RetryPolicy::ExponentialBackoffWithJitter {
            base: Duration::from_secs(1),
            max: Duration::from_secs(10),
            coefficient: 2.0,
            jitter: 0.5,
            max_attempts: 0,
        };
        for _ in 0..200 {
            let d = eval(&policy, 4).delay;
            assert!(d <= Duration::from_secs(10), "{d:?} above cap");
            assert!(d >= Duration::from_secs(5), "{d:?} below jitter band");
        }
    }

    #[test]
    fn randomized_interval_draws_within_bounds() {
        let policy = RetryPolicy::RandomizedInterval {
            min: Duration::from_millis(200),
            max: Duration::from_millis(800),
            max_attempts: 0,
        };
        for attempt in 0..100 {
            let d = eval(&policy, attempt).delay;
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(800));
        }
    }

    #[test]
    fn exhaustion_boundary() {
        let policy = RetryPolicy::FixedInterval {
            interval: Duration::from_secs(1),
            max_attempts: 3,
        };
        assert!(!eval(&policy, 0).exhausted);
        assert!(!eval(&policy, 1).exhausted);
        assert!(!eval(&policy, 2).exhausted);
        assert!(eval(&policy, 3).exhausted);
        assert!(eval(&policy, 100).exhausted);
    }

    #[test]
    fn zero_max_attempts_never_exhausts() {
        let policy = RetryPolicy::FixedInterval {
            interval: Duration::from_secs(1),
            max_attempts: 0,
        };
        assert!(!eval(&policy, u32::MAX).exhausted);
    }

    #[test]
    fn server_hint_overrides_every_variant() {
        let ctx = AttemptContext::new(2).with_server_hint_secs(5);
        let policies = [
            RetryPolicy::FixedInterval {
                interval: Duration::from_secs(1),
                max_attempts: 0,
            },
            RetryPolicy::FixedIntervalWithJitter {
                interval: Duration::from_secs(1),
                jitter: 0.3,
                max_attempts: 0,
            },
            RetryPolicy::ExponentialBackoff {
                base: Duration::from_secs(1),
                max: Duration::from_secs(60),
                coefficient: 2.0,
                max_attempts: 0,
            },
            RetryPolicy::ExponentialBackoffWithJitter {
                base: Duration::from_secs(1),
                max: Duration::from_secs(60),
                coefficient: 2.0,
                jitter: 0.3,
                max_attempts: 0,
            },
            RetryPolicy::RandomizedInterval {
                min: Duration::from_millis(100),
                max: Duration::from_millis(900),
                max_attempts: 0,
            },
        ];
        for policy in &policies {
            assert_eq!(
                policy.evaluate(&ctx).unwrap().delay,
                Duration::from_secs(5),
                "hint ignored by {policy:?}"
            );
        }
    }

    #[test]
    fn hybrid_switches_phase_at_cutoff() {
        let policy = RetryPolicy::Hybrid {
            phase1: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(1),
                max_attempts: 0,
            }),
            phase2: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(5),
                max_attempts: 0,
            }),
            cutoff: 2,
            max_attempts: 10,
        };
        assert_eq!(eval(&policy, 0).delay, Duration::from_secs(1));
        assert_eq!(eval(&policy, 2).delay, Duration::from_secs(1));
        assert_eq!(eval(&policy, 3).delay, Duration::from_secs(5));
    }

    #[test]
    fn hybrid_exhaustion_ignores_phase_budgets() {
        // Both phases allow only 1 attempt; the hybrid allows 10.
        let policy = RetryPolicy::Hybrid {
            phase1: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(1),
                max_attempts: 1,
            }),
            phase2: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(5),
                max_attempts: 1,
            }),
            cutoff: 2,
            max_attempts: 10,
        };
        assert!(!eval(&policy, 5).exhausted);
        assert!(!eval(&policy, 9).exhausted);
        assert!(eval(&policy, 10).exhausted);
    }

    #[test]
    fn hybrid_applies_server_hint_in_active_phase() {
        let policy = RetryPolicy::Hybrid {
            phase1: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(1),
                max_attempts: 0,
            }),
            phase2: Box::new(RetryPolicy::ExponentialBackoff {
                base: Duration::from_secs(2),
                max: Duration::from_secs(60),
                coefficient: 2.0,
                max_attempts: 0,
            }),
            cutoff: 1,
            max_attempts: 0,
        };
        let ctx = AttemptContext::new(4).with_server_hint_secs(7);
        assert_eq!(policy.evaluate(&ctx).unwrap().delay, Duration::from_secs(7));
    }

    #[test]
    fn malformed_jitter_is_rejected() {
        let policy = RetryPolicy::FixedIntervalWithJitter {
            interval: Duration::from_secs(1),
            jitter: 1.5,
            max_attempts: 0,
        };
        assert_eq!(
            policy.evaluate(&AttemptContext::new(0)),
            Err(PolicyError::InvalidJitter(1.5))
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let policy = RetryPolicy::RandomizedInterval {
            min: Duration::from_secs(10),
            max: Duration::from_secs(1),
            max_attempts: 0,
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidRange { .. })
        ));
    }

    #[test]
    fn bad_coefficient_is_rejected() {
        let policy = RetryPolicy::ExponentialBackoff {
            base: Duration::from_secs(1),
            max: Duration::from_secs(10),
            coefficient: f64::NAN,
            max_attempts: 0,
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidCoefficient(_))
        ));
    }

    #[test]
    fn hybrid_validation_recurses_into_phases() {
        let policy = RetryPolicy::Hybrid {
            phase1: Box::new(RetryPolicy::FixedInterval {
                interval: Duration::from_secs(1),
                max_attempts: 0,
            }),
            phase2: Box::new(RetryPolicy::RandomizedInterval {
                min: Duration::from_secs(9),
                max: Duration::from_secs(3),
                max_attempts: 0,
            }),
            cutoff: 2,
            max_attempts: 10,
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidRange { .. })
        ));
    }
}
