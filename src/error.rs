//! Error types used by the retrykit policies and the retry driver.
//!
//! This module defines two error enums:
//!
//! - [`PolicyError`] — a retry policy was configured with malformed fields.
//! - [`RetryError`] — terminal outcomes of a [`Retrier`](crate::Retrier) run.
//!
//! A [`PolicyError`] is always a caller bug: policies are configuration
//! values built once at startup, so evaluation refuses to guess a delay for
//! a policy it cannot trust.

use std::time::Duration;
use thiserror::Error;

/// # Configuration errors for retry policies.
///
/// Returned by [`RetryPolicy::validate`](crate::RetryPolicy::validate) and by
/// [`RetryPolicy::evaluate`](crate::RetryPolicy::evaluate) when a variant's
/// fields cannot produce a meaningful delay. Evaluation never falls back to
/// an arbitrary default for a malformed policy.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// Jitter fraction is outside `[0.0, 1.0]` or not finite.
    #[error("jitter fraction {0} must lie within [0.0, 1.0]")]
    InvalidJitter(f64),

    /// Backoff coefficient is not finite or not positive.
    #[error("backoff coefficient {0} must be finite and positive")]
    InvalidCoefficient(f64),

    /// An interval range is inverted (lower bound above upper bound).
    #[error("interval range inverted: lower bound {lower:?} exceeds upper bound {upper:?}")]
    InvalidRange {
        /// Lower bound of the offending range.
        lower: Duration,
        /// Upper bound of the offending range.
        upper: Duration,
    },
}

/// # Terminal outcomes of a retry loop.
///
/// `E` is the caller's operation error. It is carried inside
/// [`RetryError::Exhausted`] and [`RetryError::Aborted`] so the caller can
/// inspect the last failure after the loop gives up.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The attempt budget ran out; `last` is the error from the final attempt.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts executed (initial attempt included).
        attempts: u32,
        /// Error returned by the final attempt.
        last: E,
    },

    /// The operation failed with an error it marked as non-retryable.
    #[error("aborted on non-retryable error: {0}")]
    Aborted(E),

    /// The cancellation token fired before the loop could finish.
    #[error("retry loop cancelled")]
    Cancelled,

    /// The policy itself was malformed.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
