//! # Retry driver: runs an operation under a policy.
//!
//! [`Retrier`] owns a validated [`RetryPolicy`] and drives the retry loop:
//! run the operation, classify the failure, consult the policy, sleep the
//! computed delay, repeat. The loop is cancellable at its safe points
//! (before each attempt and during the backoff sleep) via a
//! [`CancellationToken`].
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► check cancellation
//!   ├─► op().await
//!   │     ├─ Ok(v)                ─► return Ok(v)
//!   │     └─ Err(e):
//!   │          ├─ !e.is_retryable() ─► return Aborted(e)
//!   │          ├─ evaluate(attempt, e.retry_after())
//!   │          ├─ exhausted        ─► return Exhausted { attempts, last: e }
//!   │          └─ sleep(delay)  (aborts immediately on cancellation)
//!   └─► attempt += 1
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; the attempt counter never resets.
//! - The policy is consulted only **between** attempts, never before the
//!   first one (the first execution is free).
//! - A server hint carried by the error ([`Retryable::retry_after`]) is
//!   forwarded to the policy and wins over the policy's own formula.

use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::{PolicyError, RetryError};
use crate::policies::{AttemptContext, RetryPolicy};

/// Classification hooks for operation errors.
///
/// Implemented by the caller's error type so the driver can distinguish
/// transient from permanent failures and pick up server-supplied delay
/// hints (a parsed retry-after directive on throttling responses).
pub trait Retryable {
    /// Whether another attempt could plausibly succeed. Defaults to `true`.
    fn is_retryable(&self) -> bool {
        true
    }

    /// Explicit delay requested by the remote peer, if the failure carried
    /// one. Defaults to `None`.
    fn retry_after(&self) -> Option<std::time::Duration> {
        None
    }
}

/// Drives an async operation to completion under a [`RetryPolicy`].
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retrykit::{Retrier, Retryable, RetryPolicy};
///
/// #[derive(Debug)]
/// struct Unavailable;
///
/// impl std::fmt::Display for Unavailable {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "unavailable")
///     }
/// }
/// impl Retryable for Unavailable {}
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let retrier = Retrier::new(RetryPolicy::FixedInterval {
///     interval: Duration::from_millis(1),
///     max_attempts: 5,
/// })
/// .unwrap();
///
/// let mut calls = 0u32;
/// let out: Result<u32, _> = retrier
///     .run(&CancellationToken::new(), || {
///         calls += 1;
///         let ok = calls >= 3;
///         async move { if ok { Ok(42) } else { Err(Unavailable) } }
///     })
///     .await;
///
/// assert_eq!(out.unwrap(), 42);
/// assert_eq!(calls, 3);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Retrier {
    policy: RetryPolicy,
}

impl Retrier {
    /// Creates a retrier, validating the policy once up front.
    pub fn new(policy: RetryPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Returns the policy this retrier runs under.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until it succeeds, aborts, exhausts the budget, or is
    /// cancelled.
    ///
    /// `op` is invoked once per attempt. Cancellation is observed before
    /// each attempt and during the backoff sleep; an attempt already in
    /// flight is not interrupted.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        E: Retryable,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled);
            }

            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(RetryError::Aborted(err));
            }

            let mut ctx = AttemptContext::new(attempt);
            if let Some(hint) = err.retry_after() {
                ctx = ctx.with_server_hint(hint);
            }

            let decision = self.policy.evaluate(&ctx)?;
            if decision.exhausted {
                return Err(RetryError::Exhausted {
                    attempts: attempt.saturating_add(1),
                    last: err,
                });
            }

            select! {
                _ = time::sleep(decision.delay) => {}
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            }

            attempt = attempt.saturating_add(1);
        }
    }
}
