//! Retry policies and attempt evaluation.
//!
//! This module groups the knobs that control **how long** to wait between
//! attempts and **how many** attempts are allowed.
//!
//! ## Contents
//! - [`RetryPolicy`] the delay formula and attempt budget (sum type)
//! - [`AttemptContext`] per-decision input (attempt number + server hint)
//! - [`RetryDecision`] the evaluation result (delay + exhaustion)
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy::evaluate(&AttemptContext) -> RetryDecision { delay, exhausted }
//!      └─► Retrier::run uses:
//!           - delay to schedule the next attempt (cancellable sleep)
//!           - exhausted to decide stop/continue
//! ```

mod attempt;
mod jitter;
mod retry;

pub use attempt::AttemptContext;
pub use retry::{RetryDecision, RetryPolicy};
