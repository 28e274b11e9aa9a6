//! Per-decision input for policy evaluation.
//!
//! An [`AttemptContext`] is constructed fresh by the caller before each
//! retry decision. It carries the 0-indexed attempt number and, when the
//! previous response included an explicit retry-after directive, the
//! server-supplied delay hint.

use std::time::Duration;

/// Input to a single retry decision.
///
/// `attempt` is 0-indexed: the context for the delay before the first retry
/// carries `attempt == 0`. The evaluator is never consulted before the first
/// attempt itself.
///
/// # Example
/// ```rust
/// use retrykit::AttemptContext;
///
/// let ctx = AttemptContext::new(2).with_server_hint_secs(5);
/// assert_eq!(ctx.attempt, 2);
/// assert_eq!(ctx.server_hint, Some(std::time::Duration::from_secs(5)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttemptContext {
    /// 0-indexed number of the attempt that just failed.
    pub attempt: u32,
    /// Explicit delay requested by the remote peer, if any.
    ///
    /// When present it overrides the policy's own formula: an explicit
    /// server instruction is more authoritative than a local heuristic.
    pub server_hint: Option<Duration>,
}

impl AttemptContext {
    /// Creates a context for the given attempt number with no server hint.
    pub fn new(attempt: u32) -> Self {
        Self {
            attempt,
            server_hint: None,
        }
    }

    /// Attaches a server-supplied delay hint.
    #[must_use]
    pub fn with_server_hint(mut self, hint: Duration) -> Self {
        self.server_hint = Some(hint);
        self
    }

    /// Attaches a server hint given in whole seconds (the usual granularity
    /// of retry-after directives).
    #[must_use]
    pub fn with_server_hint_secs(self, secs: u64) -> Self {
        self.with_server_hint(Duration::from_secs(secs))
    }
}
