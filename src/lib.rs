//! # retrykit
//!
//! **Retrykit** is a small library of retry/backoff and concurrency
//! primitives for building resilient HTTP clients and workers. It is
//! designed as a building block: the host application owns the transport,
//! the logging backend, and the wiring; retrykit owns the decisions in
//! between.
//!
//! ## Architecture
//! ```text
//!  caller's operation (HTTP call, job, ...)
//!        │
//!        ▼
//!  ┌─────────────────────────────────────────────┐
//!  │ Retrier (retry loop)                        │
//!  │  - classify failure via Retryable           │
//!  │  - RetryPolicy::evaluate(AttemptContext)    │
//!  │  - cancellable backoff sleep                │
//!  └─────────────────────────────────────────────┘
//!        │ delay / exhausted
//!        ▼
//!  RetryDecision ──► retry, or surface RetryError
//!
//!  independent primitives:
//!    SyncMap<K, V>   concurrency-safe typed map
//!    Spawner         panic-contained task spawning
//! ```
//!
//! ## Features
//! | Area          | Description                                              | Key types                                  |
//! |---------------|----------------------------------------------------------|--------------------------------------------|
//! | **Policies**  | Fixed, jittered, exponential, randomized, hybrid backoff | [`RetryPolicy`], [`AttemptContext`]        |
//! | **Driver**    | Cancellable retry loop over any async operation          | [`Retrier`], [`Retryable`], [`RetryError`] |
//! | **Containers**| Generic thread-safe map, atomic per-key operations       | [`SyncMap`]                                |
//! | **Spawning**  | Panic-contained background tasks, explicit capability    | [`Spawner`]                                |
//! | **Errors**    | Typed configuration and loop-outcome errors              | [`PolicyError`], [`RetryError`]            |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retrykit::{AttemptContext, RetryPolicy, SyncMap};
//!
//! // Policies are plain configuration values, built once at startup.
//! let policy = RetryPolicy::ExponentialBackoff {
//!     base: Duration::from_secs(1),
//!     max: Duration::from_secs(10),
//!     coefficient: 2.0,
//!     max_attempts: 5,
//! };
//!
//! // A server-supplied retry-after hint overrides the formula.
//! let hinted = AttemptContext::new(1).with_server_hint_secs(5);
//! assert_eq!(policy.evaluate(&hinted).unwrap().delay, Duration::from_secs(5));
//!
//! // SyncMap is an independent primitive: a typed, thread-safe map.
//! let inflight: SyncMap<u64, &str> = SyncMap::new();
//! inflight.store(7, "GET /health");
//! assert_eq!(inflight.load(&7), Some("GET /health"));
//! ```

mod error;
mod policies;
mod retrier;
mod spawn;
mod sync;

// ---- Public re-exports ----

pub use error::{PolicyError, RetryError};
pub use policies::{AttemptContext, RetryDecision, RetryPolicy};
pub use retrier::{Retrier, Retryable};
pub use spawn::Spawner;
pub use sync::SyncMap;
