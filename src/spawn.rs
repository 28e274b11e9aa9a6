//! # Panic-safe task spawning.
//!
//! [`Spawner`] wraps `tokio::spawn` so a panicking task is contained and
//! reported instead of being discovered later through a failed join. It is
//! an explicit capability: construct one and hand it to the call sites that
//! spawn background work, rather than reaching for a process-wide default.
//!
//! A panic inside a spawned future resolves the handle to `None` and invokes
//! the configured hook (or an `eprintln!` fallback) with the task label and
//! the panic message.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

type PanicHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Spawns futures onto the tokio runtime with panic containment.
///
/// # Example
/// ```rust
/// use retrykit::Spawner;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let spawner = Spawner::new();
///
/// let ok = spawner.spawn("adder", async { 2 + 2 });
/// assert_eq!(ok.await.unwrap(), Some(4));
///
/// let bad = spawner.spawn("boom", async { panic!("kaboom"); });
/// assert_eq!(bad.await.unwrap(), None);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Spawner {
    hook: Option<PanicHook>,
}

impl Spawner {
    /// Creates a spawner that reports panics to stderr.
    pub fn new() -> Self {
        Self { hook: None }
    }

    /// Creates a spawner that reports panics to `hook(label, message)`.
    pub fn with_panic_hook<F>(hook: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    /// Spawns `future`, containing any panic it raises.
    ///
    /// The handle resolves to `Some(output)` on normal completion and `None`
    /// if the future panicked; the panic is reported through the hook either
    /// way, so the handle may be dropped without losing the report.
    pub fn spawn<T, Fut>(&self, label: &str, future: Fut) -> JoinHandle<Option<T>>
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let label = label.to_string();
        let hook = self.hook.clone();

        tokio::spawn(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(value) => Some(value),
                Err(payload) => {
                    let msg = panic_message(payload);
                    match &hook {
                        Some(hook) => hook(&label, &msg),
                        None => eprintln!("[retrykit] task '{label}' panicked: {msg}"),
                    }
                    None
                }
            }
        })
    }
}

impl fmt::Debug for Spawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Renders a panic payload. `&str` and `String` payloads (the overwhelming
/// majority) are reported verbatim, anything else as a placeholder.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
