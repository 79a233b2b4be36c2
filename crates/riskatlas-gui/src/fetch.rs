//! One in-flight request per panel, polled from the UI thread.

use poll_promise::Promise;
use std::future::Future;
use tokio::runtime::Handle;

/// Load state of a single remote value.
pub enum Fetch<T: Send + 'static> {
    Idle,
    /// Request in flight. `stale` is the last good value, still shown meanwhile.
    Loading {
        promise: Promise<Result<T, String>>,
        stale: Option<T>,
    },
    Ready(T),
    Failed(String),
}

impl<T: Send + 'static> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::Idle
    }
}

impl<T: Send + 'static> Fetch<T> {
    /// Starts `future` on a worker thread, replacing any request already in flight.
    pub fn start<F>(&mut self, label: &str, runtime: &Handle, future: F)
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let handle = runtime.clone();
        let what = label.to_string();
        let promise = Promise::spawn_thread(format!("fetch-{}", label), move || {
            handle.block_on(future).map_err(|e| {
                tracing::warn!("Request for {} failed: {:#}", what, e);
                format!("{:#}", e)
            })
        });

        let stale = match std::mem::take(self) {
            Fetch::Ready(value) => Some(value),
            Fetch::Loading { stale, .. } => stale,
            Fetch::Idle | Fetch::Failed(_) => None,
        };
        *self = Fetch::Loading { promise, stale };
    }

    /// Moves a finished request into `Ready` or `Failed`.
    ///
    /// Returns true when the state changed this call.
    pub fn poll(&mut self) -> bool {
        match std::mem::take(self) {
            Fetch::Loading { promise, stale } => match promise.try_take() {
                Ok(Ok(value)) => {
                    *self = Fetch::Ready(value);
                    true
                }
                Ok(Err(error)) => {
                    *self = Fetch::Failed(error);
                    true
                }
                Err(promise) => {
                    *self = Fetch::Loading { promise, stale };
                    false
                }
            },
            other => {
                *self = other;
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Fetch::Idle)
    }

    /// Current value, or the previous one while a reload is in flight.
    pub fn value(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            Fetch::Loading { stale, .. } => stale.as_ref(),
            Fetch::Idle | Fetch::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetch::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Drops the value and abandons any request in flight.
    pub fn clear(&mut self) {
        *self = Fetch::Idle;
    }
}
