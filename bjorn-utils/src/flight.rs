//! Single-flight fetch deduplication keyed by string.
//!
//! Concurrent callers asking for the same key while a fetch is outstanding
//! all await that one fetch and receive the identical result.

use std::{collections::HashMap, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Error delivered to every caller waiting on a failed fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The upstream fetch function returned an error.
    #[error("upstream fetch failed: {0:#}")]
    Upstream(Arc<anyhow::Error>),

    /// The spawned fetch task panicked or was aborted by the runtime.
    #[error("fetch task did not complete: {0}")]
    Aborted(String),
}

impl From<anyhow::Error> for FetchError {
    fn from(source: anyhow::Error) -> Self {
        Self::Upstream(Arc::new(source))
    }
}

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;
type CallMap<V> = HashMap<String, SharedFetch<V>>;

/// Collapses overlapping fetches for the same key into one upstream call.
pub struct FlightGroup<V> {
    calls: Arc<Mutex<CallMap<V>>>,
}

impl<V> Default for FlightGroup<V> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<V> FlightGroup<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` for `key` unless a fetch for `key` is already in flight,
    /// in which case wait for that one instead.
    ///
    /// The fetch runs as a detached task, so it completes even if every
    /// caller stops waiting. The in-flight record is cleared once the task
    /// finishes, including when it panics.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        self.run_or_reuse(key, || None, fetch).await
    }

    /// Like [`FlightGroup::run`], but first consults `reuse` while holding the
    /// in-flight lock.
    ///
    /// `reuse` sees every result published by a fetch that already cleared
    /// its record, so a value stored by the previous flight is returned
    /// without starting another one.
    pub async fn run_or_reuse<R, F, Fut>(
        &self,
        key: &str,
        reuse: R,
        fetch: F,
    ) -> Result<V, FetchError>
    where
        R: FnOnce() -> Option<V>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let call = {
            let mut calls = self.calls.lock();
            if let Some(existing) = calls.get(key) {
                trace!(key, "joining in-flight fetch");
                existing.clone()
            } else if let Some(value) = reuse() {
                trace!(key, "value published before fetch started");
                return Ok(value);
            } else {
                debug!(key, "starting fetch");
                let call = self.spawn_fetch(key.to_owned(), fetch());
                calls.insert(key.to_owned(), call.clone());
                call
            }
        };

        call.await
    }

    /// Number of keys with a fetch currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    fn spawn_fetch<Fut>(&self, key: String, fetch: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        // The caller still holds the map lock here, so the record cannot be
        // cleared before it is inserted.
        let record = InFlightRecord {
            calls: Arc::clone(&self.calls),
            key,
        };
        let handle = tokio::spawn(async move {
            let _record = record;
            fetch.await.map_err(FetchError::from)
        });

        async move {
            handle
                .await
                .unwrap_or_else(|join_error| Err(FetchError::Aborted(join_error.to_string())))
        }
        .boxed()
        .shared()
    }
}

/// Clears a key's in-flight record when the fetch task ends, whether it
/// returned, panicked or was dropped by the runtime.
struct InFlightRecord<V> {
    calls: Arc<Mutex<CallMap<V>>>,
    key: String,
}

impl<V> Drop for InFlightRecord<V> {
    fn drop(&mut self) {
        trace!(key = %self.key, "clearing in-flight record");
        self.calls.lock().remove(&self.key);
    }
}
