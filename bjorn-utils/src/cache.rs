//! Bounded, time-expiring cache that fetches missing values on demand.

use std::{
    num::NonZeroUsize,
    sync::Arc,
    time::{Duration, Instant},
};

use futures::future::{BoxFuture, FutureExt};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::flight::{FetchError, FlightGroup};

/// Async function producing the value for a cache key on a miss.
pub type FetchFn<V> = Arc<dyn Fn(String) -> BoxFuture<'static, anyhow::Result<V>> + Send + Sync>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// String-keyed LRU cache with a fixed TTL and deduplicated fetches.
///
/// Reads never extend an entry's lifetime; only [`Cache::set`] or a fresh
/// fetch does. The internal lock is never held while the fetch runs.
pub struct Cache<V> {
    entries: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    flight: FlightGroup<V>,
    fetch: FetchFn<V>,
    capacity: NonZeroUsize,
    ttl: Duration,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    ///
    /// A capacity of zero is treated as one.
    pub fn new<F, Fut>(capacity: usize, ttl: Duration, fetch: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let fetch: FetchFn<V> = Arc::new(move |key| fetch(key).boxed());

        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            flight: FlightGroup::new(),
            fetch,
            capacity,
            ttl,
        }
    }

    /// Return the cached value for `key`, fetching and storing it on a miss.
    ///
    /// Concurrent misses for the same key share a single upstream fetch. A
    /// failed fetch is not cached, so the next call retries. A fetch never
    /// overwrites an entry [`Cache::set`] stored after the fetch began.
    pub async fn get(&self, key: &str) -> Result<V, FetchError> {
        if let Some(value) = self.lookup(key, true) {
            trace!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss");
        let entries = Arc::clone(&self.entries);
        let fetch = Arc::clone(&self.fetch);
        let owned_key = key.to_owned();

        // A flight finishing between the miss above and this call has
        // already stored its value; `lookup` runs under the in-flight lock.
        self.flight
            .run_or_reuse(
                key,
                || self.lookup(key, true),
                move || async move {
                    let started = Instant::now();
                    let value = fetch(owned_key.clone()).await?;

                    let mut entries = entries.lock();
                    let superseded = entries
                        .peek(&owned_key)
                        .is_some_and(|existing| existing.inserted_at > started);
                    if superseded {
                        debug!(key = %owned_key, "newer entry stored during fetch; keeping it");
                    } else {
                        entries.put(owned_key, CacheEntry::new(value.clone()));
                    }
                    anyhow::Ok(value)
                },
            )
            .await
    }

    /// Insert or overwrite `key` with a fresh TTL, bypassing the fetch.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        trace!(key = %key, "cache set");
        self.entries.lock().put(key, CacheEntry::new(value));
    }

    /// Look up `key` without fetching or touching its LRU position.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.lookup(key, false)
    }

    /// Number of stored entries, including ones that expired but were not yet
    /// observed.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lookup(&self, key: &str, promote: bool) -> Option<V> {
        let mut entries = self.entries.lock();

        let entry = if promote {
            entries.get(key)
        } else {
            entries.peek(key)
        }?;

        if entry.is_expired(self.ttl) {
            debug!(key, "cache entry expired");
            entries.pop(key);
            return None;
        }

        Some(entry.value.clone())
    }
}
