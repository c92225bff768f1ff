//! Get-or-compute over a [`CacheStore`] with request coalescing.
//!
//! The first caller to miss on a key becomes the leader: its computation runs
//! in a spawned task so it finishes for the other waiters even if the leader's
//! own request goes away. The leader stores the value before it leaves the
//! in-flight map, and re-reads the cache before computing, so a caller that
//! missed just before the store never recomputes.
//!
//! [`SingleFlight::forget`] detaches a running leader: callers arriving after
//! it start a fresh computation, and the detached leader never stores.

use crate::cache::CacheStore;
use crate::error::{MediaError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

type Outcome = Option<Result<Value>>;

struct Flight {
    rx: watch::Receiver<Outcome>,
    stale: Arc<AtomicBool>,
}

#[derive(Clone)]
pub struct SingleFlight {
    cache: Arc<dyn CacheStore>,
    in_flight: Arc<DashMap<String, Flight>>,
}

impl SingleFlight {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Number of keys with a computation currently running.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Drops the stored value and detaches any computation running for
    /// `key`. Returns whether a live value was removed.
    pub async fn forget(&self, key: &str) -> bool {
        if let Some((_, flight)) = self.in_flight.remove(key) {
            flight.stale.store(true, Ordering::SeqCst);
            debug!(key = %key, "detached in-flight computation");
        }
        self.cache.forget(key).await
    }

    pub async fn remember<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(hit) = self.cache.get(key).await {
            debug!(key = %key, "cache hit");
            return decode(key, hit);
        }

        let fut = compute();
        let mut rx = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(e) => {
                debug!(key = %key, "joining in-flight computation");
                e.get().rx.clone()
            }
            Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None);
                let stale = Arc::new(AtomicBool::new(false));
                e.insert(Flight {
                    rx: rx.clone(),
                    stale: stale.clone(),
                });
                self.spawn_leader(key.to_string(), ttl, fut, tx, stale);
                rx
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map(|o| (*o).clone())
            .map_err(|_| MediaError::Interrupted(key.to_string()))?;
        match outcome {
            Some(Ok(value)) => decode(key, value),
            Some(Err(e)) => Err(e),
            None => Err(MediaError::Interrupted(key.to_string())),
        }
    }

    fn spawn_leader<T, Fut>(
        &self,
        key: String,
        ttl: Duration,
        fut: Fut,
        tx: watch::Sender<Outcome>,
        stale: Arc<AtomicBool>,
    ) where
        T: Serialize + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let cache = self.cache.clone();
        let guard = InFlight {
            key,
            map: self.in_flight.clone(),
            stale,
        };
        tokio::spawn(async move {
            let outcome = lead(cache.as_ref(), &guard.key, ttl, fut, &guard.stale).await;
            // Leave the map only after the value is stored.
            drop(guard);
            let _ = tx.send(Some(outcome));
        });
    }
}

async fn lead<T, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    fut: Fut,
    stale: &AtomicBool,
) -> Result<Value>
where
    T: Serialize,
    Fut: Future<Output = Result<T>>,
{
    if let Some(hit) = cache.get(key).await {
        return Ok(hit);
    }
    debug!(key = %key, ttl_secs = ttl.as_secs(), "computing cache entry");
    let value = fut.await?;
    let encoded = serde_json::to_value(&value)?;
    if stale.load(Ordering::SeqCst) {
        debug!(key = %key, "discarding value of detached computation");
        return Ok(encoded);
    }
    cache.put(key, encoded.clone(), ttl).await;
    // Forgotten while storing.
    if stale.load(Ordering::SeqCst) {
        cache.forget(key).await;
    }
    Ok(encoded)
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| MediaError::transform(format!("cached value for '{key}': {e}")))
}

/// Removes the in-flight entry when the leader finishes or unwinds, unless a
/// newer leader has taken the key since.
struct InFlight {
    key: String,
    map: Arc<DashMap<String, Flight>>,
    stale: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.map
            .remove_if(&self.key, |_, f| Arc::ptr_eq(&f.stale, &self.stale));
    }
}
