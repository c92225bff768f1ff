//! Key/value store with per-entry expiry.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// Backing store for cached records. Implementations must be safe under
/// concurrent access; coordination of concurrent misses lives in
/// [`crate::flight::SingleFlight`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn put(&self, key: &str, value: Value, ttl: Duration);
    /// Returns whether a live entry was removed.
    async fn forget(&self, key: &str) -> bool;
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .map(|e| (e.expires_at > now, e.value.clone()));
        match hit {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                self.entries.remove_if(key, |_, e| e.expires_at <= now);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) {
        if ttl.is_zero() {
            self.entries.remove(key);
            return;
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn forget(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .remove(key)
            .is_some_and(|(_, e)| e.expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .put("media.movie.1", json!({"id": 1}), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("media.movie.1").await, Some(json!({"id": 1})));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("media.movie.1").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn forget_and_purge() {
        let cache = MemoryCache::new();
        cache.put("a", json!(1), Duration::from_secs(10)).await;
        cache.put("b", json!(2), Duration::from_secs(100)).await;
        assert!(cache.forget("a").await);
        assert!(!cache.forget("a").await);

        cache.put("c", json!(3), Duration::from_secs(5)).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_is_not_stored() {
        let cache = MemoryCache::new();
        cache.put("k", json!(true), Duration::ZERO).await;
        assert_eq!(cache.get("k").await, None);
    }
}
