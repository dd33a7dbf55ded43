//! In-process cache backend.
//!
//! Entries live in a sharded [`DashMap`], so a read, write or delete only
//! locks the shard holding its key. Expiry uses [`tokio::time::Instant`] and
//! follows the runtime clock (which lets tests pause and advance time).

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument};

use crate::store::{CacheError, CacheStore, MAX_TTL};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe in-memory store with per-entry TTL.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Entry>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries, Instant::now())
    }

    /// Spawns a task purging expired entries every `every`.
    ///
    /// Must be called from within a tokio runtime. A previously started
    /// sweeper is stopped first.
    pub fn start_sweeper(&self, every: Duration) {
        let entries = Arc::clone(&self.entries);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = purge(&entries, Instant::now());
                if purged > 0 {
                    debug!(cache.purged = purged, "Purged expired cache entries");
                }
            }
        });

        let previous = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

fn purge(entries: &DashMap<String, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before.saturating_sub(entries.len())
}

#[async_trait]
impl CacheStore for MemoryCache {
    fn backend(&self) -> &'static str {
        "memory"
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }

        // Only remove the entry if it is still the expired one; a concurrent
        // set may already have replaced it.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl.min(MAX_TTL),
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).is_some())
    }

    #[instrument(skip(self), fields(cache.operation = "PREFIX_DEL"))]
    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut removed: u64 = 0;
        self.entries.retain(|key, _| {
            let matches = key.starts_with(prefix);
            if matches {
                removed += 1;
            }
            !matches
        });
        Ok(removed)
    }

    async fn shutdown(&self) {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), MINUTE).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "old".to_string(), MINUTE).await.unwrap();
        cache.set("k", "new".to_string(), MINUTE).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(5))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        // Logical deletion on read
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_capped() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::MAX).await.unwrap();

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_invalidate_prefix() {
        let cache = MemoryCache::new();
        for key in ["app:admins|a1|", "app:admins|a2|page=i:2", "app:admin:42|-|", "app:users|a1|"] {
            cache.set(key, "x".to_string(), MINUTE).await.unwrap();
        }

        let removed = cache.invalidate_prefix("app:admins|").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.get("app:admins|a1|").await.unwrap(), None);
        assert_eq!(cache.get("app:admins|a2|page=i:2").await.unwrap(), None);
        assert!(cache.get("app:admin:42|-|").await.unwrap().is_some());
        assert!(cache.get("app:users|a1|").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_without_matches_is_noop() {
        let cache = MemoryCache::new();
        assert_eq!(cache.invalidate_prefix("nothing:").await.unwrap(), 0);
        assert!(!cache.delete("nothing").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache
            .set("short", "v".to_string(), Duration::from_secs(1))
            .await
            .unwrap();
        cache.set("long", "v".to_string(), MINUTE).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_and_stops_on_shutdown() {
        let cache = MemoryCache::new();
        cache
            .set("short", "v".to_string(), Duration::from_secs(1))
            .await
            .unwrap();
        cache.start_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(cache.is_empty());

        cache.shutdown().await;
        cache.set("k", "v".to_string(), MINUTE).await.unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = Arc::new(MemoryCache::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move {
                cache
                    .set(&format!("key:{i}"), i.to_string(), MINUTE)
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(cache.len(), 32);
        assert_eq!(cache.invalidate_prefix("key:").await.unwrap(), 32);
    }
}
