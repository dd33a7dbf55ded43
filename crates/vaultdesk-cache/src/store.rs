//! Storage backends for cached responses.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Longest lifetime an entry can get. Backends cap larger TTLs to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Error type for cache backend operations.
///
/// Never surfaced to HTTP clients: [`crate::ResponseCache`] logs these and
/// degrades to a miss or a no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Key-value store with per-entry TTL and prefix invalidation.
///
/// Implementations are shared by every request and handle their own
/// synchronization. Each operation is atomic for a single key; nothing is
/// promised across keys.
#[async_trait]
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and metrics.
    fn backend(&self) -> &'static str;

    /// Returns the stored value unless it is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` until `ttl` elapses, overwriting any previous entry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes a single key. Returns whether something was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Removes every key starting with `prefix` and returns how many were removed.
    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    /// Releases background resources. Called once at process shutdown.
    async fn shutdown(&self) {}
}

/// Store used when caching is turned off or the backend is unreachable.
///
/// Every read is a miss and every write is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn invalidate_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let store = DisabledCache;
        store
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.invalidate_prefix("").await.unwrap(), 0);
    }
}
