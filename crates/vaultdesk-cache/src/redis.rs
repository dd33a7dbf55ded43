//! Redis cache backend for multi-instance deployments.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, instrument};

use crate::store::{CacheError, CacheStore, MAX_TTL};

const SCAN_BATCH: usize = 100;

/// Redis store sharing one multiplexed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Redis` if the URL is invalid or the server is
    /// unreachable, and `CacheError::Timeout` if connecting takes longer than
    /// `op_timeout`.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = with_timeout(op_timeout, ConnectionManager::new(client)).await?;

        Ok(Self { conn, op_timeout })
    }
}

async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, redis::RedisError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout(limit)),
    }
}

/// Escapes the glob metacharacters understood by `SCAN MATCH`.
fn glob_escape(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 4);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\' | '^') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisCache {
    fn backend(&self) -> &'static str {
        "redis"
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        with_timeout(self.op_timeout, conn.get::<_, Option<String>>(key)).await
    }

    #[instrument(skip(self, value), fields(cache.operation = "PSETEX"))]
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // PSETEX rejects a zero expiry.
        let millis = u64::try_from(ttl.min(MAX_TTL).as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        with_timeout(
            self.op_timeout,
            conn.pset_ex::<_, _, ()>(key, value, millis),
        )
        .await?;

        debug!(cache.key = %key, cache.ttl_ms = millis, "Cache set");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let removed: u64 = with_timeout(self.op_timeout, conn.del(key)).await?;
        Ok(removed > 0)
    }

    /// Walks the keyspace with `SCAN` so the server is never blocked.
    #[instrument(skip(self), fields(cache.operation = "SCAN_DEL"))]
    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", glob_escape(prefix));
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = with_timeout(
                self.op_timeout,
                redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH)
                    .query_async(&mut conn),
            )
            .await?;

            if !keys.is_empty() {
                let count: u64 = with_timeout(self.op_timeout, conn.del(&keys)).await?;
                deleted += count;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(cache.prefix = %prefix, cache.deleted = deleted, "Prefix invalidation complete");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDIS_URL: &str = "redis://localhost:6379";

    #[test]
    fn test_glob_escape() {
        assert_eq!(glob_escape("vaultdesk:admins|"), "vaultdesk:admins|");
        assert_eq!(glob_escape("a*b?c[d]"), "a\\*b\\?c\\[d\\]");
        assert_eq!(glob_escape("back\\slash"), "back\\\\slash");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisCache::connect("not-a-url", Duration::from_millis(200)).await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_get_delete() {
        let cache = RedisCache::connect(REDIS_URL, Duration::from_secs(1))
            .await
            .unwrap();

        cache
            .set("vaultdesk-test:k", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("vaultdesk-test:k").await.unwrap(),
            Some("v".to_string())
        );
        assert!(cache.delete("vaultdesk-test:k").await.unwrap());
        assert_eq!(cache.get("vaultdesk-test:k").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_invalidate_prefix() {
        let cache = RedisCache::connect(REDIS_URL, Duration::from_secs(1))
            .await
            .unwrap();

        for key in [
            "vaultdesk-test:admins|a1|",
            "vaultdesk-test:admins|a2|page=i:2",
            "vaultdesk-test:admin:42|-|",
        ] {
            cache
                .set(key, "x".to_string(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        let removed = cache
            .invalidate_prefix("vaultdesk-test:admins|")
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(
            cache
                .get("vaultdesk-test:admin:42|-|")
                .await
                .unwrap()
                .is_some()
        );

        cache.invalidate_prefix("vaultdesk-test:").await.unwrap();
    }
}
