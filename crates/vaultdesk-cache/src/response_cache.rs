//! Read-through caching and write-through invalidation for route handlers.

use std::future::Future;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::{CacheBackend, CacheConfig};
use crate::invalidation::{Invalidation, Target};
use crate::keys::{CacheKey, KeyDeriver, QueryParams};
use crate::memory::MemoryCache;
use crate::redis::RedisCache;
use crate::store::{CacheStore, DisabledCache};
use crate::ttl::{TtlClass, TtlPolicy};

/// Handle to the response cache, shared through application state.
///
/// Store failures never reach the caller: a failed read is a miss and a
/// failed write or invalidation is logged and dropped.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    keys: KeyDeriver,
    ttl: TtlPolicy,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, keys: KeyDeriver, ttl: TtlPolicy) -> Self {
        Self { store, keys, ttl }
    }

    /// In-memory cache with default keys and TTLs, without a sweeper.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCache::new()),
            KeyDeriver::default(),
            TtlPolicy::default(),
        )
    }

    pub fn disabled() -> Self {
        Self::new(
            Arc::new(DisabledCache),
            KeyDeriver::default(),
            TtlPolicy::default(),
        )
    }

    /// Builds the backend selected by `config`.
    ///
    /// An unreachable Redis degrades to a disabled cache so that separate
    /// instances never serve diverging local copies.
    pub async fn connect(config: &CacheConfig) -> Self {
        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackend::Memory => {
                let memory = MemoryCache::new();
                if let Some(every) = config.sweep_interval() {
                    memory.start_sweeper(every);
                }
                Arc::new(memory)
            }
            CacheBackend::Redis => {
                match RedisCache::connect(&config.redis_url, config.op_timeout()).await {
                    Ok(redis) => Arc::new(redis),
                    Err(e) => {
                        warn!(error = %e, "Redis unavailable, response caching disabled");
                        Arc::new(DisabledCache)
                    }
                }
            }
            CacheBackend::Disabled => Arc::new(DisabledCache),
        };

        info!(
            cache.backend = store.backend(),
            cache.prefix = %config.key_prefix,
            "Response cache initialized"
        );

        Self::new(store, config.key_deriver(), config.ttl_policy())
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        self.ttl
    }

    pub fn derive_key(&self, namespace: &str, actor: Option<i64>, params: &QueryParams) -> CacheKey {
        self.keys.derive(namespace, actor, params)
    }

    /// Returns the cached value, or `None` on a miss or any store failure.
    #[instrument(skip_all, fields(cache.key = %key))]
    pub async fn get_cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let backend = self.store.backend();

        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss");
                counter!("cache_requests_total", "backend" => backend, "result" => "miss")
                    .increment(1);
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Cache read failed, treating as miss");
                counter!("cache_requests_total", "backend" => backend, "result" => "error")
                    .increment(1);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Cache hit");
                counter!("cache_requests_total", "backend" => backend, "result" => "hit")
                    .increment(1);
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, "Failed to deserialize cached value");
                counter!("cache_requests_total", "backend" => backend, "result" => "error")
                    .increment(1);
                None
            }
        }
    }

    /// Stores `value` under `key` for the duration of `ttl`.
    #[instrument(skip_all, fields(cache.key = %key, cache.ttl = %ttl))]
    pub async fn set_cached<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T, ttl: TtlClass) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize value for cache");
                return;
            }
        };

        if let Err(e) = self
            .store
            .set(key.as_str(), raw, self.ttl.duration(ttl))
            .await
        {
            warn!(error = %e, "Cache write failed");
            counter!("cache_write_errors_total", "backend" => self.store.backend()).increment(1);
        }
    }

    /// Applies one invalidation scope.
    pub async fn invalidate(&self, invalidation: &Invalidation) {
        for target in invalidation.targets(&self.keys) {
            let result = match &target {
                Target::Exact(key) => self.store.delete(key).await.map(u64::from),
                Target::Prefix(prefix) => self.store.invalidate_prefix(prefix).await,
            };

            match result {
                Ok(removed) => {
                    debug!(cache.target = target.as_str(), cache.removed = removed, "Cache invalidated");
                    counter!("cache_invalidated_keys_total", "backend" => self.store.backend())
                        .increment(removed);
                }
                Err(e) => {
                    warn!(cache.target = target.as_str(), error = %e, "Failed to invalidate cache");
                }
            }
        }
    }

    /// Applies every scope of a mutation's invalidation plan, in order.
    pub async fn invalidate_all(&self, plan: &[Invalidation]) {
        for invalidation in plan {
            self.invalidate(invalidation).await;
        }
    }

    /// Serves `key` from the cache, or runs `compute` and stores its result.
    ///
    /// Errors from `compute` are returned unchanged and nothing is stored.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: TtlClass,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get_cached(key).await {
            return Ok(cached);
        }

        let value = compute().await?;
        self.set_cached(key, &value, ttl).await;
        Ok(value)
    }

    pub async fn shutdown(&self) {
        self.store.shutdown().await;
        info!(cache.backend = self.store.backend(), "Response cache shut down");
    }
}
