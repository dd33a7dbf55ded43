//! Cache configuration.
//!
//! # Environment Variables
//!
//! - `CACHE_BACKEND`: `memory`, `redis` or `disabled` (default: `memory`)
//! - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
//! - `CACHE_PREFIX`: Root of every cache key (default: `vaultdesk`)
//! - `CACHE_TTL_SHORT`: Seconds for the short TTL class (default: `300`)
//! - `CACHE_TTL_MEDIUM`: Seconds for the medium TTL class (default: `3600`)
//! - `CACHE_HASH_PARAMS`: Hash the parameter section of keys (default: `false`)
//! - `CACHE_SWEEP_INTERVAL_SECONDS`: Memory backend purge interval, `0` disables (default: `60`)
//! - `CACHE_OP_TIMEOUT_MS`: Per-operation timeout for Redis (default: `250`)

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::keys::KeyDeriver;
use crate::ttl::TtlPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            "disabled" | "none" | "off" => Ok(CacheBackend::Disabled),
            other => Err(format!("unknown cache backend '{other}'")),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheBackend::Memory => "memory",
            CacheBackend::Redis => "redis",
            CacheBackend::Disabled => "disabled",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: String,
    /// Root of every key, keeps several deployments apart on one Redis.
    pub key_prefix: String,
    pub ttl_short_seconds: u64,
    pub ttl_medium_seconds: u64,
    pub hash_params: bool,
    pub sweep_interval_seconds: u64,
    pub op_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: "vaultdesk".into(),
            ttl_short_seconds: 300,
            ttl_medium_seconds: 3600,
            hash_params: false,
            sweep_interval_seconds: 60,
            op_timeout_ms: 250,
        }
    }
}

impl CacheConfig {
    /// Loads configuration from the environment, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Invalid CACHE_BACKEND, using memory");
                CacheBackend::Memory
            }),
            Err(_) => defaults.backend,
        };

        Self {
            backend,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.key_prefix),
            ttl_short_seconds: parsed("CACHE_TTL_SHORT").unwrap_or(defaults.ttl_short_seconds),
            ttl_medium_seconds: parsed("CACHE_TTL_MEDIUM").unwrap_or(defaults.ttl_medium_seconds),
            hash_params: env::var("CACHE_HASH_PARAMS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.hash_params),
            sweep_interval_seconds: parsed("CACHE_SWEEP_INTERVAL_SECONDS")
                .unwrap_or(defaults.sweep_interval_seconds),
            op_timeout_ms: parsed("CACHE_OP_TIMEOUT_MS").unwrap_or(defaults.op_timeout_ms),
        }
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.ttl_short_seconds),
            Duration::from_secs(self.ttl_medium_seconds),
        )
    }

    pub fn key_deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.key_prefix.clone()).with_hashed_params(self.hash_params)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms.max(1))
    }

    /// `None` when the sweeper is turned off.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_seconds > 0).then(|| Duration::from_secs(self.sweep_interval_seconds))
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
