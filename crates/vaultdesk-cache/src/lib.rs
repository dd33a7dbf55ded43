//! # Vaultdesk Cache
//!
//! Response caching for the Vaultdesk admin API.
//!
//! This crate provides:
//! - Deterministic cache keys from namespace, actor and query parameters
//! - TTL classes for cached routes
//! - In-memory and Redis stores behind one [`CacheStore`] trait
//! - Read-through caching and invalidation plans through [`ResponseCache`]
//!
//! # Example
//!
//! ```ignore
//! use vaultdesk_cache::{CacheConfig, QueryParams, ResponseCache, TtlClass, namespaces};
//!
//! let cache = ResponseCache::connect(&CacheConfig::from_env()).await;
//!
//! let params = QueryParams::new().with("page", 1).with("per_page", 10);
//! let key = cache.derive_key(namespaces::admins::LIST, Some(actor_id), &params);
//! let page = cache
//!     .read_through(&key, TtlClass::Medium, || service.list_admins(params))
//!     .await?;
//!
//! cache.invalidate_all(&namespaces::invalidate::admin_changed(42)).await;
//! ```

pub mod config;
pub mod invalidation;
pub mod keys;
pub mod memory;
pub mod namespaces;
pub mod redis;
pub mod response_cache;
pub mod store;
pub mod ttl;

pub use config::{CacheBackend, CacheConfig};
pub use invalidation::{Invalidation, Target};
pub use keys::{CacheKey, KeyDeriver, ParamValue, QueryParams, ToQueryParams};
pub use memory::MemoryCache;
pub use namespaces::invalidate;
pub use self::redis::RedisCache;
pub use response_cache::ResponseCache;
pub use store::{CacheError, CacheStore, DisabledCache, MAX_TTL};
pub use ttl::{TtlClass, TtlPolicy};
