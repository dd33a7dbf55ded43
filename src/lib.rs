//! # Vaultdesk API
//!
//! Administrative REST backend for a retail bank, built with Axum. Admins
//! manage customers, deposits, loans, cards and transactions; every read
//! endpoint is served through a response cache and every mutation
//! invalidates the cached entries it makes stale.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── vaultdesk-core/           # AppError, response envelopes, roles, permissions
//! ├── vaultdesk-config/         # JWT, CORS, rate limit and server settings
//! ├── vaultdesk-auth/           # JWT tokens and bcrypt hashing
//! ├── vaultdesk-cache/          # Key derivation, stores, read-through, invalidation
//! └── vaultdesk-observability/  # Tracing and Prometheus metrics
//! src/
//! ├── ledger.rs        # In-memory system of record
//! ├── middleware/      # Authentication and permission extractors
//! ├── modules/         # Feature modules
//! ├── router.rs        # Route groups and rate limit tiers
//! └── validator.rs     # Validated JSON extractor
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `model.rs`: records, DTOs and filter parameters
//! - `service.rs`: business logic over the [`ledger::Ledger`]
//! - `controller.rs`: handlers, cache lookups and invalidations
//! - `router.rs`: route definitions
//!
//! ## Caching
//!
//! Handlers derive a key from a namespace such as `users` or `user:7`, the
//! calling admin for listings, and the request's query parameters. A miss
//! runs the service and stores the response envelope for a short or medium
//! TTL. Mutations name the namespaces they touch through
//! [`vaultdesk_cache::invalidate`], and the whole namespace subtree is
//! dropped once the write has committed.
//!
//! ## Rate Limiting
//!
//! | Tier | Routes | Default |
//! |------|--------|---------|
//! | critical | registration and every mutation | 10/minute |
//! | login | `POST /login` | 5/minute |
//! | default | reads and token refresh | 100/hour |
//! | export | `GET /transactions/export` | 5/hour |

pub mod ledger;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export workspace crates for convenience
pub use vaultdesk_auth;
pub use vaultdesk_cache;
pub use vaultdesk_config;
pub use vaultdesk_core;
