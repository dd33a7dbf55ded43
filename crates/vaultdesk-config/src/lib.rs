//! # Vaultdesk Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetimes
//! - [`cors`]: Allowed CORS origins
//! - [`rate_limit`]: Per-tier API rate limits
//! - [`server`]: Listen address
//!
//! Cache settings live next to the cache in `vaultdesk-cache`.

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{IpGovernorConfig, RateLimit, RateLimitConfig, RateTier};
pub use server::ServerConfig;
