use vaultdesk_auth::password;
use vaultdesk_cache::{CacheConfig, ResponseCache};
use vaultdesk_config::{CorsConfig, JwtConfig, RateLimitConfig};

use crate::ledger::Ledger;

#[derive(Clone, Debug)]
pub struct AppState {
    pub ledger: Ledger,
    pub cache: ResponseCache,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    /// bcrypt work factor for new password hashes.
    pub password_cost: u32,
}

pub async fn init_app_state() -> AppState {
    let cache_config = CacheConfig::from_env();

    AppState {
        ledger: Ledger::new(),
        cache: ResponseCache::connect(&cache_config).await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        password_cost: password::cost_from_env(),
    }
}
