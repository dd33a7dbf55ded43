//! Token signing settings.
//!
//! - `JWT_SECRET`: HMAC signing secret
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 3600)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: 604800)

use std::env;

use tracing::warn;

const DEV_SECRET: &str = "change-me-in-production-at-least-32-chars";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604_800,
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set, signing tokens with the development secret");
                defaults.secret
            }
        };

        Self {
            secret,
            access_token_expiry: lifetime_from_env("JWT_ACCESS_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: lifetime_from_env(
                "JWT_REFRESH_EXPIRY",
                defaults.refresh_token_expiry,
            ),
        }
    }
}

/// Positive number of seconds, or `default`.
fn lifetime_from_env(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|raw| parse_lifetime(&raw))
        .unwrap_or(default)
}

fn parse_lifetime(raw: &str) -> Option<i64> {
    raw.trim().parse().ok().filter(|secs: &i64| *secs > 0)
}
