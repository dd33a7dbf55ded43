//! Rate limiting configuration for API endpoints.
//!
//! Limits are written as `N/unit`, where unit is `second`, `minute`, `hour`
//! or `day`. Each tier becomes a token bucket of `N` tokens refilled one at a
//! time over `unit / N`, keyed by client IP.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: turn every limiter on or off (default: `true`)
//! - `RATE_LIMIT_ADMIN_CRITICAL`: mutations and admin management (default: `10/minute`)
//! - `RATE_LIMIT_LOGIN`: login (default: `5/minute`)
//! - `RATE_LIMIT_USER_DEFAULT`: reads (default: `100/hour`)
//! - `RATE_LIMIT_EXPORT`: CSV exports (default: `5/hour`)

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tracing::warn;

/// Governor configuration keyed by client IP.
///
/// The IP comes from `x-forwarded-for`, `x-real-ip` or `forwarded`, falling
/// back to the peer address.
pub type IpGovernorConfig =
    GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitParseError {
    #[error("expected '<count>/<unit>', got '{0}'")]
    Format(String),
    #[error("request count must be a positive integer, got '{0}'")]
    Count(String),
    #[error("unknown time unit '{0}'")]
    Unit(String),
}

/// `requests` per `per`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u32,
    pub per: Duration,
}

impl RateLimit {
    pub const fn new(requests: u32, per: Duration) -> Self {
        Self { requests, per }
    }

    pub const fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    pub const fn per_hour(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(3600))
    }

    /// Time to regain one token.
    pub fn replenish_interval(&self) -> Duration {
        (self.per / self.requests.max(1)).max(Duration::from_millis(1))
    }
}

impl FromStr for RateLimit {
    type Err = RateLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, unit) = s
            .split_once('/')
            .ok_or_else(|| RateLimitParseError::Format(s.to_string()))?;

        let requests: u32 = count
            .trim()
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| RateLimitParseError::Count(count.trim().to_string()))?;

        let per = match unit.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Duration::from_secs(1),
            "m" | "min" | "minute" | "minutes" => Duration::from_secs(60),
            "h" | "hour" | "hours" => Duration::from_secs(3600),
            "d" | "day" | "days" => Duration::from_secs(86_400),
            other => return Err(RateLimitParseError::Unit(other.to_string())),
        };

        Ok(Self { requests, per })
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.per.as_secs() {
            1 => "second",
            60 => "minute",
            3600 => "hour",
            86_400 => "day",
            secs => return write!(f, "{}/{}s", self.requests, secs),
        };
        write!(f, "{}/{}", self.requests, unit)
    }
}

/// Route groups sharing one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateTier {
    /// Mutations and admin management.
    Critical,
    Login,
    /// Reads.
    Default,
    Export,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub admin_critical: RateLimit,
    pub login: RateLimit,
    pub user_default: RateLimit,
    pub export: RateLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_critical: RateLimit::per_minute(10),
            login: RateLimit::per_minute(5),
            user_default: RateLimit::per_hour(100),
            export: RateLimit::per_hour(5),
        }
    }
}

impl RateLimitConfig {
    /// Loads limits from the environment. Invalid values are logged and
    /// replaced by their default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off"))
                .unwrap_or(defaults.enabled),
            admin_critical: limit_from_env("RATE_LIMIT_ADMIN_CRITICAL", defaults.admin_critical),
            login: limit_from_env("RATE_LIMIT_LOGIN", defaults.login),
            user_default: limit_from_env("RATE_LIMIT_USER_DEFAULT", defaults.user_default),
            export: limit_from_env("RATE_LIMIT_EXPORT", defaults.export),
        }
    }

    /// Config with every limiter turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn limit(&self, tier: RateTier) -> RateLimit {
        match tier {
            RateTier::Critical => self.admin_critical,
            RateTier::Login => self.login,
            RateTier::Default => self.user_default,
            RateTier::Export => self.export,
        }
    }

    /// Builds the governor config for `tier`.
    ///
    /// Returns `None` when rate limiting is disabled or the limit cannot be
    /// expressed as a token bucket.
    #[must_use]
    pub fn governor_config(&self, tier: RateTier) -> Option<IpGovernorConfig> {
        if !self.enabled {
            return None;
        }

        let limit = self.limit(tier);
        GovernorConfigBuilder::default()
            .period(limit.replenish_interval())
            .burst_size(limit.requests)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
    }
}

fn limit_from_env(name: &str, default: RateLimit) -> RateLimit {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|e: RateLimitParseError| {
            warn!(variable = name, error = %e, "Invalid rate limit, using {default}");
            default
        }),
        Err(_) => default,
    }
}
