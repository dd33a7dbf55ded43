//! TTL classes for cached responses.

use std::fmt;
use std::time::Duration;

/// Named duration policy assigned to each cached route.
///
/// - `Short`: aggregates and fast-moving listings (analytics, transactions).
/// - `Medium`: entity details and listings that only change through mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    Short,
    Medium,
}

impl TtlClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtlClass::Short => "short",
            TtlClass::Medium => "medium",
        }
    }
}

impl fmt::Display for TtlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durations backing each [`TtlClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub short: Duration,
    pub medium: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(300),
            medium: Duration::from_secs(3600),
        }
    }
}

impl TtlPolicy {
    pub fn new(short: Duration, medium: Duration) -> Self {
        Self { short, medium }
    }

    pub fn duration(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Short => self.short,
            TtlClass::Medium => self.medium,
        }
    }
}
