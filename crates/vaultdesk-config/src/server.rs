use std::env;
use std::net::SocketAddr;

use tracing::warn;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Reads `SERVER_ADDR` (default `0.0.0.0:3000`).
    pub fn from_env() -> Self {
        match env::var("SERVER_ADDR") {
            Ok(raw) => match raw.parse() {
                Ok(addr) => Self { addr },
                Err(e) => {
                    warn!(error = %e, value = %raw, "Invalid SERVER_ADDR, using {DEFAULT_ADDR}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
