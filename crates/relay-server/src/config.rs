//! Server configuration.

use std::env;
use std::net::SocketAddr;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Process-level settings: where to listen, where to persist, how to log.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// SQLite URL for the conversation store. Conversations live in memory
    /// when unset.
    pub database_url: Option<String>,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// - `RELAY_ADDR` - listen address (default: 0.0.0.0:8000)
    /// - `RELAY_DATABASE_URL` - e.g. `sqlite:data/relay.db?mode=rwc`
    /// - `RELAY_LOG_JSON` - "true"/"1" for JSON logs
    pub fn from_env() -> Result<Self, String> {
        let addr = env::var("RELAY_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| format!("Invalid RELAY_ADDR {:?}: {}", addr, e))?;

        Ok(Self {
            addr,
            database_url: env::var("RELAY_DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            log_json: env::var("RELAY_LOG_JSON")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
        })
    }
}
