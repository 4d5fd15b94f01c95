//! Configuration management for the server.

use crate::remote::{DEFAULT_REMOTE_LIMIT, DEFAULT_REMOTE_URL, DEFAULT_SIMULATED_LATENCY};
use std::env;
use std::time::Duration;

/// Default database location; created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://quotes.db?mode=rwc";

/// Default period between sync passes.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Which remote collaborator sync passes talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    /// Placeholder HTTP endpoint
    Http,
    /// `serverQuotes` slot with artificial latency
    Simulated,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// SQLite connection URL for durable slots
    pub database_url: String,
    /// Remote collaborator
    pub remote_mode: RemoteMode,
    /// Endpoint for the HTTP remote
    pub remote_url: String,
    /// Number of posts taken from the HTTP remote
    pub remote_limit: usize,
    /// Period between sync passes
    pub sync_interval: Duration,
    /// Artificial latency of the simulated remote
    pub simulated_latency: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let remote_mode = match lookup("REMOTE_MODE").as_deref() {
            None | Some("simulated") => RemoteMode::Simulated,
            Some("http") => RemoteMode::Http,
            Some(other) => return Err(ConfigError::InvalidRemoteMode(other.to_string())),
        };

        let remote_url = lookup("REMOTE_URL").unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());

        let remote_limit = match lookup("REMOTE_LIMIT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("REMOTE_LIMIT"))?,
            None => DEFAULT_REMOTE_LIMIT,
        };

        let sync_interval = match lookup("SYNC_INTERVAL_SECS") {
            Some(value) => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber("SYNC_INTERVAL_SECS"))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidNumber("SYNC_INTERVAL_SECS"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SYNC_INTERVAL,
        };

        let simulated_latency = match lookup("SIMULATED_LATENCY_MS") {
            Some(value) => Duration::from_millis(
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber("SIMULATED_LATENCY_MS"))?,
            ),
            None => DEFAULT_SIMULATED_LATENCY,
        };

        Ok(Self {
            host,
            port,
            database_url,
            remote_mode,
            remote_url,
            remote_limit,
            sync_interval,
            simulated_latency,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid REMOTE_MODE value: {0} (expected \"http\" or \"simulated\")")]
    InvalidRemoteMode(String),

    #[error("Invalid {0} value")]
    InvalidNumber(&'static str),
}
