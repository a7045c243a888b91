//! Common utilities shared across examples.

#![allow(dead_code)]

use nolfix::session::{DEFAULT_ASYNC_PORT, DEFAULT_SYNC_PORT, SessionConfig};
use std::env;
use std::time::Duration;

/// Default venue host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default demo credentials.
pub const DEFAULT_USER: &str = "BOS";

/// Example configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    /// Venue hostname.
    pub host: String,
    /// Synchronous channel port.
    pub sync_port: u16,
    /// Asynchronous channel port.
    pub async_port: u16,
    /// Username sent with every request.
    pub username: String,
    /// Password sent with every request.
    pub password: String,
}

impl ExampleConfig {
    /// Reads `NOL_HOST`, `NOL_SYNC_PORT`, `NOL_ASYNC_PORT`, `NOL_USER` and
    /// `NOL_PASSWORD`, falling back to local defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("NOL_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            sync_port: port_from_env("NOL_SYNC_PORT", DEFAULT_SYNC_PORT),
            async_port: port_from_env("NOL_ASYNC_PORT", DEFAULT_ASYNC_PORT),
            username: env::var("NOL_USER").unwrap_or_else(|_| DEFAULT_USER.to_string()),
            password: env::var("NOL_PASSWORD").unwrap_or_else(|_| DEFAULT_USER.to_string()),
        }
    }

    /// Returns the session configuration for this environment.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.host.clone(), self.sync_port, self.async_port)
            .with_connect_timeout(Duration::from_secs(5))
            .with_read_timeout(Duration::from_secs(10))
            .with_write_timeout(Duration::from_secs(10))
    }

    /// Returns the synchronous channel address.
    #[must_use]
    pub fn sync_addr(&self) -> String {
        format!("{}:{}", self.host, self.sync_port)
    }
}

fn port_from_env(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(default)
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
