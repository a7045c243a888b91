/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides connection and protocol options for a FIXML session.

use nolfix_core::error::SessionError;
use nolfix_transport::frame::{DEFAULT_MAX_FRAME_SIZE, Framer};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default synchronous (request/response) port.
pub const DEFAULT_SYNC_PORT: u16 = 24444;

/// Default asynchronous (event) port.
pub const DEFAULT_ASYNC_PORT: u16 = 24445;

/// Configuration for a FIXML session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Venue gateway hostname or IP address.
    pub host: String,
    /// Port of the synchronous request/response channel.
    pub sync_port: u16,
    /// Port of the asynchronous event channel. Kept for completeness, never dialed.
    pub async_port: u16,
    /// Maximum accepted frame payload in bytes.
    pub max_frame_size: usize,
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Socket read timeout; `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Socket write timeout; `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
    /// Whether the echoed `UserReqID` must match the one sent.
    pub verify_request_id: bool,
    /// First request id handed out by the session.
    pub initial_request_id: i64,
}

impl SessionConfig {
    /// Creates a new session configuration with required fields.
    ///
    /// # Arguments
    /// * `host` - Venue gateway host
    /// * `sync_port` - Synchronous channel port
    /// * `async_port` - Asynchronous channel port
    #[must_use]
    pub fn new(host: impl Into<String>, sync_port: u16, async_port: u16) -> Self {
        Self {
            host: host.into(),
            sync_port,
            async_port,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            verify_request_id: true,
            initial_request_id: 1,
        }
    }

    /// Sets the maximum frame size.
    #[must_use]
    pub const fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the socket read timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the socket write timeout.
    #[must_use]
    pub const fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Sets whether echoed request ids are checked.
    #[must_use]
    pub const fn with_request_id_verification(mut self, verify: bool) -> Self {
        self.verify_request_id = verify;
        self
    }

    /// Sets the first request id.
    #[must_use]
    pub const fn with_initial_request_id(mut self, id: i64) -> Self {
        self.initial_request_id = id;
        self
    }

    /// Returns the `host:port` address of the synchronous channel.
    #[must_use]
    pub fn sync_addr(&self) -> String {
        format!("{}:{}", self.host, self.sync_port)
    }

    /// Returns the `host:port` address of the asynchronous channel.
    #[must_use]
    pub fn async_addr(&self) -> String {
        format!("{}:{}", self.host, self.async_port)
    }

    /// Returns a framer honouring the configured maximum frame size.
    #[must_use]
    pub const fn framer(&self) -> Framer {
        Framer::new().with_max_frame_size(self.max_frame_size)
    }

    /// Checks the configuration for values the session cannot work with.
    ///
    /// # Errors
    /// Returns `SessionError::Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.host.trim().is_empty() {
            return Err(SessionError::Configuration("host is empty".to_string()));
        }
        if self.sync_port == 0 {
            return Err(SessionError::Configuration(
                "sync_port must be non-zero".to_string(),
            ));
        }
        if self.max_frame_size == 0 {
            return Err(SessionError::Configuration(
                "max_frame_size must be non-zero".to_string(),
            ));
        }
        for (name, timeout) in [
            ("connect_timeout", self.connect_timeout),
            ("read_timeout", self.read_timeout),
            ("write_timeout", self.write_timeout),
        ] {
            if timeout.is_some_and(|t| t.is_zero()) {
                return Err(SessionError::Configuration(format!(
                    "{name} must be non-zero"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", DEFAULT_SYNC_PORT, DEFAULT_ASYNC_PORT)
    }
}
