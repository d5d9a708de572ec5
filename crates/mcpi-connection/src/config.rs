//! Connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default host of the game's scripting endpoint
pub const DEFAULT_HOST: &str = "localhost";

/// Default port of the game's scripting endpoint
pub const DEFAULT_PORT: u16 = 4711;

/// Configuration for a line-protocol connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Host to connect to (default: localhost)
    pub host: String,
    /// Port of the scripting endpoint (default: 4711)
    pub port: u16,
    /// Connect timeout in milliseconds; `None` waits for the OS
    pub connect_timeout_ms: Option<u64>,
    /// Disable Nagle's algorithm (default: true)
    pub nodelay: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            connect_timeout_ms: None,
            nodelay: true,
        }
    }
}

impl ConnectionConfig {
    /// Configuration for the given host and port, other settings default
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// `host:port` form used for connecting and logging
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
