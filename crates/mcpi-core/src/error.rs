//! Error types for the mcpi line protocol

use thiserror::Error;

/// Result type for mcpi operations
pub type Result<T> = std::result::Result<T, McpiError>;

/// mcpi error types
#[derive(Debug, Error)]
pub enum McpiError {
    /// Socket-level connect failure (DNS, refused, unreachable, timeout)
    #[error("Failed to connect to {address}: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// `open()` called on a connection that is already open
    #[error("Connection already open")]
    AlreadyOpen,

    /// Operation attempted before `open()`
    #[error("Connection not open, call open() first")]
    NotOpen,

    /// `open()` called on a connection that has been closed
    #[error("Connection closed, create a new connection")]
    Closed,

    /// Any other I/O failure on an open stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Argument (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for McpiError {
    fn from(err: serde_json::Error) -> Self {
        McpiError::Serialization(err.to_string())
    }
}

impl McpiError {
    /// Build a `ConnectionFailed` for the given address
    pub fn connection_failed(address: impl Into<String>, source: std::io::Error) -> Self {
        McpiError::ConnectionFailed {
            address: address.into(),
            source,
        }
    }
}
