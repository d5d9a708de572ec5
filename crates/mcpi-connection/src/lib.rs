//! Line-protocol connection to a Minecraft Pi API endpoint
//!
//! This crate provides:
//! - `LineConnection`, one TCP connection shared safely between tasks
//! - The `Connection` trait for code that should not care about the transport
//! - Line transport abstractions (LineReader/LineWriter traits) and TCP halves
//! - `BlockingConnection` for synchronous callers

pub mod blocking;
pub mod config;
pub mod connection;
pub mod tcp;
pub mod transport;

pub use blocking::BlockingConnection;
pub use config::ConnectionConfig;
pub use connection::{Connection, ConnectionState, LineConnection};
pub use mcpi_core::{McpiError, Result, Value, args};
pub use transport::{LineReader, LineWriter};
