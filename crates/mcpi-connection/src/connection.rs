//! Line-protocol connection to a game's scripting endpoint
//!
//! The protocol carries no request identifiers, so a response belongs to a
//! request only by arrival order. Every wire operation therefore runs under
//! one exclusive gate, and `send_and_receive` holds it across both its write
//! and its read.

use crate::config::ConnectionConfig;
use crate::tcp;
use crate::transport::{LineReader, LineWriter};
use async_trait::async_trait;
use mcpi_core::{McpiError, Result, Value, encode_command, is_quiet, to_ascii_bytes};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle of a connection; a closed connection is never reopened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Unopened = 0,
    Open = 1,
    Closed = 2,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ConnectionState::Unopened,
            1 => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }
}

/// Operations every connection to a game exposes
#[async_trait]
pub trait Connection: Send + Sync {
    /// Establish the connection
    async fn open(&self) -> Result<()>;

    /// Release the connection; repeated calls are no-ops
    async fn close(&self);

    /// Send a command without waiting for a response
    async fn send(&self, command: &str, args: &[Value]) -> Result<()>;

    /// Read one response line
    async fn receive(&self) -> Result<Option<String>>;

    /// Send a command and read its response as one uninterrupted exchange
    async fn send_and_receive(&self, command: &str, args: &[Value]) -> Result<Option<String>>;
}

/// Owned halves of an open stream
enum Link {
    Unopened,
    Open {
        reader: Box<dyn LineReader>,
        writer: Box<dyn LineWriter>,
    },
    Closed,
}

type OpenHalves<'a> = (&'a mut Box<dyn LineReader>, &'a mut Box<dyn LineWriter>);

/// A connection speaking the `name(args)\n` line protocol
///
/// Operations take `&self`, so one connection can be shared between tasks
/// behind an `Arc`. Once closed, `send` does nothing and `receive` /
/// `send_and_receive` return `Ok(None)`; use [`LineConnection::state`] to
/// tell this apart from the peer closing its side.
pub struct LineConnection {
    /// Endpoint configuration
    config: ConnectionConfig,
    /// Exclusive gate around the stream
    link: Mutex<Link>,
    /// Mirror of the link state, readable without the gate
    state: AtomicU8,
    /// Fired by `close()` to abort whatever holds the gate
    closing: CancellationToken,
}

impl LineConnection {
    /// Create an unopened connection
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            link: Mutex::new(Link::Unopened),
            state: AtomicU8::new(ConnectionState::Unopened as u8),
            closing: CancellationToken::new(),
        }
    }

    /// Create an open connection over an already-established transport
    pub fn with_transport(
        config: ConnectionConfig,
        reader: impl LineReader + 'static,
        writer: impl LineWriter + 'static,
    ) -> Self {
        Self {
            config,
            link: Mutex::new(Link::Open {
                reader: Box::new(reader),
                writer: Box::new(writer),
            }),
            state: AtomicU8::new(ConnectionState::Open as u8),
            closing: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Connect to the configured host and port
    ///
    /// Fails with `ConnectionFailed` if the socket cannot be established,
    /// `AlreadyOpen` on a second call and `Closed` after `close()`.
    pub async fn open(&self) -> Result<()> {
        let mut link = self.link.lock().await;
        match *link {
            Link::Unopened => {}
            Link::Open { .. } => return Err(McpiError::AlreadyOpen),
            Link::Closed => return Err(McpiError::Closed),
        }

        let (reader, writer) = tokio::select! {
            biased;
            () = self.closing.cancelled() => return Err(McpiError::Closed),
            halves = tcp::connect(&self.config) => halves?,
        };

        *link = Link::Open {
            reader: Box::new(reader),
            writer: Box::new(writer),
        };
        self.set_state(ConnectionState::Open);
        info!("Connected to {}", self.config.address());
        Ok(())
    }

    /// Close the connection
    ///
    /// Aborts any operation currently holding the gate, then drops the read
    /// path, shuts down the write path and releases the socket.
    pub async fn close(&self) {
        self.closing.cancel();

        let mut link = self.link.lock().await;
        let previous = std::mem::replace(&mut *link, Link::Closed);
        self.set_state(ConnectionState::Closed);

        if let Link::Open { reader, mut writer } = previous {
            drop(reader);
            writer.close_write().await;
            drop(writer);
            info!("Disconnected from {}", self.config.address());
        }
    }

    /// Send `command(args)` without waiting for a response
    pub async fn send(&self, command: &str, args: &[Value]) -> Result<()> {
        let line = encode_command(command, args);
        trace_send(command, &line);
        let bytes = to_ascii_bytes(&line);

        let mut link = self.link.lock().await;
        let Some((_, writer)) = self.open_halves(&mut link, "send")? else {
            return Ok(());
        };

        tokio::select! {
            biased;
            () = self.closing.cancelled() => Ok(()),
            written = writer.write_line(&bytes) => written,
        }
    }

    /// Read one response line
    ///
    /// Returns `None` when the peer has closed its side or the connection is
    /// closed. Blocks until a line arrives otherwise.
    pub async fn receive(&self) -> Result<Option<String>> {
        let mut link = self.link.lock().await;
        let Some((reader, _)) = self.open_halves(&mut link, "receive")? else {
            return Ok(None);
        };

        self.read_response(reader).await
    }

    /// Send `command(args)` and read the response line, holding the gate
    /// throughout so no other exchange can slip in between
    pub async fn send_and_receive(&self, command: &str, args: &[Value]) -> Result<Option<String>> {
        let line = encode_command(command, args);
        trace_send(command, &line);
        let bytes = to_ascii_bytes(&line);

        let mut link = self.link.lock().await;
        let Some((reader, writer)) = self.open_halves(&mut link, "send_and_receive")? else {
            return Ok(None);
        };

        let written = tokio::select! {
            biased;
            () = self.closing.cancelled() => false,
            written = writer.write_line(&bytes) => {
                written?;
                true
            }
        };
        if !written {
            return Ok(None);
        }

        self.read_response(reader).await
    }

    /// Borrow the stream halves, or `None` if the connection is closed or closing
    fn open_halves<'a>(&self, link: &'a mut Link, op: &str) -> Result<Option<OpenHalves<'a>>> {
        if self.closing.is_cancelled() {
            debug!("Ignoring {} on closed connection", op);
            return Ok(None);
        }

        match link {
            Link::Open { reader, writer } => Ok(Some((reader, writer))),
            Link::Unopened => Err(McpiError::NotOpen),
            Link::Closed => {
                debug!("Ignoring {} on closed connection", op);
                Ok(None)
            }
        }
    }

    async fn read_response(&self, reader: &mut Box<dyn LineReader>) -> Result<Option<String>> {
        let response = tokio::select! {
            biased;
            () = self.closing.cancelled() => None,
            line = reader.next_line() => line?,
        };

        if let Some(line) = response.as_deref().filter(|l| !l.is_empty()) {
            debug!("Received: {}", line);
        }
        Ok(response)
    }
}

fn trace_send(command: &str, line: &str) {
    if !is_quiet(command) {
        debug!("Sending: {}", line.trim_end());
    }
}

#[async_trait]
impl Connection for LineConnection {
    async fn open(&self) -> Result<()> {
        LineConnection::open(self).await
    }

    async fn close(&self) {
        LineConnection::close(self).await
    }

    async fn send(&self, command: &str, args: &[Value]) -> Result<()> {
        LineConnection::send(self, command, args).await
    }

    async fn receive(&self) -> Result<Option<String>> {
        LineConnection::receive(self).await
    }

    async fn send_and_receive(&self, command: &str, args: &[Value]) -> Result<Option<String>> {
        LineConnection::send_and_receive(self, command, args).await
    }
}
