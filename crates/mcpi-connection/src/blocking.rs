//! Synchronous facade over [`LineConnection`]
//!
//! Owns a current-thread tokio runtime and blocks on each operation. Its
//! operations must not be called from inside an async context; use
//! `LineConnection` there.

use crate::config::ConnectionConfig;
use crate::connection::{ConnectionState, LineConnection};
use mcpi_core::{Result, Value};
use tokio::runtime::{Builder, Handle, Runtime};

/// Blocking connection for scripts and non-async callers
pub struct BlockingConnection {
    inner: LineConnection,
    /// Only taken in `drop`
    runtime: Option<Runtime>,
}

impl BlockingConnection {
    /// Create an unopened connection and its private runtime
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: LineConnection::new(config),
            runtime: Some(runtime),
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match &self.runtime {
            Some(runtime) => runtime.block_on(future),
            None => unreachable!("runtime is only taken in drop"),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn open(&self) -> Result<()> {
        self.block_on(self.inner.open())
    }

    pub fn close(&self) {
        self.block_on(self.inner.close())
    }

    pub fn send(&self, command: &str, args: &[Value]) -> Result<()> {
        self.block_on(self.inner.send(command, args))
    }

    pub fn receive(&self) -> Result<Option<String>> {
        self.block_on(self.inner.receive())
    }

    pub fn send_and_receive(&self, command: &str, args: &[Value]) -> Result<Option<String>> {
        self.block_on(self.inner.send_and_receive(command, args))
    }
}

impl Drop for BlockingConnection {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        if Handle::try_current().is_ok() {
            // Blocking inside another runtime panics; the socket closes with `inner`
            runtime.shutdown_background();
        } else {
            runtime.block_on(self.inner.close());
        }
    }
}
