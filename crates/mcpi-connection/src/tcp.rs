//! TCP transport for the line protocol

use crate::config::ConnectionConfig;
use mcpi_core::{McpiError, Result};
use std::io;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info};

/// Line-buffered read half of a TCP connection
pub type TcpLineReader = BufReader<OwnedReadHalf>;

/// Write half of a TCP connection
pub type TcpLineWriter = OwnedWriteHalf;

/// Connect to the configured endpoint and split the socket into line halves
///
/// Any socket-level failure, including an elapsed connect timeout, is
/// reported as `ConnectionFailed`.
pub async fn connect(config: &ConnectionConfig) -> Result<(TcpLineReader, TcpLineWriter)> {
    let addr = config.address();
    info!("Connecting to {}", addr);

    let connecting = TcpStream::connect((config.host.as_str(), config.port));
    let stream = within_connect_timeout(&addr, config.connect_timeout(), connecting).await?;

    if config.nodelay {
        stream
            .set_nodelay(true)
            .map_err(|e| McpiError::connection_failed(&addr, e))?;
    }

    if let Ok(local) = stream.local_addr() {
        debug!("Connected to {} from {}", addr, local);
    }

    let (read_half, write_half) = stream.into_split();
    Ok((BufReader::new(read_half), write_half))
}

/// Await a connect attempt, mapping failure or an elapsed limit to `ConnectionFailed`
async fn within_connect_timeout<F, T>(addr: &str, limit: Option<Duration>, connecting: F) -> Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    let outcome = match limit {
        Some(limit) => match tokio::time::timeout(limit, connecting).await {
            Ok(outcome) => outcome,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no answer within {:?}", limit),
            )),
        },
        None => connecting.await,
    };
    outcome.map_err(|e| McpiError::connection_failed(addr, e))
}
