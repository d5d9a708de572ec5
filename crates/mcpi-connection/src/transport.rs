//! Line transport abstractions
//!
//! Provides LineReader/LineWriter traits so the connection can run over TCP
//! or any other byte stream.

use async_trait::async_trait;
use mcpi_core::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Trait for reading newline-terminated lines
#[async_trait]
pub trait LineReader: Send {
    /// Read the next line with its terminator (`\n` or `\r\n`) stripped
    ///
    /// A final unterminated line is returned as-is. Returns `None` once the
    /// peer has closed the stream.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Trait for writing encoded request lines
#[async_trait]
pub trait LineWriter: Send {
    /// Write a complete line (terminator included) and flush it
    async fn write_line(&mut self, line: &[u8]) -> Result<()>;

    /// Shut down the write direction, ignoring errors
    async fn close_write(&mut self);
}

#[async_trait]
impl<R> LineReader for R
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

#[async_trait]
impl<W> LineWriter for W
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.write_all(line).await?;
        self.flush().await?;
        Ok(())
    }

    async fn close_write(&mut self) {
        let _ = self.shutdown().await;
    }
}
