//! Line-based command transport over the primary output stream.

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tracing::debug;

use super::Transport;

/// Writes one newline-terminated, tab-delimited record per command and
/// flushes immediately so the peer always sees complete lines.
///
/// In production the writer is the process stdout; tests substitute a
/// scripted writer. A write failure (typically a broken pipe once the peer
/// exits) is surfaced to the dispatcher, which treats it as fatal.
pub struct LineTransport<W = Stdout> {
    out: W,
}

impl LineTransport {
    /// Line transport over the process stdout.
    pub fn stdout() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for LineTransport {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: AsyncWrite + Unpin + Send> LineTransport<W> {
    /// Line transport over an arbitrary writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Transport for LineTransport<W> {
    async fn send_record(&mut self, record: &str) -> io::Result<()> {
        let mut line = String::with_capacity(record.len() + 1);
        line.push_str(record);
        line.push('\n');

        self.out.write_all(line.as_bytes()).await?;
        self.out.flush().await?;

        debug!("Wrote {} bytes to the line channel", line.len());
        Ok(())
    }
}
