//! # Acknowledgement Listener
//!
//! Reads inbound acknowledgement lines from the primary input stream.
//!
//! Acknowledgements are informational only: they are parsed and logged,
//! never correlated back into retransmission. This listener runs only in
//! line mode; end-of-input means the peer disconnected and triggers global
//! shutdown. In datagram mode the component is not started at all.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::shutdown::Shutdown;

/// One parsed acknowledgement line.
///
/// Fields are carried verbatim: the listener is log-only, so no numeric
/// interpretation is imposed on the sequence field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub command: String,
    pub sequence: String,
    pub message: String,
}

impl Acknowledgement {
    /// Split a tab-delimited ack line of the form
    /// `COMMAND_TYPE\tsequence\tmessage`.
    ///
    /// Returns `None` for lines with fewer than three fields; any fields
    /// beyond the third are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() < 3 {
            return None;
        }
        Some(Self {
            command: fields[0].to_string(),
            sequence: fields[1].to_string(),
            message: fields[2].to_string(),
        })
    }
}

/// Reads and logs acknowledgement lines until EOF or shutdown.
pub struct AckIngest {
    shutdown: Shutdown,
}

impl AckIngest {
    pub fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }

    /// Run against the process stdin.
    pub async fn run(self) {
        let stdin = BufReader::new(tokio::io::stdin());
        self.read_lines(stdin).await;
    }

    async fn read_lines<R: AsyncBufRead + Unpin>(self, reader: R) {
        debug!("Ack listener started");
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                _ = self.shutdown.signalled() => break,
                result = lines.next_line() => match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("EOF on the command channel; peer disconnected, shutting down");
                        self.shutdown.trigger();
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read from the command channel: {}; shutting down", e);
                        self.shutdown.trigger();
                        break;
                    }
                },
            };

            match Acknowledgement::parse(&line) {
                Some(ack) => info!(
                    "Ack received: command={}, seq={}, msg={}",
                    ack.command, ack.sequence, ack.message
                ),
                None => warn!("Invalid ack format: {:?}", line.trim()),
            }
        }
        debug!("Ack listener stopped");
    }
}
