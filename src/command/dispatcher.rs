//! Command dispatcher: sequence assignment, formatting, transport hand-off.

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::command::{Command, SequenceCounter};
use crate::shutdown::Shutdown;
use crate::transport::Transport;

/// Owns the transport and the global sequence counter.
///
/// Every dispatch claims the next sequence number and sends the formatted
/// record while holding the transport lock, so records reach the wire in
/// sequence order even when several tasks dispatch concurrently.
///
/// A transport failure is fatal: it is logged, the shutdown flag is set, and
/// no further command is ever dispatched. There is no retry and no
/// retransmission; control state self-heals on the next telemetry tick or
/// heartbeat of a restarted process.
pub struct CommandDispatcher {
    sequence: SequenceCounter,
    transport: Mutex<Box<dyn Transport>>,
    shutdown: Shutdown,
}

impl CommandDispatcher {
    /// Create a dispatcher over the transport chosen at startup.
    pub fn new(transport: Box<dyn Transport>, shutdown: Shutdown) -> Self {
        Self {
            sequence: SequenceCounter::new(),
            transport: Mutex::new(transport),
            shutdown,
        }
    }

    /// Assign the next sequence number, encode the command, and send it.
    ///
    /// Returns `true` if the record reached the transport. Returns `false`
    /// without sending when shutdown is already in progress, or when the
    /// transport failed (which itself triggers shutdown).
    pub async fn dispatch(&self, command: Command) -> bool {
        let mut transport = self.transport.lock().await;
        if self.shutdown.is_triggered() {
            return false;
        }

        let sequence = self.sequence.claim();
        let record = command.encode(sequence);
        match transport.send_record(&record).await {
            Ok(()) => {
                info!("Sent command: {}", record);
                true
            }
            Err(e) => {
                error!("Command transport failed: {}; shutting down", e);
                self.shutdown.trigger();
                false
            }
        }
    }

    /// Total number of sequence numbers issued so far.
    pub fn issued(&self) -> u64 {
        self.sequence.issued()
    }
}
