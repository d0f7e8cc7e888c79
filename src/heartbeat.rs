//! # Heartbeat Timer
//!
//! Periodic liveness signal for the supervising process, independent of
//! telemetry activity.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::command::{Command, CommandDispatcher};
use crate::shutdown::Shutdown;

/// Fires a HEARTBEAT command on a fixed period for the process lifetime.
///
/// The first heartbeat is sent immediately on start. The loop ends when
/// shutdown is signalled or when a dispatch fails (which itself triggers
/// shutdown), so the process stops heartbeating within one period of a
/// fatal transport error.
pub struct HeartbeatTimer {
    interval: Duration,
    dispatcher: Arc<CommandDispatcher>,
    shutdown: Shutdown,
}

impl HeartbeatTimer {
    pub fn new(interval: Duration, dispatcher: Arc<CommandDispatcher>, shutdown: Shutdown) -> Self {
        Self {
            interval,
            dispatcher,
            shutdown,
        }
    }

    /// Run until shutdown is signalled or dispatch fails.
    pub async fn run(self) {
        debug!("Heartbeat timer started with interval {:?}", self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = self.shutdown.signalled() => break,
                _ = ticker.tick() => {
                    if !self.dispatcher.dispatch(Command::Heartbeat).await {
                        break;
                    }
                }
            }
        }
        debug!("Heartbeat timer stopped");
    }
}
