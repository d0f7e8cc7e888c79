//! Telemetry ingest loop: connect, parse, derive, dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::command::{Command, CommandDispatcher};
use crate::config::Config;
use crate::rate::{MovingAverage, RateModel, RecoverySample, RecoveryWindow};
use crate::shutdown::Shutdown;
use crate::telemetry::message::{RxReport, TelemetryMessage};

/// Consumes the JSON telemetry feed and turns receiver reports into control
/// commands.
///
/// The loop never gives up on the telemetry source: failed connects and
/// dropped connections are retried after a fixed backoff until shutdown is
/// signalled. Window state (RSSI smoothing, recovery tracking) lives in this
/// task and survives reconnects; per-connection read state does not, so a
/// reconnect can never reorder or replay commands.
pub struct TelemetryIngest {
    host: String,
    port: u16,
    backoff: Duration,
    model: RateModel,
    rssi_window: MovingAverage,
    recovery_window: RecoveryWindow,
    fec_threshold: u64,
    lost_threshold: u64,
    dispatcher: Arc<CommandDispatcher>,
    shutdown: Shutdown,
}

impl TelemetryIngest {
    /// Build the ingest loop from the loaded configuration.
    pub fn new(config: &Config, dispatcher: Arc<CommandDispatcher>, shutdown: Shutdown) -> Self {
        Self {
            host: config.telemetry.host.clone(),
            port: config.telemetry.port,
            backoff: Duration::from_millis(config.telemetry.reconnect_interval_ms),
            model: RateModel::new(&config.link),
            rssi_window: MovingAverage::new(config.link.rssi_window),
            recovery_window: RecoveryWindow::new(config.link.recovery_window),
            fec_threshold: config.link.fec_threshold,
            lost_threshold: config.link.lost_threshold,
            dispatcher,
            shutdown,
        }
    }

    /// Run until shutdown is signalled.
    pub async fn run(mut self) {
        while !self.shutdown.is_triggered() {
            debug!(
                "Connecting to telemetry stream at {}:{}...",
                self.host, self.port
            );
            let stream = tokio::select! {
                _ = self.shutdown.signalled() => break,
                result = TcpStream::connect((self.host.as_str(), self.port)) => match result {
                    Ok(stream) => stream,
                    Err(e) => {
                        debug!(
                            "Failed to connect to telemetry stream: {}; retrying in {:?}",
                            e, self.backoff
                        );
                        self.sleep_backoff().await;
                        continue;
                    }
                },
            };

            debug!("Connected. Listening for telemetry messages...");
            self.read_stream(stream).await;

            if self.shutdown.is_triggered() {
                break;
            }
            self.sleep_backoff().await;
        }
        debug!("Telemetry ingest stopped");
    }

    /// Fixed backoff between connection attempts, cut short by shutdown.
    async fn sleep_backoff(&self) {
        tokio::select! {
            _ = self.shutdown.signalled() => {}
            _ = tokio::time::sleep(self.backoff) => {}
        }
    }

    /// Read lines from one connection until it ends or shutdown is
    /// signalled. A read error only ends the connection, never the loop.
    async fn read_stream(&mut self, stream: TcpStream) {
        let mut lines = BufReader::new(stream).lines();
        loop {
            let line = tokio::select! {
                _ = self.shutdown.signalled() => return,
                result = lines.next_line() => match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("Telemetry stream closed by peer");
                        return;
                    }
                    Err(e) => {
                        debug!("Telemetry read error: {}", e);
                        return;
                    }
                },
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.process_line(line).await;
        }
    }

    /// Classify and act on one line of the feed. Malformed lines are logged
    /// and skipped, never fatal.
    async fn process_line(&mut self, line: &str) {
        let message = match TelemetryMessage::parse(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping malformed telemetry line: {}", e);
                return;
            }
        };

        match message {
            TelemetryMessage::Settings => debug!("Received settings message"),
            TelemetryMessage::Rx(report) if report.is_video_rx() => {
                self.process_video_rx(report).await;
            }
            TelemetryMessage::Rx(report) => {
                debug!("Received rx message with id {:?}; no action", report.id);
            }
            TelemetryMessage::Other { kind } => {
                debug!("Received message of type {:?}; no action", kind);
            }
        }
    }

    /// One control tick: loss alerting, best-antenna selection, smoothing,
    /// and bitrate/power command emission.
    ///
    /// A report without antenna statistics skips the tick entirely.
    async fn process_video_rx(&mut self, report: RxReport) {
        let Some(best) = report.best_antenna() else {
            debug!("No rx_ant_stats available; skipping tick");
            return;
        };
        let best_rssi = best.rssi_avg;

        if let Some(sample) = report.packets.recovery_sample() {
            self.recovery_window.push(sample);
            if let Some(worst) = self.recovery_window.worst() {
                if self.should_alert(worst) {
                    let sent = self
                        .dispatcher
                        .dispatch(Command::RecLost {
                            fec_recovered: worst.fec_recovered,
                            lost: worst.lost,
                        })
                        .await;
                    if !sent {
                        return;
                    }
                }
            }
        } else {
            debug!("No packet counters available for loss tracking");
        }

        self.rssi_window.push(best_rssi);
        let Some(smoothed) = self.rssi_window.average() else {
            return;
        };
        let bitrate = self.model.bitrate(smoothed);
        let tx_power = self.model.tx_power(smoothed);
        debug!(
            "Best RSSI {} dBm, smoothed {} dBm, bitrate {}, TX power {}",
            best_rssi, smoothed, bitrate, tx_power
        );

        if !self.dispatcher.dispatch(Command::Bitrate(bitrate)).await {
            return;
        }
        self.dispatcher.dispatch(Command::TxPower(tx_power)).await;
    }

    /// Alert unconditionally while both thresholds are zero; otherwise only
    /// when the worst retained sample exceeds either threshold.
    fn should_alert(&self, sample: RecoverySample) -> bool {
        if self.fec_threshold == 0 && self.lost_threshold == 0 {
            return true;
        }
        sample.fec_recovered > self.fec_threshold || sample.lost > self.lost_threshold
    }
}
