//! # Adaptive Link Controller
//!
//! Observes wfb-ng radio telemetry and steers the transmitter.
//!
//! The controller connects to the newline-delimited JSON telemetry feed,
//! maps the best antenna's RSSI to a target bitrate and TX power, and emits
//! sequenced tab-delimited commands over stdout (with acknowledgements read
//! from stdin) or over one-way UDP datagrams. It runs until the command
//! channel fails, the peer disconnects, or Ctrl+C is received.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alink_ctrl::ack::AckIngest;
use alink_ctrl::command::CommandDispatcher;
use alink_ctrl::config::Config;
use alink_ctrl::heartbeat::HeartbeatTimer;
use alink_ctrl::shutdown::Shutdown;
use alink_ctrl::telemetry::TelemetryIngest;
use alink_ctrl::transport::{DatagramTransport, LineTransport, Transport};

#[derive(Parser, Debug)]
#[command(name = "alink-ctrl")]
#[command(about = "Adaptive link controller for wfb-ng wireless video uplinks")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Heartbeat interval in seconds (overrides the config file)
    #[arg(long)]
    heartbeat: Option<f64>,

    /// Verbosity: 0 silent, 1 commands and acks, 2 full debug
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    verbose: u8,

    /// Transmit commands as UDP datagrams instead of stdout lines
    #[arg(long)]
    udp: bool,

    /// Destination host for UDP transmissions
    #[arg(long, default_value = "10.5.0.10")]
    udp_host: String,

    /// Destination port for UDP transmissions
    #[arg(long, default_value_t = 5557)]
    udp_port: u16,
}

/// Map the CLI verbosity to a default log level.
fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr: stdout is the command channel in line mode
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(log_level(args.verbose).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("alink-ctrl v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(interval) = args.heartbeat {
        config.heartbeat.interval_secs = interval;
    }
    config.validate()?;

    let shutdown = Shutdown::new();

    // The transport is chosen once here and held for the process lifetime
    let transport: Box<dyn Transport> = if args.udp {
        let transport = DatagramTransport::open(&args.udp_host, args.udp_port).await?;
        info!(
            "Running in UDP mode: transmitting to {}",
            transport.destination()
        );
        Box::new(transport)
    } else {
        Box::new(LineTransport::stdout())
    };
    let dispatcher = Arc::new(CommandDispatcher::new(transport, shutdown.clone()));

    tokio::spawn(
        TelemetryIngest::new(&config, Arc::clone(&dispatcher), shutdown.clone()).run(),
    );
    tokio::spawn(
        HeartbeatTimer::new(
            config.heartbeat.interval(),
            Arc::clone(&dispatcher),
            shutdown.clone(),
        )
        .run(),
    );
    if args.udp {
        info!("UDP mode active: ignoring stdin (ack listener not started)");
    } else {
        tokio::spawn(AckIngest::new(shutdown.clone()).run());
    }

    tokio::select! {
        _ = shutdown.signalled() => {
            info!("Shutdown signalled, exiting...");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            shutdown.trigger();
        }
    }

    info!("Total commands issued: {}", dispatcher.issued());
    Ok(())
}
