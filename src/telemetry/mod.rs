//! # Telemetry Module
//!
//! Ingest of the newline-delimited JSON radio telemetry feed.
//!
//! This module handles:
//! - Message classification and the serde shapes of the feed
//! - The self-healing connect/read loop with fixed reconnect backoff
//! - Deriving and dispatching control commands per receiver report

pub mod ingest;
pub mod message;

pub use ingest::TelemetryIngest;
pub use message::{AntennaStats, PacketCounters, RxReport, TelemetryMessage};
