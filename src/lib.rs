//! # Adaptive Link Controller Library
//!
//! Real-time adaptive-link control for a wfb-ng wireless video uplink.
//!
//! This library observes per-packet radio telemetry (RSSI, packet loss, FEC
//! recovery) from a streaming JSON feed, derives revised transmission
//! parameters, and emits sequenced control commands to the modem/radio
//! subsystem over a bidirectional line channel or a one-way UDP datagram
//! channel.

pub mod ack;
pub mod command;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod rate;
pub mod shutdown;
pub mod telemetry;
pub mod transport;
