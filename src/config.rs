//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every mapping bound, window size, and threshold lives here; nothing in
//! the rate model is hard-coded. All sections and fields are optional and
//! fall back to the defaults below, so running without a config file is
//! fully supported.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub link: LinkConfig,

    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

/// Telemetry source configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_host")]
    pub host: String,

    #[serde(default = "default_telemetry_port")]
    pub port: u16,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Link adaptation configuration: mapping bounds, windows, thresholds
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Weakest RSSI of the bitrate ramp (dBm)
    #[serde(default = "default_rssi_low")]
    pub rssi_low: i32,

    /// Strongest RSSI of the bitrate ramp (dBm)
    #[serde(default = "default_rssi_high")]
    pub rssi_high: i32,

    /// Bitrate at or below `rssi_low`
    #[serde(default = "default_bitrate_low")]
    pub bitrate_low: u32,

    /// Bitrate at or above `rssi_high`
    #[serde(default = "default_bitrate_high")]
    pub bitrate_high: u32,

    /// Weakest RSSI of the TX power ramp (dBm)
    #[serde(default = "default_tx_rssi_min")]
    pub tx_rssi_min: i32,

    /// Strongest RSSI of the TX power ramp (dBm)
    #[serde(default = "default_tx_rssi_max")]
    pub tx_rssi_max: i32,

    /// TX power at or above `tx_rssi_max`
    #[serde(default = "default_tx_power_low")]
    pub tx_power_low: u32,

    /// TX power at or below `tx_rssi_min`
    #[serde(default = "default_tx_power_high")]
    pub tx_power_high: u32,

    /// RSSI moving-average window size; 1 disables smoothing
    #[serde(default = "default_rssi_window")]
    pub rssi_window: usize,

    /// Recovery window size for loss tracking
    #[serde(default = "default_recovery_window")]
    pub recovery_window: usize,

    /// FEC-recovered threshold for loss alerts; 0 together with
    /// `lost_threshold` 0 alerts on every sample
    #[serde(default)]
    pub fec_threshold: u64,

    /// Lost-packet threshold for loss alerts
    #[serde(default)]
    pub lost_threshold: u64,
}

/// Heartbeat configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HeartbeatConfig {
    #[serde(default = "default_heartbeat_interval_secs")]
    pub interval_secs: f64,
}

impl HeartbeatConfig {
    /// The heartbeat period as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}

// Default value functions
fn default_telemetry_host() -> String {
    "localhost".to_string()
}
fn default_telemetry_port() -> u16 {
    8103
}
fn default_reconnect_interval_ms() -> u64 {
    3000
}

fn default_rssi_low() -> i32 {
    -90
}
fn default_rssi_high() -> i32 {
    -50
}
fn default_bitrate_low() -> u32 {
    6000
}
fn default_bitrate_high() -> u32 {
    14000
}
fn default_tx_rssi_min() -> i32 {
    -90
}
fn default_tx_rssi_max() -> i32 {
    -40
}
fn default_tx_power_low() -> u32 {
    1
}
fn default_tx_power_high() -> u32 {
    9
}
fn default_rssi_window() -> usize {
    5
}
fn default_recovery_window() -> usize {
    5
}

fn default_heartbeat_interval_secs() -> f64 {
    0.5
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            host: default_telemetry_host(),
            port: default_telemetry_port(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            rssi_low: default_rssi_low(),
            rssi_high: default_rssi_high(),
            bitrate_low: default_bitrate_low(),
            bitrate_high: default_bitrate_high(),
            tx_rssi_min: default_tx_rssi_min(),
            tx_rssi_max: default_tx_rssi_max(),
            tx_power_low: default_tx_power_low(),
            tx_power_high: default_tx_power_high(),
            rssi_window: default_rssi_window(),
            recovery_window: default_recovery_window(),
            fec_threshold: 0,
            lost_threshold: 0,
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of its valid range or the ramps
    /// are inverted.
    pub fn validate(&self) -> Result<()> {
        if self.telemetry.host.is_empty() {
            return Err(config_error("telemetry host cannot be empty"));
        }
        if self.link.rssi_low >= self.link.rssi_high {
            return Err(config_error("rssi_low must be below rssi_high"));
        }
        if self.link.bitrate_low > self.link.bitrate_high {
            return Err(config_error("bitrate_low must not exceed bitrate_high"));
        }
        if self.link.tx_rssi_min >= self.link.tx_rssi_max {
            return Err(config_error("tx_rssi_min must be below tx_rssi_max"));
        }
        if self.link.tx_power_low > self.link.tx_power_high {
            return Err(config_error("tx_power_low must not exceed tx_power_high"));
        }
        if self.link.rssi_window == 0 {
            return Err(config_error("rssi_window must be at least 1"));
        }
        if self.link.recovery_window == 0 {
            return Err(config_error("recovery_window must be at least 1"));
        }
        if !self.heartbeat.interval_secs.is_finite() || self.heartbeat.interval_secs <= 0.0 {
            return Err(config_error("heartbeat interval must be positive"));
        }
        Ok(())
    }
}

fn config_error(message: &str) -> crate::error::AlinkError {
    crate::error::AlinkError::Config(toml::de::Error::custom(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_the_documented_bounds() {
        let config = Config::default();
        assert_eq!(config.telemetry.host, "localhost");
        assert_eq!(config.telemetry.port, 8103);
        assert_eq!(config.telemetry.reconnect_interval_ms, 3000);
        assert_eq!(config.link.rssi_low, -90);
        assert_eq!(config.link.rssi_high, -50);
        assert_eq!(config.link.bitrate_low, 6000);
        assert_eq!(config.link.bitrate_high, 14000);
        assert_eq!(config.link.tx_rssi_min, -90);
        assert_eq!(config.link.tx_rssi_max, -40);
        assert_eq!(config.link.tx_power_low, 1);
        assert_eq!(config.link.tx_power_high, 9);
        assert_eq!(config.link.rssi_window, 5);
        assert_eq!(config.link.recovery_window, 5);
        assert_eq!(config.link.fec_threshold, 0);
        assert_eq!(config.link.lost_threshold, 0);
        assert_eq!(config.heartbeat.interval_secs, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.telemetry.port, 8103);
        assert_eq!(config.link.bitrate_high, 14000);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [link]
            bitrate_high = 20000
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.link.bitrate_high, 20000);
        assert_eq!(config.link.bitrate_low, 6000);
        assert_eq!(config.telemetry.host, "localhost");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(
            file,
            r#"
            [telemetry]
            host = "gs.local"
            port = 8104

            [heartbeat]
            interval_secs = 0.25
            "#
        )
        .expect("failed to write temp config");

        let config = Config::load(file.path()).expect("config should load");
        assert_eq!(config.telemetry.host, "gs.local");
        assert_eq!(config.telemetry.port, 8104);
        assert_eq!(config.heartbeat.interval_secs, 0.25);
        assert_eq!(config.heartbeat.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "[telemetry").expect("failed to write temp config");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_missing_file() {
        assert!(Config::load("/nonexistent/alink.toml").is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_bitrate_ramp() {
        let mut config = Config::default();
        config.link.rssi_low = -40;
        config.link.rssi_high = -90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_power_ramp() {
        let mut config = Config::default();
        config.link.tx_power_low = 9;
        config.link.tx_power_high = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_windows() {
        let mut config = Config::default();
        config.link.rssi_window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.link.recovery_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_heartbeat() {
        let mut config = Config::default();
        config.heartbeat.interval_secs = 0.0;
        assert!(config.validate().is_err());

        config.heartbeat.interval_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = Config::default();
        config.telemetry.host = String::new();
        assert!(config.validate().is_err());
    }
}
