//! # Rate Model Module
//!
//! Pure mapping from a signal sample to revised transmission parameters.
//!
//! This module handles:
//! - RSSI to bitrate mapping (clamped linear interpolation)
//! - RSSI to transmit power mapping (clamped, inverted interpolation)
//! - Fixed-capacity FIFO windows for RSSI smoothing and loss tracking
//!
//! The model itself is stateless; the moving-average and recovery windows in
//! [`window`] are owned by the caller.

pub mod window;

pub use window::{MovingAverage, RecoverySample, RecoveryWindow};

use crate::config::LinkConfig;

/// Stateless mapping from an RSSI sample to target bitrate and TX power.
///
/// All bounds come from [`LinkConfig`]; nothing in the mapping is
/// hard-coded. Outputs are always clamped to the configured range.
///
/// # Examples
///
/// ```
/// use alink_ctrl::config::LinkConfig;
/// use alink_ctrl::rate::RateModel;
///
/// let model = RateModel::new(&LinkConfig::default());
/// assert_eq!(model.bitrate(-90), 6000);
/// assert_eq!(model.tx_power(-90), 9);
/// ```
#[derive(Debug, Clone)]
pub struct RateModel {
    rssi_low: i32,
    rssi_high: i32,
    bitrate_low: u32,
    bitrate_high: u32,
    tx_rssi_min: i32,
    tx_rssi_max: i32,
    tx_power_low: u32,
    tx_power_high: u32,
}

impl RateModel {
    /// Build a model from the configured link bounds.
    pub fn new(link: &LinkConfig) -> Self {
        Self {
            rssi_low: link.rssi_low,
            rssi_high: link.rssi_high,
            bitrate_low: link.bitrate_low,
            bitrate_high: link.bitrate_high,
            tx_rssi_min: link.tx_rssi_min,
            tx_rssi_max: link.tx_rssi_max,
            tx_power_low: link.tx_power_low,
            tx_power_high: link.tx_power_high,
        }
    }

    /// Map an RSSI value (dBm) to a target bitrate.
    ///
    /// At or below `rssi_low` returns `bitrate_low`; at or above `rssi_high`
    /// returns `bitrate_high`; linear in between, truncated toward zero.
    pub fn bitrate(&self, rssi: i32) -> u32 {
        if rssi <= self.rssi_low {
            return self.bitrate_low;
        }
        if rssi >= self.rssi_high {
            return self.bitrate_high;
        }
        let ratio = f64::from(rssi - self.rssi_low) / f64::from(self.rssi_high - self.rssi_low);
        let bitrate = f64::from(self.bitrate_low)
            + ratio * (f64::from(self.bitrate_high) - f64::from(self.bitrate_low));
        bitrate as u32
    }

    /// Map an RSSI value (dBm) to a transmit power level.
    ///
    /// Inverted interpolation: at or below `tx_rssi_min` (worst signal)
    /// returns `tx_power_high`; at or above `tx_rssi_max` (best signal)
    /// returns `tx_power_low`; linear in between, rounded half away from
    /// zero.
    pub fn tx_power(&self, rssi: i32) -> u32 {
        if rssi <= self.tx_rssi_min {
            return self.tx_power_high;
        }
        if rssi >= self.tx_rssi_max {
            return self.tx_power_low;
        }
        let ratio =
            f64::from(rssi - self.tx_rssi_min) / f64::from(self.tx_rssi_max - self.tx_rssi_min);
        let power = f64::from(self.tx_power_high)
            - ratio * (f64::from(self.tx_power_high) - f64::from(self.tx_power_low));
        power.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_model() -> RateModel {
        RateModel::new(&LinkConfig::default())
    }

    #[test]
    fn test_bitrate_clamps_at_weak_signal() {
        let model = default_model();
        assert_eq!(model.bitrate(-90), 6000);
        assert_eq!(model.bitrate(-120), 6000);
    }

    #[test]
    fn test_bitrate_clamps_at_strong_signal() {
        let model = default_model();
        assert_eq!(model.bitrate(-50), 14000);
        assert_eq!(model.bitrate(-30), 14000);
    }

    #[test]
    fn test_bitrate_interpolates_linearly() {
        let model = default_model();
        // Midpoint of [-90, -50] maps to the midpoint of [6000, 14000]
        assert_eq!(model.bitrate(-70), 10000);
        // Quarter of the way up
        assert_eq!(model.bitrate(-80), 8000);
    }

    #[test]
    fn test_bitrate_truncates_toward_zero() {
        // 6000 + (1/40) * 8000 = 6200.0 exactly; pick bounds that fall
        // between integers instead
        let link = LinkConfig {
            rssi_low: -90,
            rssi_high: -50,
            bitrate_low: 6000,
            bitrate_high: 14001,
            ..LinkConfig::default()
        };
        let model = RateModel::new(&link);
        // 6000 + (1/40) * 8001 = 6200.025 -> 6200
        assert_eq!(model.bitrate(-89), 6200);
    }

    #[test]
    fn test_bitrate_is_monotonic_non_decreasing() {
        let model = default_model();
        let mut previous = model.bitrate(-120);
        for rssi in -120..=0 {
            let bitrate = model.bitrate(rssi);
            assert!(
                bitrate >= previous,
                "bitrate decreased at rssi {}: {} < {}",
                rssi,
                bitrate,
                previous
            );
            previous = bitrate;
        }
    }

    #[test]
    fn test_tx_power_clamps_at_weak_signal() {
        let model = default_model();
        assert_eq!(model.tx_power(-90), 9);
        assert_eq!(model.tx_power(-100), 9);
    }

    #[test]
    fn test_tx_power_clamps_at_strong_signal() {
        let model = default_model();
        assert_eq!(model.tx_power(-40), 1);
        assert_eq!(model.tx_power(-20), 1);
    }

    #[test]
    fn test_tx_power_inverts_the_interpolation() {
        let model = default_model();
        // Midpoint of [-90, -40] maps to the midpoint of [9, 1]
        assert_eq!(model.tx_power(-65), 5);
        // Stronger signal, lower power
        assert!(model.tx_power(-50) < model.tx_power(-80));
    }

    #[test]
    fn test_tx_power_rounds_half_away_from_zero() {
        // 9 - (1/2) * (9 - 2) = 5.5 -> 6 under the committed rounding rule
        let link = LinkConfig {
            tx_rssi_min: -90,
            tx_rssi_max: -40,
            tx_power_low: 2,
            tx_power_high: 9,
            ..LinkConfig::default()
        };
        let model = RateModel::new(&link);
        assert_eq!(model.tx_power(-65), 6);
    }

    #[test]
    fn test_tx_power_is_monotonic_non_increasing() {
        let model = default_model();
        let mut previous = model.tx_power(-120);
        for rssi in -120..=0 {
            let power = model.tx_power(rssi);
            assert!(
                power <= previous,
                "tx power increased at rssi {}: {} > {}",
                rssi,
                power,
                previous
            );
            previous = power;
        }
    }
}
