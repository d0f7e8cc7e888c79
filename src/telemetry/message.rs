//! JSON shapes of the telemetry feed.
//!
//! The feed delivers one JSON object per line. Only `rx` reports for the
//! video receiver drive control decisions; everything else is either
//! consumed silently (`settings`) or logged as an extension point.

use serde::Deserialize;
use serde_json::Value;

use crate::rate::RecoverySample;

/// Stream id of the receiver report that drives control decisions.
pub const VIDEO_RX_ID: &str = "video rx";

/// RSSI substituted for antennas that report no `rssi_avg`, low enough to
/// never win the best-antenna selection against a real reading.
const MISSING_RSSI_DBM: i32 = -1000;

/// One parsed line of the telemetry feed, classified by its `type` field.
#[derive(Debug)]
pub enum TelemetryMessage {
    /// One-time settings snapshot sent when the stream opens
    Settings,
    /// Per-tick receiver report
    Rx(RxReport),
    /// Recognized JSON of a shape this controller does not act on
    Other { kind: String },
}

impl TelemetryMessage {
    /// Classify one line of the feed.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for lines that are not valid JSON or
    /// whose `rx` payload has an unexpected layout; the caller logs and
    /// skips those lines.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match kind.as_str() {
            "settings" => Ok(TelemetryMessage::Settings),
            "rx" => Ok(TelemetryMessage::Rx(serde_json::from_value(value)?)),
            _ => Ok(TelemetryMessage::Other { kind }),
        }
    }
}

/// Per-tick receiver report. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RxReport {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub rx_ant_stats: Vec<AntennaStats>,

    #[serde(default)]
    pub packets: PacketCounters,
}

impl RxReport {
    /// True for the report stream that drives control decisions.
    pub fn is_video_rx(&self) -> bool {
        self.id == VIDEO_RX_ID
    }

    /// The antenna with the highest `rssi_avg`, or `None` if the report
    /// carries no antenna statistics. The first maximum encountered wins on
    /// ties.
    pub fn best_antenna(&self) -> Option<&AntennaStats> {
        let mut best: Option<&AntennaStats> = None;
        for antenna in &self.rx_ant_stats {
            match best {
                Some(current) if antenna.rssi_avg <= current.rssi_avg => {}
                _ => best = Some(antenna),
            }
        }
        best
    }
}

/// Statistics for a single receive antenna.
#[derive(Debug, Clone, Deserialize)]
pub struct AntennaStats {
    /// Average RSSI over the tick, in dBm
    #[serde(default = "default_rssi_avg")]
    pub rssi_avg: i32,
}

fn default_rssi_avg() -> i32 {
    MISSING_RSSI_DBM
}

/// Per-tick packet counters; each entry is a `[delta, total]` pair of which
/// only the leading delta matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PacketCounters {
    #[serde(default)]
    pub fec_rec: Vec<u64>,

    #[serde(default)]
    pub lost: Vec<u64>,
}

impl PacketCounters {
    /// The tick's recovery sample, if both counters carry a leading value.
    pub fn recovery_sample(&self) -> Option<RecoverySample> {
        match (self.fec_rec.first(), self.lost.first()) {
            (Some(&fec_recovered), Some(&lost)) => Some(RecoverySample {
                fec_recovered,
                lost,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings_message() {
        let message = TelemetryMessage::parse(r#"{"type":"settings","profile":"default"}"#)
            .expect("settings line should parse");
        assert!(matches!(message, TelemetryMessage::Settings));
    }

    #[test]
    fn test_parse_video_rx_report() {
        let line = r#"{"type":"rx","id":"video rx","rx_ant_stats":[{"ant":0,"rssi_avg":-55,"rssi_min":-60}],"packets":{"fec_rec":[1,10],"lost":[2,20]}}"#;
        let message = TelemetryMessage::parse(line).expect("rx line should parse");
        let TelemetryMessage::Rx(report) = message else {
            panic!("expected an rx report");
        };
        assert!(report.is_video_rx());
        assert_eq!(report.rx_ant_stats.len(), 1);
        assert_eq!(report.rx_ant_stats[0].rssi_avg, -55);
        assert_eq!(
            report.packets.recovery_sample(),
            Some(RecoverySample {
                fec_recovered: 1,
                lost: 2
            })
        );
    }

    #[test]
    fn test_parse_unknown_type_is_classified_not_rejected() {
        let message = TelemetryMessage::parse(r#"{"type":"tx","id":"video tx"}"#)
            .expect("unknown type should still parse");
        let TelemetryMessage::Other { kind } = message else {
            panic!("expected an Other message");
        };
        assert_eq!(kind, "tx");
    }

    #[test]
    fn test_parse_missing_type_is_classified_as_other() {
        let message =
            TelemetryMessage::parse(r#"{"id":"something"}"#).expect("line should parse");
        let TelemetryMessage::Other { kind } = message else {
            panic!("expected an Other message");
        };
        assert_eq!(kind, "");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(TelemetryMessage::parse("{not json").is_err());
        assert!(TelemetryMessage::parse("").is_err());
    }

    #[test]
    fn test_best_antenna_selects_the_maximum() {
        let report = RxReport {
            id: VIDEO_RX_ID.to_string(),
            rx_ant_stats: vec![
                AntennaStats { rssi_avg: -70 },
                AntennaStats { rssi_avg: -55 },
            ],
            packets: PacketCounters::default(),
        };
        assert_eq!(report.best_antenna().map(|a| a.rssi_avg), Some(-55));
    }

    #[test]
    fn test_best_antenna_first_maximum_wins_on_ties() {
        let report = RxReport {
            rx_ant_stats: vec![
                AntennaStats { rssi_avg: -60 },
                AntennaStats { rssi_avg: -80 },
                AntennaStats { rssi_avg: -60 },
            ],
            ..RxReport::default()
        };
        let best = report.best_antenna().expect("report has antennas");
        assert!(std::ptr::eq(best, &report.rx_ant_stats[0]));
    }

    #[test]
    fn test_best_antenna_none_without_statistics() {
        assert!(RxReport::default().best_antenna().is_none());
    }

    #[test]
    fn test_missing_rssi_avg_never_beats_a_real_reading() {
        let line = r#"{"type":"rx","id":"video rx","rx_ant_stats":[{"ant":0},{"ant":1,"rssi_avg":-88}]}"#;
        let TelemetryMessage::Rx(report) =
            TelemetryMessage::parse(line).expect("rx line should parse")
        else {
            panic!("expected an rx report");
        };
        assert_eq!(report.best_antenna().map(|a| a.rssi_avg), Some(-88));
    }

    #[test]
    fn test_recovery_sample_requires_both_counters() {
        let only_fec = PacketCounters {
            fec_rec: vec![3],
            lost: vec![],
        };
        assert_eq!(only_fec.recovery_sample(), None);

        let empty = PacketCounters::default();
        assert_eq!(empty.recovery_sample(), None);
    }
}
