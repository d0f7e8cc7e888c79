//! Fixed-capacity FIFO windows owned by the telemetry ingest loop.

use std::collections::VecDeque;

/// Moving average over the most recent RSSI samples.
///
/// Pushing beyond capacity evicts the oldest sample. The average is rounded
/// half away from zero.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    samples: VecDeque<i32>,
    capacity: usize,
}

impl MovingAverage {
    /// Create a window retaining at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: i32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Rounded average of the retained samples, or `None` if empty.
    pub fn average(&self) -> Option<i32> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: i64 = self.samples.iter().map(|&s| i64::from(s)).sum();
        Some((sum as f64 / self.samples.len() as f64).round() as i32)
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no samples have been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One observation of FEC-recovered and lost packet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverySample {
    pub fec_recovered: u64,
    pub lost: u64,
}

impl RecoverySample {
    /// Combined severity used to rank samples within the window.
    pub fn combined(&self) -> u64 {
        self.fec_recovered + self.lost
    }
}

/// FIFO window of the most recent recovery samples.
///
/// Evaluated by selecting the retained sample with the highest combined
/// `fec_recovered + lost`; on ties the first (oldest) maximum wins.
#[derive(Debug, Clone)]
pub struct RecoveryWindow {
    samples: VecDeque<RecoverySample>,
    capacity: usize,
}

impl RecoveryWindow {
    /// Create a window retaining at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: RecoverySample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The retained sample with the highest combined count, or `None` if the
    /// window is empty. The first maximum encountered wins on ties.
    pub fn worst(&self) -> Option<RecoverySample> {
        let mut worst: Option<RecoverySample> = None;
        for &sample in &self.samples {
            match worst {
                Some(current) if sample.combined() <= current.combined() => {}
                _ => worst = Some(sample),
            }
        }
        worst
    }
}
