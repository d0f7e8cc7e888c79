//! Globally shared monotonic sequence counter.

use std::sync::{Arc, Mutex};

/// Hands out strictly increasing sequence numbers to every issuing task.
///
/// Issuance is serialized by a mutex, so concurrent callers never observe
/// duplicates or gaps. Cloning is cheap; all clones share one counter.
/// The first claimed value is 1.
#[derive(Clone, Debug, Default)]
pub struct SequenceCounter {
    current: Arc<Mutex<u64>>,
}

impl SequenceCounter {
    /// Create a counter whose first claimed value will be 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next sequence number.
    pub fn claim(&self) -> u64 {
        let mut current = self.current.lock().expect("sequence counter lock poisoned");
        *current += 1;
        *current
    }

    /// Number of sequence values claimed so far.
    pub fn issued(&self) -> u64 {
        *self.current.lock().expect("sequence counter lock poisoned")
    }
}
