//! # Shutdown Coordination
//!
//! One-way cooperative shutdown flag shared by every long-running task.
//!
//! The flag only ever transitions from unset to set; setting it is
//! idempotent. Reads are lock-free. Tasks observe the transition at their
//! next iteration boundary, either by polling [`Shutdown::is_triggered`] or
//! by selecting on [`Shutdown::signalled`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Shared handle to the global shutdown flag.
///
/// Cloning is cheap; all clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

#[derive(Debug, Default)]
struct ShutdownInner {
    triggered: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    /// Create a new, unset shutdown flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every task waiting in [`Shutdown::signalled`].
    ///
    /// Idempotent: triggering an already-set flag has no further effect.
    pub fn trigger(&self) {
        self.inner.triggered.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Lock-free read of the flag.
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Wait until the flag is set.
    ///
    /// Completes immediately if the flag is already set. Intended for use in
    /// `tokio::select!` alongside a blocking read or sleep.
    pub async fn signalled(&self) {
        loop {
            // Register interest before re-checking the flag so a trigger
            // between the check and the await cannot be missed.
            let notified = self.inner.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}
