//! # Transport Module
//!
//! Delivery mechanisms for formatted command records.
//!
//! This module handles:
//! - The [`Transport`] trait the dispatcher sends through
//! - Line transport: newline-terminated records on stdout, flushed per record
//! - Datagram transport: one UDP datagram per record to a fixed destination
//!
//! The transport is chosen once at process start and is not switchable at
//! runtime.

use async_trait::async_trait;
use std::io;

pub mod datagram;
pub mod line;

pub use datagram::DatagramTransport;
pub use line::LineTransport;

/// Delivery mechanism for one formatted command record.
///
/// Implementations must deliver the record as a complete, newline-terminated
/// line. A returned error is treated as fatal by the dispatcher.
#[async_trait]
pub trait Transport: Send {
    /// Deliver one record (without trailing newline) to the peer.
    async fn send_record(&mut self, record: &str) -> io::Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock transport for testing
    #[derive(Clone, Default)]
    pub struct MockTransport {
        pub sent: Arc<Mutex<Vec<String>>>,
        pub send_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent_records(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        pub fn set_send_error(&self, error: io::ErrorKind) {
            *self.send_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_record(&mut self, record: &str) -> io::Result<()> {
            if let Some(error) = *self.send_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock send error"));
            }
            self.sent.lock().unwrap().push(record.to_string());
            Ok(())
        }
    }
}
