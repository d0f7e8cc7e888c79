//! # Error Types
//!
//! Custom error types for the adaptive link controller using `thiserror`.

use thiserror::Error;

/// Main error type for the adaptive link controller
#[derive(Debug, Error)]
pub enum AlinkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command transport errors
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for the adaptive link controller
pub type Result<T> = std::result::Result<T, AlinkError>;
