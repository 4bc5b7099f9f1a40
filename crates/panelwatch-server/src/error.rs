//! Server error types.

use thiserror::Error;

/// Server errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Change detection error.
    #[error("detector error: {0}")]
    Core(#[from] panelwatch_core::Error),

    /// API client error.
    #[error("client error: {0}")]
    Client(#[from] panelwatch_client::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
