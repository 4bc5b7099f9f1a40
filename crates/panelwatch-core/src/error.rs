//! Core error types.

use thiserror::Error;

/// Core change detection errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] panelwatch_proto::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The webinar API failed.
    #[error("source error: {0}")]
    Source(String),

    /// The event sink rejected an event.
    #[error("sink error: {0}")]
    Sink(String),
}
