//! Error types shared by adapters.

use thiserror::Error;

/// Errors that can occur in adapter operations.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Delivering an outbound message failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The engine's inbox has been closed; no more messages are accepted.
    #[error("inbox closed, message from '{adapter}' dropped")]
    InboxClosed {
        /// Adapter that tried to deliver.
        adapter: String,
    },

    /// Invalid adapter configuration.
    #[error("invalid adapter configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates a send failure.
    pub fn send_failed(msg: impl Into<String>) -> Self {
        Self::SendFailed(msg.into())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
