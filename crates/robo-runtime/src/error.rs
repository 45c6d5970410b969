//! Runtime error types.

use thiserror::Error;

use robo_core::AdapterError;
use robo_framework::FrameworkError;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Adapter configuration deserialization failed.
    #[error("Failed to deserialize config for adapter '{adapter}': {reason}")]
    AdapterConfigDeserialize { adapter: String, reason: String },

    /// Adapter error.
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Handler registration failed.
    #[error(transparent)]
    Framework(#[from] FrameworkError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
