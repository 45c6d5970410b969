//! Error types for the Robo framework.

use thiserror::Error;
use tower::BoxError;

use robo_core::AdapterError;

/// Errors raised while setting up the engine.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// A trigger could not be turned into a descriptor.
    ///
    /// Fatal to the registration of that handler only; other handlers still
    /// load.
    #[error("invalid trigger '{trigger}' on handler '{handler}': {reason}")]
    Configuration {
        /// Name of the handler that declared the trigger.
        handler: String,
        /// Name of the offending trigger method.
        trigger: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The adapter name collides with the broadcast target `"all"`.
    #[error("adapter name '{0}' is reserved for broadcasts")]
    ReservedAdapterName(String),
}

impl FrameworkError {
    /// Creates a configuration error.
    pub fn configuration(
        handler: impl Into<String>,
        trigger: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            handler: handler.into(),
            trigger: trigger.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned to handlers that push messages to adapters.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The named adapter is not registered.
    #[error("unknown adapter '{0}'")]
    UnknownAdapter(String),

    /// The adapter accepted the call but failed to deliver.
    #[error("adapter '{adapter}' failed to deliver: {source}")]
    Delivery {
        /// Adapter that failed.
        adapter: String,
        /// Underlying adapter error.
        #[source]
        source: AdapterError,
    },
}

/// A failure inside a handler method during dispatch.
///
/// Never propagated out of dispatch; it is logged with the trigger identity
/// and counted in the dispatch report.
#[derive(Debug, Error)]
pub enum HandlerInvocationError {
    /// The handler returned an error.
    #[error("trigger '{trigger}' of handler '{handler}' failed: {source}")]
    Failed {
        /// Handler name.
        handler: String,
        /// Trigger name.
        trigger: String,
        /// Error returned by the handler.
        #[source]
        source: BoxError,
    },

    /// The handler panicked.
    #[error("trigger '{trigger}' of handler '{handler}' panicked: {message}")]
    Panicked {
        /// Handler name.
        handler: String,
        /// Trigger name.
        trigger: String,
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// A failure inside a handler's termination hook.
#[derive(Debug, Error)]
pub enum ShutdownHookError {
    /// The hook returned an error.
    #[error("shutdown hook of handler '{handler}' failed: {source}")]
    Failed {
        /// Handler name.
        handler: String,
        /// Error returned by the hook.
        #[source]
        source: BoxError,
    },

    /// The hook panicked.
    #[error("shutdown hook of handler '{handler}' panicked: {message}")]
    Panicked {
        /// Handler name.
        handler: String,
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Result type for engine setup operations.
pub type FrameworkResult<T> = Result<T, FrameworkError>;

/// Result type for notify operations.
pub type NotifyResult<T> = Result<T, NotifyError>;
