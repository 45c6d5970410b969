//! Robo Runtime - orchestration layer for the Robo chat-bot framework.
//!
//! This crate provides:
//! - Layered configuration (`RoboConfig`, `ConfigLoader`)
//! - Logging setup (`LoggingBuilder`, `init_from_config`)
//! - The inbox event loop (`RoboRuntime`)
//! - A stdin/stdout adapter (`ShellAdapter`, feature `shell`)
//!
//! ```ignore
//! use robo_runtime::{RoboRuntime, ShellAdapter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = RoboRuntime::new();
//!     runtime.register_adapter::<ShellAdapter>()?;
//!     runtime.register_handler(Greeter)?;
//!
//!     // Run until Ctrl+C or end of input
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
#[cfg(feature = "shell")]
pub use adapters::{ShellAdapter, ShellConfig};
pub use config::{ConfigError, ConfigLoader, ConfigResult, RoboConfig, RobotConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RoboRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
