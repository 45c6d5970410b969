//! Adapter trait.
//!
//! Adapters bridge a chat transport with the Robo engine. The engine only
//! needs two things from them:
//!
//! - **Outbound**: [`Adapter::send`] delivers text produced by handlers.
//! - **Inbound**: when started, an adapter receives an [`Inbox`] and pushes
//!   every message it reads from its transport into it.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Stdout;
//!
//! #[async_trait]
//! impl Adapter for Stdout {
//!     async fn send(&self, message: &OutboundMessage) -> AdapterResult<()> {
//!         println!("{}", message.text);
//!         Ok(())
//!     }
//!
//!     fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
//!         self
//!     }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::inbox::Inbox;
use crate::message::OutboundMessage;

/// A transport-specific component that exchanges messages with a chat network.
///
/// Implementations are responsible for their own internal synchronization;
/// `send` may be called concurrently from several handlers.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Delivers a message to the transport.
    async fn send(&self, message: &OutboundMessage) -> AdapterResult<()>;

    /// Called when the runtime starts.
    ///
    /// Adapters that produce inbound messages should keep (a clone of) the
    /// inbox, typically inside a spawned reader task. The inbox is already
    /// bound to the adapter's registered name. The default implementation
    /// drops it, which suits send-only adapters.
    async fn on_start(&self, _inbox: Inbox) -> AdapterResult<()> {
        Ok(())
    }

    /// Called when the runtime is shutting down.
    async fn on_shutdown(&self) -> AdapterResult<()> {
        Ok(())
    }

    /// Returns self as an `Arc<dyn Any>` for safe downcasting.
    ///
    /// Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared adapter trait object.
pub type BoxedAdapter = Arc<dyn Adapter>;

/// Trait for adapters that can be created from their configuration section.
///
/// Separates compile-time concerns (`Config` type, `from_config()`) from the
/// object-safe [`Adapter`] trait.
pub trait ConfigurableAdapter: Adapter {
    /// The configuration type, deserialized from `adapters.<name>`.
    type Config: serde::de::DeserializeOwned + Default;

    /// Returns the adapter name, used both as config key and registry name.
    fn name() -> &'static str
    where
        Self: Sized;

    /// Creates an adapter instance from its deserialized configuration.
    fn from_config(config: Self::Config) -> AdapterResult<Self>
    where
        Self: Sized;
}
