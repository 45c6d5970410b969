//! # Robo Core
//!
//! The narrow contracts shared by every layer of the Robo chat-bot framework.
//!
//! This crate deliberately knows nothing about handlers or pattern matching.
//! It only defines how the outside world talks to the dispatch engine:
//!
//! - **Messages**: [`InboundMessage`] (what an adapter received) and
//!   [`OutboundMessage`] (what a handler wants delivered).
//! - **Adapters**: the [`Adapter`] trait implemented by transports, plus
//!   [`ConfigurableAdapter`] for adapters that are built from configuration.
//! - **Inbox**: the bounded channel ([`Inbox`]) through which adapters hand
//!   inbound messages to the engine, one at a time and in order.
//!
//! ```text
//! ┌─────────────┐  Inbox   ┌──────────┐  notify   ┌─────────────┐
//! │   Adapter   │─────────▶│  Robot   │──────────▶│   Adapter   │
//! │  (shell)    │  (mpsc)  │ (engine) │           │  (shell)    │
//! └─────────────┘          └──────────┘           └─────────────┘
//! ```

pub mod adapter;
pub mod error;
pub mod inbox;
pub mod message;

pub use adapter::{Adapter, BoxedAdapter, ConfigurableAdapter};
pub use error::{AdapterError, AdapterResult};
pub use inbox::{Inbox, InboxReceiver, inbox};
pub use message::{InboundMessage, OutboundMessage};
