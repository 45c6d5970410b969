//! # Robo
//!
//! A pattern-triggered chat-bot framework for Rust.
//!
//! ## Overview
//!
//! A bot is a set of handlers. Each handler lists trigger methods, each bound
//! to a regular expression and optionally to a room filter. Inbound chat
//! messages addressed to the bot are matched against every trigger; all
//! matching triggers fire in a stable order, and fallback triggers only fire
//! when nothing else did.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  Inbox   ┌────────────┐     ┌──────────────────────────┐
//! │   Adapter   │─────────▶│   Runtime  │────▶│ Robot                    │
//! │  (shell)    │  (mpsc)  │ (one loop) │     │  registry → dispatcher   │──▶ handlers
//! └─────────────┘          └────────────┘     │  adapter table ← notify  │
//!        ▲                                    └──────────────────────────┘
//!        └──────────────────── replies ─────────────────┘
//! ```
//!
//! - **Core**: message types, the adapter contract and the inbox
//! - **Framework**: handlers, triggers, the registry and dispatch
//! - **Runtime**: configuration, logging and the event loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use robo::prelude::*;
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     async fn hi(&self, ctx: TriggerContext) -> HandlerResult {
//!         ctx.reply("hello!").await?;
//!         Ok(())
//!     }
//! }
//!
//! impl Handler for Greeter {
//!     fn triggers(&self) -> Vec<TriggerSpec<Self>> {
//!         triggers! {
//!             /// Say hello
//!             hi => "^hi\\b",
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = RoboRuntime::new();
//!     runtime.register_adapter::<ShellAdapter>()?;
//!     runtime.register_handler(Greeter)?;
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): load `robo.toml`
//! - `yaml-config`: load `robo.yaml`
//! - `json-log`: JSON log output
//! - `shell` (default): the stdin/stdout adapter

pub use robo_core as core;
pub use robo_framework as framework;
pub use robo_runtime as runtime;

pub use robo_framework::triggers;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use robo::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use robo_runtime::RoboRuntime;
    #[cfg(feature = "shell")]
    pub use robo_runtime::ShellAdapter;

    // Handlers
    pub use robo_framework::prelude::*;
    pub use robo_framework::{NullAdapter, Target};

    // Adapter contract for custom transports
    pub use robo_core::{
        Adapter, AdapterError, AdapterResult, ConfigurableAdapter, Inbox, InboundMessage,
        OutboundMessage,
    };
}
