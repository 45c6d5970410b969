//! # Robo Framework
//!
//! Handler registry and dispatch engine for chat bots.
//!
//! This layer provides:
//! - The [`Handler`] capability and the [`triggers!`] macro for declaring
//!   pattern-bound trigger methods
//! - The descriptor extractor and the ordered [`Registry`]
//! - The [`Dispatcher`] (multi-match, single-winner fallback)
//! - The adapter table and [`Robot::notify`]
//! - Shutdown of handlers through the optional [`Terminable`] capability
//! - Built-in handlers ([`Echo`], [`Ping`], [`Help`]) and the [`NullAdapter`]
//!
//! Everything is reached through a [`Robot`] handle:
//!
//! ```rust,ignore
//! use robo_framework::prelude::*;
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     async fn hi(&self, ctx: TriggerContext) -> HandlerResult {
//!         ctx.reply("hi").await?;
//!         Ok(())
//!     }
//! }
//!
//! impl Handler for Greeter {
//!     fn triggers(&self) -> Vec<TriggerSpec<Self>> {
//!         triggers! {
//!             /// say hi
//!             hi => "^hi",
//!         }
//!     }
//! }
//!
//! let robot = Robot::new("robo");
//! robot.register(Greeter)?;
//! robot.dispatch_text("robo hi", None).await;
//! ```

#[macro_use]
mod macros;

pub mod builtin;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod notifier;
pub mod registry;
pub mod robot;
pub mod service;
pub mod trigger;

pub use async_trait::async_trait;
pub use futures::future::BoxFuture;

pub use builtin::{Echo, Help, NullAdapter, Ping};
pub use context::{Captures, TriggerContext};
pub use descriptor::{HandlerDescriptor, Tier};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{
    FrameworkError, FrameworkResult, HandlerInvocationError, NotifyError, NotifyResult,
    ShutdownHookError,
};
pub use handler::{Configurable, Handler, HandlerResult, Terminable};
pub use lifecycle::{ShutdownReport, shutdown_all};
pub use notifier::{AdapterTable, BROADCAST, Target};
pub use registry::{HandlerDoc, Registry};
pub use robot::{Robot, RobotBuilder};
pub use trigger::{TriggerFn, TriggerSpec};

/// Everything needed to write handlers.
pub mod prelude {
    pub use crate::async_trait;
    pub use crate::triggers;
    pub use crate::{
        Configurable, Handler, HandlerResult, Robot, Terminable, TriggerContext, TriggerSpec,
    };
}
