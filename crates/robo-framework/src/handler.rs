//! Handler capability traits.
//!
//! A handler is a value bundling one or more trigger methods. Instead of
//! discovering those methods at runtime, every handler lists them through
//! [`Handler::triggers`], usually generated by the [`triggers!`] macro:
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
//!             /// Say hi back.
//!             hi => "^hi",
//!         }
//!     }
//! }
//! ```
//!
//! Optional lifecycle behaviour is opted into through the [`Terminable`] and
//! [`Configurable`] capabilities, exposed via [`Handler::as_terminable`] and
//! [`Handler::as_configurable`].
//!
//! [`triggers!`]: crate::triggers

use async_trait::async_trait;
use serde_json::Value;
use tower::BoxError;

use crate::trigger::TriggerSpec;

/// Result type returned by trigger methods and hooks.
pub type HandlerResult = Result<(), BoxError>;

/// An object bundling one or more trigger-bound response methods.
pub trait Handler: Send + Sync + 'static {
    /// Name used in logs and error messages.
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Lists the trigger methods of this handler in declaration order.
    fn triggers(&self) -> Vec<TriggerSpec<Self>>
    where
        Self: Sized;

    /// Returns the termination hook, if this handler has one.
    fn as_terminable(&self) -> Option<&dyn Terminable> {
        None
    }

    /// Returns the configuration hook, if this handler has one.
    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }
}

/// Handlers that need to release resources when the bot shuts down.
#[async_trait]
pub trait Terminable: Send + Sync {
    /// Called once per handler instance during shutdown.
    async fn shutdown(&self) -> HandlerResult;
}

/// Handlers that accept the robot-wide options map.
pub trait Configurable: Send + Sync {
    /// Called once, before the handler's triggers are extracted.
    fn configure(&mut self, options: &Value);
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
