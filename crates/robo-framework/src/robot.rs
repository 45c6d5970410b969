//! The [`Robot`] engine.
//!
//! A `Robot` owns the handler registry and the adapter table. It is a cheap
//! handle (`Clone`, `Send`, `Sync`) shared by the runtime, by adapters'
//! callers and by every [`TriggerContext`](crate::context::TriggerContext).
//!
//! ```rust,ignore
//! let robot = Robot::builder().name("test").build();
//! robot.register(Foo::default())?;
//! robot.register_defaults()?;
//! robot.load_adapter("null", Arc::new(NullAdapter::new()))?;
//!
//! robot.dispatch_text("test hi", Some("@random")).await;
//! robot.shutdown().await;
//! ```

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, info};

use robo_core::{Adapter, BoxedAdapter, InboundMessage, OutboundMessage};

use crate::builtin::{Echo, Help, Ping};
use crate::descriptor::{HandlerDescriptor, Tier};
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::error::{FrameworkResult, NotifyResult};
use crate::handler::Handler;
use crate::lifecycle::{ShutdownReport, shutdown_all};
use crate::notifier::{AdapterTable, Target};
use crate::registry::{HandlerDoc, Registry};

/// Name used when none is configured.
pub const DEFAULT_NAME: &str = "robo";

/// Builder for [`Robot`].
#[derive(Debug, Clone)]
pub struct RobotBuilder {
    name: String,
    require_address: bool,
    options: Value,
}

impl Default for RobotBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            require_address: true,
            options: Value::Object(Default::default()),
        }
    }
}

impl RobotBuilder {
    /// Name the robot answers to.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether messages must start with the robot's address to be handled.
    pub fn require_address(mut self, require: bool) -> Self {
        self.require_address = require;
        self
    }

    /// Options handed to [`Configurable`](crate::handler::Configurable)
    /// handlers at registration.
    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Robot {
        Robot {
            inner: Arc::new(RobotInner {
                dispatcher: Dispatcher::new(self.name, self.require_address),
                options: self.options,
                registry: RwLock::new(Registry::new()),
                adapters: AdapterTable::new(),
                next_instance: AtomicU64::new(0),
                defaults: Mutex::new(()),
            }),
        }
    }
}

struct RobotInner {
    dispatcher: Dispatcher,
    options: Value,
    registry: RwLock<Registry>,
    adapters: AdapterTable,
    next_instance: AtomicU64,
    /// Serializes `register_defaults` so the built-ins load once.
    defaults: Mutex<()>,
}

/// Handler registry, adapter table and dispatcher behind one handle.
#[derive(Clone)]
pub struct Robot {
    inner: Arc<RobotInner>,
}

impl Robot {
    /// Creates a robot named `name` with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    pub fn builder() -> RobotBuilder {
        RobotBuilder::default()
    }

    pub fn name(&self) -> &str {
        self.inner.dispatcher.name()
    }

    pub fn require_address(&self) -> bool {
        self.inner.dispatcher.require_address()
    }

    /// Robot-wide options.
    pub fn options(&self) -> &Value {
        &self.inner.options
    }

    // ─── Handlers ────────────────────────────────────────────────────────────

    /// Registers a handler instance and returns how many triggers it added.
    ///
    /// A [`Configurable`](crate::handler::Configurable) handler is configured
    /// with the robot options first. On error nothing is added.
    pub fn register<H: Handler>(&self, handler: H) -> FrameworkResult<usize> {
        self.register_in(handler, Tier::User)
    }

    /// Registers the built-in handlers (echo, ping, help).
    ///
    /// They sort after every user handler. Calling this again is a no-op.
    pub fn register_defaults(&self) -> FrameworkResult<()> {
        let _guard = self.inner.defaults.lock();
        if self.inner.registry.read().has_tier(Tier::Default) {
            debug!("Default handlers already registered");
            return Ok(());
        }
        self.register_in(Echo, Tier::Default)?;
        self.register_in(Ping, Tier::Default)?;
        self.register_in(Help::default(), Tier::Default)?;
        Ok(())
    }

    fn register_in<H: Handler>(&self, mut handler: H, tier: Tier) -> FrameworkResult<usize> {
        if let Some(configurable) = handler.as_configurable() {
            configurable.configure(&self.inner.options);
        }
        let id = self.inner.next_instance.fetch_add(1, Ordering::Relaxed);
        let descriptors = HandlerDescriptor::extract(Arc::new(handler), id, tier)?;
        let count = descriptors.len();
        if let Some(first) = descriptors.first() {
            info!(handler = first.handler_name(), triggers = count, ?tier, "Registered handler");
        }
        self.inner.registry.write().insert(descriptors);
        Ok(count)
    }

    /// Snapshot of the handler table in dispatch order.
    pub fn handlers(&self) -> Arc<[HandlerDescriptor]> {
        self.inner.registry.read().all()
    }

    /// Help entries for every documented trigger, in dispatch order.
    pub fn documentation(&self) -> Vec<HandlerDoc> {
        self.inner.registry.read().documentation()
    }

    // ─── Adapters ────────────────────────────────────────────────────────────

    /// Stores `adapter` under `name`, replacing any adapter of that name.
    ///
    /// `"all"` is reserved for broadcasts and rejected.
    pub fn load_adapter(&self, name: impl Into<String>, adapter: BoxedAdapter) -> FrameworkResult<()> {
        self.inner.adapters.load(name, adapter)
    }

    pub fn adapter(&self, name: &str) -> Option<BoxedAdapter> {
        self.inner.adapters.get(name)
    }

    /// The adapter named `name`, downcast to its concrete type.
    pub fn adapter_as<A: Adapter>(&self, name: &str) -> Option<Arc<A>> {
        let any: Arc<dyn Any + Send + Sync> = self.adapter(name)?.as_any();
        any.downcast::<A>().ok()
    }

    /// Names of all loaded adapters, sorted.
    pub fn adapter_names(&self) -> Vec<String> {
        self.inner.adapters.names()
    }

    /// Snapshot of all loaded adapters, sorted by name.
    pub fn adapters(&self) -> Vec<(String, BoxedAdapter)> {
        self.inner.adapters.entries()
    }

    /// Sends `text` to one adapter, or to every adapter for `None`/`"all"`.
    pub async fn notify<'a>(
        &self,
        target: impl Into<Target<'a>>,
        text: impl Into<String>,
    ) -> NotifyResult<usize> {
        self.notify_room(target.into(), None, text).await
    }

    /// Like [`notify`](Self::notify), addressing a specific room.
    pub async fn notify_room(
        &self,
        target: Target<'_>,
        room: Option<String>,
        text: impl Into<String>,
    ) -> NotifyResult<usize> {
        let message = OutboundMessage::new(text).to_room(room);
        self.inner.adapters.notify(target, &message).await
    }

    // ─── Dispatch & lifecycle ────────────────────────────────────────────────

    /// Dispatches one inbound message against the current handler table.
    pub async fn dispatch(&self, message: InboundMessage) -> DispatchReport {
        let table = self.handlers();
        self.inner.dispatcher.dispatch(self, &table, message).await
    }

    /// Shorthand for dispatching bare text from an optional room.
    pub async fn dispatch_text(&self, text: impl Into<String>, room: Option<&str>) -> DispatchReport {
        let mut message = InboundMessage::new(text);
        message.room = room.map(str::to_string);
        self.dispatch(message).await
    }

    /// Runs every handler's termination hook once.
    pub async fn shutdown(&self) -> ShutdownReport {
        let table = self.handlers();
        info!(handlers = table.len(), "Shutting down handlers");
        shutdown_all(&table).await
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("name", &self.name())
            .field("require_address", &self.require_address())
            .field("handlers", &self.inner.registry.read().len())
            .field("adapters", &self.inner.adapters)
            .finish()
    }
}
