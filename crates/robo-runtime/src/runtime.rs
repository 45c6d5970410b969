//! Main runtime: configuration, adapters and the inbox loop.
//!
//! The runtime builds a [`Robot`] from configuration, starts every loaded
//! adapter with a handle to a bounded inbox and then dispatches inbound
//! messages one at a time until it is told to stop.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use robo_runtime::RoboRuntime;
//!
//! // Auto-loads robo.toml from the current directory
//! let runtime = RoboRuntime::new();
//!
//! // Custom configuration path
//! let runtime = RoboRuntime::builder()
//!     .config_file("config/robo.toml")
//!     .build()?;
//!
//! runtime.register_adapter::<ShellAdapter>()?;
//! runtime.register_handler(Greeter)?;
//! runtime.run().await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tracing::{debug, error, info, warn};

use robo_core::{BoxedAdapter, ConfigurableAdapter, Inbox, InboxReceiver};
use robo_framework::{Handler, Robot};

use crate::config::{ConfigLoader, ConfigResult, RoboConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Runs a [`Robot`] against its adapters.
///
/// ```rust,ignore
/// let runtime = RoboRuntime::from_config(&load_config()?);
/// runtime.register_adapter::<ShellAdapter>()?;
/// runtime.run().await?;
/// ```
pub struct RoboRuntime {
    config: RoboConfig,
    robot: Robot,
    running: AtomicBool,
}

impl RoboRuntime {
    /// Creates a runtime from `robo.toml` in the current directory, falling
    /// back to defaults if it cannot be loaded.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                RoboConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from configuration.
    ///
    /// Initializes logging, builds the robot and registers the built-in
    /// handlers unless `robot.load_defaults` is off.
    pub fn from_config(config: &RoboConfig) -> Self {
        logging::init_from_config(&config.logging);

        let robot = Robot::builder()
            .name(config.robot.name.clone())
            .require_address(config.robot.require_address)
            .options(config.robot.options.clone())
            .build();

        if config.robot.load_defaults
            && let Err(e) = robot.register_defaults()
        {
            error!(error = %e, "Failed to register built-in handlers");
        }

        info!(
            robot = %config.robot.name,
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            robot,
            running: AtomicBool::new(false),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RoboConfig {
        &self.config
    }

    /// The engine driven by this runtime.
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Returns whether the inbox loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Builds an adapter from its `adapters.<name>` section and loads it.
    ///
    /// Without a section the adapter's default configuration is used.
    ///
    /// ```rust,ignore
    /// runtime.register_adapter::<ShellAdapter>()?;
    /// ```
    pub fn register_adapter<A>(&self) -> RuntimeResult<Arc<A>>
    where
        A: ConfigurableAdapter,
    {
        let adapter_name = A::name();

        let config: A::Config = if let Some(value) = self.config.adapters.get(adapter_name) {
            value
                .deserialize()
                .map_err(|e| RuntimeError::AdapterConfigDeserialize {
                    adapter: adapter_name.to_string(),
                    reason: e.to_string(),
                })?
        } else {
            warn!(
                adapter = adapter_name,
                "No configuration found for adapter, using default"
            );
            Default::default()
        };

        let adapter = Arc::new(A::from_config(config)?);
        self.robot.load_adapter(adapter_name, adapter.clone())?;
        Ok(adapter)
    }

    /// Loads an already constructed adapter under `name`.
    pub fn load_adapter(&self, name: impl Into<String>, adapter: BoxedAdapter) -> RuntimeResult<()> {
        Ok(self.robot.load_adapter(name, adapter)?)
    }

    /// Registers a handler instance with the robot.
    pub fn register_handler<H: Handler>(&self, handler: H) -> RuntimeResult<usize> {
        Ok(self.robot.register(handler)?)
    }

    /// Runs until Ctrl+C / SIGTERM, or until every adapter has dropped its
    /// inbox.
    pub async fn run(&self) -> RuntimeResult<()> {
        info!("Robo runtime is now running. Press Ctrl+C to stop.");
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` completes, or until every adapter has dropped
    /// its inbox.
    ///
    /// A message being dispatched when `shutdown` fires is finished first.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        if self.running.swap(true, Ordering::AcqRel) {
            warn!("Runtime is already running");
            return Ok(());
        }

        let (inbox, mut receiver) = robo_core::inbox(self.config.robot.queue_capacity);
        self.start_adapters(&inbox).await;
        drop(inbox);

        self.event_loop(&mut receiver, shutdown).await;
        receiver.close();

        self.stop().await;
        self.running.store(false, Ordering::Release);
        Ok(())
    }

    async fn start_adapters(&self, inbox: &Inbox) {
        let adapters = self.robot.adapters();
        debug!("Starting {} adapter(s)", adapters.len());

        for (name, adapter) in adapters {
            if let Err(e) = adapter.on_start(inbox.named(name.as_str())).await {
                error!(adapter = %name, error = %e, "Failed to start adapter");
                continue;
            }
            info!(adapter = %name, "Adapter started");
        }
    }

    async fn event_loop<F>(&self, receiver: &mut InboxReceiver, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                message = receiver.recv() => match message {
                    Some(message) => {
                        let report = self.robot.dispatch(message).await;
                        if report.failed > 0 {
                            warn!(failed = report.failed, "Some handlers failed");
                        }
                    }
                    None => {
                        info!("All adapters closed their inbox, stopping");
                        break;
                    }
                },
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }
    }

    async fn stop(&self) {
        info!("Stopping Robo runtime");

        let report = self.robot.shutdown().await;
        debug!(
            terminated = report.terminated.len(),
            failed = report.failed,
            "Handlers shut down"
        );

        for (name, adapter) in self.robot.adapters() {
            if let Err(e) = adapter.on_shutdown().await {
                error!(adapter = %name, error = %e, "Error during adapter shutdown");
            }
        }

        info!("Runtime stopped");
    }
}

impl Default for RoboRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoboRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoboRuntime")
            .field("robot", &self.robot)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler, listening for Ctrl+C only");
                ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            () = ctrl_c() => {}
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a `RoboRuntime` with custom configuration.
///
/// ```rust,ignore
/// let runtime = RoboRuntime::builder()
///     .config_file("config/robo.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: RoboConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Overrides one dotted config key, e.g. `set("robot.name", "hal")`.
    pub fn set<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<RoboRuntime> {
        let config = self.config_loader.load()?;
        Ok(RoboRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
