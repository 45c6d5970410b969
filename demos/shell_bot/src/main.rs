//! Shell Bot Example
//!
//! A terminal bot: every line typed on stdin is a chat message, replies are
//! printed to stdout. Messages must be addressed to the bot by name:
//!
//! ```text
//! robo> robo hi
//! Hello there!
//! robo> robo help
//! ...
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package shell-bot -- --name robo
//! cargo run --package shell-bot -- --config demos/shell_bot/robo.toml
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use clap::Parser;
use robo::prelude::*;
use robo::runtime::config::ConfigLoader;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Chat with a Robo bot in your terminal")]
struct Args {
    /// Configuration file to load instead of ./robo.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (development, production, ...)
    #[arg(short, long)]
    profile: Option<String>,

    /// Name the bot answers to
    #[arg(short, long)]
    name: Option<String>,

    /// Handle messages that are not addressed to the bot
    #[arg(long)]
    no_address: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Greets people and counts how many greetings it handed out.
#[derive(Default)]
struct Greeter {
    greeting: Option<String>,
    greeted: AtomicUsize,
}

impl Greeter {
    async fn hi(&self, ctx: TriggerContext) -> HandlerResult {
        self.greeted.fetch_add(1, Ordering::Relaxed);
        let greeting = self.greeting.as_deref().unwrap_or("Hello there!");
        ctx.reply(greeting).await?;
        Ok(())
    }

    async fn bye(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("See you!").await?;
        Ok(())
    }

    async fn whisper(&self, ctx: TriggerContext) -> HandlerResult {
        let secret = ctx.named("secret").unwrap_or_default().to_string();
        ctx.reply(format!("psst... {secret}")).await?;
        Ok(())
    }

    async fn confused(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply(format!("Sorry, I don't know how to '{}'", ctx.text()))
            .await?;
        Ok(())
    }
}

impl Handler for Greeter {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        triggers! {
            /// Say hello
            hi => r"^(?:hi|hello)\b",
            /// Say goodbye
            bye => r"^bye\b",
            /// Tell a secret (only in the #secret room)
            whisper => r"^whisper\s+(?P<secret>.+)" [room = "^#secret$"],
            confused => ".*" [fallback],
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Configurable for Greeter {
    fn configure(&mut self, options: &Value) {
        self.greeting = options
            .pointer("/greeter/greeting")
            .and_then(Value::as_str)
            .map(str::to_string);
    }
}

#[async_trait]
impl Terminable for Greeter {
    async fn shutdown(&self) -> HandlerResult {
        info!(
            greeted = self.greeted.load(Ordering::Relaxed),
            "Greeter shutting down"
        );
        Ok(())
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile.clone());
    }
    if let Some(name) = &args.name {
        loader = loader.set("robot.name", name);
    }
    if args.no_address {
        loader = loader.set("robot.require_address", false);
    }
    let config = loader.load()?;

    let runtime = RoboRuntime::from_config(&config);
    runtime.register_adapter::<ShellAdapter>()?;
    runtime.register_handler(Greeter::default())?;

    info!(
        name = runtime.robot().name(),
        handlers = runtime.robot().handlers().len(),
        "Shell bot ready"
    );

    // Runs until Ctrl+C or end of input
    runtime.run().await?;

    Ok(())
}
