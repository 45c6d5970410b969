//! Interactive stdin/stdout adapter.
//!
//! Every line read from stdin becomes an inbound message; outbound messages
//! are printed to stdout. Reaching the end of stdin closes the adapter's
//! inbox, which stops the runtime once no other adapter is producing.
//!
//! ```toml
//! [adapters.shell]
//! prompt = "robo> "
//! room = "#shell"
//! ```

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use robo_core::{
    Adapter, AdapterError, AdapterResult, ConfigurableAdapter, Inbox, OutboundMessage,
};

/// Configuration for [`ShellAdapter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Printed before each line is read. Empty disables the prompt.
    pub prompt: String,
    /// Room attached to every inbound message.
    pub room: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "robo> ".to_string(),
            room: None,
        }
    }
}

/// Reads messages from stdin and writes replies to stdout.
#[derive(Debug, Default)]
pub struct ShellAdapter {
    config: ShellConfig,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl ShellAdapter {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            reader: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}

async fn print_prompt(prompt: &str) {
    if prompt.is_empty() {
        return;
    }
    let mut stdout = tokio::io::stdout();
    let _ = stdout.write_all(prompt.as_bytes()).await;
    let _ = stdout.flush().await;
}

async fn read_lines(inbox: Inbox, prompt: String, room: Option<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&prompt).await;
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if inbox.deliver(line, room.clone()).await.is_err() {
                    debug!("Inbox closed, shell reader exiting");
                    break;
                }
            }
            Ok(None) => {
                info!("End of input, shell reader exiting");
                break;
            }
            Err(e) => {
                info!(error = %e, "Failed to read stdin, shell reader exiting");
                break;
            }
        }
    }
}

#[async_trait]
impl Adapter for ShellAdapter {
    async fn send(&self, message: &OutboundMessage) -> AdapterResult<()> {
        let mut stdout = tokio::io::stdout();
        let line = format!("{}\n", message.text);
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| AdapterError::send_failed(e.to_string()))?;
        stdout.flush().await?;
        Ok(())
    }

    async fn on_start(&self, inbox: Inbox) -> AdapterResult<()> {
        let handle = tokio::spawn(read_lines(
            inbox,
            self.config.prompt.clone(),
            self.config.room.clone(),
        ));
        if let Some(previous) = self.reader.lock().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    async fn on_shutdown(&self) -> AdapterResult<()> {
        if let Some(handle) = self.reader.lock().take() {
            handle.abort();
        }
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl ConfigurableAdapter for ShellAdapter {
    type Config = ShellConfig;

    fn name() -> &'static str {
        "shell"
    }

    fn from_config(config: Self::Config) -> AdapterResult<Self> {
        Ok(Self::new(config))
    }
}
