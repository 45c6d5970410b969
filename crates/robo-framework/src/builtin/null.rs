use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::trace;

use robo_core::{Adapter, AdapterResult, ConfigurableAdapter, OutboundMessage};

/// An adapter that delivers nowhere and remembers what it was asked to send.
///
/// Useful in tests and dry runs.
#[derive(Debug, Default)]
pub struct NullAdapter {
    sent: Mutex<Vec<OutboundMessage>>,
}

/// The null adapter takes no options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NullAdapterConfig {}

impl NullAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every message sent so far.
    pub fn responses(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.text.clone()).collect()
    }

    /// Every message sent so far.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }

    /// Forgets recorded messages.
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Adapter for NullAdapter {
    async fn send(&self, message: &OutboundMessage) -> AdapterResult<()> {
        trace!(text = %message.text, room = ?message.room, "Null adapter received message");
        self.sent.lock().push(message.clone());
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl ConfigurableAdapter for NullAdapter {
    type Config = NullAdapterConfig;

    fn name() -> &'static str {
        "null"
    }

    fn from_config(_config: Self::Config) -> AdapterResult<Self> {
        Ok(Self::new())
    }
}
