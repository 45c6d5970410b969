//! Bounded inbox between adapters and the dispatch engine.
//!
//! Adapters never call the engine directly. They push [`InboundMessage`]s
//! into an [`Inbox`]; the runtime owns the single [`InboxReceiver`] and
//! dispatches messages one at a time, so a message is fully handled before
//! the next one is taken.
//!
//! ```rust,ignore
//! let (inbox, mut receiver) = robo_core::inbox(64);
//! let shell = inbox.named("shell");
//! shell.deliver("robo ping", None).await?;
//! let message = receiver.recv().await;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use crate::error::{AdapterError, AdapterResult};
use crate::message::InboundMessage;

/// Creates a bounded inbox with room for `capacity` pending messages.
///
/// A capacity of zero is bumped to one.
pub fn inbox(capacity: usize) -> (Inbox, InboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        Inbox {
            adapter: None,
            tx,
        },
        InboxReceiver { rx },
    )
}

/// The sending half of the engine inbox, optionally tagged with the name of
/// the adapter that owns it.
///
/// Cloning is cheap. Once every `Inbox` is dropped the receiver yields
/// `None`.
#[derive(Debug, Clone)]
pub struct Inbox {
    adapter: Option<Arc<str>>,
    tx: mpsc::Sender<InboundMessage>,
}

impl Inbox {
    /// Returns a copy of this inbox that stamps messages with `adapter`.
    pub fn named(&self, adapter: impl Into<Arc<str>>) -> Self {
        Self {
            adapter: Some(adapter.into()),
            tx: self.tx.clone(),
        }
    }

    /// Name of the adapter this inbox is bound to, if any.
    pub fn adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    /// Delivers raw text (and an optional room) to the engine.
    pub async fn deliver(
        &self,
        text: impl Into<String>,
        room: Option<String>,
    ) -> AdapterResult<()> {
        let mut message = InboundMessage::new(text);
        message.room = room;
        self.send(message).await
    }

    /// Delivers a prepared message, filling in the source adapter when the
    /// message does not name one.
    ///
    /// Waits while the inbox is full.
    pub async fn send(&self, mut message: InboundMessage) -> AdapterResult<()> {
        if message.adapter.is_none() {
            message.adapter = self.adapter.as_deref().map(str::to_string);
        }
        trace!(adapter = ?self.adapter, text = %message.text, "Delivering inbound message");
        self.tx
            .send(message)
            .await
            .map_err(|_| AdapterError::InboxClosed {
                adapter: self.adapter.as_deref().unwrap_or("unnamed").to_string(),
            })
    }

    /// Returns `true` once the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The receiving half of the engine inbox.
#[derive(Debug)]
pub struct InboxReceiver {
    rx: mpsc::Receiver<InboundMessage>,
}

impl InboxReceiver {
    /// Waits for the next inbound message.
    ///
    /// Returns `None` once every [`Inbox`] has been dropped and the buffer
    /// is drained.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.rx.recv().await
    }

    /// Stops accepting new messages; already buffered ones can still be read.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
