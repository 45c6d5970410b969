//! Inbound and outbound message values.
//!
//! Both types are plain data: they are created per message, moved through
//! the pipeline, and dropped once dispatch (or delivery) completes.

use serde::{Deserialize, Serialize};

/// A message received by an adapter and handed to the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Raw text, including the bot's address prefix if the sender used one.
    pub text: String,
    /// Room (channel, group, conversation) the message originated from.
    #[serde(default)]
    pub room: Option<String>,
    /// Name of the adapter that received the message.
    #[serde(default)]
    pub adapter: Option<String>,
}

impl InboundMessage {
    /// Creates a message without room or source adapter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            room: None,
            adapter: None,
        }
    }

    /// Sets the originating room.
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets the name of the adapter that received this message.
    pub fn from_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    /// Returns the room as a string slice.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }
}

/// A message a handler wants an adapter to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Text to deliver.
    pub text: String,
    /// Target room, if the transport distinguishes rooms.
    #[serde(default)]
    pub room: Option<String>,
}

impl OutboundMessage {
    /// Creates an outbound message without a target room.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            room: None,
        }
    }

    /// Sets the target room.
    pub fn to_room(mut self, room: Option<String>) -> Self {
        self.room = room;
        self
    }
}

impl From<&str> for OutboundMessage {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for OutboundMessage {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
