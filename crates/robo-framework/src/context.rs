//! The context handed to a trigger method.
//!
//! One [`TriggerContext`] is built per invoked descriptor. The message itself
//! is shared (`Arc`) between every handler that fires for it; captures are
//! specific to the trigger whose pattern produced them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use robo_core::InboundMessage;

use crate::error::NotifyResult;
use crate::notifier::Target;
use crate::robot::Robot;

/// Capture groups of a trigger pattern, owned so the context can outlive the
/// text it was matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    groups: Vec<Option<String>>,
    named: HashMap<String, String>,
}

impl Captures {
    /// Runs `pattern` against `text` and copies out the groups.
    ///
    /// Returns empty captures when the pattern does not match.
    pub(crate) fn capture(pattern: &Regex, text: &str) -> Self {
        let Some(caps) = pattern.captures(text) else {
            return Self::default();
        };
        let groups = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        let named = pattern
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();
        Self { groups, named }
    }

    /// Positional group; `0` is the whole match.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// Named group.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Number of groups including the whole match.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Everything a trigger method needs to answer a message.
#[derive(Clone)]
pub struct TriggerContext {
    robot: Robot,
    message: Arc<InboundMessage>,
    text: Arc<str>,
    trigger: Cow<'static, str>,
    captures: Arc<Captures>,
}

impl TriggerContext {
    pub(crate) fn new(
        robot: Robot,
        message: Arc<InboundMessage>,
        text: Arc<str>,
        trigger: Cow<'static, str>,
        captures: Captures,
    ) -> Self {
        Self {
            robot,
            message,
            text,
            trigger,
            captures: Arc::new(captures),
        }
    }

    /// Handle to the engine, e.g. for [`Robot::documentation`].
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// The inbound message as received, address prefix included.
    pub fn message(&self) -> &InboundMessage {
        &self.message
    }

    /// Raw text as received.
    pub fn raw(&self) -> &str {
        &self.message.text
    }

    /// Text the pattern was matched against (address prefix stripped).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Room the message came from.
    pub fn room(&self) -> Option<&str> {
        self.message.room()
    }

    /// Adapter that received the message.
    pub fn adapter(&self) -> Option<&str> {
        self.message.adapter.as_deref()
    }

    /// Name of the trigger being invoked.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// All capture groups.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Positional capture group; `0` is the whole match.
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index)
    }

    /// Named capture group.
    pub fn named(&self, name: &str) -> Option<&str> {
        self.captures.name(name)
    }

    /// Answers in the room the message came from.
    ///
    /// Goes to the source adapter when known, otherwise to every adapter.
    pub async fn reply(&self, text: impl Into<String>) -> NotifyResult<usize> {
        let target = match self.adapter() {
            Some(adapter) => Target::Adapter(adapter),
            None => Target::All,
        };
        self.robot
            .notify_room(target, self.room().map(str::to_string), text)
            .await
    }

    /// Pushes `text` to one adapter, or to all of them for `None`/`"all"`.
    pub async fn notify(
        &self,
        target: Option<&str>,
        text: impl Into<String>,
    ) -> NotifyResult<usize> {
        self.robot.notify(target, text).await
    }
}

impl std::fmt::Debug for TriggerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerContext")
            .field("robot", &self.robot.name())
            .field("message", &self.message)
            .field("text", &self.text)
            .field("trigger", &self.trigger)
            .field("captures", &self.captures)
            .finish()
    }
}
