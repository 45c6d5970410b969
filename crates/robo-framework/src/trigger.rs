//! Trigger specifications: the metadata a handler attaches to each of its
//! response methods.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::TriggerContext;
use crate::handler::HandlerResult;

/// A trigger method bound to handler type `H`.
///
/// The instance is passed as an `Arc` so the returned future can own it.
pub type TriggerFn<H> = fn(Arc<H>, TriggerContext) -> BoxFuture<'static, HandlerResult>;

/// Declares one trigger method of a handler.
///
/// Built with [`TriggerSpec::new`] and the chained setters, or by the
/// [`triggers!`](crate::triggers) macro.
pub struct TriggerSpec<H> {
    name: Cow<'static, str>,
    pattern: Cow<'static, str>,
    room: Option<Cow<'static, str>>,
    fallback: bool,
    description: Option<String>,
    method: TriggerFn<H>,
}

impl<H> TriggerSpec<H> {
    /// Creates a trigger named `name` that fires `method` when `pattern`
    /// matches the start of the (address-stripped) message text.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        pattern: impl Into<Cow<'static, str>>,
        method: TriggerFn<H>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            room: None,
            fallback: false,
            description: None,
            method,
        }
    }

    /// Only accept messages whose room matches `room`.
    pub fn room(mut self, room: impl Into<Cow<'static, str>>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Marks this trigger as a fallback: it is only considered when no
    /// ordinary trigger accepted the message.
    pub fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the one-line description shown in generated help.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Derives the description from documentation lines.
    ///
    /// The first non-blank line wins; an explicit [`description`](Self::description)
    /// is never overwritten.
    pub fn docs(mut self, lines: &[&str]) -> Self {
        if self.description.is_none() {
            self.description = lines
                .iter()
                .map(|line| line.trim())
                .find(|line| !line.is_empty())
                .map(str::to_string);
        }
        self
    }

    /// Trigger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern text as authored.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Room filter text, if any.
    pub fn room_filter(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Whether this is a fallback trigger.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Description, if any.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn method(&self) -> TriggerFn<H> {
        self.method
    }

    pub(crate) fn name_cow(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}

impl<H> fmt::Debug for TriggerSpec<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerSpec")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("room", &self.room)
            .field("fallback", &self.fallback)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
