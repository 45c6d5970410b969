//! Message dispatcher.
//!
//! The [`Dispatcher`] decides which descriptors of a table snapshot fire for
//! one inbound message:
//!
//! 1. The bot's address (`name`, `@name`, `name:`, `name,` followed by
//!    whitespace) is stripped from the start of the text. Unaddressed text
//!    is ignored unless the dispatcher was built with
//!    `require_address = false`, in which case it is matched as-is.
//! 2. Every ordinary descriptor accepting the text and room fires, in table
//!    order, each awaited before the next.
//! 3. Only when none fired, the first accepting fallback descriptor fires.
//!
//! Handler failures are logged and counted; they never stop the pass.

use std::sync::Arc;

use tracing::{Instrument, Level, debug, error, span};

use robo_core::InboundMessage;

use crate::context::TriggerContext;
use crate::descriptor::HandlerDescriptor;
use crate::robot::Robot;

/// What happened to one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Whether the message was considered at all.
    pub addressed: bool,
    /// Trigger names invoked, in invocation order.
    pub invoked: Vec<String>,
    /// Whether the invoked trigger was a fallback.
    pub fallback: bool,
    /// How many invocations failed or panicked.
    pub failed: usize,
}

impl DispatchReport {
    /// Returns `true` if any trigger fired.
    pub fn matched(&self) -> bool {
        !self.invoked.is_empty()
    }
}

/// Matches messages against a descriptor table.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    name: Arc<str>,
    require_address: bool,
}

impl Dispatcher {
    pub fn new(name: impl Into<Arc<str>>, require_address: bool) -> Self {
        Self {
            name: name.into(),
            require_address,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn require_address(&self) -> bool {
        self.require_address
    }

    /// Returns the text following the bot's address, or `None` when `text`
    /// is not addressed to the bot.
    pub fn strip_address<'t>(&self, text: &'t str) -> Option<&'t str> {
        let rest = text.trim_start();
        let rest = rest.strip_prefix('@').unwrap_or(rest);
        let rest = rest.strip_prefix(self.name.as_ref())?;
        let rest = rest.strip_prefix([':', ',']).unwrap_or(rest);
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim())
    }

    /// Text the patterns are matched against, or `None` if the message
    /// should be ignored.
    pub fn target_text<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self.strip_address(text) {
            Some(stripped) => Some(stripped),
            None if self.require_address => None,
            None => Some(text.trim()),
        }
    }

    /// Dispatches one message against `table`.
    pub async fn dispatch(
        &self,
        robot: &Robot,
        table: &[HandlerDescriptor],
        message: InboundMessage,
    ) -> DispatchReport {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            robot = %self.name,
            room = message.room().unwrap_or("-"),
            adapter = message.adapter.as_deref().unwrap_or("-"),
        );
        self.dispatch_inner(robot, table, message)
            .instrument(span)
            .await
    }

    async fn dispatch_inner(
        &self,
        robot: &Robot,
        table: &[HandlerDescriptor],
        message: InboundMessage,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        let Some(text) = self.target_text(&message.text) else {
            debug!(text = %message.text, "Message not addressed to robot, ignoring");
            return report;
        };
        report.addressed = true;

        let text: Arc<str> = Arc::from(text);
        let message = Arc::new(message);
        let room = message.room();

        for descriptor in table.iter().filter(|d| !d.is_fallback()) {
            if descriptor.accepts(&text, room) {
                self.fire(robot, descriptor, &message, &text, &mut report)
                    .await;
            }
        }

        if !report.matched() {
            let fallback = table
                .iter()
                .filter(|d| d.is_fallback())
                .find(|d| d.accepts(&text, room));
            if let Some(descriptor) = fallback {
                debug!(trigger = descriptor.trigger_name(), "No trigger matched, using fallback");
                report.fallback = true;
                self.fire(robot, descriptor, &message, &text, &mut report)
                    .await;
            }
        }

        if !report.matched() {
            debug!(text = %text, "No trigger matched");
        }
        report
    }

    async fn fire(
        &self,
        robot: &Robot,
        descriptor: &HandlerDescriptor,
        message: &Arc<InboundMessage>,
        text: &Arc<str>,
        report: &mut DispatchReport,
    ) {
        debug!(
            handler = descriptor.handler_name(),
            trigger = descriptor.trigger_name(),
            "Invoking trigger"
        );
        let ctx = TriggerContext::new(
            robot.clone(),
            Arc::clone(message),
            Arc::clone(text),
            descriptor.trigger_cow(),
            descriptor.captures(text),
        );
        report.invoked.push(descriptor.trigger_name().to_string());
        if let Err(e) = descriptor.invoke(ctx).await {
            report.failed += 1;
            error!(
                handler = descriptor.handler_name(),
                trigger = descriptor.trigger_name(),
                "{e}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_name() {
        let d = Dispatcher::new("test", true);
        assert_eq!(d.strip_address("test hi foo"), Some("hi foo"));
        assert_eq!(d.strip_address("  test   hi"), Some("hi"));
    }

    #[test]
    fn test_strip_decorated_name() {
        let d = Dispatcher::new("test", true);
        assert_eq!(d.strip_address("@test hi"), Some("hi"));
        assert_eq!(d.strip_address("test: hi"), Some("hi"));
        assert_eq!(d.strip_address("@test, hi"), Some("hi"));
    }

    #[test]
    fn test_name_must_be_a_whole_word() {
        let d = Dispatcher::new("test", true);
        assert_eq!(d.strip_address("tests hi foo"), None);
        assert_eq!(d.strip_address("test"), None);
        assert_eq!(d.strip_address("testhi"), None);
        assert_eq!(d.strip_address("hi test"), None);
    }

    #[test]
    fn test_name_is_case_sensitive() {
        let d = Dispatcher::new("test", true);
        assert_eq!(d.strip_address("Test hi"), None);
    }

    #[test]
    fn test_target_text_policies() {
        let strict = Dispatcher::new("test", true);
        assert_eq!(strict.target_text("hi"), None);
        assert_eq!(strict.target_text("test hi"), Some("hi"));

        let lenient = Dispatcher::new("test", false);
        assert_eq!(lenient.target_text("hi "), Some("hi"));
        assert_eq!(lenient.target_text("test hi"), Some("hi"));
    }

    #[test]
    fn test_trailing_whitespace_trimmed_with_or_without_address() {
        let d = Dispatcher::new("robo", false);
        assert_eq!(d.target_text("robo ping "), Some("ping"));
        assert_eq!(d.target_text("ping "), Some("ping"));
        assert_eq!(d.target_text("robo: ping\n"), Some("ping"));
    }

    #[test]
    fn test_report_matched() {
        let mut report = DispatchReport::default();
        assert!(!report.matched());
        report.invoked.push("hi".to_string());
        assert!(report.matched());
    }
}
