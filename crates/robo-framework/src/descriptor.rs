//! Handler descriptors and the extractor that builds them.
//!
//! A [`HandlerDescriptor`] is the registry's record of one trigger method:
//! the compiled pattern, the optional room filter, the fallback flag, help
//! metadata, and a type-erased service that calls the method on its shared
//! handler instance.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use regex::Regex;
use tower::ServiceExt;
use tracing::trace;

use crate::context::{Captures, TriggerContext};
use crate::error::{FrameworkError, FrameworkResult, HandlerInvocationError, panic_message};
use crate::handler::Handler;
use crate::service::{BoxedTriggerService, TriggerService};

/// Registration tier. User handlers always order before built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Handlers registered by the application.
    User,
    /// Built-in handlers added by `register_defaults`.
    Default,
}

/// The registry's record of one trigger-bound method.
#[derive(Clone)]
pub struct HandlerDescriptor {
    instance: Arc<dyn Handler>,
    instance_id: u64,
    handler_name: Arc<str>,
    trigger_name: Cow<'static, str>,
    pattern: Regex,
    pattern_text: Arc<str>,
    room_pattern: Option<Regex>,
    fallback: bool,
    description: Option<Arc<str>>,
    tier: Tier,
    service: BoxedTriggerService,
}

impl HandlerDescriptor {
    /// Builds one descriptor per trigger of `instance`, in declaration order.
    ///
    /// Fails as a whole when any trigger has an empty or unparsable pattern,
    /// an unparsable room filter, or a name already used by another trigger
    /// of the same handler.
    pub fn extract<H: Handler>(
        instance: Arc<H>,
        instance_id: u64,
        tier: Tier,
    ) -> FrameworkResult<Vec<HandlerDescriptor>> {
        let handler_name: Arc<str> = Arc::from(instance.name());
        let erased: Arc<dyn Handler> = instance.clone();
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();

        for spec in instance.triggers() {
            if !seen.insert(spec.name().to_string()) {
                return Err(FrameworkError::configuration(
                    handler_name.as_ref(),
                    spec.name(),
                    "duplicate trigger name",
                ));
            }
            if spec.pattern().trim().is_empty() {
                return Err(FrameworkError::configuration(
                    handler_name.as_ref(),
                    spec.name(),
                    "empty pattern",
                ));
            }

            let pattern = anchored(spec.pattern()).map_err(|e| {
                FrameworkError::configuration(
                    handler_name.as_ref(),
                    spec.name(),
                    format!("invalid pattern: {e}"),
                )
            })?;
            let room_pattern = spec
                .room_filter()
                .map(anchored)
                .transpose()
                .map_err(|e| {
                    FrameworkError::configuration(
                        handler_name.as_ref(),
                        spec.name(),
                        format!("invalid room filter: {e}"),
                    )
                })?;

            trace!(
                handler = %handler_name,
                trigger = spec.name(),
                pattern = spec.pattern(),
                fallback = spec.is_fallback(),
                "Extracted trigger"
            );

            descriptors.push(HandlerDescriptor {
                instance: Arc::clone(&erased),
                instance_id,
                handler_name: Arc::clone(&handler_name),
                trigger_name: spec.name_cow(),
                pattern,
                pattern_text: Arc::from(spec.pattern()),
                room_pattern,
                fallback: spec.is_fallback(),
                description: spec.description_text().map(Arc::from),
                tier,
                service: TriggerService::new(Arc::clone(&instance), spec.method()).boxed(),
            });
        }

        Ok(descriptors)
    }

    /// Returns `true` if the pattern matches `text` and the room filter (if
    /// any) matches `room`. A room filter never matches a missing room.
    pub fn accepts(&self, text: &str, room: Option<&str>) -> bool {
        if !self.pattern.is_match(text) {
            return false;
        }
        match (&self.room_pattern, room) {
            (None, _) => true,
            (Some(filter), Some(room)) => filter.is_match(room),
            (Some(_), None) => false,
        }
    }

    /// Captures of this trigger's pattern against `text`.
    pub(crate) fn captures(&self, text: &str) -> Captures {
        Captures::capture(&self.pattern, text)
    }

    /// Calls the trigger method, turning returned errors and panics into
    /// [`HandlerInvocationError`].
    pub async fn invoke(&self, ctx: TriggerContext) -> Result<(), HandlerInvocationError> {
        let call = self.service.clone().oneshot(ctx);
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(HandlerInvocationError::Failed {
                handler: self.handler_name.to_string(),
                trigger: self.trigger_name.to_string(),
                source,
            }),
            Err(payload) => Err(HandlerInvocationError::Panicked {
                handler: self.handler_name.to_string(),
                trigger: self.trigger_name.to_string(),
                message: panic_message(&*payload),
            }),
        }
    }

    /// The handler instance owning this trigger.
    pub fn instance(&self) -> &Arc<dyn Handler> {
        &self.instance
    }

    /// Registration-wide id of the owning instance.
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn trigger_name(&self) -> &str {
        &self.trigger_name
    }

    pub(crate) fn trigger_cow(&self) -> Cow<'static, str> {
        self.trigger_name.clone()
    }

    /// Pattern as authored, without the start anchor added at compile time.
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    pub fn room_pattern(&self) -> Option<&str> {
        self.room_pattern.as_ref().map(Regex::as_str)
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("handler", &self.handler_name)
            .field("instance_id", &self.instance_id)
            .field("trigger", &self.trigger_name)
            .field("pattern", &self.pattern_text)
            .field("room", &self.room_pattern())
            .field("fallback", &self.fallback)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

/// Compiles `pattern` so it only matches at the start of the text.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerResult;
    use crate::trigger::TriggerSpec;

    struct Greeter;

    impl Greeter {
        async fn hi(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }

        async fn lobby(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Greeter {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            crate::triggers! {
                /// say hi
                hi => "hi",
                lobby => "^goodbye" [room = "@lobby", fallback],
            }
        }
    }

    struct Broken(&'static str);

    impl Broken {
        async fn run(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Broken {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            vec![TriggerSpec::new(
                "run",
                self.0,
                |this: Arc<Self>, ctx: TriggerContext| -> crate::BoxFuture<'static, HandlerResult> {
                    Box::pin(async move { this.run(ctx).await })
                },
            )]
        }
    }

    struct Twice;

    impl Twice {
        async fn run(&self, _ctx: TriggerContext) -> HandlerResult {
            Ok(())
        }
    }

    impl Handler for Twice {
        fn triggers(&self) -> Vec<TriggerSpec<Self>> {
            crate::triggers! {
                run => "^a",
                run => "^b",
            }
        }
    }

    #[test]
    fn test_extract_keeps_declaration_order_and_metadata() {
        let descriptors = HandlerDescriptor::extract(Arc::new(Greeter), 7, Tier::User).unwrap();
        assert_eq!(descriptors.len(), 2);

        let hi = &descriptors[0];
        assert_eq!(hi.trigger_name(), "hi");
        assert_eq!(hi.handler_name(), "Greeter");
        assert_eq!(hi.pattern_text(), "hi");
        assert_eq!(hi.description(), Some("say hi"));
        assert_eq!(hi.instance_id(), 7);
        assert!(!hi.is_fallback());

        let lobby = &descriptors[1];
        assert!(lobby.is_fallback());
        assert!(lobby.description().is_none());
        assert_eq!(lobby.tier(), Tier::User);
    }

    #[test]
    fn test_patterns_are_anchored_at_start() {
        let descriptors = HandlerDescriptor::extract(Arc::new(Greeter), 0, Tier::User).unwrap();
        let hi = &descriptors[0];
        assert!(hi.accepts("hi there", None));
        assert!(!hi.accepts("oh hi", None));
    }

    #[test]
    fn test_room_filter() {
        let descriptors = HandlerDescriptor::extract(Arc::new(Greeter), 0, Tier::User).unwrap();
        let lobby = &descriptors[1];
        assert!(lobby.accepts("goodbye", Some("@lobby")));
        assert!(!lobby.accepts("goodbye", Some("#lobby")));
        assert!(!lobby.accepts("goodbye", None));
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = HandlerDescriptor::extract(Arc::new(Broken("(")), 0, Tier::User).unwrap_err();
        let FrameworkError::Configuration { handler, trigger, .. } = err else {
            panic!("expected a configuration error, got {err:?}");
        };
        assert_eq!(handler, "Broken");
        assert_eq!(trigger, "run");
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        assert!(HandlerDescriptor::extract(Arc::new(Broken("  ")), 0, Tier::User).is_err());
    }

    #[test]
    fn test_duplicate_trigger_name_is_rejected() {
        let err = HandlerDescriptor::extract(Arc::new(Twice), 0, Tier::User).unwrap_err();
        assert!(err.to_string().contains("duplicate trigger name"));
    }
}
