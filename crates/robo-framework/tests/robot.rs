//! End-to-end behaviour of the engine with a multi-trigger handler.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use robo_framework::prelude::*;
use robo_framework::{FrameworkError, NotifyError, NullAdapter, Target, Tier};

#[derive(Debug, Default)]
struct FooState {
    response: Option<String>,
    options: Option<Value>,
    shutdowns: usize,
}

#[derive(Default)]
struct Foo {
    state: Arc<Mutex<FooState>>,
}

impl Foo {
    fn with_state(state: Arc<Mutex<FooState>>) -> Self {
        Self { state }
    }

    async fn goodbye(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("goodbye @random").await?;
        Ok(())
    }

    async fn goodbye2(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("goodbye all").await?;
        Ok(())
    }

    async fn goodbye3(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("bye").await?;
        Ok(())
    }

    async fn hello(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("hello").await?;
        Ok(())
    }

    async fn hi(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("hi").await?;
        Ok(())
    }

    async fn missing1(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("missing1").await?;
        Ok(())
    }

    async fn missing2(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("missing2").await?;
        Ok(())
    }
}

#[async_trait]
impl Terminable for Foo {
    async fn shutdown(&self) -> HandlerResult {
        let mut state = self.state.lock();
        state.response = Some("shutdown".to_string());
        state.shutdowns += 1;
        Ok(())
    }
}

impl Configurable for Foo {
    fn configure(&mut self, options: &Value) {
        self.state.lock().options = Some(options.clone());
    }
}

impl Handler for Foo {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        triggers! {
            /// test hello
            hello => "^hello",
            /// test hi
            hi => "^hi",
            /// test goodbye in random
            goodbye => "^goodbye" [room = "^@random"],
            /// test goodbye everywhere
            goodbye2 => "^goodbye",
            /// test bye
            goodbye3 => "^bye",
            /// test fallback
            missing1 => "^foobarbaz" [fallback, room = "^missing"],
            /// test foo
            missing2 => "^foo$" [room = "^missing"],
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

/// One good trigger and one whose pattern does not compile.
struct Misconfigured;

impl Misconfigured {
    async fn fine(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("fine").await?;
        Ok(())
    }

    async fn broken(&self, _ctx: TriggerContext) -> HandlerResult {
        Ok(())
    }
}

impl Handler for Misconfigured {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        triggers! {
            fine => "^fine",
            broken => "^(unclosed",
        }
    }
}

struct Setup {
    robot: Robot,
    null: Arc<NullAdapter>,
    state: Arc<Mutex<FooState>>,
}

fn setup() -> Setup {
    let state = Arc::new(Mutex::new(FooState::default()));
    let robot = Robot::builder()
        .name("test")
        .options(json!({ "foo": "bar" }))
        .build();
    robot.register(Foo::with_state(state.clone())).unwrap();

    let null = Arc::new(NullAdapter::new());
    robot.load_adapter("null", null.clone()).unwrap();

    Setup { robot, null, state }
}

#[test]
fn test_handlers_sorted_by_trigger_name() {
    let Setup { robot, .. } = setup();
    let names: Vec<String> = robot
        .handlers()
        .iter()
        .map(|d| d.trigger_name().to_string())
        .collect();

    assert_eq!(
        names,
        vec!["goodbye", "goodbye2", "goodbye3", "hello", "hi", "missing1", "missing2"]
    );
}

#[test]
fn test_descriptor_keeps_pattern_and_room() {
    let Setup { robot, .. } = setup();
    let handlers = robot.handlers();
    let first = &handlers[0];

    assert_eq!(first.handler_name(), "Foo");
    assert_eq!(first.pattern_text(), "^goodbye");
    assert!(first.accepts("goodbye", Some("@random")));
    assert!(!first.accepts("goodbye", Some("@test")));
}

#[test]
fn test_documentation() {
    let Setup { robot, .. } = setup();
    let docs = robot.documentation();

    assert_eq!(docs.len(), 7);
    assert_eq!(docs[4].description, "test hi");
    assert_eq!(docs[4].pattern, "^hi");
}

#[test]
fn test_defaults_register_after_user_handlers() {
    let Setup { robot, .. } = setup();
    robot.register_defaults().unwrap();
    robot.register_defaults().unwrap();

    let handlers = robot.handlers();
    assert_eq!(handlers.len(), 10);
    assert_eq!(handlers[7].handler_name(), "Echo");
    assert_eq!(handlers[7].tier(), Tier::Default);
    assert_eq!(handlers[8].handler_name(), "Help");
    assert_eq!(handlers[9].handler_name(), "Ping");
}

#[tokio::test]
async fn test_addressed_message_triggers_handler() {
    let Setup { robot, null, .. } = setup();

    let report = robot.dispatch_text("test hi foo", None).await;

    assert!(report.addressed);
    assert_eq!(report.invoked, vec!["hi"]);
    assert_eq!(null.responses(), vec!["hi"]);
}

#[tokio::test]
async fn test_non_ascii_text_is_dispatched() {
    let Setup { robot, null, .. } = setup();

    robot.dispatch_text("test hi あいう", None).await;

    assert_eq!(null.responses(), vec!["hi"]);
}

#[tokio::test]
async fn test_unaddressed_message_is_ignored() {
    let Setup { robot, null, .. } = setup();

    let report = robot.dispatch_text("tests hi foo", None).await;

    assert!(!report.addressed);
    assert!(null.responses().is_empty());
}

#[tokio::test]
async fn test_no_match_is_silent() {
    let Setup { robot, null, .. } = setup();

    let report = robot.dispatch_text("test foo", None).await;

    assert!(report.addressed);
    assert!(!report.matched());
    assert!(null.responses().is_empty());
}

#[tokio::test]
async fn test_room_filter_adds_second_match() {
    let Setup { robot, null, .. } = setup();

    robot.dispatch_text("test goodbye", Some("@random")).await;

    assert_eq!(null.responses(), vec!["goodbye @random", "goodbye all"]);
}

#[tokio::test]
async fn test_room_filter_excludes_other_rooms() {
    let Setup { robot, null, .. } = setup();

    robot.dispatch_text("test goodbye", Some("@test")).await;

    assert_eq!(null.responses(), vec!["goodbye all"]);
}

#[tokio::test]
async fn test_fallback_fires_when_nothing_matched() {
    let Setup { robot, null, .. } = setup();

    let report = robot.dispatch_text("test foobarbaz", Some("missing")).await;

    assert!(report.fallback);
    assert_eq!(null.responses(), vec!["missing1"]);
}

#[tokio::test]
async fn test_fallback_skipped_when_ordinary_matched() {
    let Setup { robot, null, .. } = setup();

    let report = robot.dispatch_text("test foo", Some("missing")).await;

    assert!(!report.fallback);
    assert_eq!(null.responses(), vec!["missing2"]);
}

#[tokio::test]
async fn test_reply_keeps_room() {
    let Setup { robot, null, .. } = setup();

    robot.dispatch_text("test goodbye", Some("@test")).await;

    let messages = null.messages();
    assert_eq!(messages[0].room.as_deref(), Some("@test"));
}

#[tokio::test]
async fn test_shutdown_runs_hook_once_per_instance() {
    let Setup { robot, state, .. } = setup();

    let report = robot.shutdown().await;

    assert_eq!(report.terminated, vec!["Foo"]);
    assert_eq!(report.failed, 0);
    let state = state.lock();
    assert_eq!(state.response.as_deref(), Some("shutdown"));
    assert_eq!(state.shutdowns, 1);
}

#[test]
fn test_options_are_passed_to_handlers() {
    let Setup { state, .. } = setup();
    assert_eq!(state.lock().options, Some(json!({ "foo": "bar" })));
}

#[tokio::test]
async fn test_notify_reaches_adapter() {
    let Setup { robot, null, .. } = setup();

    let sent = robot.notify(Target::All, "hello").await.unwrap();

    assert_eq!(sent, 1);
    assert_eq!(null.responses(), vec!["hello"]);
}

#[tokio::test]
async fn test_notify_unknown_adapter() {
    let Setup { robot, .. } = setup();

    let err = robot.notify("irc", "hello").await.unwrap_err();

    assert!(matches!(err, NotifyError::UnknownAdapter(ref name) if name == "irc"));
}

#[test]
fn test_adapter_downcast() {
    let Setup { robot, .. } = setup();
    assert!(robot.adapter_as::<NullAdapter>("null").is_some());
    assert!(robot.adapter_as::<NullAdapter>("irc").is_none());
}

#[tokio::test]
async fn test_bad_pattern_rejects_only_that_handler() {
    let Setup { robot, null, .. } = setup();

    let err = robot.register(Misconfigured).unwrap_err();
    assert!(matches!(
        err,
        FrameworkError::Configuration { ref handler, ref trigger, .. }
            if handler == "Misconfigured" && trigger == "broken"
    ));

    let handlers = robot.handlers();
    assert_eq!(handlers.len(), 7);
    assert!(handlers.iter().all(|d| d.handler_name() == "Foo"));

    robot.register_defaults().unwrap();
    assert_eq!(robot.handlers().len(), 10);

    robot.dispatch_text("test fine", None).await;
    robot.dispatch_text("test hi", None).await;
    robot.dispatch_text("test ping", None).await;
    assert_eq!(null.responses(), vec!["hi", "pong"]);
}
