//! Sharing one robot between tasks and threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use robo_framework::prelude::*;
use robo_framework::{NullAdapter, Tier};

fn assert_send_sync<T: Send + Sync + 'static>() {}

#[test]
fn test_robot_is_send_and_sync() {
    assert_send_sync::<Robot>();
}

#[derive(Default)]
struct Counter {
    seen: AtomicUsize,
}

impl Counter {
    async fn count(&self, ctx: TriggerContext) -> HandlerResult {
        self.seen.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        ctx.reply(ctx.text().to_string()).await?;
        Ok(())
    }
}

impl Handler for Counter {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        triggers! {
            count => r"^count \d+$",
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_from_many_tasks() {
    let robot = Robot::new("robo");
    let null = Arc::new(NullAdapter::new());
    robot.load_adapter("null", null.clone()).unwrap();
    robot.register(Counter::default()).unwrap();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let robot = robot.clone();
            tokio::spawn(async move { robot.dispatch_text(format!("robo count {i}"), None).await })
        })
        .collect();

    for task in tasks {
        let report = task.await.unwrap();
        assert_eq!(report.invoked, vec!["count"]);
        assert_eq!(report.failed, 0);
    }

    let mut responses = null.responses();
    responses.sort();
    let mut expected: Vec<String> = (0..32).map(|i| format!("count {i}")).collect();
    expected.sort();
    assert_eq!(responses, expected);
}

#[test]
fn test_register_defaults_races_register_once() {
    let robot = Robot::new("robo");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let robot = robot.clone();
            scope.spawn(move || robot.register_defaults().unwrap());
        }
    });

    let defaults = robot
        .handlers()
        .iter()
        .filter(|d| d.tier() == Tier::Default)
        .count();
    assert_eq!(defaults, 3);
}
