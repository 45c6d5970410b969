//! Shutdown of handler instances.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::descriptor::HandlerDescriptor;
use crate::error::{ShutdownHookError, panic_message};

/// Outcome of a shutdown pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Handlers whose hook ran successfully, in the order they were called.
    pub terminated: Vec<String>,
    /// Hooks that returned an error or panicked.
    pub failed: usize,
}

/// Runs the termination hook of every distinct handler instance in `table`,
/// in table order.
///
/// Instances owning several descriptors are shut down once. A failing hook is
/// logged and the pass continues.
pub async fn shutdown_all(table: &[HandlerDescriptor]) -> ShutdownReport {
    let mut report = ShutdownReport::default();
    let mut seen = HashSet::new();

    for descriptor in table {
        if !seen.insert(descriptor.instance_id()) {
            continue;
        }
        let instance = descriptor.instance();
        let Some(hook) = instance.as_terminable() else {
            continue;
        };

        let name = descriptor.handler_name();
        debug!(handler = name, "Running shutdown hook");
        let outcome = match AssertUnwindSafe(hook.shutdown()).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ShutdownHookError::Failed {
                handler: name.to_string(),
                source,
            }),
            Err(payload) => Err(ShutdownHookError::Panicked {
                handler: name.to_string(),
                message: panic_message(&*payload),
            }),
        };

        match outcome {
            Ok(()) => {
                info!(handler = name, "Handler shut down");
                report.terminated.push(name.to_string());
            }
            Err(e) => {
                error!(handler = name, "{e}");
                report.failed += 1;
            }
        }
    }

    report
}
