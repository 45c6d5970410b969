use crate::context::TriggerContext;
use crate::handler::{Handler, HandlerResult};
use crate::trigger::TriggerSpec;

/// Liveness check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ping;

impl Ping {
    async fn ping(&self, ctx: TriggerContext) -> HandlerResult {
        ctx.reply("pong").await?;
        Ok(())
    }
}

impl Handler for Ping {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        crate::triggers! {
            /// Reply with pong
            ping => "^ping$",
        }
    }
}
