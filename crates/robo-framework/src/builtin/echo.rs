use crate::context::TriggerContext;
use crate::handler::{Handler, HandlerResult};
use crate::trigger::TriggerSpec;

/// Repeats whatever follows `echo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Echo {
    async fn echo(&self, ctx: TriggerContext) -> HandlerResult {
        let message = ctx.named("message").unwrap_or_default().to_string();
        ctx.reply(message).await?;
        Ok(())
    }
}

impl Handler for Echo {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        crate::triggers! {
            /// Echo back the given message
            echo => r"^echo\s+(?P<message>.+)",
        }
    }
}
