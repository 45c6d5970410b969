use serde_json::Value;

use crate::context::TriggerContext;
use crate::handler::{Configurable, Handler, HandlerResult};
use crate::registry::HandlerDoc;
use crate::trigger::TriggerSpec;

/// Lists every documented trigger as `pattern - description`.
///
/// `help <word>` keeps only the lines containing `word`. A header line can be
/// set through the `help.header` robot option.
#[derive(Debug, Clone, Default)]
pub struct Help {
    header: Option<String>,
}

impl Help {
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
        }
    }

    /// Renders the help text for `docs`, keeping lines containing `filter`.
    pub fn render(&self, docs: &[HandlerDoc], filter: Option<&str>) -> String {
        let lines = docs
            .iter()
            .map(|doc| format!("{} - {}", doc.pattern, doc.description))
            .filter(|line| filter.is_none_or(|f| line.contains(f)));
        self.header.iter().cloned().chain(lines).collect::<Vec<_>>().join("\n")
    }

    async fn help(&self, ctx: TriggerContext) -> HandlerResult {
        let docs = ctx.robot().documentation();
        let text = self.render(&docs, ctx.named("filter").map(str::trim));
        if !text.is_empty() {
            ctx.reply(text).await?;
        }
        Ok(())
    }
}

impl Configurable for Help {
    fn configure(&mut self, options: &Value) {
        if let Some(header) = options.pointer("/help/header").and_then(Value::as_str) {
            self.header = Some(header.to_string());
        }
    }
}

impl Handler for Help {
    fn triggers(&self) -> Vec<TriggerSpec<Self>> {
        crate::triggers! {
            /// Show available commands
            help => r"^help(?:\s+(?P<filter>.+))?$",
        }
    }

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}
