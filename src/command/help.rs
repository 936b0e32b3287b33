use crate::command::*;
use anyhow::Result;

pub struct Help;

#[async_trait::async_trait]
impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} - show this help message",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        if line.is_cmd(self.name()).is_none() {
            return Ok(CommandHandled::No);
        }

        let mut reply = String::new();
        reply.push_str("Commands:\n");
        for command in crate::command::commands() {
            if let Some(usage) = command.usage(ctx).await {
                reply.push_str(&usage);
                reply.push('\n');
            }
        }

        Ok(CommandHandled::Reply(reply.trim_end().to_string()))
    }
}
