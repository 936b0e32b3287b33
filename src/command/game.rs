use crate::command::history::describe;
use crate::command::*;
use anyhow::{anyhow, Result};

pub struct NewGame;

#[async_trait::async_trait]
impl Command for NewGame {
    fn name(&self) -> &'static str {
        "game"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <a> <b> <winner|draw> - record a match",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let [a, b, result] = args else {
            return Err(anyhow!("Usage: game <a> <b> <winner|draw>"));
        };

        let a = ctx.service.player_by_name(a).await?;
        let b = ctx.service.player_by_name(b).await?;
        let winner = if result.eq_ignore_ascii_case("draw") {
            None
        } else {
            // Unknown winners are reported by the service, not here.
            Some(ctx.service.player_by_name(result).await?.id())
        };

        let created = ctx.service.create_match(a.id(), b.id(), winner).await?;
        let reply = ctx
            .service
            .match_history()
            .await
            .into_iter()
            .find(|report| report.id == created.id)
            .map(|report| describe(&report))
            .unwrap_or_else(|| format!("Recorded match {}", created.id));
        Ok(CommandHandled::Reply(reply))
    }
}
