use crate::command::*;
use anyhow::{anyhow, Result};

pub struct NewPlayer;

#[async_trait::async_trait]
impl Command for NewPlayer {
    fn name(&self) -> &'static str {
        "player"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <name> - register a new player",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        if args.is_empty() {
            return Err(anyhow!("Usage: player <name>"));
        }

        let player = ctx.service.create_player(&args.join(" ")).await?;
        let rated = ctx.service.player_by_id(player.id).await?;
        Ok(CommandHandled::Reply(format!(
            "Registered {} with rating {}",
            player.name, rated.elo.rating
        )))
    }
}
