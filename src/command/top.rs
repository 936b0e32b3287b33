use crate::command::*;
use anyhow::Result;
use std::fmt::Write;

pub struct Top;

#[async_trait::async_trait]
impl Command for Top {
    fn name(&self) -> &'static str {
        "top"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} - best players by Elo rating",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        if line.is_cmd(self.name()).is_none() {
            return Ok(CommandHandled::No);
        }

        let top_size = ctx.cfg.read().await.general.top_size;
        let players = ctx.service.ranked_leaderboard().await;
        if players.is_empty() {
            return Ok(CommandHandled::Reply("No players yet.".to_string()));
        }

        let mut reply = String::new();
        for player in players.iter().take(top_size) {
            writeln!(
                reply,
                "{}. {} ({})",
                player.rank,
                player.name(),
                player.elo.rating
            )?;
        }

        Ok(CommandHandled::Reply(reply.trim_end().to_string()))
    }
}

pub struct Glicko2Top;

#[async_trait::async_trait]
impl Command for Glicko2Top {
    fn name(&self) -> &'static str {
        "gtop"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} - best players by Glicko-2 rating, with confidence interval",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        if line.is_cmd(self.name()).is_none() {
            return Ok(CommandHandled::No);
        }

        let top_size = ctx.cfg.read().await.general.top_size;
        let players = ctx.service.glicko2_leaderboard().await;
        if players.is_empty() {
            return Ok(CommandHandled::Reply("No players yet.".to_string()));
        }

        let mut reply = String::new();
        for (index, player) in players.iter().take(top_size).enumerate() {
            let glicko2 = &player.glicko2;
            writeln!(
                reply,
                "{}. {} - {:.0} ({:.0}-{:.0})",
                index + 1,
                player.name(),
                glicko2.rating,
                glicko2.interval.min,
                glicko2.interval.max
            )?;
        }

        Ok(CommandHandled::Reply(reply.trim_end().to_string()))
    }
}
