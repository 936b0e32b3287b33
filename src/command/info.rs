use crate::command::*;
use anyhow::{anyhow, Result};
use std::fmt::Write;

/// Resolves the single argument of `info`/`card`, joining multi-word names.
fn player_name(args: &[&str], usage: &str) -> Result<String> {
    if args.is_empty() {
        return Err(anyhow!("Usage: {}", usage));
    }
    Ok(args.join(" "))
}

pub struct Info;

#[async_trait::async_trait]
impl Command for Info {
    fn name(&self) -> &'static str {
        "info"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <name> - rating and rank of a player",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let name = player_name(args, "info <name>")?;
        let player = ctx.service.player_by_name(&name).await?;

        let glicko2 = &player.glicko2;
        let mut reply = String::new();
        writeln!(reply, "ID: {}", player.id())?;
        writeln!(reply, "Name: {}", player.name())?;
        writeln!(reply, "Rank: {}", prettify_rank(player.rank))?;
        writeln!(reply, "Rating: {}", player.elo.rating)?;
        writeln!(reply, "Games: {}", player.elo.games_played)?;
        if player.elo.games_played > 0 {
            writeln!(reply, "Last change: {}", signed(player.elo.last_change))?;
        }
        writeln!(
            reply,
            "Glicko-2: {:.0} ({:.0}-{:.0}), RD {:.0}",
            glicko2.rating, glicko2.interval.min, glicko2.interval.max, glicko2.deviation
        )?;
        write!(
            reply,
            "Registered: {}",
            player.player.registered_at.format("%Y-%m-%d")
        )?;

        Ok(CommandHandled::Reply(reply))
    }
}

pub struct Card;

#[async_trait::async_trait]
impl Command for Card {
    fn name(&self) -> &'static str {
        "card"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <name> - results of a player against each opponent",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let name = player_name(args, "card <name>")?;
        let player = ctx.service.player_by_name(&name).await?;
        let card = ctx.service.player_card(player.id()).await?;

        let mut reply = String::new();
        write!(
            reply,
            "{} {} ({})",
            prettify_rank(card.player.rank),
            card.player.name(),
            card.player.elo.rating
        )?;

        let opponents = card.opponents_by_games();
        if opponents.is_empty() {
            reply.push_str("\nNo games played yet.");
        }
        for (opponent, h2h) in opponents {
            let opponent = match ctx.service.player_by_id(opponent).await {
                Ok(rated) => rated.name().to_string(),
                Err(_) => opponent.to_string(),
            };
            write!(
                reply,
                "\nvs {}: {}W {}D {}L",
                opponent, h2h.wins, h2h.draws, h2h.losses
            )?;
        }

        Ok(CommandHandled::Reply(reply))
    }
}
