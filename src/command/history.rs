use crate::command::*;
use crate::model::{MatchReport, Outcome};
use anyhow::{anyhow, Result};
use std::fmt::Write;

const DEFAULT_COUNT: usize = 10;

pub struct History;

#[async_trait::async_trait]
impl Command for History {
    fn name(&self) -> &'static str {
        "history"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} [n] - the last n matches, newest first (default {})",
            ctx.prefix().await,
            self.name(),
            DEFAULT_COUNT
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let count = match args {
            [] => DEFAULT_COUNT,
            [n] => n
                .parse()
                .map_err(|_| anyhow!("'{}' is not a number of matches", n))?,
            _ => return Err(anyhow!("Usage: history [n]")),
        };

        let history = ctx.service.match_history().await;
        if history.is_empty() {
            return Ok(CommandHandled::Reply("No matches yet.".to_string()));
        }

        let mut reply = String::new();
        for report in history.iter().take(count) {
            writeln!(reply, "{}", describe(report))?;
        }
        Ok(CommandHandled::Reply(reply.trim_end().to_string()))
    }
}

/// One line per match: `#3 2024-05-01 ivan (1020, +20) beat olga (980, -20)`.
pub(crate) fn describe(report: &MatchReport) -> String {
    let side = |side: &crate::model::SideReport| {
        format!(
            "{} ({}, {})",
            side.name,
            side.standing.rating,
            signed(side.standing.last_change)
        )
    };
    let (a, b) = (side(&report.side_a), side(&report.side_b));
    let result = match report.outcome {
        Outcome::WinA => format!("{} beat {}", a, b),
        Outcome::WinB => format!("{} beat {}", b, a),
        Outcome::Draw => format!("{} drew with {}", a, b),
    };
    format!(
        "{} {} {}",
        report.id,
        report.played_at.format("%Y-%m-%d"),
        result
    )
}
