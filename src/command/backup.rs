use crate::command::*;
use anyhow::{anyhow, Result};

pub struct Export;

#[async_trait::async_trait]
impl Command for Export {
    fn name(&self) -> &'static str {
        "export"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <file> - write every player and match to a file",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let [path] = args else {
            return Err(anyhow!("Usage: export <file>"));
        };

        let bytes = ctx.service.export_snapshot().await?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| anyhow!("Could not write export to `{}`: {}", path, e))?;
        Ok(CommandHandled::Reply(format!(
            "Exported {} bytes to {}",
            bytes.len(),
            path
        )))
    }
}

pub struct Import;

#[async_trait::async_trait]
impl Command for Import {
    fn name(&self) -> &'static str {
        "import"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} <file> - replace the whole ladder with an export",
            ctx.prefix().await,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled> {
        let Some(args) = line.is_cmd(self.name()) else {
            return Ok(CommandHandled::No);
        };
        let [path] = args else {
            return Err(anyhow!("Usage: import <file>"));
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow!("Could not read import from `{}`: {}", path, e))?;
        ctx.service.import_snapshot(&bytes).await?;

        let players = ctx.service.ranked_leaderboard().await.len();
        let matches = ctx.service.match_history().await.len();
        Ok(CommandHandled::Reply(format!(
            "Imported {} players and {} matches",
            players, matches
        )))
    }
}
