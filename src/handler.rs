use crate::command::{CommandHandled, Line};
use crate::{config::Config, context::Context, log_error, log_internal, service::LadderService};
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;

/// Reads command lines and answers them
pub struct Handler {
    cfg: RwLock<Config>,
    service: LadderService,
}

impl<'a> Handler {
    pub fn new(cfg: Config, service: LadderService) -> Self {
        Self {
            cfg: RwLock::new(cfg),
            service,
        }
    }

    fn ctx(&'a self) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            service: &self.service,
        }
    }

    /// Iterates over all the commands to see if any can handle the line.  `None` for blank input.
    pub async fn handle_line(&self, input: &str) -> Option<String> {
        let ctx = self.ctx();
        let prefix = ctx.prefix().await;
        let line = Line::parse(input, &prefix)?;

        for command in crate::command::commands() {
            match command.handle(&ctx, &line).await {
                Ok(CommandHandled::Reply(reply)) => return Some(reply),
                Ok(CommandHandled::No) => continue,
                Err(err) => {
                    log_error!("Error in command {}: {:#}", command.name(), err);
                    return Some(format!("Error: {:#}", err));
                }
            }
        }

        Some(format!(
            "Unknown command '{}'. Try {}help",
            line.name(),
            prefix
        ))
    }

    /// Answers every line of `input` on `output` until end of input.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(&line).await {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }
        log_internal!("End of input");
        Ok(())
    }
}
