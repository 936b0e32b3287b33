pub use crate::context::Context;
use anyhow::Result;

mod backup;
mod game;
mod help;
mod history;
mod info;
mod player;
mod top;

#[async_trait::async_trait]
pub trait Command: Sync + Send {
    /// Command name, as typed after the prefix
    fn name(&self) -> &'static str;
    /// Help message line.  None if no help message
    async fn usage(&self, ctx: &Context<'_>) -> Option<String>;
    /// Potentially handle a command line.  Returns:
    /// - Ok(CommandHandled::Reply) if the line was for this command
    /// - Ok(CommandHandled::No) if another command should look at it
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context<'_>, line: &Line<'_>) -> Result<CommandHandled>;
}

pub enum CommandHandled {
    Reply(String),
    No,
}

/// One line of input split into a command name and its arguments.
pub struct Line<'a> {
    name: String,
    args: Vec<&'a str>,
}

impl<'a> Line<'a> {
    /// Splits `input` into words.  The command prefix is optional; the name is case-insensitive.
    pub fn parse(input: &'a str, prefix: &str) -> Option<Self> {
        let input = input.trim();
        let input = input.strip_prefix(prefix).unwrap_or(input);
        let mut words = input.split_whitespace();
        let name = words.next()?.to_lowercase();
        Some(Line {
            name,
            args: words.collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments, if this line invokes `cmd`.
    pub fn is_cmd(&self, cmd: &str) -> Option<&[&'a str]> {
        (self.name == cmd).then_some(self.args.as_slice())
    }
}

/// Ordered list of available commands
pub fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(help::Help),
        // Reads
        Box::new(top::Top),
        Box::new(top::Glicko2Top),
        Box::new(info::Info),
        Box::new(info::Card),
        Box::new(history::History),
        // Mutations
        Box::new(player::NewPlayer),
        Box::new(game::NewGame),
        Box::new(backup::Export),
        Box::new(backup::Import),
    ]
}

/// Medals for the podium, the plain number otherwise.
pub(crate) fn prettify_rank(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        _ => rank.to_string(),
    }
}

pub(crate) fn signed(change: i32) -> String {
    format!("{:+}", change)
}
