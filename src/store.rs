//! The match log and player registry the engine reads from.

use crate::model::{Match, MatchId, NewMatch, Player};
use anyhow::{anyhow, Result};
use tokio::sync::RwLock;

/// Source of truth for players and matches.
///
/// Implementations only store records; all validation and every derived value lives in the
/// engine.  `list_matches` may return matches in any order.
#[async_trait::async_trait]
pub trait LadderStore: Send + Sync {
    /// Players in registration order.
    async fn list_players(&self) -> Result<Vec<Player>>;
    async fn add_player(&self, player: Player) -> Result<Player>;
    async fn list_matches(&self) -> Result<Vec<Match>>;
    /// Stores the match under a fresh id.
    async fn create_match(&self, new: NewMatch) -> Result<Match>;
    /// Replaces every record at once.
    async fn replace_all(&self, players: Vec<Player>, matches: Vec<Match>) -> Result<()>;
}

/// Records shared by the in-memory and file-backed stores.
#[derive(Debug, Default, Clone)]
pub struct Records {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

impl Records {
    pub fn next_match_id(&self) -> Result<MatchId> {
        let last = self.matches.iter().map(|m| m.id.0).max().unwrap_or(0);
        last.checked_add(1)
            .map(MatchId)
            .ok_or_else(|| anyhow!("No match id left after {}", MatchId(last)))
    }

    pub fn push_match(&mut self, new: NewMatch) -> Result<Match> {
        let m = new.with_id(self.next_match_id()?);
        self.matches.push(m.clone());
        Ok(m)
    }
}

/// A store that forgets everything on drop.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LadderStore for MemoryStore {
    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.records.read().await.players.clone())
    }

    async fn add_player(&self, player: Player) -> Result<Player> {
        self.records.write().await.players.push(player.clone());
        Ok(player)
    }

    async fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.records.read().await.matches.clone())
    }

    async fn create_match(&self, new: NewMatch) -> Result<Match> {
        self.records.write().await.push_match(new)
    }

    async fn replace_all(&self, players: Vec<Player>, matches: Vec<Match>) -> Result<()> {
        *self.records.write().await = Records { players, matches };
        Ok(())
    }
}
