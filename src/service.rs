//! Entry point for everything that reads or changes the ladder.

use crate::archive::Archive;
use crate::cache::{RatingCache, Snapshot};
use crate::card::{self, PlayerCard};
use crate::elo::EloSettings;
use crate::error::{Error, Result};
use crate::glicko2::{self, Glicko2Settings};
use crate::logging::PrintColor;
use crate::model::{
    EloStanding, Match, MatchReport, NewMatch, Player, PlayerId, RatedPlayer, SideReport,
};
use crate::replay::{self, ReplayedMatch};
use crate::store::LadderStore;
use crate::{log_event, log_internal, normalize, ranking};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Settings for both rating pipelines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSettings {
    pub elo: EloSettings,
    pub glicko2: Glicko2Settings,
}

/// Ladder operations over an injected store and cache.
///
/// Mutations are serialized by an internal writer lock that is held from validation until the
/// rebuilt snapshot is swapped in, so snapshots are published in mutation order.  Reads never
/// take that lock.
pub struct LadderService {
    store: Arc<dyn LadderStore>,
    cache: Arc<RatingCache>,
    settings: RatingSettings,
    writer: Mutex<()>,
}

impl LadderService {
    /// Builds the service and fills the cache from the current log.
    pub async fn new(
        store: Arc<dyn LadderStore>,
        cache: Arc<RatingCache>,
        settings: RatingSettings,
    ) -> Result<Self> {
        let service = LadderService {
            store,
            cache,
            settings,
            writer: Mutex::new(()),
        };
        service.rebuild().await?;
        Ok(service)
    }

    /// All players ranked by Elo, best first.
    pub async fn ranked_leaderboard(&self) -> Vec<RatedPlayer> {
        self.cache.ranked_list().await
    }

    /// All players ordered by Glicko-2 rating, best first.
    pub async fn glicko2_leaderboard(&self) -> Vec<RatedPlayer> {
        ranking::by_glicko2(self.cache.ranked_list().await)
    }

    pub async fn player_by_name(&self, name: &str) -> Result<RatedPlayer> {
        if normalize::name(name).is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        self.cache
            .get_by_name(name)
            .await
            .ok_or_else(|| Error::player_not_found(name.trim()))
    }

    pub async fn player_by_id(&self, id: PlayerId) -> Result<RatedPlayer> {
        self.cache
            .snapshot()
            .await
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| Error::player_not_found(id))
    }

    /// Every match with both sides' post-match Elo state, newest first.
    pub async fn match_history(&self) -> Vec<MatchReport> {
        let snapshot = self.cache.snapshot().await;
        snapshot
            .history()
            .iter()
            .rev()
            .map(|replayed| report(&snapshot, replayed))
            .collect()
    }

    pub async fn player_card(&self, id: PlayerId) -> Result<PlayerCard> {
        let snapshot = self.cache.snapshot().await;
        let player = snapshot
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| Error::player_not_found(id))?;
        let results = card::head_to_head(id, snapshot.history().iter().map(|m| &m.record));
        Ok(PlayerCard { player, results })
    }

    /// Registers a player.  Names are unique after normalization.
    pub async fn create_player(&self, raw: &str) -> Result<Player> {
        let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(Error::InvalidName(raw.to_string()));
        }

        let _writer = self.writer.lock().await;

        let wanted = normalize::name(&name);
        let players = self.store.list_players().await.map_err(Error::Storage)?;
        if players.iter().any(|p| normalize::name(&p.name) == wanted) {
            return Err(Error::Conflict(format!(
                "a player named '{}' already exists",
                name
            )));
        }

        let player = self
            .store
            .add_player(Player::new(name, Utc::now()))
            .await
            .map_err(Error::Storage)?;
        log_event!("New player {}", player.color());

        self.rebuild().await?;
        Ok(player)
    }

    /// Records a match played now.  `winner == None` is a draw.
    pub async fn create_match(
        &self,
        player_a: PlayerId,
        player_b: PlayerId,
        winner: Option<PlayerId>,
    ) -> Result<Match> {
        self.create_match_at(player_a, player_b, winner, Utc::now())
            .await
    }

    pub async fn create_match_at(
        &self,
        player_a: PlayerId,
        player_b: PlayerId,
        winner: Option<PlayerId>,
        played_at: DateTime<Utc>,
    ) -> Result<Match> {
        let new = NewMatch::new(player_a, player_b, winner, played_at)?;

        let _writer = self.writer.lock().await;

        let players = self.store.list_players().await.map_err(Error::Storage)?;
        for id in [player_a, player_b] {
            if !players.iter().any(|p| p.id == id) {
                return Err(Error::player_not_found(id));
            }
        }

        let created = self.store.create_match(new).await.map_err(Error::Storage)?;
        log_event!(
            "Match {} recorded: {} vs {}",
            created.id,
            display_name(&players, created.player_a),
            display_name(&players, created.player_b),
        );

        self.rebuild().await?;

        let snapshot = self.cache.snapshot().await;
        if let (Some(a), Some(b)) = (
            snapshot.get_by_id(created.player_a),
            snapshot.get_by_id(created.player_b),
        ) {
            log_event!("Ratings now {} {}", a.color(), b.color());
        }
        Ok(created)
    }

    pub async fn export_snapshot(&self) -> Result<Vec<u8>> {
        let players = self.store.list_players().await.map_err(Error::Storage)?;
        let mut matches = self.store.list_matches().await.map_err(Error::Storage)?;
        replay::sort_chronologically(&mut matches);
        Archive::new(players, matches).encode()
    }

    /// Replaces every player and match with the contents of an export.
    ///
    /// The archive is checked in full before the store is touched.
    pub async fn import_snapshot(&self, bytes: &[u8]) -> Result<()> {
        let archive = Archive::decode(bytes)?;
        validate_archive(&archive)?;

        let _writer = self.writer.lock().await;

        let (players, matches) = (archive.players.len(), archive.matches.len());
        self.store
            .replace_all(archive.players, archive.matches)
            .await
            .map_err(Error::Storage)?;
        log_event!("Imported {} players and {} matches", players, matches);

        self.rebuild().await
    }

    /// Recomputes everything from the store and swaps the result into the cache.
    ///
    /// On error the cache keeps its previous snapshot.
    async fn rebuild(&self) -> Result<()> {
        let started = Instant::now();

        let players = self.store.list_players().await.map_err(Error::Storage)?;
        let mut matches = self.store.list_matches().await.map_err(Error::Storage)?;
        let snapshot = compute(players, &mut matches, &self.settings);

        log_internal!(
            "Rebuilt ratings for {} players from {} matches in {:?}",
            snapshot.ranked().len(),
            snapshot.history().len(),
            started.elapsed(),
        );
        self.cache.update(snapshot).await;
        Ok(())
    }
}

/// The pure part of a rebuild: both rating pipelines, joined by player id and ranked.
pub fn compute(players: Vec<Player>, matches: &mut [Match], settings: &RatingSettings) -> Snapshot {
    replay::sort_chronologically(matches);

    let elo = replay::replay(matches, &settings.elo);
    let glicko = glicko2::rate_periods(matches, &players, &settings.glicko2);

    let rated = players
        .into_iter()
        .map(|player| RatedPlayer {
            rank: 0,
            elo: elo.standing(player.id, &settings.elo),
            glicko2: glicko
                .get(&player.id)
                .copied()
                .unwrap_or_else(|| settings.glicko2.default_rating()),
            player,
        })
        .collect();

    Snapshot::new(ranking::rank(rated), elo.matches)
}

fn report(snapshot: &Snapshot, replayed: &ReplayedMatch) -> MatchReport {
    let side = |id: PlayerId, standing: EloStanding| SideReport {
        player: id,
        name: snapshot
            .get_by_id(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string()),
        standing,
    };

    let record = &replayed.record;
    MatchReport {
        id: record.id,
        played_at: record.played_at,
        outcome: record.outcome(),
        side_a: side(record.player_a, replayed.side_a),
        side_b: side(record.player_b, replayed.side_b),
    }
}

fn display_name(players: &[Player], id: PlayerId) -> String {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.color())
        .unwrap_or_else(|| id.to_string())
}

fn validate_archive(archive: &Archive) -> Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashMap::new();
    for player in &archive.players {
        if !ids.insert(player.id) {
            return Err(Error::Conflict(format!(
                "player id {} appears more than once",
                player.id
            )));
        }
        let name = normalize::name(&player.name);
        if name.is_empty() {
            return Err(Error::InvalidName(player.name.clone()));
        }
        if let Some(previous) = names.insert(name, &player.name) {
            return Err(Error::Conflict(format!(
                "players '{}' and '{}' have the same name",
                previous, player.name
            )));
        }
    }

    let mut match_ids = HashSet::new();
    for m in &archive.matches {
        if !match_ids.insert(m.id) {
            return Err(Error::Conflict(format!(
                "match {} appears more than once",
                m.id
            )));
        }
        m.validate()?;
        for id in [m.player_a, m.player_b] {
            if !ids.contains(&id) {
                return Err(Error::player_not_found(id));
            }
        }
    }
    Ok(())
}
