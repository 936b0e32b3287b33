use crate::error::{Error, Result};
use crate::glicko2::Glicko2Rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        PlayerId(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        PlayerId::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(PlayerId)
    }
}

/// Assigned by the store, increasing in creation order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered ladder participant.  Ratings are not part of the record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: impl Into<String>, registered_at: DateTime<Utc>) -> Self {
        Player {
            id: PlayerId::new(),
            name: name.into(),
            registered_at,
        }
    }
}

/// A match as it sits in the log.  `winner == None` is a draw.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub winner: Option<PlayerId>,
    pub played_at: DateTime<Utc>,
}

/// A match that has not been given an id by the store yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub winner: Option<PlayerId>,
    pub played_at: DateTime<Utc>,
}

impl NewMatch {
    /// Builds a match, refusing self-play and winners that did not take part.
    pub fn new(
        player_a: PlayerId,
        player_b: PlayerId,
        winner: Option<PlayerId>,
        played_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_pairing(player_a, player_b, winner)?;
        Ok(NewMatch {
            player_a,
            player_b,
            winner,
            played_at,
        })
    }

    pub fn with_id(self, id: MatchId) -> Match {
        Match {
            id,
            player_a: self.player_a,
            player_b: self.player_b,
            winner: self.winner,
            played_at: self.played_at,
        }
    }
}

impl Match {
    pub fn validate(&self) -> Result<()> {
        validate_pairing(self.player_a, self.player_b, self.winner)
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner {
            None => Outcome::Draw,
            Some(winner) if winner == self.player_a => Outcome::WinA,
            Some(_) => Outcome::WinB,
        }
    }

    /// The other participant, if `id` played in this match.
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        if self.player_a == id {
            Some(self.player_b)
        } else if self.player_b == id {
            Some(self.player_a)
        } else {
            None
        }
    }

    /// Score of `id` in this match, `None` if they did not play.
    pub fn score_for(&self, id: PlayerId) -> Option<Score> {
        let (score_a, score_b) = self.outcome().scores();
        if self.player_a == id {
            Some(score_a)
        } else if self.player_b == id {
            Some(score_b)
        } else {
            None
        }
    }
}

fn validate_pairing(a: PlayerId, b: PlayerId, winner: Option<PlayerId>) -> Result<()> {
    if a == b {
        return Err(Error::Conflict(format!(
            "player {} cannot play against themselves",
            a
        )));
    }
    match winner {
        Some(winner) if winner != a && winner != b => Err(Error::InvalidWinner { winner }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WinA,
    WinB,
    Draw,
}

impl Outcome {
    /// Scores for side A and side B.
    pub fn scores(self) -> (Score, Score) {
        match self {
            Outcome::WinA => (Score::WIN, Score::LOSS),
            Outcome::WinB => (Score::LOSS, Score::WIN),
            Outcome::Draw => (Score::DRAW, Score::DRAW),
        }
    }
}

/// A score in the range `0.0..=1.0`, where `0.0` is a loss and `1.0` is a win.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Elo state of one player after folding some prefix of the log.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EloStanding {
    pub rating: i32,
    pub games_played: u32,
    pub last_change: i32,
}

/// A registered player joined with everything derived from the log.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedPlayer {
    pub player: Player,
    /// 1-based position on the Elo leaderboard.
    pub rank: usize,
    pub elo: EloStanding,
    pub glicko2: Glicko2Rating,
}

impl RatedPlayer {
    pub fn id(&self) -> PlayerId {
        self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }
}

/// One side of a match in the history view, with the state right after the match.
#[derive(Debug, Clone, PartialEq)]
pub struct SideReport {
    pub player: PlayerId,
    pub name: String,
    pub standing: EloStanding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub id: MatchId,
    pub played_at: DateTime<Utc>,
    pub outcome: Outcome,
    pub side_a: SideReport,
    pub side_b: SideReport,
}
