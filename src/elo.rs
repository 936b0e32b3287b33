//! Single-match Elo update with a tiered K-factor.

use crate::model::{EloStanding, Score};
use serde::{Deserialize, Serialize};

const ELO_DIVISOR: f64 = 400.0; // divisor for the Elo expected score formula

/// Seed values and K-factor tiers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EloSettings {
    pub initial_rating: i32,
    /// Players with at most this many finished games get `provisional_k`.
    pub provisional_games: u32,
    pub provisional_k: i32,
    /// Established players at or above this rating get `master_k`.
    pub master_rating: i32,
    pub master_k: i32,
    pub standard_k: i32,
}

impl Default for EloSettings {
    fn default() -> Self {
        EloSettings {
            initial_rating: 1000,
            provisional_games: 30,
            provisional_k: 40,
            master_rating: 2400,
            master_k: 10,
            standard_k: 20,
        }
    }
}

impl EloSettings {
    /// K-factor for a player, from that player's own state before the match.
    pub fn k_factor(&self, standing: &EloStanding) -> i32 {
        if standing.games_played <= self.provisional_games {
            self.provisional_k
        } else if standing.rating >= self.master_rating {
            self.master_k
        } else {
            self.standard_k
        }
    }

    pub fn seed(&self) -> EloStanding {
        EloStanding {
            rating: self.initial_rating,
            games_played: 0,
            last_change: 0,
        }
    }
}

/// Expected score of A against B.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(rating_b - rating_a) / ELO_DIVISOR))
}

/// New rating of A after scoring `outcome_a` against B.
///
/// Rounds half away from zero.
pub fn calculate(rating_a: i32, rating_b: i32, k_factor: i32, outcome_a: Score) -> i32 {
    let expected = expected_score(rating_a, rating_b);
    let rating = f64::from(rating_a) + f64::from(k_factor) * (outcome_a.value() - expected);
    rating.round() as i32
}
