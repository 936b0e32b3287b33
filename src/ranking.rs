//! Leaderboard ordering.

use crate::model::RatedPlayer;

/// Orders players by Elo rating, best first, and numbers them from 1.
///
/// The sort is stable: players with equal ratings keep the order they came in, and still get
/// distinct consecutive ranks.
pub fn rank(mut players: Vec<RatedPlayer>) -> Vec<RatedPlayer> {
    players.sort_by(|a, b| b.elo.rating.cmp(&a.elo.rating));
    for (index, player) in players.iter_mut().enumerate() {
        player.rank = index + 1;
    }
    players
}

/// Orders players by Glicko-2 rating, best first, leaving their Elo rank untouched.
pub fn by_glicko2(mut players: Vec<RatedPlayer>) -> Vec<RatedPlayer> {
    players.sort_by(|a, b| b.glicko2.rating.total_cmp(&a.glicko2.rating));
    players
}
