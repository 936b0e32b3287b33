//! Per-opponent results for one player.

use crate::model::{Match, PlayerId, RatedPlayer, Score};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHead {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl HeadToHead {
    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    fn record(&mut self, score: Score) {
        if score == Score::WIN {
            self.wins += 1;
        } else if score == Score::LOSS {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCard {
    pub player: RatedPlayer,
    pub results: HashMap<PlayerId, HeadToHead>,
}

impl PlayerCard {
    /// Opponents, most played first.  Ties are ordered by id so the listing is stable.
    pub fn opponents_by_games(&self) -> Vec<(PlayerId, HeadToHead)> {
        let mut opponents: Vec<_> = self.results.iter().map(|(id, h2h)| (*id, *h2h)).collect();
        opponents.sort_by(|a, b| b.1.games().cmp(&a.1.games()).then(a.0.cmp(&b.0)));
        opponents
    }
}

/// Folds every match `focal` took part in into a per-opponent tally.
pub fn head_to_head<'a>(
    focal: PlayerId,
    matches: impl IntoIterator<Item = &'a Match>,
) -> HashMap<PlayerId, HeadToHead> {
    let mut results: HashMap<PlayerId, HeadToHead> = HashMap::new();
    for m in matches {
        let (Some(opponent), Some(score)) = (m.opponent_of(focal), m.score_for(focal)) else {
            continue;
        };
        results.entry(opponent).or_default().record(score);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchId, NewMatch};
    use chrono::Utc;

    fn game(id: u64, a: PlayerId, b: PlayerId, winner: Option<PlayerId>) -> Match {
        NewMatch::new(a, b, winner, Utc::now())
            .unwrap()
            .with_id(MatchId(id))
    }

    #[test]
    fn tallies_from_the_focal_side() {
        let (me, rival, other, stranger) = (
            PlayerId::new(),
            PlayerId::new(),
            PlayerId::new(),
            PlayerId::new(),
        );
        let matches = [
            game(1, me, rival, Some(me)),
            game(2, rival, me, Some(rival)),
            game(3, rival, me, None),
            game(4, me, rival, Some(me)),
            game(5, other, me, Some(me)),
            game(6, other, stranger, Some(other)),
        ];

        let results = head_to_head(me, &matches);

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[&rival],
            HeadToHead {
                wins: 2,
                draws: 1,
                losses: 1
            }
        );
        assert_eq!(
            results[&other],
            HeadToHead {
                wins: 1,
                draws: 0,
                losses: 0
            }
        );
        assert!(!results.contains_key(&stranger));
    }

    #[test]
    fn no_matches_no_opponents() {
        let (me, a, b) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
        assert!(head_to_head(me, &[game(1, a, b, None)]).is_empty());
    }
}
