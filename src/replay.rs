//! Folding the match log into Elo standings.

use crate::elo::{self, EloSettings};
use crate::model::{EloStanding, Match, PlayerId};
use std::collections::HashMap;

/// A match together with both sides' Elo state right after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayedMatch {
    pub record: Match,
    pub side_a: EloStanding,
    pub side_b: EloStanding,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EloReplay {
    /// In the order they were folded.
    pub matches: Vec<ReplayedMatch>,
    /// Final state of everyone who played at least once.
    pub standings: HashMap<PlayerId, EloStanding>,
}

impl EloReplay {
    /// Final state of `id`, or the seed if they never played.
    pub fn standing(&self, id: PlayerId, settings: &EloSettings) -> EloStanding {
        self.standings
            .get(&id)
            .copied()
            .unwrap_or_else(|| settings.seed())
    }
}

/// Puts matches in folding order: oldest first, ties broken by id.
pub fn sort_chronologically(matches: &mut [Match]) {
    matches.sort_by(|a, b| a.played_at.cmp(&b.played_at).then(a.id.cmp(&b.id)));
}

/// Replays `matches`, which must already be in chronological order.
pub fn replay(matches: &[Match], settings: &EloSettings) -> EloReplay {
    let mut standings: HashMap<PlayerId, EloStanding> = HashMap::new();
    let mut replayed = Vec::with_capacity(matches.len());

    for m in matches {
        let before_a = *standings.entry(m.player_a).or_insert_with(|| settings.seed());
        let before_b = *standings.entry(m.player_b).or_insert_with(|| settings.seed());

        let (score_a, score_b) = m.outcome().scores();
        let k_a = settings.k_factor(&before_a);
        let k_b = settings.k_factor(&before_b);

        let rating_a = elo::calculate(before_a.rating, before_b.rating, k_a, score_a);
        let rating_b = elo::calculate(before_b.rating, before_a.rating, k_b, score_b);

        let after_a = EloStanding {
            rating: rating_a,
            games_played: before_a.games_played + 1,
            last_change: rating_a - before_a.rating,
        };
        let after_b = EloStanding {
            rating: rating_b,
            games_played: before_b.games_played + 1,
            last_change: rating_b - before_b.rating,
        };

        standings.insert(m.player_a, after_a);
        standings.insert(m.player_b, after_b);
        replayed.push(ReplayedMatch {
            record: m.clone(),
            side_a: after_a,
            side_b: after_b,
        });
    }

    EloReplay {
        matches: replayed,
        standings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchId, NewMatch};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn game(id: u64, a: PlayerId, b: PlayerId, winner: Option<PlayerId>, minute: i64) -> Match {
        NewMatch::new(a, b, winner, at(minute))
            .unwrap()
            .with_id(MatchId(id))
    }

    fn standing(rating: i32, games_played: u32, last_change: i32) -> EloStanding {
        EloStanding {
            rating,
            games_played,
            last_change,
        }
    }

    #[test]
    fn three_player_ladder() {
        let (p1, p2, p3) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
        let matches = [
            game(1, p1, p2, Some(p2), 0),
            game(2, p1, p3, Some(p3), 1),
            game(3, p2, p3, Some(p2), 2),
        ];

        let result = replay(&matches, &EloSettings::default());

        let snapshots: Vec<_> = result
            .matches
            .iter()
            .map(|m| (m.side_a, m.side_b))
            .collect();
        assert_eq!(
            snapshots,
            vec![
                (standing(980, 1, -20), standing(1020, 1, 20)),
                (standing(961, 2, -19), standing(1019, 1, 19)),
                (standing(1040, 2, 20), standing(999, 2, -20)),
            ]
        );

        assert_eq!(result.standings[&p1], standing(961, 2, -19));
        assert_eq!(result.standings[&p2], standing(1040, 2, 20));
        assert_eq!(result.standings[&p3], standing(999, 2, -20));
    }

    #[test]
    fn draw_differs_from_win() {
        let (a, b) = (PlayerId::new(), PlayerId::new());
        let settings = EloSettings::default();

        let drawn = replay(&[game(1, a, b, None, 0)], &settings);
        let won = replay(&[game(1, a, b, Some(a), 0)], &settings);

        assert_eq!(drawn.standings[&a], standing(1000, 1, 0));
        assert_eq!(drawn.standings[&b], standing(1000, 1, 0));
        assert_ne!(drawn.standings[&a], won.standings[&a]);
        assert_ne!(drawn.standings[&b], won.standings[&b]);
    }

    #[test]
    fn each_side_uses_its_own_k_factor() {
        let (veteran, rookie, sparring) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
        let settings = EloSettings::default();

        // 31 draws between equals keep the veteran at 1000 but past the provisional tier.
        let mut matches: Vec<Match> = (0..31)
            .map(|i| game(i, veteran, sparring, None, i as i64))
            .collect();
        matches.push(game(31, veteran, rookie, Some(rookie), 100));

        let result = replay(&matches, &settings);
        let last = result.matches.last().unwrap();

        // Veteran: K = 20, rookie: K = 40.
        assert_eq!(last.side_a, standing(990, 32, -10));
        assert_eq!(last.side_b, standing(1020, 1, 20));
    }

    #[test]
    fn unplayed_players_keep_the_seed() {
        let settings = EloSettings::default();
        let result = replay(&[], &settings);
        assert_eq!(result.standing(PlayerId::new(), &settings), standing(1000, 0, 0));
    }

    #[test]
    fn sorting_is_by_time_then_id() {
        let (a, b) = (PlayerId::new(), PlayerId::new());
        let mut matches = vec![
            game(3, a, b, None, 5),
            game(2, a, b, None, 0),
            game(1, a, b, None, 5),
        ];

        sort_chronologically(&mut matches);

        let ids: Vec<_> = matches.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn deterministic() {
        let (a, b, c) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
        let matches = [
            game(1, a, b, Some(a), 0),
            game(2, b, c, None, 1),
            game(3, c, a, Some(c), 2),
        ];
        let settings = EloSettings::default();
        assert_eq!(replay(&matches, &settings), replay(&matches, &settings));
    }
}
