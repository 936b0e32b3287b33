//! Glicko-2 over fixed-length rating periods.
//!
//! Matches are bucketed into periods (24 hours by default) and every period is closed with
//! [`skillratings::glicko2::glicko2_rating_period`].  Within a period each player is rated against
//! their opponents' ratings as they stood when the period opened.

use crate::model::{Match, Player, PlayerId, Score};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use skillratings::glicko2::{glicko2_rating_period, Glicko2Config, Glicko2Rating as Rating};
use skillratings::Outcomes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Glicko2Settings {
    pub initial_rating: f64,
    pub initial_deviation: f64,
    pub initial_volatility: f64,
    /// System constant constraining volatility change over time.
    pub tau: f64,
    pub convergence_tolerance: f64,
    pub period_hours: i64,
    /// Half-width of the confidence interval in deviations.
    pub interval_deviations: f64,
}

impl Default for Glicko2Settings {
    fn default() -> Self {
        Glicko2Settings {
            initial_rating: 1500.0,
            initial_deviation: 350.0,
            initial_volatility: 0.06,
            tau: 0.5,
            convergence_tolerance: 0.000_001,
            period_hours: 24,
            interval_deviations: 2.0,
        }
    }
}

impl Glicko2Settings {
    pub fn period(&self) -> Duration {
        Duration::hours(self.period_hours)
    }

    pub fn default_rating(&self) -> Glicko2Rating {
        Glicko2Rating::new(
            self.initial_rating,
            self.initial_deviation,
            self.initial_volatility,
            self.interval_deviations,
        )
    }

    /// Refuses values the rating algorithm cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("initial_deviation", self.initial_deviation),
            ("initial_volatility", self.initial_volatility),
            ("convergence_tolerance", self.convergence_tolerance),
        ] {
            if !(value > 0.0) {
                return Err(anyhow!("glicko2.{} must be positive, got {}", name, value));
            }
        }
        if self.period_hours <= 0 {
            return Err(anyhow!(
                "glicko2.period_hours must be positive, got {}",
                self.period_hours
            ));
        }
        Ok(())
    }

    fn config(&self) -> Glicko2Config {
        Glicko2Config {
            tau: self.tau,
            convergence_tolerance: self.convergence_tolerance,
        }
    }

    fn start(&self) -> Rating {
        Rating {
            rating: self.initial_rating,
            deviation: self.initial_deviation,
            volatility: self.initial_volatility,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Glicko2Rating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
    pub interval: Interval,
}

impl Glicko2Rating {
    pub fn new(rating: f64, deviation: f64, volatility: f64, interval_deviations: f64) -> Self {
        let half_width = interval_deviations * deviation;
        Glicko2Rating {
            rating,
            deviation,
            volatility,
            interval: Interval {
                min: rating - half_width,
                max: rating + half_width,
            },
        }
    }

    fn from_period(rating: Rating, settings: &Glicko2Settings) -> Self {
        Glicko2Rating::new(
            rating.rating,
            rating.deviation,
            rating.volatility,
            settings.interval_deviations,
        )
    }
}

/// Rates every player over the match log.
///
/// `matches` must be in ascending chronological order.  The result has an entry for every
/// registered player and every match participant; players without matches keep the default
/// rating.
pub fn rate_periods(
    matches: &[Match],
    players: &[Player],
    settings: &Glicko2Settings,
) -> HashMap<PlayerId, Glicko2Rating> {
    let mut periods = PeriodState::new(settings);

    for m in matches {
        periods.advance_to(m.played_at);
        periods.queue(m);
    }
    periods.close();

    let mut ratings: HashMap<PlayerId, Glicko2Rating> = players
        .iter()
        .map(|player| (player.id, settings.default_rating()))
        .collect();
    for (id, rating) in periods.pool {
        ratings.insert(id, Glicko2Rating::from_period(rating, settings));
    }
    ratings
}

struct PeriodState<'a> {
    settings: &'a Glicko2Settings,
    /// Everyone who has played at least once so far.
    pool: HashMap<PlayerId, Rating>,
    /// Opponent and own result, per player, for the open period.
    pending: HashMap<PlayerId, Vec<(PlayerId, Outcomes)>>,
    opened_at: Option<DateTime<Utc>>,
}

impl<'a> PeriodState<'a> {
    fn new(settings: &'a Glicko2Settings) -> Self {
        PeriodState {
            settings,
            pool: HashMap::new(),
            pending: HashMap::new(),
            opened_at: None,
        }
    }

    /// Closes the open period if `at` falls past its end, then makes sure a period is open.
    fn advance_to(&mut self, at: DateTime<Utc>) {
        match self.opened_at {
            Some(opened_at) if at > opened_at + self.settings.period() => {
                self.close();
                self.opened_at = Some(at);
            }
            Some(_) => {}
            None => self.opened_at = Some(at),
        }
    }

    fn queue(&mut self, m: &Match) {
        let start = self.settings.start();
        self.pool.entry(m.player_a).or_insert(start);
        self.pool.entry(m.player_b).or_insert(start);

        let (score_a, score_b) = m.outcome().scores();
        self.pending
            .entry(m.player_a)
            .or_default()
            .push((m.player_b, outcome(score_a)));
        self.pending
            .entry(m.player_b)
            .or_default()
            .push((m.player_a, outcome(score_b)));
    }

    fn close(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let config = self.settings.config();
        let at_open = self.pool.clone();
        for (id, rating) in self.pool.iter_mut() {
            let results: Vec<(Rating, Outcomes)> = self
                .pending
                .get(id)
                .map(|games| {
                    games
                        .iter()
                        .map(|(opponent, result)| (at_open[opponent], *result))
                        .collect()
                })
                .unwrap_or_default();

            *rating = glicko2_rating_period(rating, &results, &config);
            if results.is_empty() {
                rating.deviation = rating.deviation.min(self.settings.initial_deviation);
            }
        }
        self.pending.clear();
    }
}

fn outcome(score: Score) -> Outcomes {
    if score == Score::WIN {
        Outcomes::WIN
    } else if score == Score::LOSS {
        Outcomes::LOSS
    } else {
        Outcomes::DRAW
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchId, NewMatch};
    use chrono::TimeZone;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} is not within {tolerance} of {expected}"
        );
    }

    fn at(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn game(id: u64, a: &Player, b: &Player, winner: Option<&Player>, hour: i64) -> Match {
        NewMatch::new(a.id, b.id, winner.map(|w| w.id), at(hour))
            .unwrap()
            .with_id(MatchId(id))
    }

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("p{}", i), at(0)))
            .collect()
    }

    fn rating(rating: f64, deviation: f64) -> Rating {
        Rating {
            rating,
            deviation,
            volatility: 0.06,
        }
    }

    /// Glickman's worked example, run through the same period close the ladder uses.
    #[test]
    fn glickman_worked_example() {
        let settings = Glicko2Settings::default();
        let mut state = PeriodState::new(&settings);
        let focal = PlayerId::new();
        let opponents = [
            (PlayerId::new(), 1400.0, 30.0, Outcomes::WIN),
            (PlayerId::new(), 1550.0, 100.0, Outcomes::LOSS),
            (PlayerId::new(), 1700.0, 300.0, Outcomes::LOSS),
        ];

        state.pool.insert(focal, rating(1500.0, 200.0));
        for (id, opponent, deviation, result) in opponents {
            state.pool.insert(id, rating(opponent, deviation));
            state.pending.entry(focal).or_default().push((id, result));
        }
        state.close();

        let rated = Glicko2Rating::from_period(state.pool[&focal], &settings);
        assert_close(rated.rating, 1464.06, 0.01);
        assert_close(rated.deviation, 151.52, 0.01);
        assert_close(rated.volatility, 0.05999, 0.0001);
        assert_close(rated.interval.max - rated.interval.min, 4.0 * 151.52, 0.05);
    }

    #[test]
    fn settings_are_validated() {
        assert!(Glicko2Settings::default().validate().is_ok());

        let zero_deviation = Glicko2Settings {
            initial_deviation: 0.0,
            ..Glicko2Settings::default()
        };
        assert!(zero_deviation.validate().is_err());

        let no_period = Glicko2Settings {
            period_hours: 0,
            ..Glicko2Settings::default()
        };
        assert!(no_period.validate().is_err());
    }

    #[test]
    fn empty_log_keeps_defaults() {
        let settings = Glicko2Settings::default();
        let players = players(3);

        let ratings = rate_periods(&[], &players, &settings);

        assert_eq!(ratings.len(), 3);
        for player in &players {
            assert_eq!(ratings[&player.id], settings.default_rating());
        }
        let default = settings.default_rating();
        assert_eq!(default.interval.min, 800.0);
        assert_eq!(default.interval.max, 2200.0);
    }

    #[test]
    fn winner_gains_loser_drops() {
        let settings = Glicko2Settings::default();
        let p = players(3);
        let matches = [game(1, &p[0], &p[1], Some(&p[0]), 1)];

        let ratings = rate_periods(&matches, &p, &settings);

        assert!(ratings[&p[0].id].rating > 1500.0);
        assert!(ratings[&p[1].id].rating < 1500.0);
        assert_close(
            ratings[&p[0].id].rating - 1500.0,
            1500.0 - ratings[&p[1].id].rating,
            1e-9
        );
        assert!(ratings[&p[0].id].deviation < 350.0);
        assert_eq!(ratings[&p[2].id], settings.default_rating());
    }

    #[test]
    fn matches_in_one_period_use_opening_ratings() {
        let settings = Glicko2Settings::default();
        let p = players(2);

        // Both games fall within 24h of the first one: a single period.
        let same_period = [
            game(1, &p[0], &p[1], Some(&p[0]), 0),
            game(2, &p[0], &p[1], Some(&p[0]), 24),
        ];
        // Second game strictly after the bucket end: two periods.
        let two_periods = [
            game(1, &p[0], &p[1], Some(&p[0]), 0),
            game(2, &p[0], &p[1], Some(&p[0]), 25),
        ];

        let one = rate_periods(&same_period, &p, &settings);
        let two = rate_periods(&two_periods, &p, &settings);

        assert!(one[&p[0].id].rating > 1500.0);
        assert!(two[&p[0].id].rating > 1500.0);
        assert!((one[&p[0].id].rating - two[&p[0].id].rating).abs() > 1e-6);
    }

    #[test]
    fn idle_players_gain_deviation_up_to_the_cap() {
        let settings = Glicko2Settings::default();
        let p = players(4);
        let matches = [
            game(1, &p[0], &p[1], None, 0),
            game(2, &p[2], &p[3], None, 48),
        ];

        let only_first = rate_periods(&matches[..1], &p, &settings);
        let both = rate_periods(&matches, &p, &settings);

        let idle_before = only_first[&p[0].id].deviation;
        let idle_after = both[&p[0].id].deviation;
        assert!(idle_after > idle_before);
        assert!(idle_after <= settings.initial_deviation);
        assert_eq!(only_first[&p[0].id].rating, both[&p[0].id].rating);
    }

    #[test]
    fn deterministic() {
        let settings = Glicko2Settings::default();
        let p = players(4);
        let matches = [
            game(1, &p[0], &p[1], Some(&p[1]), 0),
            game(2, &p[2], &p[3], None, 3),
            game(3, &p[0], &p[2], Some(&p[0]), 30),
            game(4, &p[1], &p[3], Some(&p[3]), 80),
        ];

        let first = rate_periods(&matches, &p, &settings);
        let second = rate_periods(&matches, &p, &settings);

        for player in &p {
            let (a, b) = (first[&player.id], second[&player.id]);
            assert_eq!(a.rating.to_bits(), b.rating.to_bits());
            assert_eq!(a.deviation.to_bits(), b.deviation.to_bits());
            assert_eq!(a.volatility.to_bits(), b.volatility.to_bits());
        }
    }
}
