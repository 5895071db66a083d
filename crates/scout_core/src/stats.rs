//! Counter model and derived match statistics.
//!
//! Counter names double as the persisted camelCase keys, so the on-disk
//! schema stays compatible with older saves.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TrackerError;

/// The event types tallied during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Interceptions,
    Assists,
    Goals,
    Attempts,
    GoodPasses,
    BadPasses,
    GoalsAgainst,
    GoalsDefended,
}

impl CounterKind {
    pub const ALL: [CounterKind; 8] = [
        CounterKind::Interceptions,
        CounterKind::Assists,
        CounterKind::Goals,
        CounterKind::Attempts,
        CounterKind::GoodPasses,
        CounterKind::BadPasses,
        CounterKind::GoalsAgainst,
        CounterKind::GoalsDefended,
    ];

    /// Goalkeeper-only counters, zeroed when the goalkeeper role is disabled.
    pub const KEEPER: [CounterKind; 2] = [CounterKind::GoalsAgainst, CounterKind::GoalsDefended];

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Interceptions => "interceptions",
            CounterKind::Assists => "assists",
            CounterKind::Goals => "goals",
            CounterKind::Attempts => "attempts",
            CounterKind::GoodPasses => "goodPasses",
            CounterKind::BadPasses => "badPasses",
            CounterKind::GoalsAgainst => "goalsAgainst",
            CounterKind::GoalsDefended => "goalsDefended",
        }
    }
}

impl FromStr for CounterKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CounterKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TrackerError::UnknownCounter(s.to_string()))
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative event tallies for one player in one match.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    pub interceptions: u32,
    pub assists: u32,
    pub goals: u32,
    pub attempts: u32,
    pub good_passes: u32,
    pub bad_passes: u32,
    pub goals_against: u32,
    pub goals_defended: u32,
}

impl Counters {
    pub fn get(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Interceptions => self.interceptions,
            CounterKind::Assists => self.assists,
            CounterKind::Goals => self.goals,
            CounterKind::Attempts => self.attempts,
            CounterKind::GoodPasses => self.good_passes,
            CounterKind::BadPasses => self.bad_passes,
            CounterKind::GoalsAgainst => self.goals_against,
            CounterKind::GoalsDefended => self.goals_defended,
        }
    }

    fn get_mut(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::Interceptions => &mut self.interceptions,
            CounterKind::Assists => &mut self.assists,
            CounterKind::Goals => &mut self.goals,
            CounterKind::Attempts => &mut self.attempts,
            CounterKind::GoodPasses => &mut self.good_passes,
            CounterKind::BadPasses => &mut self.bad_passes,
            CounterKind::GoalsAgainst => &mut self.goals_against,
            CounterKind::GoalsDefended => &mut self.goals_defended,
        }
    }

    pub fn increment(&mut self, kind: CounterKind) {
        *self.get_mut(kind) += 1;
    }

    /// Decrement one tally. No-op at zero; returns whether anything changed.
    pub fn decrement(&mut self, kind: CounterKind) -> bool {
        let value = self.get_mut(kind);
        if *value > 0 {
            *value -= 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self, kind: CounterKind) {
        *self.get_mut(kind) = 0;
    }

    pub fn reset(&mut self) {
        *self = Counters::default();
    }

    pub fn has_activity(&self) -> bool {
        CounterKind::ALL.iter().any(|k| self.get(*k) > 0)
    }
}

// ============================================================================
// Derived metrics
// ============================================================================

pub fn total_passes(c: &Counters) -> u32 {
    c.good_passes + c.bad_passes
}

/// Percentage of completed passes, 0 when no passes were played.
pub fn pass_accuracy(c: &Counters) -> u32 {
    let total = total_passes(c);
    if total == 0 {
        return 0;
    }
    (c.good_passes as f64 / total as f64 * 100.0).round() as u32
}

pub fn total_shots(c: &Counters) -> u32 {
    c.goals + c.attempts
}

/// Percentage of shots that scored, 0 when no shots were taken.
pub fn shot_accuracy(c: &Counters) -> u32 {
    let total = total_shots(c);
    if total == 0 {
        return 0;
    }
    (c.goals as f64 / total as f64 * 100.0).round() as u32
}

/// Goalkeeper save percentage, 0 when no shots were faced.
pub fn save_pct(c: &Counters) -> u32 {
    let faced = c.goals_defended + c.goals_against;
    if faced == 0 {
        return 0;
    }
    (c.goals_defended as f64 / faced as f64 * 100.0).round() as u32
}

/// Composite activity metric: touches per minute, rounded to one decimal.
///
/// With `passes_include_assists` the assist count is assumed to be part of
/// the pass tallies and is deducted before the components are summed, so an
/// assist is not counted twice.
pub fn involvement_per_minute(c: &Counters, minutes_played: f64, passes_include_assists: bool) -> f64 {
    if minutes_played <= 0.0 {
        return 0.0;
    }

    let passes = total_passes(c);
    let passes_excl_assists = if passes_include_assists {
        passes.saturating_sub(c.assists)
    } else {
        passes
    };

    let raw = passes_excl_assists + c.assists + c.attempts + c.goals + c.interceptions;
    let per_min = raw as f64 / minutes_played;
    (per_min * 10.0).round() / 10.0
}

/// Frozen derived-stat record stored alongside a scouting report.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivedTotals {
    pub total_passes: u32,
    pub pass_accuracy: u32,
    pub shot_accuracy: u32,
    pub involvement: f64,
    pub save_pct: u32,
}

impl DerivedTotals {
    pub fn from_counters(c: &Counters, playtime_secs: u32) -> Self {
        let minutes = playtime_secs as f64 / 60.0;
        Self {
            total_passes: total_passes(c),
            pass_accuracy: pass_accuracy(c),
            shot_accuracy: shot_accuracy(c),
            involvement: involvement_per_minute(c, minutes, true),
            save_pct: save_pct(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_counters() -> Counters {
        Counters {
            good_passes: 10,
            bad_passes: 5,
            assists: 3,
            goals: 2,
            attempts: 1,
            interceptions: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_involvement_reference_value() {
        let c = sample_counters();
        // (10+5-3) + 3 + 1 + 2 + 4 = 22 over 10 minutes
        assert_eq!(involvement_per_minute(&c, 10.0, true), 2.2);
    }

    #[test]
    fn test_involvement_without_assist_deduction() {
        let c = sample_counters();
        // 15 + 3 + 1 + 2 + 4 = 25 over 10 minutes
        assert_eq!(involvement_per_minute(&c, 10.0, false), 2.5);
    }

    #[test]
    fn test_involvement_zero_minutes() {
        let c = sample_counters();
        assert_eq!(involvement_per_minute(&c, 0.0, true), 0.0);
        assert_eq!(involvement_per_minute(&c, -1.0, true), 0.0);
    }

    #[test]
    fn test_involvement_assists_exceed_passes() {
        let c = Counters { assists: 5, good_passes: 1, ..Default::default() };
        // pass component floors at zero, assists still count once
        assert_eq!(involvement_per_minute(&c, 1.0, true), 5.0);
    }

    #[test]
    fn test_save_pct() {
        let c = Counters { goals_defended: 7, goals_against: 3, ..Default::default() };
        assert_eq!(save_pct(&c), 70);
        assert_eq!(save_pct(&Counters::default()), 0);
    }

    #[test]
    fn test_pass_accuracy_zero_denominator() {
        assert_eq!(pass_accuracy(&Counters::default()), 0);
        assert_eq!(shot_accuracy(&Counters::default()), 0);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut c = Counters::default();
        for kind in CounterKind::ALL {
            assert!(!c.decrement(kind), "{} should be a no-op at zero", kind);
            assert_eq!(c.get(kind), 0);
        }
    }

    #[test]
    fn test_counter_name_roundtrip() {
        for kind in CounterKind::ALL {
            assert_eq!(kind.as_str().parse::<CounterKind>().unwrap(), kind);
        }
        assert!("ownGoals".parse::<CounterKind>().is_err());
    }

    #[test]
    fn test_counters_serde_schema() {
        let c = sample_counters();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["goodPasses"], 10);
        assert_eq!(json["goalsAgainst"], 0);
    }

    proptest! {
        #[test]
        fn prop_percentages_bounded(
            good in 0u32..10_000,
            bad in 0u32..10_000,
            goals in 0u32..10_000,
            attempts in 0u32..10_000,
            defended in 0u32..10_000,
            against in 0u32..10_000,
        ) {
            let c = Counters {
                good_passes: good,
                bad_passes: bad,
                goals,
                attempts,
                goals_defended: defended,
                goals_against: against,
                ..Default::default()
            };
            prop_assert!(pass_accuracy(&c) <= 100);
            prop_assert!(shot_accuracy(&c) <= 100);
            prop_assert!(save_pct(&c) <= 100);
        }
    }
}
