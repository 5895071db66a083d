//! Persisted configuration for the tracker and the scoreboard.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::storage::{keys, KeyValueStore};

/// Scoreboard configuration, mutated only via an explicit settings apply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreboardConfig {
    /// Half duration in minutes
    pub half_min: u32,
    /// Halftime break duration in minutes
    pub halftime_min: u32,
    /// Shot clock duration in seconds
    pub shot_sec: u32,
    /// Shot clock warning threshold in seconds
    pub warn_sec: u32,
    /// Vibration alerts enabled
    pub vibrate: bool,
    /// Master alert volume, 0.0..=1.0
    pub volume: f32,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self { half_min: 10, halftime_min: 3, shot_sec: 60, warn_sec: 20, vibrate: true, volume: 0.6 }
    }
}

impl ScoreboardConfig {
    /// Clamp every field into its accepted range.
    pub fn sanitized(mut self) -> Self {
        self.half_min = self.half_min.clamp(1, 60);
        self.halftime_min = self.halftime_min.min(30);
        self.shot_sec = self.shot_sec.clamp(1, 999);
        self.warn_sec = self.warn_sec.clamp(1, 998);
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }

    pub fn half_secs(&self) -> f64 {
        (self.half_min * 60) as f64
    }

    pub fn halftime_secs(&self) -> f64 {
        (self.halftime_min * 60) as f64
    }
}

/// Player identity and match-format settings for the tracker.
///
/// Persisted as one key per field. The opponent is deliberately absent: it is
/// per-match runtime state, not a setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerSettings {
    pub player_name: String,
    pub player_number: String,
    pub own_team: String,
    pub goalkeeper: bool,
    pub half_duration_min: u32,
    pub number_of_halves: u32,
}

impl TrackerSettings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let get = |key: &str| store.get(key).unwrap_or_default();
        Self {
            player_name: get(keys::PLAYER_NAME),
            player_number: get(keys::PLAYER_NUMBER),
            own_team: get(keys::OWN_TEAM),
            goalkeeper: store.get(keys::IS_GOALKEEPER).as_deref() == Some("true"),
            half_duration_min: get(keys::HALF_DURATION).parse().unwrap_or(10),
            number_of_halves: get(keys::NUMBER_OF_HALVES).parse().unwrap_or(2),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(keys::PLAYER_NAME, &self.player_name);
        store.set(keys::PLAYER_NUMBER, &self.player_number);
        store.set(keys::OWN_TEAM, &self.own_team);
        store.set(keys::IS_GOALKEEPER, if self.goalkeeper { "true" } else { "false" });
        store.set(keys::HALF_DURATION, &self.half_duration_min.to_string());
        store.set(keys::NUMBER_OF_HALVES, &self.number_of_halves.to_string());
    }

    /// All identity fields are required before scouting can start.
    pub fn validate_for_start(&self) -> Result<()> {
        if self.player_name.trim().is_empty() {
            return Err(TrackerError::MissingField("playerName"));
        }
        if self.player_number.trim().is_empty() {
            return Err(TrackerError::MissingField("playerNumber"));
        }
        if self.own_team.trim().is_empty() {
            return Err(TrackerError::MissingField("ownTeam"));
        }
        Ok(())
    }

    /// Ending a match only needs a player name on the report.
    pub fn validate_for_end(&self) -> Result<()> {
        if self.player_name.trim().is_empty() {
            return Err(TrackerError::MissingField("playerName"));
        }
        Ok(())
    }

    pub fn has_profile(&self) -> bool {
        self.validate_for_start().is_ok()
    }
}

/// Payload of the settings-saved broadcast consumed by the scoreboard.
///
/// Only the half duration is always present; the remaining fields are carried
/// when the settings surface exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub half_min: u32,
    pub halftime_min: Option<u32>,
    pub shot_sec: Option<u32>,
    pub warn_sec: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_config_sanitize_clamps() {
        let cfg = ScoreboardConfig {
            half_min: 0,
            halftime_min: 90,
            shot_sec: 5000,
            warn_sec: 0,
            vibrate: true,
            volume: 1.4,
        }
        .sanitized();

        assert_eq!(cfg.half_min, 1);
        assert_eq!(cfg.halftime_min, 30);
        assert_eq!(cfg.shot_sec, 999);
        assert_eq!(cfg.warn_sec, 1);
        assert_eq!(cfg.volume, 1.0);
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = TrackerSettings {
            player_name: "Lena".into(),
            player_number: "7".into(),
            own_team: "HC Vipers".into(),
            goalkeeper: true,
            half_duration_min: 12,
            number_of_halves: 2,
        };
        settings.save(&mut store);

        assert_eq!(TrackerSettings::load(&store), settings);
    }

    #[test]
    fn test_settings_defaults_on_missing() {
        let store = MemoryStore::new();
        let settings = TrackerSettings::load(&store);
        assert_eq!(settings.half_duration_min, 10);
        assert_eq!(settings.number_of_halves, 2);
        assert!(!settings.goalkeeper);
    }

    #[test]
    fn test_validation() {
        let mut settings = TrackerSettings { player_name: "Lena".into(), ..Default::default() };
        assert!(settings.validate_for_end().is_ok());
        assert!(settings.validate_for_start().is_err());

        settings.player_number = "7".into();
        settings.own_team = "HC Vipers".into();
        assert!(settings.validate_for_start().is_ok());

        settings.player_name = "  ".into();
        assert!(matches!(
            settings.validate_for_end(),
            Err(TrackerError::MissingField("playerName"))
        ));
    }
}
