//! Well-known storage keys and typed JSON accessors.
//!
//! Key names carry a schema version suffix where the record layout has
//! changed; existing data round-trips unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;

/// Autosaved in-progress match state.
pub const LIVE_STATE: &str = "liveStateV1";
/// Completed scouting reports, JSON array.
pub const SAVED_REPORTS: &str = "savedScoutings";
/// Scoreboard runtime state.
pub const SCOREBOARD_STATE: &str = "scoreboardStateV2";
/// Scoreboard configuration.
pub const SCOREBOARD_CONFIG: &str = "scoreboardCfgV2";

// Tracker settings, one key per field.
pub const PLAYER_NAME: &str = "playerName";
pub const PLAYER_NUMBER: &str = "playerNumber";
pub const OWN_TEAM: &str = "ownTeam";
pub const IS_GOALKEEPER: &str = "isGoalkeeper";
pub const HALF_DURATION: &str = "halfDuration";
pub const NUMBER_OF_HALVES: &str = "numberOfHalves";

/// Read a JSON record, falling back to its default when the key is missing
/// or the stored value does not parse.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        None => T::default(),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("ignoring unparsable value under {:?}: {}", key, err);
                T::default()
            }
        },
    }
}

/// Write a JSON record. Serialization failure is logged and the write skipped.
pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(err) => log::warn!("could not serialize value for {:?}: {}", key, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_missing_yields_default() {
        let store = MemoryStore::new();
        let value: Vec<u32> = load_json(&store, "nothing");
        assert!(value.is_empty());
    }

    #[test]
    fn test_load_corrupt_yields_default() {
        let mut store = MemoryStore::new();
        store.set(LIVE_STATE, "{ definitely not json");
        let value: Vec<u32> = load_json(&store, LIVE_STATE);
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "list", &vec![1u32, 2, 3]);
        let value: Vec<u32> = load_json(&store, "list");
        assert_eq!(value, vec![1, 2, 3]);
    }
}
