//! Live match session: counters, playtime clock, autosave and end-of-match.

use serde::{Deserialize, Serialize};

use crate::clock::{format_report_date, now_ms};
use crate::config::{SettingsUpdate, TrackerSettings};
use crate::error::Result;
use crate::report::{ReportList, ScoutingReport};
use crate::stats::{CounterKind, Counters, DerivedTotals};
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Increment,
    Decrement,
}

/// Append-only log entry for one counter mutation. Recorded for a future
/// undo feature; nothing consumes it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAction {
    pub action: ActionKind,
    pub counter: CounterKind,
}

/// Autosaved snapshot of an in-progress match.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveState {
    pub counters: Counters,
    /// Elapsed playtime in seconds
    pub playtime: u32,
    pub is_playing: bool,
    /// Wall-clock time of the last autosave (unix milliseconds)
    pub last_tick: u64,
    pub is_goalkeeper: bool,
    pub opponent: String,
}

/// The tracker controller: owns the live session, the settings and the saved
/// report list, and writes every mutation through to the store.
pub struct Tracker {
    store: Box<dyn KeyValueStore>,
    settings: TrackerSettings,
    reports: ReportList,
    counters: Counters,
    playtime_secs: u32,
    playing: bool,
    opponent: String,
    actions: Vec<CounterAction>,
}

impl Tracker {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let settings = TrackerSettings::load(store.as_ref());
        let reports = ReportList::load(store.as_ref());
        Self {
            store,
            settings,
            reports,
            counters: Counters::default(),
            playtime_secs: 0,
            playing: false,
            opponent: String::new(),
            actions: Vec::new(),
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn playtime_secs(&self) -> u32 {
        self.playtime_secs
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn reports(&self) -> &ReportList {
        &self.reports
    }

    pub fn actions(&self) -> &[CounterAction] {
        &self.actions
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    pub fn derived(&self) -> DerivedTotals {
        DerivedTotals::from_counters(&self.counters, self.playtime_secs)
    }

    pub fn has_progress(&self) -> bool {
        self.playtime_secs > 0 || self.counters.has_activity()
    }

    // ========================
    // Match lifecycle
    // ========================

    /// Begin scouting a new match. Requires a complete player profile.
    pub fn start_match(&mut self, opponent: &str) -> Result<()> {
        self.settings.validate_for_start()?;
        self.reset_session();
        self.opponent = opponent.trim().to_string();
        self.save_live_state();
        Ok(())
    }

    /// End the match: freeze counters and derived stats into an immutable
    /// report, append it to the saved list and clear the live session.
    pub fn end_match(&mut self) -> Result<ScoutingReport> {
        self.settings.validate_for_end()?;

        self.playing = false;

        let id = now_ms();
        let report = ScoutingReport {
            id,
            date: format_report_date(id),
            player_name: self.settings.player_name.clone(),
            player_number: self.settings.player_number.clone(),
            own_team: self.settings.own_team.clone(),
            opponent: self.opponent.clone(),
            playtime: self.playtime_secs,
            is_goalkeeper: self.settings.goalkeeper,
            stats: self.counters.clone(),
            totals: self.derived(),
        };

        self.reports.append(self.store.as_mut(), report.clone());
        self.reset_session();
        self.clear_live_state();

        log::info!("match ended, report {} saved", report.id);
        Ok(report)
    }

    /// Throw the in-progress match away without creating a report.
    pub fn discard_match(&mut self) {
        self.reset_session();
        self.opponent.clear();
        self.clear_live_state();
    }

    pub fn delete_report(&mut self, id: u64) -> Result<()> {
        self.reports.delete(self.store.as_mut(), id)
    }

    fn reset_session(&mut self) {
        self.playing = false;
        self.counters.reset();
        self.playtime_secs = 0;
        self.actions.clear();
    }

    // ========================
    // Counter mutations
    // ========================

    pub fn increment(&mut self, kind: CounterKind) {
        self.counters.increment(kind);
        self.actions.push(CounterAction { action: ActionKind::Increment, counter: kind });
        self.save_live_state();
    }

    /// Decrement one counter. At zero this is a complete no-op: no log entry
    /// is recorded and nothing is persisted.
    pub fn decrement(&mut self, kind: CounterKind) {
        if self.counters.decrement(kind) {
            self.actions.push(CounterAction { action: ActionKind::Decrement, counter: kind });
            self.save_live_state();
        }
    }

    /// Mutate a counter by its persisted name. Unknown names fail loudly.
    pub fn increment_named(&mut self, name: &str) -> Result<()> {
        self.increment(name.parse()?);
        Ok(())
    }

    pub fn decrement_named(&mut self, name: &str) -> Result<()> {
        self.decrement(name.parse()?);
        Ok(())
    }

    // ========================
    // Playtime clock
    // ========================

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
        self.save_live_state();
    }

    /// One-second clock tick while the player is on the field.
    pub fn tick_second(&mut self) {
        if self.playing {
            self.playtime_secs += 1;
            self.save_live_state();
        }
    }

    /// Apply several elapsed seconds at once (catch-up after a stall).
    pub fn tick_seconds(&mut self, secs: u32) {
        if self.playing && secs > 0 {
            self.playtime_secs += secs;
            self.save_live_state();
        }
    }

    pub fn add_minute(&mut self) {
        self.playtime_secs += 60;
        self.save_live_state();
    }

    /// Manual -60 s adjustment, floored at zero.
    pub fn subtract_minute(&mut self) {
        self.playtime_secs = self.playtime_secs.saturating_sub(60);
        self.save_live_state();
    }

    // ========================
    // Settings
    // ========================

    /// Persist new settings and return the broadcast payload for the
    /// scoreboard.
    pub fn save_settings(&mut self, settings: TrackerSettings) -> SettingsUpdate {
        self.settings = settings;
        self.settings.save(self.store.as_mut());

        // disabling the goalkeeper role retires the keeper tallies
        if !self.settings.goalkeeper {
            for kind in CounterKind::KEEPER {
                self.counters.clear(kind);
            }
        }
        self.save_live_state();

        SettingsUpdate {
            half_min: self.settings.half_duration_min,
            halftime_min: None,
            shot_sec: None,
            warn_sec: None,
        }
    }

    // ========================
    // Autosave / restore
    // ========================

    pub fn save_live_state(&mut self) {
        self.save_live_state_at(now_ms());
    }

    pub fn save_live_state_at(&mut self, now: u64) {
        let state = LiveState {
            counters: self.counters.clone(),
            playtime: self.playtime_secs,
            is_playing: self.playing,
            last_tick: now,
            is_goalkeeper: self.settings.goalkeeper,
            opponent: self.opponent.clone(),
        };
        keys::save_json(self.store.as_mut(), keys::LIVE_STATE, &state);
    }

    /// Resume an in-progress match after a restart. The wall-clock gap since
    /// the last autosave is added to the playtime once, so no field time is
    /// lost while the process was down. Returns whether anything was restored.
    pub fn restore_live_state(&mut self) -> bool {
        self.restore_live_state_at(now_ms())
    }

    pub fn restore_live_state_at(&mut self, now: u64) -> bool {
        let raw = match self.store.get(keys::LIVE_STATE) {
            Some(raw) => raw,
            None => return false,
        };
        let state: LiveState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("ignoring unparsable live state: {}", err);
                return false;
            }
        };

        self.counters = state.counters;
        self.playtime_secs = state.playtime;
        self.playing = state.is_playing;
        self.opponent = state.opponent;
        self.settings.goalkeeper = state.is_goalkeeper;

        if self.playing && state.last_tick > 0 {
            let gap_secs = now.saturating_sub(state.last_tick) / 1000;
            self.playtime_secs += gap_secs as u32;
        }
        true
    }

    pub fn clear_live_state(&mut self) {
        self.store.remove(keys::LIVE_STATE);
    }
}
