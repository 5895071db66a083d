//! Scoreboard and shot-clock engine.
//!
//! A phase state machine drives a game clock and an independent shot clock.
//! Time only moves through [`Scoreboard::tick`] (explicit deltas) or
//! [`Scoreboard::frame`] (wall-clock driven via the [`Ticker`]), so tests run
//! the whole engine on synthetic time.

pub mod alert;
pub mod phase;

pub use alert::{AlertCue, AlertSink, NullAlerts, TonePattern};
pub use phase::Phase;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::{ScoreboardConfig, SettingsUpdate};
use crate::scheduler::Ticker;
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Home,
    Away,
}

/// Persisted scoreboard runtime state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreboardState {
    pub home_name: String,
    pub away_name: String,
    pub home_score: u32,
    pub away_score: u32,
    pub period: u32,
    pub phase: Phase,
    /// Remaining game clock seconds for the current half
    pub game_remaining: f64,
    /// Remaining halftime break seconds
    pub halftime_remaining: f64,
    pub game_running: bool,
    pub shot_remaining: f64,
    pub shot_running: bool,
    /// One-shot latch, reset every time the shot clock is rearmed
    pub shot_warn_fired: bool,
}

impl Default for ScoreboardState {
    fn default() -> Self {
        let cfg = ScoreboardConfig::default();
        Self {
            home_name: "Home".to_string(),
            away_name: "Away".to_string(),
            home_score: 0,
            away_score: 0,
            period: 1,
            phase: Phase::Pre,
            game_remaining: cfg.half_secs(),
            halftime_remaining: cfg.halftime_secs(),
            game_running: false,
            shot_remaining: cfg.shot_sec as f64,
            shot_running: false,
            shot_warn_fired: false,
        }
    }
}

impl ScoreboardState {
    /// The clock that counts down in the current phase.
    pub fn active_remaining(&self) -> f64 {
        match self.phase {
            Phase::Halftime => self.halftime_remaining,
            _ => self.game_remaining,
        }
    }

    pub fn any_running(&self) -> bool {
        self.game_running || self.shot_running
    }
}

/// The scoreboard controller: phase machine, clocks, alerts, persistence.
pub struct Scoreboard {
    cfg: ScoreboardConfig,
    state: ScoreboardState,
    store: Box<dyn KeyValueStore>,
    alerts: Box<dyn AlertSink>,
    ticker: Ticker,
}

impl Scoreboard {
    /// Load config and state from the store, defaulting on anything missing
    /// or unparsable.
    pub fn load(store: Box<dyn KeyValueStore>, alerts: Box<dyn AlertSink>) -> Self {
        let cfg: ScoreboardConfig = keys::load_json(store.as_ref(), keys::SCOREBOARD_CONFIG);
        let cfg = cfg.sanitized();
        let mut state: ScoreboardState = keys::load_json(store.as_ref(), keys::SCOREBOARD_STATE);

        // a dead shot clock from an old session comes back armed
        if state.shot_remaining <= 0.0 {
            state.shot_remaining = cfg.shot_sec as f64;
            state.shot_warn_fired = false;
        }
        // clocks never resume running across a restart
        state.game_running = false;
        state.shot_running = false;

        Self { cfg, state, store, alerts, ticker: Ticker::new() }
    }

    pub fn state(&self) -> &ScoreboardState {
        &self.state
    }

    pub fn config(&self) -> &ScoreboardConfig {
        &self.cfg
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    // ========================
    // Game clock controls
    // ========================

    /// Start or pause the game clock. Starting always starts the shot clock
    /// (rearming it first if expired); pausing always pauses it.
    pub fn toggle_game(&mut self) {
        if self.state.phase.is_terminal() {
            return;
        }

        let starting = !self.state.game_running;
        self.state.game_running = starting;

        if starting {
            if self.state.phase == Phase::Pre {
                self.enter_first_half();
            }
            if self.state.shot_remaining <= 0.0 {
                self.state.shot_remaining = self.cfg.shot_sec as f64;
                self.state.shot_warn_fired = false;
            }
            self.state.shot_running = true;
            self.ticker.start();
        } else {
            self.state.shot_running = false;
        }

        self.save_state();
    }

    /// Pause/resume only the shot clock. Ignored while the game clock is
    /// stopped.
    pub fn toggle_shot(&mut self) {
        if !self.state.game_running {
            return;
        }
        self.state.shot_running = !self.state.shot_running;
        if self.state.shot_running {
            self.ticker.start();
        }
        self.save_state();
    }

    /// Rearm the shot clock to `secs` (clamped to 1..=999). Clears the
    /// warning latch; the clock runs iff the game clock is running.
    pub fn rearm_shot(&mut self, secs: u32) {
        self.state.shot_remaining = secs.clamp(1, 999) as f64;
        self.state.shot_warn_fired = false;
        self.state.shot_running = self.state.game_running;
        if self.state.shot_running {
            self.ticker.start();
        }
        self.save_state();
    }

    pub fn reset_shot(&mut self) {
        self.rearm_shot(self.cfg.shot_sec);
    }

    /// Reinitialize only the clock of the current phase, without changing
    /// phase. Stops both clocks.
    pub fn reset_period(&mut self) {
        match self.state.phase {
            Phase::Halftime => self.state.halftime_remaining = self.cfg.halftime_secs(),
            _ => self.state.game_remaining = self.cfg.half_secs(),
        }
        self.state.game_running = false;
        self.state.shot_running = false;
        self.ticker.stop();
        self.save_state();
    }

    // ========================
    // Phase machine
    // ========================

    fn enter_first_half(&mut self) {
        self.state.phase = Phase::FirstHalf;
        self.state.period = 1;
        self.state.game_remaining = self.cfg.half_secs();
        self.state.halftime_remaining = self.cfg.halftime_secs();
        self.rearm_shot_silent();
    }

    fn enter_second_half(&mut self) {
        self.state.phase = Phase::SecondHalf;
        self.state.period = 2;
        self.state.game_remaining = self.cfg.half_secs();
        self.rearm_shot_silent();
    }

    // rearm without an extra persistence round, for use inside transitions
    fn rearm_shot_silent(&mut self) {
        self.state.shot_remaining = self.cfg.shot_sec as f64;
        self.state.shot_warn_fired = false;
        self.state.shot_running = self.state.game_running;
    }

    /// Advance to the next phase manually.
    pub fn next_phase(&mut self) {
        match self.state.phase {
            Phase::Pre => self.enter_first_half(),
            Phase::FirstHalf => {
                self.state.phase = Phase::Halftime;
                self.state.game_running = false;
                self.state.shot_running = false;
            }
            Phase::Halftime => self.enter_second_half(),
            Phase::SecondHalf => {
                self.state.phase = Phase::End;
                self.state.game_running = false;
                self.state.shot_running = false;
            }
            Phase::End => {}
        }
        self.save_state();
    }

    /// Reset everything for a fresh match: scores cleared, first half armed,
    /// clocks stopped. Confirmation is the caller's concern.
    pub fn new_game(&mut self) {
        self.state.home_score = 0;
        self.state.away_score = 0;
        self.state.game_running = false;
        self.state.shot_running = false;
        self.state.halftime_remaining = self.cfg.halftime_secs();
        self.enter_first_half();
        self.ticker.stop();
        self.save_state();
        log::info!("scoreboard reset for a new game");
    }

    // ========================
    // Scores and names
    // ========================

    pub fn add_score(&mut self, team: Team, delta: i32) {
        let score = match team {
            Team::Home => &mut self.state.home_score,
            Team::Away => &mut self.state.away_score,
        };
        *score = score.saturating_add_signed(delta);
        self.save_state();
    }

    pub fn set_team_name(&mut self, team: Team, name: &str) {
        let trimmed = name.trim();
        match team {
            Team::Home => {
                self.state.home_name =
                    if trimmed.is_empty() { "Home".to_string() } else { trimmed.to_string() };
            }
            Team::Away => {
                self.state.away_name =
                    if trimmed.is_empty() { "Away".to_string() } else { trimmed.to_string() };
            }
        }
        self.save_state();
    }

    // ========================
    // Configuration
    // ========================

    /// Apply a full configuration from the settings surface.
    pub fn apply_config(&mut self, cfg: ScoreboardConfig) {
        self.cfg = cfg.sanitized();
        keys::save_json(self.store.as_mut(), keys::SCOREBOARD_CONFIG, &self.cfg);

        if !self.state.game_running {
            self.state.game_remaining = self.cfg.half_secs();
            self.state.halftime_remaining = self.cfg.halftime_secs();
        }
        self.rearm_shot(self.cfg.shot_sec);
    }

    /// Consume a settings broadcast from the tracker. Fields the broadcast
    /// does not carry keep their current values.
    pub fn apply_settings(&mut self, update: &SettingsUpdate) {
        let mut cfg = self.cfg.clone();
        if update.half_min > 0 {
            cfg.half_min = update.half_min;
        }
        if let Some(halftime_min) = update.halftime_min {
            cfg.halftime_min = halftime_min;
        }
        if let Some(shot_sec) = update.shot_sec {
            cfg.shot_sec = shot_sec;
        }
        if let Some(warn_sec) = update.warn_sec {
            cfg.warn_sec = warn_sec;
        }
        self.apply_config(cfg);
    }

    // ========================
    // Tick loop
    // ========================

    /// One frame of the real-time loop. Starts or stops the tick driver as
    /// the running flags demand and advances the clocks by the measured
    /// wall-clock delta.
    pub fn frame(&mut self, now: Instant) {
        if !self.state.any_running() {
            self.ticker.stop();
            return;
        }
        self.ticker.start();
        if let Some(delta) = self.ticker.delta(now) {
            self.tick(delta);
        }
    }

    /// Suspend the loop while unobserved; no time advances until the next
    /// frame after resume.
    pub fn pause_ticking(&mut self) {
        self.ticker.stop();
    }

    /// Advance both clocks by an elapsed delta and fire any due alerts.
    pub fn tick(&mut self, delta: Duration) {
        let dt = delta.as_secs_f64();
        if dt <= 0.0 || !self.state.any_running() {
            return;
        }

        if self.state.game_running {
            match self.state.phase {
                Phase::Halftime => {
                    self.state.halftime_remaining -= dt;
                    if self.state.halftime_remaining <= 0.0 {
                        self.state.halftime_remaining = 0.0;
                        self.state.game_running = false;
                        self.fire(AlertCue::PeriodEnd);
                        self.enter_second_half();
                    }
                }
                Phase::FirstHalf | Phase::SecondHalf => {
                    self.state.game_remaining -= dt;
                    if self.state.game_remaining <= 0.0 {
                        self.state.game_remaining = 0.0;
                        self.state.game_running = false;
                        self.fire(AlertCue::PeriodEnd);
                        self.state.phase = match self.state.phase {
                            Phase::FirstHalf => Phase::Halftime,
                            _ => Phase::End,
                        };
                        self.state.shot_running = false;
                    }
                }
                Phase::Pre | Phase::End => {}
            }
        }

        if self.state.shot_running {
            self.state.shot_remaining -= dt;

            // one-shot warning on the descending crossing
            if !self.state.shot_warn_fired
                && self.state.shot_remaining <= self.cfg.warn_sec as f64
                && self.state.shot_remaining > 0.0
            {
                self.state.shot_warn_fired = true;
                self.fire(AlertCue::ShotWarning);
            }

            if self.state.shot_remaining <= 0.0 {
                self.state.shot_remaining = 0.0;
                self.state.shot_running = false;
                self.fire(AlertCue::ShotExpired);
            }
        }

        self.save_state();
    }

    fn fire(&mut self, cue: AlertCue) {
        log::debug!("alert: {:?}", cue);
        self.alerts.tone(&cue.tone(), self.cfg.volume);
        if self.cfg.vibrate {
            self.alerts.vibrate(&cue.vibration());
        }
    }

    fn save_state(&mut self) {
        keys::save_json(self.store.as_mut(), keys::SCOREBOARD_STATE, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that records every cue it is asked to play.
    #[derive(Default)]
    struct RecordingAlerts {
        tones: Rc<RefCell<Vec<TonePattern>>>,
        vibrations: Rc<RefCell<Vec<Vec<u32>>>>,
    }

    impl AlertSink for RecordingAlerts {
        fn tone(&mut self, pattern: &TonePattern, _volume: f32) {
            self.tones.borrow_mut().push(*pattern);
        }

        fn vibrate(&mut self, pattern: &[u32]) {
            self.vibrations.borrow_mut().push(pattern.to_vec());
        }
    }

    fn scoreboard() -> (Scoreboard, Rc<RefCell<Vec<TonePattern>>>) {
        let alerts = RecordingAlerts::default();
        let tones = Rc::clone(&alerts.tones);
        let sb = Scoreboard::load(Box::new(MemoryStore::new()), Box::new(alerts));
        (sb, tones)
    }

    fn tick_secs(sb: &mut Scoreboard, secs: u32) {
        for _ in 0..secs {
            sb.tick(Duration::from_secs(1));
        }
    }

    fn count_tones(tones: &Rc<RefCell<Vec<TonePattern>>>, cue: AlertCue) -> usize {
        tones.borrow().iter().filter(|t| **t == cue.tone()).count()
    }

    #[test]
    fn test_next_phase_walks_all_phases() {
        let (mut sb, _) = scoreboard();
        assert_eq!(sb.state().phase, Phase::Pre);

        sb.next_phase();
        assert_eq!(sb.state().phase, Phase::FirstHalf);
        assert_eq!(sb.state().period, 1);
        assert_eq!(sb.state().game_remaining, 600.0);
        assert_eq!(sb.state().halftime_remaining, 180.0);
        assert_eq!(sb.state().shot_remaining, 60.0);

        sb.next_phase();
        assert_eq!(sb.state().phase, Phase::Halftime);
        assert!(!sb.state().any_running());

        sb.next_phase();
        assert_eq!(sb.state().phase, Phase::SecondHalf);
        assert_eq!(sb.state().period, 2);
        assert_eq!(sb.state().game_remaining, 600.0);

        sb.next_phase();
        assert_eq!(sb.state().phase, Phase::End);
        assert!(!sb.state().any_running());

        // terminal
        sb.next_phase();
        assert_eq!(sb.state().phase, Phase::End);
    }

    #[test]
    fn test_start_from_pre_enters_first_half() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();
        assert_eq!(sb.state().phase, Phase::FirstHalf);
        assert!(sb.state().game_running);
        assert!(sb.state().shot_running);
        assert!(sb.is_ticking());
    }

    #[test]
    fn test_pause_pauses_shot_clock() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();
        sb.toggle_game();
        assert!(!sb.state().game_running);
        assert!(!sb.state().shot_running);
    }

    #[test]
    fn test_shot_warning_fires_exactly_once() {
        let (mut sb, tones) = scoreboard();
        sb.toggle_game();

        tick_secs(&mut sb, 40);
        assert_eq!(count_tones(&tones, AlertCue::ShotWarning), 1);
        assert!(sb.state().shot_warn_fired);

        tick_secs(&mut sb, 10);
        assert_eq!(count_tones(&tones, AlertCue::ShotWarning), 1);
    }

    #[test]
    fn test_shot_expiry_fires_exactly_once() {
        let (mut sb, tones) = scoreboard();
        sb.toggle_game();

        tick_secs(&mut sb, 60);
        assert_eq!(sb.state().shot_remaining, 0.0);
        assert!(!sb.state().shot_running);
        assert_eq!(count_tones(&tones, AlertCue::ShotExpired), 1);

        // game clock keeps running; the expired shot clock stays silent
        tick_secs(&mut sb, 10);
        assert_eq!(count_tones(&tones, AlertCue::ShotExpired), 1);
    }

    #[test]
    fn test_rearm_clears_warning_latch() {
        let (mut sb, tones) = scoreboard();
        sb.toggle_game();
        tick_secs(&mut sb, 45);
        assert!(sb.state().shot_warn_fired);

        sb.reset_shot();
        assert!(!sb.state().shot_warn_fired);
        assert_eq!(sb.state().shot_remaining, 60.0);
        assert!(sb.state().shot_running);

        tick_secs(&mut sb, 41);
        assert_eq!(count_tones(&tones, AlertCue::ShotWarning), 2);
    }

    #[test]
    fn test_rearm_while_paused_stays_stopped() {
        let (mut sb, _) = scoreboard();
        sb.rearm_shot(30);
        assert_eq!(sb.state().shot_remaining, 30.0);
        assert!(!sb.state().shot_running);
    }

    #[test]
    fn test_rearm_clamps_duration() {
        let (mut sb, _) = scoreboard();
        sb.rearm_shot(5000);
        assert_eq!(sb.state().shot_remaining, 999.0);
        sb.rearm_shot(0);
        assert_eq!(sb.state().shot_remaining, 1.0);
    }

    #[test]
    fn test_first_half_end_auto_advances_to_halftime() {
        let (mut sb, tones) = scoreboard();
        sb.apply_config(ScoreboardConfig { half_min: 1, ..ScoreboardConfig::default() });
        sb.toggle_game();

        tick_secs(&mut sb, 60);
        assert_eq!(sb.state().phase, Phase::Halftime);
        assert_eq!(sb.state().game_remaining, 0.0);
        assert!(!sb.state().game_running);
        assert!(!sb.state().shot_running);
        assert_eq!(count_tones(&tones, AlertCue::PeriodEnd), 1);
    }

    #[test]
    fn test_halftime_end_auto_advances_and_rearms_shot() {
        let (mut sb, tones) = scoreboard();
        sb.apply_config(ScoreboardConfig {
            half_min: 1,
            halftime_min: 1,
            ..ScoreboardConfig::default()
        });
        sb.toggle_game();
        tick_secs(&mut sb, 60); // first half over
        sb.toggle_game(); // run the halftime clock
        tick_secs(&mut sb, 60);

        assert_eq!(sb.state().phase, Phase::SecondHalf);
        assert_eq!(sb.state().period, 2);
        assert_eq!(sb.state().game_remaining, 60.0);
        assert_eq!(sb.state().shot_remaining, 60.0);
        assert!(!sb.state().shot_warn_fired);
        // stopped until the second half is started explicitly
        assert!(!sb.state().game_running);
        assert_eq!(count_tones(&tones, AlertCue::PeriodEnd), 2);
    }

    #[test]
    fn test_second_half_end_reaches_terminal_phase() {
        let (mut sb, _) = scoreboard();
        sb.apply_config(ScoreboardConfig { half_min: 1, ..ScoreboardConfig::default() });
        sb.next_phase(); // h1
        sb.next_phase(); // halftime
        sb.next_phase(); // h2
        sb.toggle_game();
        tick_secs(&mut sb, 60);

        assert_eq!(sb.state().phase, Phase::End);
        assert!(!sb.state().any_running());
        // terminal: starting again is refused
        sb.toggle_game();
        assert!(!sb.state().game_running);
    }

    #[test]
    fn test_reset_period_restores_current_clock_only() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();
        tick_secs(&mut sb, 30);
        sb.reset_period();

        assert_eq!(sb.state().phase, Phase::FirstHalf);
        assert_eq!(sb.state().game_remaining, 600.0);
        assert!(!sb.state().any_running());
    }

    #[test]
    fn test_scores_floor_at_zero() {
        let (mut sb, _) = scoreboard();
        sb.add_score(Team::Home, -1);
        assert_eq!(sb.state().home_score, 0);
        sb.add_score(Team::Home, 1);
        sb.add_score(Team::Away, 1);
        sb.add_score(Team::Away, 1);
        assert_eq!((sb.state().home_score, sb.state().away_score), (1, 2));
    }

    #[test]
    fn test_new_game_clears_scores_and_arms_first_half() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();
        sb.add_score(Team::Home, 3);
        tick_secs(&mut sb, 30);
        sb.next_phase();

        sb.new_game();
        let s = sb.state();
        assert_eq!((s.home_score, s.away_score), (0, 0));
        assert_eq!(s.phase, Phase::FirstHalf);
        assert_eq!(s.period, 1);
        assert_eq!(s.game_remaining, 600.0);
        assert!(!s.any_running());
    }

    #[test]
    fn test_apply_settings_rearms_when_stopped() {
        let (mut sb, _) = scoreboard();
        sb.apply_settings(&SettingsUpdate {
            half_min: 20,
            halftime_min: Some(5),
            shot_sec: Some(30),
            warn_sec: Some(10),
        });

        assert_eq!(sb.config().half_min, 20);
        assert_eq!(sb.state().game_remaining, 1200.0);
        assert_eq!(sb.state().halftime_remaining, 300.0);
        assert_eq!(sb.state().shot_remaining, 30.0);
    }

    #[test]
    fn test_apply_settings_keeps_running_game_clock() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();
        tick_secs(&mut sb, 10);
        let remaining = sb.state().game_remaining;

        sb.apply_settings(&SettingsUpdate {
            half_min: 20,
            halftime_min: None,
            shot_sec: None,
            warn_sec: None,
        });
        // running game clock untouched, shot clock rearmed
        assert_eq!(sb.state().game_remaining, remaining);
        assert_eq!(sb.state().shot_remaining, 60.0);
        assert!(sb.state().shot_running);
    }

    #[test]
    fn test_frame_loop_advances_with_wall_clock() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();

        let t0 = Instant::now();
        sb.frame(t0); // first frame of the run, no delta yet
        assert_eq!(sb.state().game_remaining, 600.0);

        sb.frame(t0 + Duration::from_secs(2));
        assert_eq!(sb.state().game_remaining, 598.0);
    }

    #[test]
    fn test_visibility_pause_freezes_time() {
        let (mut sb, _) = scoreboard();
        sb.toggle_game();

        let t0 = Instant::now();
        sb.frame(t0);
        sb.frame(t0 + Duration::from_secs(1));
        sb.pause_ticking();

        // a long unobserved gap adds nothing
        sb.frame(t0 + Duration::from_secs(100));
        assert_eq!(sb.state().game_remaining, 599.0);
        sb.frame(t0 + Duration::from_secs(101));
        assert_eq!(sb.state().game_remaining, 598.0);
    }

    #[test]
    fn test_frame_stops_ticker_when_idle() {
        let (mut sb, _) = scoreboard();
        sb.frame(Instant::now());
        assert!(!sb.is_ticking());
    }

    #[test]
    fn test_state_persists_across_reload() {
        let shared = crate::storage::SharedStore::new(Box::new(MemoryStore::new()));
        {
            let mut sb = Scoreboard::load(Box::new(shared.clone()), Box::new(NullAlerts));
            sb.toggle_game();
            sb.add_score(Team::Home, 2);
            tick_secs(&mut sb, 15);
            sb.toggle_game();
        }

        let reloaded = Scoreboard::load(Box::new(shared), Box::new(NullAlerts));
        let s = reloaded.state();
        assert_eq!(s.home_score, 2);
        assert_eq!(s.phase, Phase::FirstHalf);
        assert_eq!(s.game_remaining, 585.0);
        assert!(!s.game_running);
    }

    #[test]
    fn test_expired_shot_clock_rearms_on_reload() {
        let shared = crate::storage::SharedStore::new(Box::new(MemoryStore::new()));
        {
            let mut sb = Scoreboard::load(Box::new(shared.clone()), Box::new(NullAlerts));
            sb.toggle_game();
            tick_secs(&mut sb, 60);
            assert_eq!(sb.state().shot_remaining, 0.0);
        }

        let sb = Scoreboard::load(Box::new(shared), Box::new(NullAlerts));
        assert_eq!(sb.state().shot_remaining, 60.0);
        assert!(!sb.state().shot_warn_fired);
    }
}
