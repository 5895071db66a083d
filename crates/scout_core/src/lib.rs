//! # scout_core - Match Scouting Tracker & Scoreboard Engine
//!
//! Two loosely coupled components behind one persistence boundary:
//! - the **tracker**: named event counters, a playtime clock, derived match
//!   statistics and immutable scouting reports of completed matches;
//! - the **scoreboard**: a match-phase state machine driving a game clock and
//!   a shot clock, with audio/vibration alert cues.
//!
//! Both persist through a string key-value store and are otherwise
//! independent; the only cross-link is a one-way settings broadcast from the
//! tracker to the scoreboard.

pub mod broadcast;
pub mod clock;
pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod scoreboard;
pub mod session;
pub mod stats;
pub mod storage;

pub use broadcast::SettingsChannel;
pub use config::{ScoreboardConfig, SettingsUpdate, TrackerSettings};
pub use error::{Result, TrackerError};
pub use report::{ReportList, ScoutingReport};
pub use scheduler::Ticker;
pub use scoreboard::{
    AlertCue, AlertSink, NullAlerts, Phase, Scoreboard, ScoreboardState, Team, TonePattern,
};
pub use session::{LiveState, Tracker};
pub use stats::{CounterKind, Counters, DerivedTotals};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
