//! Tick driver for the real-time loops.
//!
//! Wraps the start/stop/already-running guard the timers need: starting an
//! already-running ticker never double-schedules, and the first tick of a run
//! has no delta. Callers pass `Instant`s in, so tests drive the loop with
//! synthetic time instead of real delays.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Ticker {
    running: bool,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking. Idempotent: a running ticker keeps its timebase, a
    /// stopped one starts a fresh run with no pending delta.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last = None;
        }
    }

    /// Stop ticking and drop the timebase, so a later start does not see the
    /// paused interval as elapsed time.
    pub fn stop(&mut self) {
        self.running = false;
        self.last = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed time since the previous tick of this run. Returns `None` when
    /// stopped and on the first tick after a start.
    pub fn delta(&mut self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }
        let delta = self.last.map(|last| now.saturating_duration_since(last));
        self.last = Some(now);
        delta
    }
}
