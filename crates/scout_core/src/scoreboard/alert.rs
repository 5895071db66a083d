//! Audio and vibration alert cues.
//!
//! The engine describes what an alert sounds and feels like; an [`AlertSink`]
//! turns that into platform output. Both channels are best-effort side
//! effects: a sink without audio or vibration support simply drops them.

/// A repeated square-wave tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonePattern {
    pub freq_hz: f32,
    pub tone_ms: u32,
    pub gap_ms: u32,
    pub repeats: u32,
}

/// Alternating on/off vibration milliseconds: `times` pulses of `on_ms`
/// separated by `gap_ms`.
pub fn pulse_pattern(times: u32, on_ms: u32, gap_ms: u32) -> Vec<u32> {
    let mut pattern = Vec::with_capacity((times * 2).saturating_sub(1) as usize);
    for i in 0..times {
        pattern.push(on_ms);
        if i + 1 < times {
            pattern.push(gap_ms);
        }
    }
    pattern
}

/// The distinct cue profiles the scoreboard fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCue {
    /// Game or halftime clock reached zero
    PeriodEnd,
    /// Shot clock crossed the warning threshold
    ShotWarning,
    /// Shot clock expired
    ShotExpired,
}

impl AlertCue {
    pub fn tone(&self) -> TonePattern {
        match self {
            AlertCue::PeriodEnd => TonePattern { freq_hz: 520.0, tone_ms: 700, gap_ms: 0, repeats: 1 },
            AlertCue::ShotWarning => TonePattern { freq_hz: 800.0, tone_ms: 250, gap_ms: 120, repeats: 3 },
            AlertCue::ShotExpired => TonePattern { freq_hz: 680.0, tone_ms: 600, gap_ms: 120, repeats: 5 },
        }
    }

    pub fn vibration(&self) -> Vec<u32> {
        match self {
            AlertCue::PeriodEnd => vec![200, 120, 200],
            AlertCue::ShotWarning => pulse_pattern(3, 200, 120),
            AlertCue::ShotExpired => pulse_pattern(5, 200, 120),
        }
    }
}

/// Output side of the alert channel.
pub trait AlertSink {
    /// Play a tone pattern at the given master volume (0.0..=1.0).
    fn tone(&mut self, pattern: &TonePattern, volume: f32);

    /// Replay a vibration pattern. Only called when vibration is enabled.
    fn vibrate(&mut self, pattern: &[u32]);
}

/// Sink for platforms without audio or vibration output.
#[derive(Debug, Default)]
pub struct NullAlerts;

impl AlertSink for NullAlerts {
    fn tone(&mut self, _pattern: &TonePattern, _volume: f32) {}
    fn vibrate(&mut self, _pattern: &[u32]) {}
}
