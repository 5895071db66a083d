//! Match phases of the scoreboard clock.

use serde::{Deserialize, Serialize};

/// The five scoreboard match-clock states. Serde tags are the persisted
/// phase identifiers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    #[serde(rename = "pre")]
    Pre,
    #[serde(rename = "h1")]
    FirstHalf,
    #[serde(rename = "halftime")]
    Halftime,
    #[serde(rename = "h2")]
    SecondHalf,
    #[serde(rename = "end")]
    End,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Pre => "Pre-match",
            Phase::FirstHalf => "1st half",
            Phase::Halftime => "Halftime",
            Phase::SecondHalf => "2nd half",
            Phase::End => "Full time",
        }
    }

    /// Terminal except via an explicit new-game reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::End)
    }
}
