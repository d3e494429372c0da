//! Penny for Thoughts
//!
//! A coin flip picks a face, then a prompt from that face's catalog. Both
//! draws are uniform and independent of earlier flips. The settle delay
//! before a result is shown lives in the controller's timer queue, not here.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::prompts;

/// Text shown before the first flip of a visit
pub const UNREVEALED_TEXT: &str = "Press Ctrl+F to flip for inspiration!";

/// Face a penny landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PennyOutcome {
    /// Heads up
    Heads,
    /// Tails up
    Tails,
}

impl PennyOutcome {
    /// Glyph drawn on the coin for this face
    #[must_use]
    pub fn face(self) -> &'static str {
        match self {
            Self::Heads => "🪙",
            Self::Tails => "🌙",
        }
    }
}

/// Result of a single flip
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PennyResult {
    /// Face the penny landed on
    pub outcome: PennyOutcome,
    /// Prompt drawn from that face's catalog
    pub prompt: String,
}

/// What the penny panel currently shows
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PennyDisplay {
    /// Neutral state, nothing flipped yet
    #[default]
    Unrevealed,
    /// A flip is settling; further flips are refused
    Flipping,
    /// The last flip's result
    Revealed(PennyResult),
}

impl PennyDisplay {
    /// Coin glyph for this display state
    #[must_use]
    pub fn face(&self) -> &'static str {
        match self {
            Self::Revealed(result) => result.outcome.face(),
            Self::Unrevealed | Self::Flipping => PennyOutcome::Heads.face(),
        }
    }

    /// Prompt text for this display state
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Unrevealed => UNREVEALED_TEXT,
            Self::Flipping => "The penny is spinning...",
            Self::Revealed(result) => &result.prompt,
        }
    }
}

/// Flip a penny and draw a prompt for the face it lands on
pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> PennyResult {
    let outcome = if rng.gen_bool(0.5) {
        PennyOutcome::Heads
    } else {
        PennyOutcome::Tails
    };
    let prompt = prompts::penny_catalog(outcome)
        .choose(rng)
        .copied()
        .unwrap_or_default();

    PennyResult {
        outcome,
        prompt: prompt.to_string(),
    }
}
