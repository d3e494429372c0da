//! Prompt Catalogs
//!
//! The guided catalog is walked in order by the guided mode cursor. The penny
//! catalogs are keyed by the face a flip lands on.

use crate::penny::PennyOutcome;

/// Guided-mode prompts, in cursor order
pub const GUIDED_PROMPTS: [&str; 12] = [
    "How are you feeling today?",
    "What made you smile recently?",
    "Describe a moment of peace from your day.",
    "What are you grateful for right now?",
    "What challenge are you facing, and how might you approach it?",
    "Write about a person who means a lot to you.",
    "What would you like to let go of?",
    "Describe your ideal peaceful place.",
    "What small victory did you have today?",
    "What are you looking forward to?",
    "Write about a lesson you learned recently.",
    "How do you want to grow as a person?",
];

/// Prompts for a penny that lands heads up
pub const HEADS_PROMPTS: [&str; 7] = [
    "Write about something that brings you joy.",
    "Describe a happy memory from your childhood.",
    "What adventure would you like to go on?",
    "Write about someone you admire and why.",
    "What makes you feel most alive?",
    "Describe your perfect day.",
    "What are you excited about right now?",
];

/// Prompts for a penny that lands tails up
pub const TAILS_PROMPTS: [&str; 7] = [
    "What fear would you like to overcome?",
    "Write about a time you felt proud of yourself.",
    "What change would you like to make in your life?",
    "Describe a challenge that made you stronger.",
    "What would you tell your younger self?",
    "Write about a difficult decision you made.",
    "What lesson have you learned from a mistake?",
];

/// Guided prompt at a cursor position, wrapping past the end
#[must_use]
pub fn guided(index: usize) -> &'static str {
    GUIDED_PROMPTS[index % GUIDED_PROMPTS.len()]
}

/// Catalog for a penny outcome
#[must_use]
pub fn penny_catalog(outcome: PennyOutcome) -> &'static [&'static str] {
    match outcome {
        PennyOutcome::Heads => &HEADS_PROMPTS,
        PennyOutcome::Tails => &TAILS_PROMPTS,
    }
}
