//! Theme and Colors
//!
//! The garden palette: moss greens for chrome, petal pinks for accents,
//! and a warm paper tone for the writing area.

use ratatui::style::{Color, Modifier, Style};

use garden_core::{NotifyLevel, SaveFeedbackKind};

// ============================================================================
// Garden Palette
// ============================================================================

/// Moss green for borders and titles
pub const MOSS: Color = Color::Rgb(120, 170, 110);

/// Deep leaf green for the vault door
pub const LEAF: Color = Color::Rgb(70, 120, 70);

/// Petal pink for highlights
pub const PETAL: Color = Color::Rgb(255, 170, 200);

/// Sunflower yellow for the penny
pub const SUNFLOWER: Color = Color::Rgb(250, 210, 90);

/// Paper tone for entry text
pub const PAPER: Color = Color::Rgb(240, 232, 215);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(110, 110, 110);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 90, 90);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Style for titles
pub fn title() -> Style {
    Style::default().fg(MOSS).add_modifier(Modifier::BOLD)
}

/// Style for a notification line
pub fn notify(level: NotifyLevel) -> Style {
    let color = match level {
        NotifyLevel::Info => DIM_GRAY,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    };
    Style::default().fg(color)
}

/// Style for the save indicator
pub fn save_feedback(kind: SaveFeedbackKind) -> Style {
    match kind {
        SaveFeedbackKind::Saved => Style::default().fg(PETAL).add_modifier(Modifier::BOLD),
        SaveFeedbackKind::NothingToSave => Style::default().fg(DIM_GRAY),
        SaveFeedbackKind::Failed => Style::default().fg(ERROR_RED),
    }
}
