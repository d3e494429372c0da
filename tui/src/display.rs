//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from `GardenMessage`s and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the controller tells it
//! to. Display state is the bridge between messages and rendering.
//!
//! - `DisplayState`: everything a frame needs
//! - `Flash`: a transient indicator tagged with the generation that cleared it
//! - `DisplayNotification`: status-line notification with its own lifetime

use std::collections::HashMap;
use std::time::Duration;

use garden_core::{
    progress, BufferTarget, GardenMessage, NotifyLevel, PennyDisplay, SaveFeedbackKind, Screen,
    TransferKind, TransferOutcome, WritingMode,
};

/// How long a status-line notification stays up
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// A transient indicator, removed only by the clear carrying its id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash<T> {
    /// Generation assigned by the controller
    pub id: u64,
    /// What is shown
    pub value: T,
}

/// A notification to display
#[derive(Clone, Debug)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

impl DisplayNotification {
    fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            remaining: NOTIFICATION_TTL,
        }
    }
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Screen being shown
    pub screen: Screen,
    /// Active mode on the journal screen
    pub mode: Option<WritingMode>,
    /// Rendered progress line
    pub flowers: String,
    /// Raw flower count
    pub flower_count: u64,
    /// Guided cursor position
    pub prompt_index: usize,
    /// Guided prompt text
    pub guided_prompt: String,
    /// Penny panel
    pub penny: PennyDisplay,
    /// Passphrase being typed
    pub passphrase: String,
    /// Wrong-passphrase message
    pub vault_error: Option<Flash<String>>,
    /// Save indicator
    pub save_feedback: Option<Flash<SaveFeedbackKind>>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// The controller asked the surface to exit
    pub quit: bool,
    buffers: HashMap<WritingMode, String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            screen: Screen::Vault,
            mode: None,
            flowers: progress::render(0),
            flower_count: 0,
            prompt_index: 0,
            guided_prompt: garden_core::prompts::guided(0).to_string(),
            penny: PennyDisplay::Unrevealed,
            passphrase: String::new(),
            vault_error: None,
            save_feedback: None,
            notification: None,
            quit: false,
            buffers: HashMap::new(),
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `GardenMessage` to update display state
    pub fn apply_message(&mut self, msg: GardenMessage) {
        match msg {
            // Navigation
            GardenMessage::Screen { screen, mode } => {
                self.screen = screen;
                self.mode = mode;
            }
            GardenMessage::Progress { flowers, count } => {
                self.flowers = flowers;
                self.flower_count = count;
            }

            // Writing
            GardenMessage::GuidedPrompt { index, prompt } => {
                self.prompt_index = index;
                self.guided_prompt = prompt;
            }
            GardenMessage::Penny { display } => {
                self.penny = display;
            }
            GardenMessage::Buffer { target, text } => match target {
                BufferTarget::Passphrase => self.passphrase = text,
                BufferTarget::Mode(mode) => {
                    self.buffers.insert(mode, text);
                }
            },

            // Transient feedback
            GardenMessage::VaultError { id, message } => {
                self.vault_error = Some(Flash { id, value: message });
            }
            GardenMessage::VaultErrorCleared { id } => {
                if self.vault_error.as_ref().is_some_and(|f| f.id == id) {
                    self.vault_error = None;
                }
            }
            GardenMessage::SaveFeedback { id, kind } => {
                self.save_feedback = Some(Flash { id, value: kind });
            }
            GardenMessage::SaveFeedbackCleared { id } => {
                if self.save_feedback.as_ref().is_some_and(|f| f.id == id) {
                    self.save_feedback = None;
                }
            }

            // Archive
            GardenMessage::Transfer { kind, outcome } => {
                self.notification = Some(transfer_notification(kind, &outcome));
            }

            // System
            GardenMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification::new(level, message));
            }
            GardenMessage::UnsavedInput { modes } => {
                let titles: Vec<&str> = modes.iter().map(|m| m.title()).collect();
                self.notification = Some(DisplayNotification::new(
                    NotifyLevel::Warning,
                    format!(
                        "Unsaved writing in {}. Quit again to leave anyway.",
                        titles.join(", ")
                    ),
                ));
            }
            GardenMessage::Quit => {
                self.quit = true;
            }
        }
    }

    /// Update timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Text in a mode's writing area
    pub fn buffer(&self, mode: WritingMode) -> &str {
        self.buffers.get(&mode).map_or("", String::as_str)
    }

    /// Writing area of the active mode, if on the journal screen
    pub fn active_buffer(&self) -> Option<&str> {
        match self.screen {
            Screen::Journal => self.mode.map(|m| self.buffer(m)),
            Screen::Vault | Screen::Garden => None,
        }
    }
}

fn transfer_notification(kind: TransferKind, outcome: &TransferOutcome) -> DisplayNotification {
    let (verb, preposition) = match kind {
        TransferKind::Export => ("exported", "to"),
        TransferKind::Import => ("imported", "from"),
    };
    let noun = match kind {
        TransferKind::Export => "Export",
        TransferKind::Import => "Import",
    };

    match outcome {
        TransferOutcome::Completed { path } => DisplayNotification::new(
            NotifyLevel::Success,
            format!("Garden {verb} {preposition} {}", path.display()),
        ),
        TransferOutcome::Cancelled => {
            DisplayNotification::new(NotifyLevel::Info, format!("{noun} cancelled"))
        }
        TransferOutcome::Failed { error } => {
            DisplayNotification::new(NotifyLevel::Error, format!("{noun} failed: {error}"))
        }
    }
}
