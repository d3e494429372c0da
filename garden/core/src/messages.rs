//! Garden Messages
//!
//! Messages sent from the controller to a surface. A surface renders what
//! these messages tell it and keeps no journaling logic of its own; replaying
//! the message stream from the start reproduces the whole display.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::controller::Screen;
use crate::entry::WritingMode;
use crate::penny::PennyDisplay;

/// Messages from the controller to a surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GardenMessage {
    // ============================================
    // Navigation
    // ============================================
    /// The current screen (and mode, on the journal screen) changed
    Screen {
        /// Screen now shown
        screen: Screen,
        /// Active writing mode, journal screen only
        mode: Option<WritingMode>,
    },

    /// Recomputed progress line
    Progress {
        /// Rendered flower line
        flowers: String,
        /// Raw flower count
        count: u64,
    },

    // ============================================
    // Writing
    // ============================================
    /// Guided prompt under the cursor
    GuidedPrompt {
        /// Cursor position
        index: usize,
        /// Prompt text
        prompt: String,
    },

    /// Penny panel contents
    Penny {
        /// What the panel shows
        display: PennyDisplay,
    },

    /// Contents of an input buffer
    Buffer {
        /// Which buffer
        target: BufferTarget,
        /// Full text
        text: String,
    },

    // ============================================
    // Transient feedback
    // ============================================
    /// Wrong passphrase
    VaultError {
        /// Generation, matched by the clearing message
        id: u64,
        /// Text to show under the passphrase field
        message: String,
    },

    /// Vault error display time elapsed
    VaultErrorCleared {
        /// Generation being cleared
        id: u64,
    },

    /// Result of a save attempt
    SaveFeedback {
        /// Generation, matched by the clearing message
        id: u64,
        /// Kind of feedback
        kind: SaveFeedbackKind,
    },

    /// Save indicator display time elapsed
    SaveFeedbackCleared {
        /// Generation being cleared
        id: u64,
    },

    // ============================================
    // Archive
    // ============================================
    /// Export or import finished
    Transfer {
        /// Export or import
        kind: TransferKind,
        /// How it ended
        outcome: TransferOutcome,
    },

    // ============================================
    // System
    // ============================================
    /// Notification for the status line
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Text
        message: String,
    },

    /// A quit was held back because some buffer has unsaved text
    UnsavedInput {
        /// Modes whose buffers are not empty
        modes: Vec<WritingMode>,
    },

    /// The surface should exit
    Quit,
}

/// Input buffers the controller owns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferTarget {
    /// Vault passphrase field
    Passphrase,
    /// Writing area of a mode
    Mode(WritingMode),
}

/// What a save attempt produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveFeedbackKind {
    /// Entry stored
    Saved,
    /// Buffer was empty
    NothingToSave,
    /// Storage refused the write
    Failed,
}

impl SaveFeedbackKind {
    /// Label shown on the save indicator
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Saved => "Saved! 🌸",
            Self::NothingToSave => "Nothing to save",
            Self::Failed => "Could not save",
        }
    }
}

/// Direction of an archive transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Garden written to a file
    Export,
    /// Garden replaced from a file
    Import,
}

/// How an export or import ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferOutcome {
    /// Finished; the file involved
    Completed {
        /// File written or read
        path: PathBuf,
    },
    /// The user dismissed the chooser; not an error
    Cancelled,
    /// The transfer failed and nothing was changed
    Failed {
        /// What went wrong
        error: String,
    },
}

impl TransferOutcome {
    /// Whether the transfer completed
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}
