//! Surface Events
//!
//! Events sent from a surface to the controller. A surface reports what the
//! user did; it never decides what that means. Actions that make no sense on
//! the current screen are ignored by the controller, so a surface can forward
//! every key binding unconditionally.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entry::WritingMode;

/// Events from a surface to the controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GardenEvent {
    // ============================================
    // Input
    // ============================================
    /// Edit whichever buffer the current screen writes to
    Edit(BufferEdit),

    /// Submit the passphrase buffer (vault only)
    Unlock,

    // ============================================
    // Navigation (menu commands)
    // ============================================
    /// Open the journal in a writing mode
    SelectMode(WritingMode),

    /// Start a new entry
    NewEntry,

    /// Go back to the garden hub
    ReturnToGarden,

    // ============================================
    // Writing
    // ============================================
    /// Move the guided cursor to the next prompt
    AdvancePrompt,

    /// Flip the penny
    Flip,

    /// Save the active buffer as an entry
    SaveEntry,

    // ============================================
    // Archive
    // ============================================
    /// Export to the chosen path; `None` if the chooser was dismissed
    Export {
        /// Destination file
        path: Option<PathBuf>,
    },

    /// Import from the chosen path; `None` if the chooser was dismissed
    Import {
        /// Source file
        path: Option<PathBuf>,
    },

    // ============================================
    // Lifecycle
    // ============================================
    /// The user wants to leave
    QuitRequested {
        /// Leave even if a buffer holds unsaved text
        force: bool,
    },
}

/// A single change to an input buffer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferEdit {
    /// Append a character
    Insert(char),
    /// Append text (paste)
    InsertStr(String),
    /// Remove the last character
    Backspace,
    /// Empty the buffer
    Clear,
}

impl BufferEdit {
    /// Apply the edit to `buffer`
    pub fn apply(&self, buffer: &mut String) {
        match self {
            Self::Insert(c) => buffer.push(*c),
            Self::InsertStr(s) => buffer.push_str(s),
            Self::Backspace => {
                buffer.pop();
            }
            Self::Clear => buffer.clear(),
        }
    }
}
