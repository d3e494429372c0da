//! Overlays
//!
//! Modal panels drawn over the current screen: help, about, and the path
//! chooser used for export and import. While an overlay is open it receives
//! every key.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use garden_core::TransferKind;

/// Help text shown by F1
pub const HELP_TEXT: &str = "\
Getting Started:
• Enter one of your garden's passphrases to unlock it
• Choose a writing path from your garden hub (1, 2 or 3)
• Write your thoughts and save them to grow your garden

Writing Modes:
🌱 Guided Journey - Answer thoughtful prompts (Ctrl+P for the next one)
🌿 Free Writing - Express yourself without limits
💭 Penny for Thoughts - Flip a coin for creative inspiration (Ctrl+F)

Tips:
• Your garden grows flowers as you write more entries
• Use Ctrl+S to save entries quickly
• Press Esc to return to the garden anytime
• Ctrl+E exports your garden as a backup, Ctrl+O imports one
• Ctrl+Q quits (twice if you have unsaved writing)

All your entries are stored locally and privately on your device.";

/// About text shown by F12
pub fn about_text() -> String {
    format!(
        "A beautiful, private journaling app that grows with your thoughts.\n\n\
         Version: {}\n\
         Made with ❤️ for mindful writing\n\n\
         🌸 Your thoughts are safe in your secret garden 🌸",
        env!("CARGO_PKG_VERSION")
    )
}

/// What the chooser decided
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChooserOutcome {
    /// The user confirmed this path
    Chosen(PathBuf),
    /// The user dismissed the chooser
    Cancelled,
}

/// Single-line path prompt for export and import
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathChooser {
    /// Export or import
    pub kind: TransferKind,
    /// Path typed so far
    pub input: String,
}

impl PathChooser {
    /// Chooser for `kind`, pre-filled with `suggestion`
    pub fn new(kind: TransferKind, suggestion: impl Into<String>) -> Self {
        Self {
            kind,
            input: suggestion.into(),
        }
    }

    /// Title of the overlay
    pub fn title(&self) -> &'static str {
        match self.kind {
            TransferKind::Export => "Export your garden to",
            TransferKind::Import => "Import a garden from",
        }
    }

    /// Handle a key; returns an outcome once the chooser is done
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ChooserOutcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(ChooserOutcome::Cancelled),
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    Some(ChooserOutcome::Cancelled)
                } else {
                    Some(ChooserOutcome::Chosen(PathBuf::from(path)))
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    /// Append pasted text
    pub fn paste(&mut self, text: &str) {
        self.input.push_str(text.trim_end_matches(['\n', '\r']));
    }
}

/// Modal panel currently open
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    /// Nothing open
    #[default]
    None,
    /// Help text
    Help,
    /// About text
    About,
    /// Export or import path prompt
    PathChooser(PathChooser),
}

impl Overlay {
    /// Whether a panel is open
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_chooser_prefilled_confirm() {
        let mut chooser = PathChooser::new(TransferKind::Export, "backup.json");
        assert_eq!(
            chooser.handle_key(key(KeyCode::Enter)),
            Some(ChooserOutcome::Chosen(PathBuf::from("backup.json")))
        );
    }

    #[test]
    fn test_chooser_editing() {
        let mut chooser = PathChooser::new(TransferKind::Import, "");
        for c in "a.jsonx".chars() {
            assert_eq!(chooser.handle_key(key(KeyCode::Char(c))), None);
        }
        chooser.handle_key(key(KeyCode::Backspace));
        assert_eq!(chooser.input, "a.json");

        chooser.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(chooser.input.is_empty());
        chooser.paste("/tmp/garden.json\n");
        assert_eq!(chooser.input, "/tmp/garden.json");
    }

    #[test]
    fn test_chooser_cancel() {
        let mut chooser = PathChooser::new(TransferKind::Import, "x.json");
        assert_eq!(
            chooser.handle_key(key(KeyCode::Esc)),
            Some(ChooserOutcome::Cancelled)
        );

        let mut empty = PathChooser::new(TransferKind::Import, "   ");
        assert_eq!(
            empty.handle_key(key(KeyCode::Enter)),
            Some(ChooserOutcome::Cancelled)
        );
    }

    #[test]
    fn test_about_mentions_version() {
        assert!(about_text().contains(env!("CARGO_PKG_VERSION")));
        assert!(!Overlay::None.is_open());
        assert!(Overlay::Help.is_open());
    }
}
