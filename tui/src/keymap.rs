//! Key Bindings
//!
//! The terminal analogue of the application menu. Keys are translated into
//! surface actions here and nowhere else; what an action means is up to the
//! controller.
//!
//! | Command | Binding |
//! |---------|---------|
//! | New entry | Ctrl+N |
//! | Save entry | Ctrl+S |
//! | Return to garden | Esc |
//! | Guided / Free / Penny | F2/F3/F4, or 1/2/3 on the garden |
//! | Export garden | Ctrl+E |
//! | Import garden | Ctrl+O |
//! | Next prompt | Ctrl+P |
//! | Flip the penny | Ctrl+F |
//! | Help / About | F1 / F12 |
//! | Quit | Ctrl+Q or Ctrl+C |
//!
//! While the vault is locked only typing, Enter, quit, help and about do
//! anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use garden_core::{BufferEdit, GardenEvent, Screen, TransferKind, WritingMode};

/// What a key press asks the surface to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Forward to the controller
    Garden(GardenEvent),
    /// Open the path chooser for an export or import
    ChoosePath(TransferKind),
    /// Show the help overlay
    Help,
    /// Show the about overlay
    About,
    /// Ask to quit
    Quit,
}

/// Translate a key press on `screen` into an action
pub fn map_key(key: KeyEvent, screen: Screen) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Always available
    match key.code {
        KeyCode::Char(c) if ctrl && matches!(c.to_ascii_lowercase(), 'q' | 'c') => {
            return Some(Action::Quit);
        }
        KeyCode::F(1) => return Some(Action::Help),
        KeyCode::F(12) => return Some(Action::About),
        _ => {}
    }

    if screen == Screen::Vault {
        return match key.code {
            KeyCode::Enter => Some(Action::Garden(GardenEvent::Unlock)),
            KeyCode::Backspace => Some(edit(BufferEdit::Backspace)),
            KeyCode::Char(c) if !ctrl && !alt => Some(edit(BufferEdit::Insert(c))),
            _ => None,
        };
    }

    if ctrl {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let event = match c.to_ascii_lowercase() {
            'n' => GardenEvent::NewEntry,
            's' => GardenEvent::SaveEntry,
            'p' => GardenEvent::AdvancePrompt,
            'f' => GardenEvent::Flip,
            'e' => return Some(Action::ChoosePath(TransferKind::Export)),
            'o' => return Some(Action::ChoosePath(TransferKind::Import)),
            _ => return None,
        };
        return Some(Action::Garden(event));
    }

    match key.code {
        KeyCode::Esc => Some(Action::Garden(GardenEvent::ReturnToGarden)),
        KeyCode::F(n @ 2..=4) => {
            let mode = WritingMode::ALL[usize::from(n - 2)];
            Some(Action::Garden(GardenEvent::SelectMode(mode)))
        }
        KeyCode::Char(c) if screen == Screen::Garden && !alt => {
            mode_for_digit(c).map(|m| Action::Garden(GardenEvent::SelectMode(m)))
        }
        KeyCode::Char(c) if screen == Screen::Journal && !alt => {
            Some(edit(BufferEdit::Insert(c)))
        }
        KeyCode::Enter if screen == Screen::Journal => Some(edit(BufferEdit::Insert('\n'))),
        KeyCode::Tab if screen == Screen::Journal => Some(edit(BufferEdit::Insert('\t'))),
        KeyCode::Backspace if screen == Screen::Journal => Some(edit(BufferEdit::Backspace)),
        _ => None,
    }
}

fn edit(edit: BufferEdit) -> Action {
    Action::Garden(GardenEvent::Edit(edit))
}

fn mode_for_digit(c: char) -> Option<WritingMode> {
    match c {
        '1' => Some(WritingMode::Guided),
        '2' => Some(WritingMode::Free),
        '3' => Some(WritingMode::Penny),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn garden(event: GardenEvent) -> Option<Action> {
        Some(Action::Garden(event))
    }

    #[test]
    fn test_quit_help_about_everywhere() {
        for screen in [Screen::Vault, Screen::Garden, Screen::Journal] {
            assert_eq!(map_key(ctrl('q'), screen), Some(Action::Quit));
            assert_eq!(map_key(ctrl('c'), screen), Some(Action::Quit));
            assert_eq!(map_key(key(KeyCode::F(1)), screen), Some(Action::Help));
            assert_eq!(map_key(key(KeyCode::F(12)), screen), Some(Action::About));
        }
    }

    #[test]
    fn test_vault_ignores_commands() {
        for k in [
            ctrl('s'),
            ctrl('n'),
            ctrl('e'),
            ctrl('o'),
            key(KeyCode::Esc),
            key(KeyCode::F(2)),
        ] {
            assert_eq!(map_key(k, Screen::Vault), None);
        }
    }

    #[test]
    fn test_vault_typing_and_unlock() {
        assert_eq!(
            map_key(key(KeyCode::Char('1')), Screen::Vault),
            garden(GardenEvent::Edit(BufferEdit::Insert('1')))
        );
        assert_eq!(
            map_key(key(KeyCode::Enter), Screen::Vault),
            garden(GardenEvent::Unlock)
        );
    }

    #[test]
    fn test_menu_commands() {
        let s = Screen::Journal;
        assert_eq!(map_key(ctrl('n'), s), garden(GardenEvent::NewEntry));
        assert_eq!(map_key(ctrl('s'), s), garden(GardenEvent::SaveEntry));
        assert_eq!(map_key(ctrl('p'), s), garden(GardenEvent::AdvancePrompt));
        assert_eq!(map_key(ctrl('f'), s), garden(GardenEvent::Flip));
        assert_eq!(
            map_key(key(KeyCode::Esc), s),
            garden(GardenEvent::ReturnToGarden)
        );
        assert_eq!(
            map_key(ctrl('e'), s),
            Some(Action::ChoosePath(TransferKind::Export))
        );
        assert_eq!(
            map_key(ctrl('o'), Screen::Garden),
            Some(Action::ChoosePath(TransferKind::Import))
        );
    }

    #[test]
    fn test_mode_selection_bindings() {
        assert_eq!(
            map_key(key(KeyCode::F(4)), Screen::Journal),
            garden(GardenEvent::SelectMode(WritingMode::Penny))
        );
        assert_eq!(map_key(ctrl('3'), Screen::Journal), None);
        assert_eq!(
            map_key(key(KeyCode::F(3)), Screen::Journal),
            garden(GardenEvent::SelectMode(WritingMode::Free))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('1')), Screen::Garden),
            garden(GardenEvent::SelectMode(WritingMode::Guided))
        );
    }

    #[test]
    fn test_digits_are_text_in_journal() {
        assert_eq!(
            map_key(key(KeyCode::Char('1')), Screen::Journal),
            garden(GardenEvent::Edit(BufferEdit::Insert('1')))
        );
        assert_eq!(
            map_key(key(KeyCode::Enter), Screen::Journal),
            garden(GardenEvent::Edit(BufferEdit::Insert('\n')))
        );
        assert_eq!(map_key(key(KeyCode::Char('x')), Screen::Garden), None);
    }
}
