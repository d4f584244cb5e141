//! Input handling
//!
//! Keys are mapped to screen-independent actions; the controller decides
//! what an action means on the current screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Enter
    Confirm,
    /// Direct choice selection with 1-9 (0-based)
    Choose(usize),
    Submit,
    Explain,
    Bookmark,
    Retry,
    Reset,
    Help,
    Quit,
}

/// Map a key press to an action
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Char(c @ '1'..='9') => Action::Choose(c as usize - '1' as usize),
        KeyCode::Char('s') => Action::Submit,
        KeyCode::Char('e') => Action::Explain,
        KeyCode::Char('b') => Action::Bookmark,
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Char('R') => Action::Reset,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_vim_and_arrow_keys() {
        assert_eq!(map_key(key(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(map_key(key(KeyCode::Down)), Some(Action::Down));
        assert_eq!(map_key(key(KeyCode::Char('h'))), Some(Action::Left));
        assert_eq!(map_key(key(KeyCode::Right)), Some(Action::Right));
    }

    #[test]
    fn test_digit_keys_choose() {
        assert_eq!(map_key(key(KeyCode::Char('1'))), Some(Action::Choose(0)));
        assert_eq!(map_key(key(KeyCode::Char('4'))), Some(Action::Choose(3)));
        assert_eq!(map_key(key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_reset_is_uppercase() {
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Action::Retry));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(Action::Reset)
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Action::Quit));
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_s), None);
    }
}
