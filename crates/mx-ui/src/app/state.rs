//! Presentation state
//!
//! Only cursors, overlays and notices live here; quiz data is always read
//! back from the session.

use mx_core::session::SessionState;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal screen interaction
    #[default]
    Normal,
    /// Help overlay
    Help,
}

/// Screen shown for a session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Quiz,
    Results,
}

impl Screen {
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Idle | SessionState::Configuring => Screen::Setup,
            SessionState::InProgress => Screen::Quiz,
            SessionState::Graded => Screen::Results,
        }
    }
}

/// Severity of a status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Editable row of the setup form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    Mode,
    Domain,
    Count,
    Minutes,
}

impl SetupField {
    pub const ALL: [SetupField; 4] = [
        SetupField::Mode,
        SetupField::Domain,
        SetupField::Count,
        SetupField::Minutes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SetupField::Mode => "Mode",
            SetupField::Domain => "Domain",
            SetupField::Count => "Questions",
            SetupField::Minutes => "Exam minutes",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Next row, stopping at the last
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// Previous row, stopping at the first
    pub fn prev(&self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Status message
    pub message: Option<Notice>,
    /// Should quit
    pub should_quit: bool,
    /// Focused row on the setup screen
    pub setup_field: SetupField,
    /// Highlighted choice on the quiz screen
    pub choice_cursor: usize,
    /// Highlighted row on the results screen
    pub review_cursor: usize,
    /// Explanation pane toggled on with `e`
    pub show_explanation: bool,
}

impl AppState {
    /// Create a new app state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status message
    pub fn set_message(&mut self, notice: Notice) {
        self.message = Some(notice);
    }

    /// Clear status message
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_mode_default() {
        assert_eq!(AppMode::default(), AppMode::Normal);
    }

    #[test]
    fn test_app_state_message() {
        let mut state = AppState::new();
        assert!(state.message.is_none());
        state.set_message(Notice::warning("Test"));
        assert_eq!(state.message, Some(Notice::warning("Test")));
        state.clear_message();
        assert!(state.message.is_none());
    }

    #[test]
    fn test_screen_for_state() {
        assert_eq!(Screen::for_state(SessionState::Idle), Screen::Setup);
        assert_eq!(Screen::for_state(SessionState::Configuring), Screen::Setup);
        assert_eq!(Screen::for_state(SessionState::InProgress), Screen::Quiz);
        assert_eq!(Screen::for_state(SessionState::Graded), Screen::Results);
    }

    #[test]
    fn test_setup_field_cycle_stops_at_ends() {
        assert_eq!(SetupField::Mode.prev(), SetupField::Mode);
        assert_eq!(SetupField::Mode.next(), SetupField::Domain);
        assert_eq!(SetupField::Minutes.next(), SetupField::Minutes);
        assert_eq!(SetupField::Count.prev(), SetupField::Domain);
    }
}
