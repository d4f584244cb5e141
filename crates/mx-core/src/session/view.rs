//! View-model derived from session state
//!
//! Presentation code renders from this and never toggles visibility
//! imperatively.

use super::machine::QuizSession;
use super::model::{Mode, Progress, SessionState};
use crate::timer::format_remaining;
use serde::Serialize;

/// Everything a front end needs to decide what to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    /// Mode of the running attempt, or the pending mode when idle/configuring
    pub mode: Mode,
    /// Exam-style submit command visible
    pub show_submit: bool,
    /// Finishing (grading) is possible right now
    pub can_finish: bool,
    /// Retry-incorrect command visible
    pub show_retry: bool,
    /// Answers are judged as they are selected
    pub instant_feedback: bool,
    pub progress: Progress,
    /// `n / N` counter; empty when no session
    pub progress_label: String,
    /// `Remaining m:ss` while a countdown runs
    pub timer_label: Option<String>,
    /// `Score: c / t (p%)` once graded
    pub score_label: Option<String>,
    /// 0-based index of the displayed question
    pub position: usize,
    pub total: usize,
    /// Review round number, 0 for the first pass
    pub review_round: u32,
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let state = session.state();
        let active = matches!(state, SessionState::InProgress | SessionState::Graded);
        let mode = if active {
            session.mode()
        } else {
            session.setup().mode
        };

        let show_submit = state != SessionState::Graded && mode.shows_submit();

        let progress = session.progress();
        let progress_label = if active {
            progress.label()
        } else {
            String::new()
        };

        let timer_label = session
            .remaining()
            .map(|r| format!("Remaining {}", format_remaining(r)));

        let score_label = match state {
            SessionState::Graded => session.scorecard().map(|c| c.summary()),
            _ => None,
        };

        Self {
            state,
            mode,
            show_submit,
            can_finish: state == SessionState::InProgress,
            show_retry: state == SessionState::Graded,
            instant_feedback: mode.instant_feedback(),
            progress,
            progress_label,
            timer_label,
            score_label,
            position: session.position(),
            total: progress.total,
            review_round: session.review_round(),
        }
    }
}

impl QuizSession {
    /// Derived view-model for rendering
    pub fn view(&self) -> SessionView {
        SessionView::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed_clock;
    use crate::question::fixtures::bank;
    use crate::session::model::QuizSetup;
    use chrono::Duration;

    fn session() -> QuizSession {
        QuizSession::with_clock(bank(), fixed_clock())
    }

    #[test]
    fn test_idle_view_follows_pending_mode() {
        let mut s = session();
        let view = s.view();
        assert_eq!(view.state, SessionState::Idle);
        assert!(!view.show_submit);
        assert!(view.progress_label.is_empty());

        s.set_mode(Mode::Exam);
        let view = s.view();
        assert_eq!(view.mode, Mode::Exam);
        assert!(view.show_submit);
        assert!(!view.instant_feedback);
    }

    #[test]
    fn test_exam_view_has_timer_and_submit() {
        let clock = fixed_clock();
        let mut s = QuizSession::with_clock(bank(), clock.clone());
        s.start(QuizSetup::exam(3, 10)).unwrap();
        clock.advance(Duration::seconds(61));

        let view = s.view();
        assert!(view.show_submit);
        assert!(view.can_finish);
        assert!(!view.show_retry);
        assert_eq!(view.timer_label.as_deref(), Some("Remaining 8:59"));
        assert_eq!(view.progress_label, "0 / 3");
    }

    #[test]
    fn test_practice_view() {
        let mut s = session();
        s.start(QuizSetup::practice(2)).unwrap();
        let id = s.questions()[0].id.clone();
        s.select_answer(&id, 0).unwrap();

        let view = s.view();
        assert!(!view.show_submit);
        assert!(view.can_finish);
        assert!(view.instant_feedback);
        assert!(view.timer_label.is_none());
        assert_eq!(view.progress_label, "1 / 2");
    }

    #[test]
    fn test_graded_view() {
        let mut s = session();
        s.start(QuizSetup::exam(2, 20)).unwrap();
        s.grade().unwrap();

        let view = s.view();
        assert!(!view.show_submit);
        assert!(view.show_retry);
        assert!(!view.can_finish);
        assert!(view.timer_label.is_none());
        assert_eq!(view.score_label.as_deref(), Some("Score: 0 / 2 (0%)"));
    }

    #[test]
    fn test_review_round_view() {
        let mut s = session();
        s.start(QuizSetup::exam(2, 20)).unwrap();
        s.grade().unwrap();
        s.retry_last_incorrect().unwrap();

        let view = s.view();
        assert_eq!(view.review_round, 1);
        assert_eq!(view.mode, Mode::Practice);
        assert!(view.instant_feedback);
        assert!(view.timer_label.is_none());
    }
}
