//! Session data models

use crate::error::{QuizError, Result};
use crate::question::{DomainFilter, Question};
use crate::scoring::Scorecard;
use crate::types::QuestionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of questions per quiz
pub const DEFAULT_QUESTION_COUNT: usize = 20;

/// Default exam duration in minutes
pub const DEFAULT_EXAM_MINUTES: u32 = 60;

/// Shortest exam duration accepted; smaller requests are raised to this
pub const MIN_EXAM_MINUTES: u32 = 10;

/// Quiz mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Instant per-answer feedback, no timer
    #[default]
    Practice,
    /// Timed; grading forced at expiry or after the last question
    Exam,
}

impl Mode {
    /// Whether answers are judged as soon as they are selected
    pub fn instant_feedback(&self) -> bool {
        matches!(self, Mode::Practice)
    }

    /// Whether an explicit submit command belongs to this mode
    pub fn shows_submit(&self) -> bool {
        matches!(self, Mode::Exam)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Practice => "Practice",
            Mode::Exam => "Exam",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Practice => write!(f, "practice"),
            Mode::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for Mode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(Mode::Practice),
            "exam" => Ok(Mode::Exam),
            other => Err(QuizError::InvalidSetup(format!(
                "unknown mode '{}' (expected practice or exam)",
                other
            ))),
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Configuring,
    InProgress,
    Graded,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Configuring => "configuring",
            SessionState::InProgress => "in progress",
            SessionState::Graded => "graded",
        };
        write!(f, "{}", s)
    }
}

/// Pending quiz configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSetup {
    pub mode: Mode,
    pub domain: DomainFilter,
    /// Requested question count, clamped to the pool size at start
    pub count: usize,
    /// Requested exam duration, floored at [`MIN_EXAM_MINUTES`]
    pub exam_minutes: u32,
}

impl Default for QuizSetup {
    fn default() -> Self {
        Self {
            mode: Mode::Practice,
            domain: DomainFilter::All,
            count: DEFAULT_QUESTION_COUNT,
            exam_minutes: DEFAULT_EXAM_MINUTES,
        }
    }
}

impl QuizSetup {
    /// Practice setup over every domain
    pub fn practice(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Exam setup over every domain
    pub fn exam(count: usize, minutes: u32) -> Self {
        Self {
            mode: Mode::Exam,
            count,
            exam_minutes: minutes,
            ..Default::default()
        }
    }

    /// Restrict to a domain
    pub fn with_domain(mut self, domain: DomainFilter) -> Self {
        self.domain = domain;
        self
    }

    /// Exam duration after applying the floor
    pub fn effective_exam_minutes(&self) -> u32 {
        self.exam_minutes.max(MIN_EXAM_MINUTES)
    }

    /// Reject setups no quiz can be built from
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(QuizError::InvalidSetup(
                "question count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Navigation direction for paginated presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// Position changed
    Moved(usize),
    /// Already at the first/last question
    AtBoundary(usize),
    /// Moving past the last exam question forced grading
    Graded(Scorecard),
}

/// Result of a retry-incorrect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Nothing was answered incorrectly; the session stays graded
    NothingToRetry,
    /// A new review round began with this many questions
    Started(usize),
}

/// Result of driving the timer from the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No countdown is active
    Idle,
    /// Countdown running
    Running { remaining_secs: i64 },
    /// Countdown expired on this tick and the session was graded
    Expired(Scorecard),
}

/// Answered/total counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Display form such as `3 / 20`
    pub fn label(&self) -> String {
        format!("{} / {}", self.answered, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }
}

/// Explanation shown for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub question_id: QuestionId,
    /// Text of the selected choice, `None` when unanswered
    pub selected: Option<String>,
    pub correct: String,
    pub explanation: String,
    /// `None` when unanswered
    pub is_correct: Option<bool>,
}

impl Feedback {
    /// Build feedback for a question and an optional selection
    pub fn for_question(question: &Question, selected: Option<usize>) -> Self {
        Self {
            question_id: question.id.clone(),
            selected: selected.and_then(|i| question.choice(i)).map(str::to_string),
            correct: question.correct_choice().to_string(),
            explanation: question.explanation.clone(),
            is_correct: selected.map(|i| question.is_correct(i)),
        }
    }

    /// Selected choice text or a placeholder
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or("(not answered)")
    }
}

/// Notification emitted on every session state change
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Configured(QuizSetup),
    Started { mode: Mode, count: usize },
    AnswerSelected {
        question_id: QuestionId,
        choice: usize,
        /// Judged immediately in practice mode only
        correct: Option<bool>,
    },
    Navigated(usize),
    TimerTick { remaining_secs: i64 },
    TimerExpired,
    Graded { correct: usize, total: usize, percent: u32 },
    NothingToRetry,
    RetryStarted { count: usize },
    Reset,
}
