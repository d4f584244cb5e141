//! Quiz session module
//!
//! A session owns one sampled question set, the answers recorded against
//! it, the navigation position and at most one exam countdown.
//!
//! # Lifecycle
//!
//! `Idle -> Configuring -> InProgress -> Graded`, with navigation and
//! answering looping on `InProgress` and retry-incorrect moving
//! `Graded -> InProgress`. `reset` returns to `Idle` from anywhere.
//!
//! # Example
//!
//! ```ignore
//! use mx_core::session::{QuizSession, QuizSetup};
//!
//! let mut session = QuizSession::new(bank);
//! session.start(QuizSetup::exam(20, 60))?;
//! session.select_current(2)?;
//! let card = session.grade()?;
//! println!("{}", card.summary());
//! ```

mod machine;
mod model;
mod view;

// Re-export public API
pub use machine::QuizSession;
pub use model::{
    Direction, Feedback, Mode, NavOutcome, Progress, QuizSetup, RetryOutcome, SessionEvent,
    SessionState, TickOutcome, DEFAULT_EXAM_MINUTES, DEFAULT_QUESTION_COUNT, MIN_EXAM_MINUTES,
};
pub use view::SessionView;
