//! mx-ui - TUI library for mockexam
//!
//! This crate provides the Terminal User Interface for taking quizzes.
//!
//! # Overview
//!
//! The TUI provides:
//! - A setup screen for mode, domain, question count and exam length
//! - One question per screen with instant feedback in practice mode
//! - A live exam countdown in the header
//! - A results screen with per-question review and retry-incorrect
//!
//! # Example
//!
//! ```ignore
//! use mx_ui::{App, AppOptions};
//! use mx_core::session::QuizSession;
//!
//! let mut app = App::new(QuizSession::new(bank), Box::new(store), AppOptions::default())?;
//! app.run()?;
//! ```

pub mod app;
pub mod events;
pub mod input;
pub mod layout;
pub mod theme;

pub use app::{App, AppMode, AppOptions, AppState, Controller};
pub use theme::Theme;
