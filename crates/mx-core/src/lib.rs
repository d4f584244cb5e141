//! mx-core - Core library for mockexam
//!
//! This crate provides the UI-free quiz engine: the question model and bank
//! validation, the session state machine, the scoring engine, the exam
//! countdown, the bookmark model and configuration.

pub mod bookmark;
pub mod clock;
pub mod config;
pub mod error;
pub mod question;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod types;

pub use error::{QuizError, Result};
pub use types::*;
