//! Error types for mockexam

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mockexam
#[derive(Debug, Error)]
pub enum QuizError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Question bank could not be read or parsed
    #[error("Failed to load question bank: {0}")]
    BankLoad(String),

    /// Question bank parsed but violates a structural rule
    #[error("Invalid question bank: {0}")]
    InvalidBank(String),

    /// Question not present in the bank or current question set
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    /// Choice index outside the question's choice list
    #[error("Choice {index} is out of range for question {question} ({choices} choices)")]
    ChoiceOutOfRange {
        question: String,
        index: usize,
        choices: usize,
    },

    /// Operation not permitted in the current session state
    #[error("Cannot {operation} while session is {state}")]
    InvalidState { operation: String, state: String },

    /// Grading or starting would operate on an empty question set
    #[error("No questions available: {0}")]
    EmptyQuestionSet(String),

    /// Quiz setup rejected (count of zero and similar)
    #[error("Invalid quiz setup: {0}")]
    InvalidSetup(String),

    /// Bookmark import document has the wrong shape
    #[error("Invalid bookmark format: {0}")]
    BookmarkFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QuizError>,
    },
}

impl QuizError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QuizError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error is a caller contract violation rather than a user-facing failure
    pub fn is_contract_violation(&self) -> bool {
        match self {
            QuizError::QuestionNotFound(_)
            | QuizError::ChoiceOutOfRange { .. }
            | QuizError::InvalidState { .. }
            | QuizError::EmptyQuestionSet(_) => true,
            QuizError::WithContext { source, .. } => source.is_contract_violation(),
            _ => false,
        }
    }
}

/// Result type alias for mockexam
pub type Result<T> = std::result::Result<T, QuizError>;
