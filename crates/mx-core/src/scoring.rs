//! Scoring engine: correctness per question, aggregate score, incorrect partition

use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::types::QuestionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recorded selections: question id -> chosen choice index
pub type Answers = HashMap<QuestionId, usize>;

/// Outcome for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    /// Chosen index, `None` when unanswered
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// Aggregate grading result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub total: usize,
    pub correct: usize,
    pub unanswered: usize,
    /// Integer percentage, rounded half-up
    pub percent: u32,
    /// Per-question results in question-set order
    pub results: Vec<QuestionResult>,
    /// Questions not answered correctly, in question-set order
    pub incorrect: Vec<Question>,
    /// Exam time used, when a timer ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<i64>,
}

impl Scorecard {
    /// Number of incorrect (including unanswered) questions
    pub fn incorrect_count(&self) -> usize {
        self.total - self.correct
    }

    /// True when every question was answered correctly
    pub fn is_perfect(&self) -> bool {
        self.incorrect.is_empty()
    }

    /// Result row for a question
    pub fn result_for(&self, id: &QuestionId) -> Option<&QuestionResult> {
        self.results.iter().find(|r| &r.question_id == id)
    }

    /// One-line summary such as `Score: 2 / 3 (67%)`
    pub fn summary(&self) -> String {
        format!("Score: {} / {} ({}%)", self.correct, self.total, self.percent)
    }
}

/// `round(100 * correct / total)` with half-up rounding, in integer arithmetic
///
/// Returns `None` for an empty set.
pub fn percentage(correct: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    Some(((200 * correct + total) / (2 * total)) as u32)
}

/// Grade a question set against recorded answers
///
/// Unanswered questions count as incorrect. An empty set is a caller
/// contract violation and is rejected before any division happens.
pub fn score(questions: &[Question], answers: &Answers) -> Result<Scorecard> {
    if questions.is_empty() {
        return Err(QuizError::EmptyQuestionSet(
            "cannot grade an empty question set".to_string(),
        ));
    }

    let mut results = Vec::with_capacity(questions.len());
    let mut incorrect = Vec::new();
    let mut correct = 0;
    let mut unanswered = 0;

    for question in questions {
        let selected = answers.get(&question.id).copied();
        let is_correct = selected.map(|s| question.is_correct(s)).unwrap_or(false);

        if is_correct {
            correct += 1;
        } else {
            incorrect.push(question.clone());
        }
        if selected.is_none() {
            unanswered += 1;
        }

        results.push(QuestionResult {
            question_id: question.id.clone(),
            selected,
            correct_index: question.answer_index,
            is_correct,
        });
    }

    let total = questions.len();
    let percent = percentage(correct, total).unwrap_or(0);

    Ok(Scorecard {
        total,
        correct,
        unanswered,
        percent,
        results,
        incorrect,
        elapsed_secs: None,
    })
}
