//! Question records and the validated question bank

use crate::error::{QuizError, Result};
use crate::types::{BankFingerprint, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Minimum number of choices a question must offer
pub const MIN_CHOICES: usize = 2;

/// A single multiple-choice question, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier, unique within the bank
    pub id: QuestionId,
    /// Category label used for filtering
    pub domain: String,
    /// Difficulty label
    pub difficulty: String,
    /// Question text
    pub question: String,
    /// Ordered answer options
    pub choices: Vec<String>,
    /// 0-based index of the correct choice
    pub answer_index: usize,
    /// Explanation shown with feedback
    pub explanation: String,
}

impl Question {
    /// Text of a choice, if the index is valid
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    /// Text of the correct choice
    pub fn correct_choice(&self) -> &str {
        self.choice(self.answer_index).unwrap_or_default()
    }

    /// Whether `index` selects the correct choice
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer_index
    }

    /// Check the structural rules for a single record
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(QuizError::InvalidBank("question with empty id".to_string()));
        }
        if self.choices.len() < MIN_CHOICES {
            return Err(QuizError::InvalidBank(format!(
                "question {} has {} choices, at least {} required",
                self.id,
                self.choices.len(),
                MIN_CHOICES
            )));
        }
        if self.answer_index >= self.choices.len() {
            return Err(QuizError::InvalidBank(format!(
                "question {} has answerIndex {} but only {} choices",
                self.id,
                self.answer_index,
                self.choices.len()
            )));
        }
        Ok(())
    }
}

/// Domain selection used when sampling a quiz
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainFilter {
    /// Every question in the bank
    #[default]
    All,
    /// Only questions whose domain equals the label
    Only(String),
}

impl DomainFilter {
    /// Parse a user-supplied filter; `all` (any case) or empty means every domain
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            DomainFilter::All
        } else {
            DomainFilter::Only(trimmed.to_string())
        }
    }

    /// Whether a question passes this filter
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            DomainFilter::All => true,
            DomainFilter::Only(domain) => &question.domain == domain,
        }
    }
}

impl From<String> for DomainFilter {
    fn from(s: String) -> Self {
        DomainFilter::parse(&s)
    }
}

impl From<DomainFilter> for String {
    fn from(filter: DomainFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainFilter::All => write!(f, "all"),
            DomainFilter::Only(domain) => write!(f, "{}", domain),
        }
    }
}

/// A validated, read-only collection of questions
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
    fingerprint: BankFingerprint,
}

impl QuestionBank {
    /// Validate and index a list of questions
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::InvalidBank("bank contains no questions".to_string()));
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (pos, question) in questions.iter().enumerate() {
            question.validate()?;
            if index.insert(question.id.clone(), pos).is_some() {
                return Err(QuizError::InvalidBank(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
        }

        let canonical = serde_json::to_vec(&questions)?;
        let fingerprint = BankFingerprint::from_bytes(&canonical);
        debug!(
            "Indexed question bank: {} questions, fingerprint {}",
            questions.len(),
            fingerprint.short()
        );

        Ok(Self {
            questions,
            index,
            fingerprint,
        })
    }

    /// Parse a JSON document (an array of question objects)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(json)
            .map_err(|e| QuizError::BankLoad(format!("malformed question document: {}", e)))?;
        Self::new(questions)
    }

    /// All questions in bank order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// A validated bank is never empty
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|&pos| &self.questions[pos])
    }

    /// Check whether an id exists
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.index.contains_key(id)
    }

    /// Distinct domains in first-appearance order
    pub fn domains(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .map(|q| q.domain.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// Question count per domain, in first-appearance order
    pub fn domain_counts(&self) -> Vec<(String, usize)> {
        self.domains()
            .into_iter()
            .map(|d| {
                let count = self.questions.iter().filter(|q| q.domain == d).count();
                (d.to_string(), count)
            })
            .collect()
    }

    /// Question count per difficulty label, in first-appearance order
    pub fn difficulty_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for q in &self.questions {
            match counts.iter_mut().find(|(d, _)| *d == q.difficulty) {
                Some((_, n)) => *n += 1,
                None => counts.push((q.difficulty.clone(), 1)),
            }
        }
        counts
    }

    /// Questions passing a domain filter, in bank order
    pub fn filter(&self, filter: &DomainFilter) -> Vec<&Question> {
        self.questions.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Size of the pool a filter selects
    pub fn pool_size(&self, filter: &DomainFilter) -> usize {
        self.questions.iter().filter(|q| filter.matches(q)).count()
    }

    /// Content fingerprint of the bank
    pub fn fingerprint(&self) -> &BankFingerprint {
        &self.fingerprint
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a four-choice question whose correct answer is `answer`
    pub fn question(id: &str, domain: &str, answer: usize) -> Question {
        Question {
            id: QuestionId::new(id),
            domain: domain.to_string(),
            difficulty: "basic".to_string(),
            question: format!("Question {}?", id),
            choices: vec![
                "Alpha".to_string(),
                "Bravo".to_string(),
                "Charlie".to_string(),
                "Delta".to_string(),
            ],
            answer_index: answer,
            explanation: format!("Because {}", id),
        }
    }

    /// Five questions over two domains
    pub fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            question("q1", "service-value", 0),
            question("q2", "service-value", 1),
            question("q3", "practices", 2),
            question("q4", "practices", 3),
            question("q5", "service-value", 0),
        ])
        .unwrap()
    }
}
