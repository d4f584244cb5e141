//! Core type definitions for mockexam

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a question within a bank
///
/// Banks in the wild use both `"q-12"` and `12`; both deserialize to the
/// same textual id so bookmarks and answers key consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    /// Create a QuestionId from a string
    pub fn new(s: impl Into<String>) -> Self {
        QuestionId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId(s.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuestionId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawQuestionId::deserialize(deserializer)?;
        Ok(match raw {
            RawQuestionId::Text(s) => QuestionId(s),
            RawQuestionId::Signed(n) => QuestionId(n.to_string()),
            RawQuestionId::Unsigned(n) => QuestionId(n.to_string()),
        })
    }
}

/// Unique identifier for one quiz attempt (a started or retried session)
/// Format: YYYYMMDDHHMMSS-<short_uuid>
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

impl AttemptId {
    /// Generate a new AttemptId
    pub fn generate() -> Self {
        let now = chrono::Utc::now();
        let uuid = Uuid::new_v4();
        let short_uuid = &uuid.to_string()[..8];
        AttemptId(format!("{}-{}", now.format("%Y%m%d%H%M%S"), short_uuid))
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a loaded question bank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankFingerprint(pub String);

impl BankFingerprint {
    /// Hash arbitrary canonical bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = blake3::hash(bytes);
        BankFingerprint(hash.to_hex().to_string())
    }

    /// Short form for display
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for BankFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_from_string_json() {
        let id: QuestionId = serde_json::from_str("\"svc-01\"").unwrap();
        assert_eq!(id, QuestionId::new("svc-01"));
    }

    #[test]
    fn test_question_id_from_number_json() {
        let id: QuestionId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_str(), "17");
    }

    #[test]
    fn test_question_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<QuestionId>("{\"id\": 1}").is_err());
        assert!(serde_json::from_str::<QuestionId>("[1]").is_err());
        assert!(serde_json::from_str::<QuestionId>("true").is_err());
    }

    #[test]
    fn test_question_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::new("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn test_attempt_id_generation() {
        let id = AttemptId::generate();
        assert!(id.0.len() >= 23);
        assert!(id.0.contains('-'));
        assert_ne!(id, AttemptId::generate());
    }

    #[test]
    fn test_fingerprint_stability() {
        let a = BankFingerprint::from_bytes(b"[1,2,3]");
        let b = BankFingerprint::from_bytes(b"[1,2,3]");
        let c = BankFingerprint::from_bytes(b"[1,2]");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.short().len(), 12);
    }
}
