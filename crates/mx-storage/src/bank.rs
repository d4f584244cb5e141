//! Question bank loading from disk

use mx_core::error::{QuizError, Result};
use mx_core::question::QuestionBank;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read and validate the question bank at `path`
///
/// A missing or unreadable file and malformed JSON both surface as
/// [`QuizError::BankLoad`] so the caller can show a single message and
/// keep start controls disabled.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    debug!("Loading question bank from {:?}", path);

    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            QuizError::BankLoad(format!("{} does not exist", path.display()))
        } else {
            QuizError::BankLoad(format!("cannot read {}: {}", path.display(), e))
        }
    })?;

    let bank = QuestionBank::from_json_str(&text)
        .map_err(|e| e.with_context(format!("Failed to load {}", path.display())))?;

    info!(
        "Loaded {} questions in {} domains (bank {})",
        bank.len(),
        bank.domains().len(),
        bank.fingerprint().short()
    );
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BANK: &str = r#"[
        {"id": 1, "domain": "Guiding Principles", "difficulty": "basic",
         "question": "Q1", "choices": ["a", "b"], "answerIndex": 0, "explanation": "E1"},
        {"id": "q2", "domain": "Practices", "difficulty": "intermediate",
         "question": "Q2", "choices": ["a", "b", "c"], "answerIndex": 2, "explanation": "E2"}
    ]"#;

    #[test]
    fn test_load_bank() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("questions.json");
        fs::write(&path, BANK).unwrap();

        let bank = load_bank(&path).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.domains(), vec!["Guiding Principles", "Practices"]);
        assert!(bank.contains(&"1".into()));
    }

    #[test]
    fn test_missing_bank() {
        let temp = TempDir::new().unwrap();
        let err = load_bank(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, QuizError::BankLoad(_)));
    }

    #[test]
    fn test_malformed_bank() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("questions.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_bank(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load"));
    }
}
