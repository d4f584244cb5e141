//! Bookmarked (flagged) questions and their storage seam

use crate::error::{QuizError, Result};
use crate::question::QuestionBank;
use crate::types::QuestionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Set of flagged question ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkSet {
    ids: BTreeSet<QuestionId>,
}

impl BookmarkSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for a question; returns `true` if it is now bookmarked
    pub fn toggle(&mut self, id: &QuestionId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Add a bookmark; returns `false` if it was already present
    pub fn add(&mut self, id: QuestionId) -> bool {
        self.ids.insert(id)
    }

    /// Remove a bookmark; returns `false` if it was not present
    pub fn remove(&mut self, id: &QuestionId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Ids in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &QuestionId> {
        self.ids.iter()
    }

    /// Bookmarked ids that no longer exist in the bank
    pub fn unknown_ids<'a>(&'a self, bank: &QuestionBank) -> Vec<&'a QuestionId> {
        self.ids.iter().filter(|id| !bank.contains(id)).collect()
    }

    /// Pretty JSON array of ids, suitable for download/export
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.ids)?)
    }

    /// Parse an imported document
    ///
    /// Only a JSON array of strings or integers is accepted. On any other
    /// shape an error is returned and nothing is modified; callers replace
    /// their set only on success.
    pub fn parse_import(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| QuizError::BookmarkFormat(format!("not valid JSON: {}", e)))?;

        let Value::Array(items) = value else {
            return Err(QuizError::BookmarkFormat(
                "expected a JSON array of question ids".to_string(),
            ));
        };

        let mut ids = BTreeSet::new();
        for (pos, item) in items.into_iter().enumerate() {
            let id = match item {
                Value::String(s) => QuestionId(s),
                Value::Number(n) if n.is_i64() || n.is_u64() => QuestionId(n.to_string()),
                other => {
                    return Err(QuizError::BookmarkFormat(format!(
                        "element {} is not a question id: {}",
                        pos, other
                    )))
                }
            };
            ids.insert(id);
        }
        Ok(Self { ids })
    }
}

impl FromIterator<QuestionId> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = QuestionId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Trait for bookmark persistence implementations
pub trait BookmarkStorage {
    /// Load the persisted set; a missing store yields an empty set
    fn load(&self) -> Result<BookmarkSet>;

    /// Persist the whole set
    fn save(&self, bookmarks: &BookmarkSet) -> Result<()>;

    /// Load, flip one id, save; returns the new flag state
    fn toggle(&self, id: &QuestionId) -> Result<bool> {
        let mut set = self.load()?;
        let now_set = set.toggle(id);
        self.save(&set)?;
        Ok(now_set)
    }

    /// Replace the persisted set with an imported document
    ///
    /// The stored set is untouched when the document is malformed.
    fn import(&self, text: &str) -> Result<BookmarkSet> {
        let set = BookmarkSet::parse_import(text)?;
        self.save(&set)?;
        Ok(set)
    }
}

/// In-memory storage for testing
#[cfg(test)]
pub mod memory {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct MemoryBookmarks {
        set: RefCell<BookmarkSet>,
    }

    impl BookmarkStorage for MemoryBookmarks {
        fn load(&self) -> Result<BookmarkSet> {
            Ok(self.set.borrow().clone())
        }

        fn save(&self, bookmarks: &BookmarkSet) -> Result<()> {
            *self.set.borrow_mut() = bookmarks.clone();
            Ok(())
        }
    }
}
