//! File system storage for bookmarks

use mx_core::bookmark::{BookmarkSet, BookmarkStorage};
use mx_core::error::{QuizError, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the bookmark document inside the data directory
pub const BOOKMARK_FILE: &str = "bookmarks.json";

/// Bookmarks persisted as a JSON array of question ids
pub struct FileBookmarkStore {
    path: PathBuf,
}

impl FileBookmarkStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside a data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(BOOKMARK_FILE))
    }

    /// Store in the default data directory (~/.mockexam as fallback)
    pub fn default_location() -> Self {
        Self::in_dir(default_data_dir())
    }

    /// Path of the bookmark document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(BOOKMARK_FILE);
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    QuizError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create data directory: {}", e),
                    ))
                })?;
                debug!("Created data directory: {:?}", parent);
            }
        }
        Ok(())
    }

    /// Write the set atomically (write to temp, then rename)
    fn atomic_write(&self, bookmarks: &BookmarkSet) -> Result<()> {
        self.ensure_parent()?;
        let temp_path = self.temp_path();

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            QuizError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, bookmarks)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            QuizError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved {} bookmarks to {:?}", bookmarks.len(), self.path);
        Ok(())
    }
}

impl BookmarkStorage for FileBookmarkStore {
    /// Missing, unreadable or corrupt documents load as an empty set
    fn load(&self) -> Result<BookmarkSet> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BookmarkSet::new());
            }
            Err(e) => {
                warn!("Failed to read bookmarks {:?}: {}", self.path, e);
                return Ok(BookmarkSet::new());
            }
        };

        match serde_json::from_str::<BookmarkSet>(&text) {
            Ok(set) => Ok(set),
            Err(e) => {
                warn!("Ignoring corrupt bookmark file {:?}: {}", self.path, e);
                Ok(BookmarkSet::new())
            }
        }
    }

    fn save(&self, bookmarks: &BookmarkSet) -> Result<()> {
        self.atomic_write(bookmarks)
    }
}

/// Per-user data directory for mockexam
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "mockexam", "mockexam")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".mockexam")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::QuestionId;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_store() -> (FileBookmarkStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBookmarkStore::in_dir(temp_dir.path().join("data"));
        (store, temp_dir)
    }

    fn ids(set: &BookmarkSet) -> Vec<String> {
        set.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = create_test_store();
        let set: BookmarkSet = ["q2", "q1"].into_iter().map(QuestionId::from).collect();

        store.save(&set).unwrap();
        assert!(store.path().exists());

        let loaded = store.load().unwrap();
        assert_eq!(ids(&loaded), vec!["q1", "q2"]);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let (store, _temp) = create_test_store();
        store.save(&BookmarkSet::new()).unwrap();

        assert!(!store.temp_path().exists());
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn test_toggle_persists() {
        let (store, _temp) = create_test_store();
        let id = QuestionId::from("q7");

        assert!(store.toggle(&id).unwrap());
        assert!(store.load().unwrap().contains(&id));

        assert!(!store.toggle(&id).unwrap());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{\"not\": \"an array\"}").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_import_replaces_and_rejects_bad_shape() {
        let (store, _temp) = create_test_store();
        store.import(r#"["a", 3]"#).unwrap();
        assert_eq!(ids(&store.load().unwrap()), vec!["3", "a"]);

        assert!(store.import(r#"{"a": 1}"#).is_err());
        assert_eq!(ids(&store.load().unwrap()), vec!["3", "a"]);
    }

    #[test]
    fn test_export_matches_file_content() {
        let (store, _temp) = create_test_store();
        store.import(r#"["x", "y"]"#).unwrap();

        let exported = store.load().unwrap().export_json().unwrap();
        let reimported = BookmarkSet::parse_import(&exported).unwrap();
        assert_eq!(ids(&reimported), vec!["x", "y"]);
    }
}
