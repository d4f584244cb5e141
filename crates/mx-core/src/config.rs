//! Configuration management for mockexam

use crate::error::{QuizError, Result};
use crate::session::QuizSetup;
use crate::timer::{clamp_tick_interval, MAX_TICK_MS, MIN_TICK_MS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default location of the question bank, relative to the working directory
pub const DEFAULT_BANK_PATH: &str = "data/questions.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiz defaults (mode, domain, count, exam minutes)
    pub quiz: QuizSetup,
    /// Question bank settings
    pub bank: BankConfig,
    /// Timer settings
    pub timer: TimerConfig,
    /// Bookmark settings
    pub bookmarks: BookmarkConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Question bank configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Path of the JSON question document
    pub path: PathBuf,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BANK_PATH),
        }
    }
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Tick interval in milliseconds (250-1000)
    pub tick_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_ms: MIN_TICK_MS }
    }
}

impl TimerConfig {
    /// Tick interval clamped to the supported range
    pub fn tick_interval(&self) -> Duration {
        clamp_tick_interval(self.tick_ms)
    }
}

/// Bookmark configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkConfig {
    /// Override for the bookmark file; defaults to the data directory
    pub path: Option<PathBuf>,
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme (default/mono)
    pub theme: String,
    /// Show domain and difficulty badges
    pub show_badges: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            show_badges: true,
        }
    }
}

impl Config {
    /// Parse TOML text; missing sections fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QuizError::Toml(e.to_string()))
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| QuizError::Toml(e.to_string()))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QuizError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| e.with_context(format!("Failed to parse {}", path.display())))?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(QuizError::FileNotFound(_)) => {
                debug!("No configuration at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Check semantic constraints TOML parsing cannot express
    ///
    /// Hard errors are returned as `Err`; recoverable oddities (values that
    /// will be clamped) come back as warnings.
    pub fn validate(&self) -> Result<Vec<String>> {
        self.quiz
            .validate()
            .map_err(|e| QuizError::Config(e.to_string()))?;
        if self.bank.path.as_os_str().is_empty() {
            return Err(QuizError::Config("bank.path must not be empty".to_string()));
        }

        let mut warnings = Vec::new();
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.timer.tick_ms) {
            warnings.push(format!(
                "timer.tick_ms = {} will be clamped to {}",
                self.timer.tick_ms,
                self.timer.tick_interval().as_millis()
            ));
        }
        if self.quiz.exam_minutes != self.quiz.effective_exam_minutes() {
            warnings.push(format!(
                "quiz.exam_minutes = {} is below the minimum and will be raised to {}",
                self.quiz.exam_minutes,
                self.quiz.effective_exam_minutes()
            ));
        }
        if !matches!(self.ui.theme.as_str(), "default" | "mono") {
            warnings.push(format!(
                "ui.theme '{}' is unknown, the default theme will be used",
                self.ui.theme
            ));
        }
        for w in &warnings {
            warn!("{}", w);
        }
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::DomainFilter;
    use crate::session::Mode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.quiz.count, 20);
        assert_eq!(config.quiz.exam_minutes, 60);
        assert_eq!(config.bank.path, PathBuf::from("data/questions.json"));
        assert_eq!(config.timer.tick_interval().as_millis(), 250);
        assert!(config.ui.show_badges);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml_string().unwrap();
        assert!(toml.contains("[quiz]"));
        assert!(toml.contains("[bank]"));
        assert!(toml.contains("[timer]"));

        let config2 = Config::from_toml_str(&toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
            [quiz]
            mode = "exam"
            domain = "Practices"
            exam_minutes = 90

            [timer]
            tick_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.quiz.mode, Mode::Exam);
        assert_eq!(config.quiz.domain, DomainFilter::Only("Practices".to_string()));
        assert_eq!(config.quiz.count, 20);
        assert_eq!(config.timer.tick_interval().as_millis(), 500);
        assert!(config.bookmarks.path.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[quiz\nmode=").unwrap_err();
        assert!(matches!(err, QuizError::Toml(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().unwrap().is_empty());

        config.timer.tick_ms = 50;
        config.quiz.exam_minutes = 5;
        assert_eq!(config.validate().unwrap().len(), 2);

        config.quiz.count = 0;
        assert!(matches!(config.validate().unwrap_err(), QuizError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            Config::load_or_default(Path::new("/nonexistent/mockexam/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
