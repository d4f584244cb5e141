//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod bank;
pub mod bookmark;
pub mod config;
pub mod start;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use mx_core::config::Config;
use mx_storage::FileBookmarkStore;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".mockexam/config.toml";

/// mockexam - multiple-choice practice and timed mock exams
#[derive(Debug, Parser)]
#[command(name = "mockexam")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a practice quiz or a timed exam
    Start(start::StartArgs),

    /// Inspect and validate the question bank
    Bank(bank::BankArgs),

    /// Manage bookmarked questions
    #[command(subcommand)]
    Bookmark(bookmark::BookmarkCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Loaded configuration shared by commands
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub no_color: bool,
}

impl AppContext {
    /// Load configuration, falling back to defaults when the file is absent
    pub fn load(config_path: PathBuf, no_color: bool) -> Result<Self> {
        let config = Config::load_or_default(&config_path)
            .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;
        tracing::debug!("Using configuration {:?}", config_path);
        Ok(Self {
            config,
            config_path,
            no_color,
        })
    }

    /// Bank path from the command line, or from configuration
    pub fn bank_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.bank.path.clone())
    }

    /// Bookmark store at the configured path or the default data directory
    pub fn bookmark_store(&self) -> FileBookmarkStore {
        match &self.config.bookmarks.path {
            Some(path) => FileBookmarkStore::new(path),
            None => FileBookmarkStore::default_location(),
        }
    }
}

/// Resolve the configuration file path
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let path = config_path(cli.config);
    let no_color = cli.no_color;
    let load = || AppContext::load(path.clone(), no_color);

    // Config commands work on the raw file and must run even when it does not parse
    match cli.command {
        Commands::Start(args) => start::execute(args, &load()?),
        Commands::Bank(args) => bank::execute(args, &load()?),
        Commands::Bookmark(cmd) => bookmark::execute(cmd, &load()?),
        Commands::Config(cmd) => config::execute(cmd, &path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_parse_start_args() {
        let cli = Cli::try_parse_from([
            "mockexam", "-vv", "start", "--mode", "exam", "--count", "5", "--minutes", "30",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Start(args) => {
                assert_eq!(args.count, Some(5));
                assert_eq!(args.minutes, Some(30));
                assert_eq!(args.mode, Some(mx_core::session::Mode::Exam));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["mockexam", "start", "--mode", "blitz"]).is_err());
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(config_path(None), PathBuf::from(".mockexam/config.toml"));
        assert_eq!(
            config_path(Some(PathBuf::from("custom.toml"))),
            PathBuf::from("custom.toml")
        );
    }

    #[test]
    fn test_bank_path_override() {
        let ctx = AppContext {
            config: Config::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            no_color: false,
        };
        assert_eq!(ctx.bank_path(None), PathBuf::from("data/questions.json"));
        assert_eq!(
            ctx.bank_path(Some(Path::new("other.json"))),
            PathBuf::from("other.json")
        );
    }
}
