//! Config command
//!
//! Manage mockexam configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use mx_core::config::Config;
use std::fs;
use std::path::Path;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(config_path, force),
        ConfigCommand::Validate => validate_config(config_path),
    }
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    let exists = config_path.exists();
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if exists {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} not found, showing defaults", config_path.display()).dimmed()
        );
    }
    println!();
    println!("{}", config.to_toml_string()?);

    Ok(())
}

/// Default configuration file contents
fn default_config_text() -> Result<String> {
    Ok(format!(
        "# mockexam configuration\n\n{}",
        Config::default().to_toml_string()?
    ))
}

fn reset_config(config_path: &Path, force: bool) -> Result<()> {
    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(config_path, default_config_text()?)?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}, defaults apply",
            "⚠".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(config_path)?;

    if let Err(e) = toml::from_str::<toml::Value>(&content) {
        eprintln!("{} Invalid TOML: {}", "✗".red(), e);
        anyhow::bail!("{} is not valid TOML", config_path.display());
    }
    println!("{} Configuration is valid TOML", "✓".green());

    let config = Config::from_toml_str(&content).context("Configuration has invalid values")?;
    let warnings = config.validate().context("Configuration has invalid values")?;

    if !config.bank.path.exists() {
        println!(
            "{} Question bank {} does not exist",
            "⚠".yellow(),
            config.bank.path.display()
        );
    }

    if warnings.is_empty() {
        println!("{} All values in range", "✓".green());
    } else {
        for warning in warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_text_parses() {
        let text = default_config_text().unwrap();
        assert!(text.starts_with("# mockexam configuration"));
        assert_eq!(Config::from_toml_str(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_reset_creates_file_and_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".mockexam").join("config.toml");

        reset_config(&path, true).unwrap();
        assert!(path.exists());

        reset_config(&path, true).unwrap();
        let backups = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".backup-"))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        fs::write(&path, "[quiz]\ncount = 0\n").unwrap();
        assert!(validate_config(&path).is_err());

        fs::write(&path, "[quiz\n").unwrap();
        assert!(validate_config(&path).is_err());

        fs::write(&path, "[timer]\ntick_ms = 100\n").unwrap();
        assert!(validate_config(&path).is_ok());
    }
}
