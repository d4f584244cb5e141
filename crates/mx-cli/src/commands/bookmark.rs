//! Bookmark command
//!
//! Manage bookmarked (flagged) questions.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use mx_core::bookmark::{BookmarkSet, BookmarkStorage};
use mx_core::question::QuestionBank;
use mx_core::QuestionId;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppContext;

/// Bookmark subcommands
#[derive(Debug, Subcommand)]
pub enum BookmarkCommand {
    /// List bookmarked questions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Question bank used to show question text
        #[arg(long, env = "MOCKEXAM_BANK")]
        bank: Option<PathBuf>,
    },

    /// Bookmark a question
    Add {
        /// Question ID
        id: String,
    },

    /// Remove a bookmark
    Remove {
        /// Question ID
        id: String,
    },

    /// Flip the bookmark on a question
    Toggle {
        /// Question ID
        id: String,
    },

    /// Export bookmarks as a JSON array
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace bookmarks with a JSON array of question IDs
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Remove all bookmarks
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute the bookmark command
pub fn execute(cmd: BookmarkCommand, ctx: &AppContext) -> Result<()> {
    let store = ctx.bookmark_store();
    tracing::debug!("Bookmark file: {:?}", store.path());

    match cmd {
        BookmarkCommand::List { json, bank } => {
            let bank_path = ctx.bank_path(bank.as_deref());
            list(&store, &bank_path, json)
        }
        BookmarkCommand::Add { id } => add(&store, &id),
        BookmarkCommand::Remove { id } => remove(&store, &id),
        BookmarkCommand::Toggle { id } => toggle(&store, &id),
        BookmarkCommand::Export { output } => export(&store, output),
        BookmarkCommand::Import { file } => import(&store, &file),
        BookmarkCommand::Clear { yes } => clear(&store, yes),
    }
}

fn list(store: &dyn BookmarkStorage, bank_path: &Path, as_json: bool) -> Result<()> {
    let set = store.load()?;

    if as_json {
        println!("{}", set.export_json()?);
        return Ok(());
    }

    if set.is_empty() {
        println!("No bookmarks.");
        return Ok(());
    }

    // The bank is optional here; bookmarks are listed even without one
    let bank: Option<QuestionBank> = mx_storage::load_bank(bank_path).ok();

    println!("{}", "Bookmarks:".bold().underline());
    println!();
    for id in set.iter() {
        match bank.as_ref().map(|b| b.get(id)) {
            Some(Some(question)) => println!(
                "  {} {} {}",
                id.to_string().green(),
                question.question,
                format!("[{}]", question.domain).dimmed()
            ),
            Some(None) => println!(
                "  {} {}",
                id.to_string().yellow(),
                "(not in question bank)".dimmed()
            ),
            None => println!("  {}", id.to_string().green()),
        }
    }
    println!();
    println!("  {} bookmarked", set.len());
    Ok(())
}

fn update(
    store: &dyn BookmarkStorage,
    change: impl FnOnce(&mut BookmarkSet) -> bool,
) -> Result<bool> {
    let mut set = store.load()?;
    let changed = change(&mut set);
    if changed {
        store.save(&set).context("Failed to save bookmarks")?;
    }
    Ok(changed)
}

fn add(store: &dyn BookmarkStorage, id: &str) -> Result<()> {
    let id = QuestionId::new(id);
    if update(store, |set| set.add(id.clone()))? {
        println!("{} Bookmarked {}", "✓".green(), id);
    } else {
        println!("{} {} is already bookmarked", "⚠".yellow(), id);
    }
    Ok(())
}

fn remove(store: &dyn BookmarkStorage, id: &str) -> Result<()> {
    let id = QuestionId::new(id);
    if update(store, |set| set.remove(&id))? {
        println!("{} Removed bookmark {}", "✓".green(), id);
    } else {
        println!("{} {} is not bookmarked", "⚠".yellow(), id);
    }
    Ok(())
}

fn toggle(store: &dyn BookmarkStorage, id: &str) -> Result<()> {
    let id = QuestionId::new(id);
    let now_set = store.toggle(&id).context("Failed to save bookmarks")?;
    if now_set {
        println!("{} Bookmarked {}", "✓".green(), id);
    } else {
        println!("{} Removed bookmark {}", "✓".green(), id);
    }
    Ok(())
}

fn export(store: &dyn BookmarkStorage, output: Option<PathBuf>) -> Result<()> {
    let set = store.load()?;
    let json = set.export_json()?;

    match output {
        Some(path) => {
            fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Exported {} bookmarks to {}",
                "✓".green(),
                set.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn import(store: &dyn BookmarkStorage, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let set = store
        .import(&text)
        .with_context(|| format!("Bookmarks unchanged, {} was not imported", file.display()))?;
    println!("{} Imported {} bookmarks", "✓".green(), set.len());
    Ok(())
}

fn clear(store: &dyn BookmarkStorage, yes: bool) -> Result<()> {
    let set = store.load()?;
    if set.is_empty() {
        println!("No bookmarks.");
        return Ok(());
    }

    if !yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} bookmarks?", set.len()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Clear cancelled.");
            return Ok(());
        }
    }

    store.save(&BookmarkSet::new())?;
    println!("{} Removed {} bookmarks", "✓".green(), set.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_storage::FileBookmarkStore;
    use tempfile::TempDir;

    fn store() -> (FileBookmarkStore, TempDir) {
        let temp = TempDir::new().unwrap();
        (FileBookmarkStore::in_dir(temp.path()), temp)
    }

    #[test]
    fn test_update_saves_only_on_change() {
        let (store, _temp) = store();
        assert!(update(&store, |set| set.add("q1".into())).unwrap());
        assert!(store.path().exists());

        assert!(!update(&store, |set| set.add("q1".into())).unwrap());
        assert!(!update(&store, |set| set.remove(&"q9".into())).unwrap());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_import_keeps_prior_set_on_bad_document() {
        let (store, temp) = store();
        add(&store, "q1").unwrap();

        let bad = temp.path().join("bad.json");
        fs::write(&bad, r#"{"ids": ["q2"]}"#).unwrap();
        assert!(import(&store, &bad).is_err());

        let ids: Vec<String> = store.load().unwrap().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["q1"]);
    }

    #[test]
    fn test_export_to_file() {
        let (store, temp) = store();
        toggle(&store, "q2").unwrap();

        let out = temp.path().join("out.json");
        export(&store, Some(out.clone())).unwrap();
        let set = BookmarkSet::parse_import(&fs::read_to_string(out).unwrap()).unwrap();
        assert!(set.contains(&"q2".into()));
    }
}
