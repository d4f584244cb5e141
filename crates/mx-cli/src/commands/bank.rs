//! Bank command
//!
//! Inspect and validate the question bank.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use mx_core::question::{Question, QuestionBank};
use mx_core::QuestionId;
use serde::Serialize;
use std::path::PathBuf;

use super::AppContext;

/// Arguments for the bank command
#[derive(Debug, Args)]
pub struct BankArgs {
    /// Question bank file (defaults to [bank] path in the configuration)
    #[arg(long, global = true, env = "MOCKEXAM_BANK")]
    pub bank: Option<PathBuf>,

    #[command(subcommand)]
    pub command: BankCommand,
}

/// Bank subcommands
#[derive(Debug, Subcommand)]
pub enum BankCommand {
    /// List domains with question counts
    Domains {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show bank statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the bank file
    Validate,

    /// Show a single question
    Show {
        /// Question ID
        id: String,

        /// Reveal the correct answer and explanation
        #[arg(long)]
        answer: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Summary of a loaded bank
#[derive(Debug, Serialize)]
struct BankStats {
    path: String,
    questions: usize,
    fingerprint: String,
    domains: Vec<CountEntry>,
    difficulties: Vec<CountEntry>,
}

#[derive(Debug, Serialize)]
struct CountEntry {
    name: String,
    count: usize,
}

impl BankStats {
    fn new(path: &str, bank: &QuestionBank) -> Self {
        let entries = |counts: Vec<(String, usize)>| -> Vec<CountEntry> {
            counts
                .into_iter()
                .map(|(name, count)| CountEntry { name, count })
                .collect()
        };
        Self {
            path: path.to_string(),
            questions: bank.len(),
            fingerprint: bank.fingerprint().to_string(),
            domains: entries(bank.domain_counts()),
            difficulties: entries(bank.difficulty_counts()),
        }
    }
}

/// Execute the bank command
pub fn execute(args: BankArgs, ctx: &AppContext) -> Result<()> {
    let path = ctx.bank_path(args.bank.as_deref());
    let bank = mx_storage::load_bank(&path)
        .with_context(|| format!("Question bank {} is not usable", path.display()))?;
    let path = path.display().to_string();

    match args.command {
        BankCommand::Domains { json } => list_domains(&bank, json),
        BankCommand::Stats { json } => show_stats(&path, &bank, json),
        BankCommand::Validate => validate(&path, &bank),
        BankCommand::Show { id, answer, json } => show_question(&bank, &id, answer, json),
    }
}

fn list_domains(bank: &QuestionBank, as_json: bool) -> Result<()> {
    let counts = bank.domain_counts();

    if as_json {
        let entries: Vec<CountEntry> = counts
            .into_iter()
            .map(|(name, count)| CountEntry { name, count })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Domains:".bold().underline());
    println!();
    for (name, count) in counts {
        println!("  {} {}", name.cyan(), format!("({} questions)", count).dimmed());
    }
    Ok(())
}

fn show_stats(path: &str, bank: &QuestionBank, as_json: bool) -> Result<()> {
    let stats = BankStats::new(path, bank);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Question Bank".bold().underline());
    println!();
    println!("  Path: {}", stats.path.dimmed());
    println!("  Questions: {}", stats.questions.to_string().green());
    println!("  Fingerprint: {}", bank.fingerprint().short().yellow());
    println!();
    println!("{}", "  Domains".bold());
    for entry in &stats.domains {
        println!("    {:<40} {:>4}", entry.name, entry.count);
    }
    println!();
    println!("{}", "  Difficulty".bold());
    for entry in &stats.difficulties {
        println!("    {:<40} {:>4}", entry.name, entry.count);
    }
    Ok(())
}

fn validate(path: &str, bank: &QuestionBank) -> Result<()> {
    println!(
        "{} {} is valid: {} questions in {} domains",
        "✓".green(),
        path,
        bank.len(),
        bank.domains().len()
    );
    Ok(())
}

fn question_text(question: &Question, reveal: bool) -> String {
    let mut out = format!(
        "[{}] [{}] {}\n\n{}\n\n",
        question.id, question.domain, question.difficulty, question.question
    );
    for (i, choice) in question.choices.iter().enumerate() {
        let marker = if reveal && question.is_correct(i) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!("  {} {}. {}\n", marker, i + 1, choice));
    }
    if reveal {
        out.push_str(&format!(
            "\nAnswer: {}\n{}\n",
            question.correct_choice(),
            question.explanation
        ));
    }
    out
}

fn show_question(bank: &QuestionBank, id: &str, reveal: bool, as_json: bool) -> Result<()> {
    let question = bank
        .get(&QuestionId::new(id))
        .with_context(|| format!("Question '{}' not found", id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(question)?);
        return Ok(());
    }

    print!("{}", question_text(question, reveal));
    Ok(())
}
