//! Start command
//!
//! Run a practice quiz or a timed exam, in the TUI or as plain prompts.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use console::Term;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mx_core::bookmark::{BookmarkSet, BookmarkStorage};
use mx_core::question::{DomainFilter, Question, QuestionBank};
use mx_core::scoring::{QuestionResult, Scorecard};
use mx_core::session::{
    Direction, Feedback, Mode, NavOutcome, QuizSession, QuizSetup, RetryOutcome, SessionState,
    TickOutcome,
};
use mx_core::timer::format_remaining;
use mx_ui::app::PERFECT_SCORE_NOTICE;
use mx_ui::{App, AppOptions};
use std::path::PathBuf;

use super::AppContext;

/// Arguments for the start command
#[derive(Debug, Args)]
pub struct StartArgs {
    /// Quiz mode (practice or exam)
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Restrict questions to one domain ("all" for every domain)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Number of questions
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Exam duration in minutes
    #[arg(long)]
    pub minutes: Option<u32>,

    /// Question bank file (defaults to [bank] path in the configuration)
    #[arg(long, env = "MOCKEXAM_BANK")]
    pub bank: Option<PathBuf>,

    /// Use line-by-line prompts instead of the full-screen interface
    #[arg(long)]
    pub plain: bool,
}

/// Execute the start command
pub fn execute(args: StartArgs, ctx: &AppContext) -> Result<()> {
    let setup = build_setup(&ctx.config.quiz, &args);
    setup.validate()?;

    let bank_path = ctx.bank_path(args.bank.as_deref());
    let bank = mx_storage::load_bank(&bank_path)
        .with_context(|| format!("Question bank {} is not usable", bank_path.display()))?;
    check_domain(&bank, &setup.domain)?;

    let mut session = QuizSession::new(bank);
    session.configure(setup)?;
    let store = ctx.bookmark_store();

    if args.plain {
        run_plain(session, &store)
    } else {
        run_tui(session, store, ctx)
    }
}

/// Configured quiz defaults with command-line overrides applied
fn build_setup(defaults: &QuizSetup, args: &StartArgs) -> QuizSetup {
    let mut setup = defaults.clone();
    if let Some(mode) = args.mode {
        setup.mode = mode;
    }
    if let Some(domain) = &args.domain {
        setup.domain = DomainFilter::parse(domain);
    }
    if let Some(count) = args.count {
        setup.count = count;
    }
    if let Some(minutes) = args.minutes {
        setup.exam_minutes = minutes;
    }
    setup
}

fn check_domain(bank: &QuestionBank, domain: &DomainFilter) -> Result<()> {
    if let DomainFilter::Only(name) = domain {
        let domains = bank.domains();
        if !domains.contains(&name.as_str()) {
            bail!(
                "Unknown domain '{}'. Available: {}",
                name,
                domains.join(", ")
            );
        }
    }
    Ok(())
}

fn run_tui(
    session: QuizSession,
    store: impl BookmarkStorage + 'static,
    ctx: &AppContext,
) -> Result<()> {
    let mut options = AppOptions::from_config(&ctx.config);
    if ctx.no_color {
        options = options.monochrome();
    }

    // The app restores the terminal when dropped, before the summary prints
    let scorecard = {
        let mut app = App::new(session, Box::new(store), options)?;
        app.run()?;
        app.session().scorecard().cloned()
    };

    if let Some(card) = scorecard {
        println!("{}", summary_line(&card));
    }
    Ok(())
}

// ---- plain runner ----

/// Menu entry in the plain runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Answer(usize),
    Previous,
    Next,
    Bookmark,
    Finish,
}

fn menu_items(
    question: &Question,
    selected: Option<usize>,
    bookmarked: bool,
) -> Vec<(String, MenuItem)> {
    let mut items: Vec<(String, MenuItem)> = question
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let marker = if selected == Some(i) { "●" } else { "○" };
            (format!("{} {}. {}", marker, i + 1, choice), MenuItem::Answer(i))
        })
        .collect();

    items.push(("← Previous question".to_string(), MenuItem::Previous));
    items.push(("→ Next question".to_string(), MenuItem::Next));
    let bookmark = if bookmarked {
        "★ Remove bookmark"
    } else {
        "☆ Bookmark this question"
    };
    items.push((bookmark.to_string(), MenuItem::Bookmark));
    items.push(("Finish and grade".to_string(), MenuItem::Finish));
    items
}

fn run_plain(mut session: QuizSession, store: &dyn BookmarkStorage) -> Result<()> {
    let term = Term::stdout();
    let mut bookmarks = store.load()?;

    let count = session.start_configured()?;
    tracing::debug!("Plain runner started with {} questions", count);

    loop {
        answer_questions(&mut session, store, &mut bookmarks, &term)?;

        let Some(card) = session.scorecard().cloned() else {
            break;
        };
        print_results(&session, &card);

        if card.is_perfect() {
            println!("{}", PERFECT_SCORE_NOTICE.green());
            break;
        }

        let again = Confirm::new()
            .with_prompt(format!(
                "Review the {} incorrect question(s)?",
                card.incorrect_count()
            ))
            .default(true)
            .interact_on(&term)?;
        if !again {
            break;
        }

        match session.retry_last_incorrect()? {
            RetryOutcome::Started(n) => println!("Reviewing {} incorrect question(s)", n),
            RetryOutcome::NothingToRetry => {
                println!("{}", PERFECT_SCORE_NOTICE.green());
                break;
            }
        }
    }

    Ok(())
}

/// Prompt question by question until the session is graded
fn answer_questions(
    session: &mut QuizSession,
    store: &dyn BookmarkStorage,
    bookmarks: &mut BookmarkSet,
    term: &Term,
) -> Result<()> {
    while session.state() == SessionState::InProgress {
        if expired(session)? {
            break;
        }
        let Some(question) = session.current_question().cloned() else {
            break;
        };

        term.clear_screen()?;
        show_progress(session);
        println!();
        println!(
            "{} {}",
            format!("[{}]", question.domain).dimmed(),
            question.difficulty.dimmed()
        );
        println!("{}", question.question.bold());
        println!();

        let selected = session.answer_for(&question.id);
        let items = menu_items(&question, selected, bookmarks.contains(&question.id));
        let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();
        let choice = Select::new()
            .items(&labels)
            .default(selected.unwrap_or(0))
            .interact_on(term)?;

        // Input given after the deadline does not count
        if expired(session)? {
            break;
        }

        match items[choice].1 {
            MenuItem::Answer(i) => {
                session.select_current(i)?;
                if let Some(feedback) = session.visible_feedback(&question.id) {
                    println!();
                    for line in feedback_lines(&feedback) {
                        println!("{}", line);
                    }
                    println!();
                    println!("{}", "Press any key to continue".dimmed());
                    term.read_key()?;
                }
                if session.position() + 1 < session.questions().len() {
                    session.navigate(Direction::Next)?;
                }
            }
            MenuItem::Previous => {
                session.navigate(Direction::Previous)?;
            }
            MenuItem::Next => {
                if let NavOutcome::Graded(_) = session.navigate(Direction::Next)? {
                    break;
                }
            }
            MenuItem::Bookmark => {
                let now_set = store
                    .toggle(&question.id)
                    .context("Failed to save bookmarks")?;
                if now_set {
                    bookmarks.add(question.id.clone());
                } else {
                    bookmarks.remove(&question.id);
                }
            }
            MenuItem::Finish => {
                let progress = session.progress();
                let unanswered = progress.total - progress.answered;
                if unanswered > 0 {
                    let confirmed = Confirm::new()
                        .with_prompt(format!(
                            "{} question(s) unanswered. Grade anyway?",
                            unanswered
                        ))
                        .default(false)
                        .interact_on(term)?;
                    if !confirmed {
                        continue;
                    }
                }
                session.grade()?;
            }
        }
    }
    Ok(())
}

fn expired(session: &mut QuizSession) -> Result<bool> {
    if let TickOutcome::Expired(_) = session.tick()? {
        println!();
        println!("{}", "Time is up. The exam was graded automatically.".yellow());
        return Ok(true);
    }
    Ok(false)
}

fn show_progress(session: &QuizSession) {
    let progress = session.progress();
    let style =
        ProgressStyle::with_template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} answered {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

    let bar = ProgressBar::with_draw_target(
        Some(progress.total as u64),
        ProgressDrawTarget::stdout(),
    )
    .with_style(style);
    let mut prefix = format!(
        "{} | Question {} of {}",
        session.mode().label(),
        session.position() + 1,
        progress.total
    );
    if session.review_round() > 0 {
        prefix.push_str(&format!(" | Review round {}", session.review_round()));
    }
    bar.set_prefix(prefix);
    bar.set_position(progress.answered as u64);
    if let Some(remaining) = session.remaining() {
        bar.set_message(format!("| {} left", format_remaining(remaining)));
    }
    bar.abandon();
}

fn feedback_lines(feedback: &Feedback) -> Vec<String> {
    let verdict = match feedback.is_correct {
        Some(true) => format!("{} Correct", "✓".green()),
        Some(false) => format!("{} Incorrect", "✗".red()),
        None => format!("{} Not answered", "–".yellow()),
    };
    vec![
        verdict,
        format!("  Your answer: {}", feedback.selected_label()),
        format!("  Correct answer: {}", feedback.correct),
        format!("  {}", feedback.explanation.dimmed()),
    ]
}

fn summary_line(card: &Scorecard) -> String {
    let summary = card.summary();
    if card.percent >= 70 {
        summary.green().bold().to_string()
    } else {
        summary.yellow().bold().to_string()
    }
}

fn result_line(index: usize, question: &Question, result: &QuestionResult) -> String {
    let mark = if result.is_correct {
        "✓".green()
    } else if result.selected.is_none() {
        "–".yellow()
    } else {
        "✗".red()
    };
    format!("{} {:>3}. {}", mark, index + 1, question.question)
}

fn print_results(session: &QuizSession, card: &Scorecard) {
    println!();
    println!("{}", "Results".bold().underline());
    println!();

    for (i, result) in card.results.iter().enumerate() {
        let question = session
            .questions()
            .iter()
            .find(|q| q.id == result.question_id);
        let Some(question) = question else {
            continue;
        };
        println!("{}", result_line(i, question, result));
        if !result.is_correct {
            let feedback = Feedback::for_question(question, result.selected);
            println!("       Your answer: {}", feedback.selected_label());
            println!("       Correct answer: {}", feedback.correct.green());
        }
    }

    println!();
    println!("{}", summary_line(card));
    println!("  {}", summary_details(card));
    println!();
}

/// Answer breakdown, plus time used for timed attempts
fn summary_details(card: &Scorecard) -> String {
    let mut details = format!(
        "{} correct, {} incorrect, {} unanswered",
        card.correct,
        card.incorrect_count() - card.unanswered,
        card.unanswered
    );
    if let Some(secs) = card.elapsed_secs {
        let used = format_remaining(chrono::Duration::seconds(secs));
        details.push_str(&format!(", time used {}", used));
    }
    details
}
