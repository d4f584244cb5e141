//! mockexam - multiple-choice practice and timed mock exams
//!
//! A terminal quiz runner over a JSON question bank.
//!
//! ## Quick Start
//!
//! ```bash
//! # Check the question bank
//! mockexam bank validate --bank data/questions.json
//!
//! # Practice with instant feedback
//! mockexam start --mode practice --count 10
//!
//! # Timed mock exam for one domain
//! mockexam start --mode exam --domain "Practices" --minutes 45
//!
//! # Save flagged questions
//! mockexam bookmark export -o bookmarks.json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
