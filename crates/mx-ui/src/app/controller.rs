//! Screen logic: turns actions into session commands
//!
//! The controller never renders. It holds the session, the bookmark store
//! and the presentation state, and reacts to session events to update
//! notices and cursors.

use super::state::{AppMode, AppState, Notice, Screen, SetupField};
use crate::input::{map_key, Action};
use crossterm::event::KeyEvent;
use mx_core::bookmark::{BookmarkSet, BookmarkStorage};
use mx_core::error::{QuizError, Result};
use mx_core::question::DomainFilter;
use mx_core::session::{
    Direction, Mode, NavOutcome, QuizSession, SessionEvent, TickOutcome, MIN_EXAM_MINUTES,
};
use mx_core::QuestionId;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Minutes added or removed per key press on the setup screen
const MINUTES_STEP: i64 = 5;

/// Notice shown when a retry finds nothing to review
pub const PERFECT_SCORE_NOTICE: &str = "No incorrect answers. Perfect score!";

pub struct Controller {
    /// Presentation state
    pub state: AppState,
    session: QuizSession,
    store: Box<dyn BookmarkStorage>,
    /// Cached copy of the persisted bookmarks
    bookmarks: BookmarkSet,
    /// `All` followed by every bank domain in first-appearance order
    domains: Vec<DomainFilter>,
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl Controller {
    pub fn new(mut session: QuizSession, store: Box<dyn BookmarkStorage>) -> Self {
        let bookmarks = store.load().unwrap_or_else(|e| {
            warn!("Failed to load bookmarks, starting empty: {}", e);
            BookmarkSet::new()
        });

        let domains = std::iter::once(DomainFilter::All)
            .chain(
                session
                    .bank()
                    .domains()
                    .into_iter()
                    .map(|d| DomainFilter::Only(d.to_string())),
            )
            .collect();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));

        Self {
            state: AppState::new(),
            session,
            store,
            bookmarks,
            domains,
            events,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn screen(&self) -> Screen {
        Screen::for_state(self.session.state())
    }

    /// Number of questions the pending domain can supply
    pub fn pool_size(&self) -> usize {
        self.session.bank().pool_size(&self.session.setup().domain)
    }

    /// Apply a key press; any key closes the help overlay
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state.mode == AppMode::Help {
            self.state.mode = AppMode::Normal;
            return;
        }
        if let Some(action) = map_key(key) {
            self.handle(action);
        }
    }

    /// Apply one user action
    pub fn handle(&mut self, action: Action) {
        if self.state.mode == AppMode::Help {
            self.state.mode = AppMode::Normal;
            return;
        }

        let result = match action {
            Action::Quit => {
                self.state.should_quit = true;
                Ok(())
            }
            Action::Help => {
                self.state.mode = AppMode::Help;
                Ok(())
            }
            _ => match self.screen() {
                Screen::Setup => self.handle_setup(action),
                Screen::Quiz => self.handle_quiz(action),
                Screen::Results => self.handle_results(action),
            },
        };
        if let Err(e) = result {
            self.report(e);
        }
        self.drain_events();
    }

    /// Drive the exam countdown
    pub fn on_tick(&mut self) {
        match self.session.tick() {
            Ok(TickOutcome::Expired(card)) => debug!("Countdown expired: {}", card.summary()),
            Ok(_) => {}
            Err(e) => self.report(e),
        }
        self.drain_events();
    }

    fn report(&mut self, err: QuizError) {
        if err.is_contract_violation() {
            warn!("Rejected command: {}", err);
        }
        self.state.set_message(Notice::error(err.to_string()));
    }

    fn handle_setup(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Up => self.state.setup_field = self.state.setup_field.prev(),
            Action::Down => self.state.setup_field = self.state.setup_field.next(),
            Action::Left => self.adjust_setup(-1)?,
            Action::Right => self.adjust_setup(1)?,
            Action::Confirm | Action::Submit => self.start()?,
            _ => {}
        }
        Ok(())
    }

    fn adjust_setup(&mut self, step: i64) -> Result<()> {
        let mut setup = self.session.setup().clone();
        match self.state.setup_field {
            SetupField::Mode => {
                let mode = match setup.mode {
                    Mode::Practice => Mode::Exam,
                    Mode::Exam => Mode::Practice,
                };
                self.session.set_mode(mode);
                return Ok(());
            }
            SetupField::Domain => {
                let len = self.domains.len() as i64;
                let current = self
                    .domains
                    .iter()
                    .position(|d| d == &setup.domain)
                    .unwrap_or(0) as i64;
                let next = (current + step).rem_euclid(len) as usize;
                setup.domain = self.domains[next].clone();
            }
            SetupField::Count => {
                let max = self.session.bank().len().max(1) as i64;
                setup.count = (setup.count as i64 + step).clamp(1, max) as usize;
            }
            SetupField::Minutes => {
                let minutes = i64::from(setup.effective_exam_minutes()) + step * MINUTES_STEP;
                setup.exam_minutes = minutes.max(i64::from(MIN_EXAM_MINUTES)) as u32;
            }
        }
        self.session.configure(setup)
    }

    fn start(&mut self) -> Result<()> {
        match self.session.start_configured() {
            Ok(_) => Ok(()),
            Err(QuizError::EmptyQuestionSet(msg)) => {
                self.state.set_message(Notice::warning(format!("Cannot start: {}", msg)));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn current_choice_count(&self) -> usize {
        self.session
            .current_question()
            .map(|q| q.choices.len())
            .unwrap_or(0)
    }

    fn handle_quiz(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Up => self.state.choice_cursor = self.state.choice_cursor.saturating_sub(1),
            Action::Down => {
                let last = self.current_choice_count().saturating_sub(1);
                self.state.choice_cursor = (self.state.choice_cursor + 1).min(last);
            }
            Action::Confirm => self.session.select_current(self.state.choice_cursor)?,
            Action::Choose(index) => {
                if index < self.current_choice_count() {
                    self.state.choice_cursor = index;
                    self.session.select_current(index)?;
                }
            }
            Action::Left => {
                self.session.navigate(Direction::Previous)?;
            }
            Action::Right => {
                if let NavOutcome::AtBoundary(_) = self.session.navigate(Direction::Next)? {
                    self.state
                        .set_message(Notice::info("Last question. Press s to finish."));
                }
            }
            Action::Submit => {
                self.session.grade()?;
            }
            Action::Explain => self.toggle_quiz_explanation(),
            Action::Bookmark => {
                if let Some(id) = self.session.current_question().map(|q| q.id.clone()) {
                    self.toggle_bookmark(&id)?;
                }
            }
            Action::Reset => self.session.reset(),
            Action::Retry | Action::Help | Action::Quit => {}
        }
        Ok(())
    }

    fn toggle_quiz_explanation(&mut self) {
        let visible = self
            .session
            .current_question()
            .and_then(|q| self.session.visible_feedback(&q.id))
            .is_some();
        if visible {
            self.state.show_explanation = !self.state.show_explanation;
        } else if self.session.view().instant_feedback {
            self.state
                .set_message(Notice::info("Answer the question to see its explanation"));
        } else {
            self.state
                .set_message(Notice::info("Explanations are shown after submitting"));
        }
    }

    fn handle_results(&mut self, action: Action) -> Result<()> {
        let rows = self.session.questions().len();
        match action {
            Action::Up => self.state.review_cursor = self.state.review_cursor.saturating_sub(1),
            Action::Down => {
                self.state.review_cursor =
                    (self.state.review_cursor + 1).min(rows.saturating_sub(1));
            }
            Action::Explain => self.state.show_explanation = !self.state.show_explanation,
            Action::Bookmark => {
                let id = self
                    .session
                    .questions()
                    .get(self.state.review_cursor)
                    .map(|q| q.id.clone());
                if let Some(id) = id {
                    self.toggle_bookmark(&id)?;
                }
            }
            Action::Retry => {
                self.session.retry_last_incorrect()?;
            }
            Action::Reset => self.session.reset(),
            _ => {}
        }
        Ok(())
    }

    fn toggle_bookmark(&mut self, id: &QuestionId) -> Result<()> {
        if self.store.toggle(id)? {
            self.bookmarks.add(id.clone());
            self.state
                .set_message(Notice::info(format!("Bookmarked question {}", id)));
        } else {
            self.bookmarks.remove(id);
            self.state
                .set_message(Notice::info(format!("Removed bookmark for question {}", id)));
        }
        Ok(())
    }

    fn reset_cursors(&mut self) {
        self.state.choice_cursor = 0;
        self.state.review_cursor = 0;
        self.state.show_explanation = false;
    }

    fn sync_choice_cursor(&mut self) {
        self.state.choice_cursor = self
            .session
            .current_question()
            .and_then(|q| self.session.answer_for(&q.id))
            .unwrap_or(0);
        self.state.show_explanation = false;
    }

    /// React to everything the session emitted since the last call
    fn drain_events(&mut self) {
        let events: Vec<SessionEvent> = self.events.borrow_mut().drain(..).collect();
        let mut expired = false;

        for event in events {
            match event {
                SessionEvent::Started { mode, count } => {
                    self.reset_cursors();
                    let requested = self.session.setup().count;
                    let text = if count < requested {
                        format!(
                            "{} started with {} questions ({} requested, pool exhausted)",
                            mode.label(),
                            count,
                            requested
                        )
                    } else {
                        format!("{} started with {} questions", mode.label(), count)
                    };
                    self.state.set_message(Notice::info(text));
                }
                SessionEvent::Navigated(_) => self.sync_choice_cursor(),
                SessionEvent::TimerExpired => expired = true,
                SessionEvent::Graded {
                    correct,
                    total,
                    percent,
                } => {
                    self.reset_cursors();
                    let score = format!("Score: {} / {} ({}%)", correct, total, percent);
                    let notice = if expired {
                        Notice::warning(format!("Time is up. {}", score))
                    } else {
                        Notice::success(score)
                    };
                    self.state.set_message(notice);
                }
                SessionEvent::NothingToRetry => {
                    self.state.set_message(Notice::success(PERFECT_SCORE_NOTICE));
                }
                SessionEvent::RetryStarted { count } => {
                    self.reset_cursors();
                    self.state.set_message(Notice::info(format!(
                        "Reviewing {} incorrect question(s)",
                        count
                    )));
                }
                SessionEvent::Reset => {
                    self.reset_cursors();
                    self.state.clear_message();
                }
                SessionEvent::Configured(_)
                | SessionEvent::AnswerSelected { .. }
                | SessionEvent::TimerTick { .. } => {}
            }
        }
    }
}
