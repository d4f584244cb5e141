//! Quiz session state machine

use super::model::{
    Direction, Feedback, Mode, NavOutcome, Progress, QuizSetup, RetryOutcome, SessionEvent,
    SessionState, TickOutcome,
};
use crate::clock::Clock;
use crate::error::{QuizError, Result};
use crate::question::{Question, QuestionBank};
use crate::scoring::{self, Answers, Scorecard};
use crate::timer::{ExamTimer, TimerTick};
use crate::types::{AttemptId, QuestionId};
use chrono::Duration;
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

type Observer = Box<dyn FnMut(&SessionEvent)>;

/// One quiz session over a loaded bank.
///
/// Owns the question subset, the answers, the navigation position and the
/// single exam timer. Presentation code drives it through commands and
/// re-renders from [`QuizSession::view`] or from subscribed events.
pub struct QuizSession {
    bank: QuestionBank,
    state: SessionState,
    /// Pending configuration, edited while idle/configuring
    setup: QuizSetup,
    /// Mode of the running (or last) attempt
    mode: Mode,
    question_set: Vec<Question>,
    answers: Answers,
    position: usize,
    timer: ExamTimer,
    scorecard: Option<Scorecard>,
    attempt: Option<AttemptId>,
    review_round: u32,
    observers: Vec<Observer>,
}

impl QuizSession {
    /// Create an idle session reading real time
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_clock(bank, Clock::system())
    }

    /// Create an idle session reading time from `clock`
    pub fn with_clock(bank: QuestionBank, clock: Clock) -> Self {
        Self {
            bank,
            state: SessionState::Idle,
            setup: QuizSetup::default(),
            mode: Mode::Practice,
            question_set: Vec::new(),
            answers: Answers::new(),
            position: 0,
            timer: ExamTimer::new(clock),
            scorecard: None,
            attempt: None,
            review_round: 0,
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked for every state change
    pub fn subscribe(&mut self, observer: impl FnMut(&SessionEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: SessionEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
    }

    fn require(&self, allowed: &[SessionState], operation: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation: operation.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    /// Grade an exam whose deadline passed since the last tick
    fn enforce_deadline(&mut self) -> Result<()> {
        if self.state == SessionState::InProgress
            && self.timer.is_running()
            && self.timer.remaining() <= Duration::zero()
        {
            self.tick()?;
        }
        Ok(())
    }

    // ---- configuration ----

    /// Replace the pending setup
    pub fn configure(&mut self, setup: QuizSetup) -> Result<()> {
        self.require(
            &[
                SessionState::Idle,
                SessionState::Configuring,
                SessionState::Graded,
            ],
            "configure",
        )?;
        if self.state == SessionState::Graded {
            self.timer.stop();
        }
        self.setup = setup.clone();
        self.state = SessionState::Configuring;
        self.emit(SessionEvent::Configured(setup));
        Ok(())
    }

    /// Change only the pending mode
    ///
    /// Allowed in any state; a running attempt keeps its own grading rules.
    pub fn set_mode(&mut self, mode: Mode) {
        self.setup.mode = mode;
        if self.state == SessionState::Idle {
            self.state = SessionState::Configuring;
        }
        let setup = self.setup.clone();
        self.emit(SessionEvent::Configured(setup));
    }

    // ---- lifecycle ----

    /// Start a new attempt with the pending setup
    pub fn start_configured(&mut self) -> Result<usize> {
        self.start(self.setup.clone())
    }

    /// Start a new attempt, superseding any current one
    ///
    /// Samples `min(count, pool)` questions uniformly from the domain-filtered
    /// bank. Returns the number of questions in the new set.
    pub fn start(&mut self, setup: QuizSetup) -> Result<usize> {
        setup.validate()?;

        let pool = self.bank.filter(&setup.domain);
        if pool.is_empty() {
            return Err(QuizError::EmptyQuestionSet(format!(
                "no questions in domain '{}'",
                setup.domain
            )));
        }

        let mut sampled: Vec<Question> = pool.into_iter().cloned().collect();
        let pool_size = sampled.len();
        sampled.as_mut_slice().shuffle(&mut rng());
        sampled.truncate(setup.count.min(pool_size));

        self.timer.stop();
        self.question_set = sampled;
        self.answers.clear();
        self.position = 0;
        self.scorecard = None;
        self.review_round = 0;
        self.mode = setup.mode;
        self.attempt = Some(AttemptId::generate());

        if setup.mode == Mode::Exam {
            let minutes = setup.effective_exam_minutes();
            self.timer.start(Duration::minutes(i64::from(minutes)));
        }

        self.state = SessionState::InProgress;
        self.setup = setup;
        let count = self.question_set.len();
        info!(
            "Started {} attempt {}: {} of {} questions, domain {}, bank {}",
            self.mode,
            self.attempt.as_ref().map(|a| a.as_str()).unwrap_or_default(),
            count,
            pool_size,
            self.setup.domain,
            self.bank.fingerprint().short()
        );
        self.emit(SessionEvent::Started {
            mode: self.mode,
            count,
        });
        Ok(count)
    }

    /// Record or overwrite the selection for a question
    pub fn select_answer(&mut self, question_id: &QuestionId, choice: usize) -> Result<()> {
        self.enforce_deadline()?;
        self.require(&[SessionState::InProgress], "select an answer")?;

        let question = self
            .question_set
            .iter()
            .find(|q| &q.id == question_id)
            .ok_or_else(|| QuizError::QuestionNotFound(question_id.to_string()))?;

        if choice >= question.choices.len() {
            return Err(QuizError::ChoiceOutOfRange {
                question: question_id.to_string(),
                index: choice,
                choices: question.choices.len(),
            });
        }

        let correct = self
            .mode
            .instant_feedback()
            .then(|| question.is_correct(choice));
        self.answers.insert(question_id.clone(), choice);
        debug!("Answer {} -> {}", question_id, choice);

        self.emit(SessionEvent::AnswerSelected {
            question_id: question_id.clone(),
            choice,
            correct,
        });
        Ok(())
    }

    /// Select a choice for the question at the current position
    pub fn select_current(&mut self, choice: usize) -> Result<()> {
        let id = self
            .current_question()
            .map(|q| q.id.clone())
            .ok_or_else(|| QuizError::EmptyQuestionSet("no current question".to_string()))?;
        self.select_answer(&id, choice)
    }

    /// Move one question forward or back
    ///
    /// Moving past the last question in a timed exam grades the session.
    pub fn navigate(&mut self, direction: Direction) -> Result<NavOutcome> {
        self.enforce_deadline()?;
        self.require(&[SessionState::InProgress], "navigate")?;

        let last = self.question_set.len().saturating_sub(1);
        match direction {
            Direction::Previous if self.position > 0 => {
                self.position -= 1;
            }
            Direction::Next if self.position < last => {
                self.position += 1;
            }
            Direction::Next if self.forced_grading() => {
                let card = self.grade()?;
                return Ok(NavOutcome::Graded(card));
            }
            _ => return Ok(NavOutcome::AtBoundary(self.position)),
        }

        self.emit(SessionEvent::Navigated(self.position));
        Ok(NavOutcome::Moved(self.position))
    }

    /// Jump to a question index, clamped to the set
    pub fn go_to(&mut self, index: usize) -> Result<usize> {
        self.enforce_deadline()?;
        self.require(&[SessionState::InProgress], "navigate")?;
        let clamped = index.min(self.question_set.len().saturating_sub(1));
        if clamped != self.position {
            self.position = clamped;
            self.emit(SessionEvent::Navigated(clamped));
        }
        Ok(clamped)
    }

    /// Grade the attempt
    ///
    /// Stops the timer unconditionally. Grading an already graded session
    /// returns the same scorecard.
    pub fn grade(&mut self) -> Result<Scorecard> {
        if self.state == SessionState::Graded {
            if let Some(card) = &self.scorecard {
                return Ok(card.clone());
            }
        }
        self.require(&[SessionState::InProgress], "grade")?;

        self.timer.stop();
        let mut card = scoring::score(&self.question_set, &self.answers)?;
        if self.is_timed() {
            card.elapsed_secs = self.timer.elapsed().map(|d| d.num_seconds());
        }

        info!(
            "Graded attempt {}: {}",
            self.attempt.as_ref().map(|a| a.as_str()).unwrap_or_default(),
            card.summary()
        );
        self.state = SessionState::Graded;
        self.scorecard = Some(card.clone());
        self.emit(SessionEvent::Graded {
            correct: card.correct,
            total: card.total,
            percent: card.percent,
        });
        Ok(card)
    }

    /// Begin an untimed review round over the given questions
    ///
    /// An empty list is the normal "perfect score" outcome: nothing changes
    /// and [`RetryOutcome::NothingToRetry`] is returned.
    pub fn retry_incorrect(&mut self, incorrect: Vec<Question>) -> Result<RetryOutcome> {
        self.require(&[SessionState::Graded], "retry incorrect questions")?;

        if incorrect.is_empty() {
            self.emit(SessionEvent::NothingToRetry);
            return Ok(RetryOutcome::NothingToRetry);
        }

        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(incorrect.len());
        for question in incorrect {
            if !self.bank.contains(&question.id) {
                return Err(QuizError::QuestionNotFound(question.id.to_string()));
            }
            if seen.insert(question.id.clone()) {
                questions.push(question);
            }
        }
        questions.as_mut_slice().shuffle(&mut rng());

        self.timer.stop();
        self.question_set = questions;
        self.answers.clear();
        self.position = 0;
        self.scorecard = None;
        self.mode = Mode::Practice;
        self.review_round += 1;
        self.state = SessionState::InProgress;

        let count = self.question_set.len();
        info!("Review round {}: {} questions", self.review_round, count);
        self.emit(SessionEvent::RetryStarted { count });
        Ok(RetryOutcome::Started(count))
    }

    /// Retry the incorrect partition of the last grading
    pub fn retry_last_incorrect(&mut self) -> Result<RetryOutcome> {
        self.require(&[SessionState::Graded], "retry incorrect questions")?;
        let incorrect = self
            .scorecard
            .as_ref()
            .map(|c| c.incorrect.clone())
            .unwrap_or_default();
        self.retry_incorrect(incorrect)
    }

    /// Discard the session and return to idle
    pub fn reset(&mut self) {
        self.timer.stop();
        self.question_set.clear();
        self.answers.clear();
        self.position = 0;
        self.scorecard = None;
        self.attempt = None;
        self.review_round = 0;
        self.state = SessionState::Idle;
        debug!("Session reset");
        self.emit(SessionEvent::Reset);
    }

    /// Drive the exam countdown; grades automatically at expiry
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.state != SessionState::InProgress {
            return Ok(TickOutcome::Idle);
        }
        match self.timer.tick() {
            TimerTick::Inactive => Ok(TickOutcome::Idle),
            TimerTick::Running { remaining } => {
                let remaining_secs = remaining.num_seconds();
                self.emit(SessionEvent::TimerTick { remaining_secs });
                Ok(TickOutcome::Running { remaining_secs })
            }
            TimerTick::Expired => {
                info!("Exam time expired, grading");
                self.emit(SessionEvent::TimerExpired);
                let card = self.grade()?;
                Ok(TickOutcome::Expired(card))
            }
        }
    }

    // ---- queries ----

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Mode of the current attempt
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Pending setup
    pub fn setup(&self) -> &QuizSetup {
        &self.setup
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Current question set, in presentation order
    pub fn questions(&self) -> &[Question] {
        &self.question_set
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Selection recorded for a question
    pub fn answer_for(&self, id: &QuestionId) -> Option<usize> {
        self.answers.get(id).copied()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Question at the current position
    pub fn current_question(&self) -> Option<&Question> {
        self.question_set.get(self.position)
    }

    /// Last grading result while graded
    pub fn scorecard(&self) -> Option<&Scorecard> {
        self.scorecard.as_ref()
    }

    pub fn attempt_id(&self) -> Option<&AttemptId> {
        self.attempt.as_ref()
    }

    /// Number of retry rounds since the attempt started; 0 for the first pass
    pub fn review_round(&self) -> u32 {
        self.review_round
    }

    /// Whether an exam countdown belongs to this attempt
    pub fn is_timed(&self) -> bool {
        self.mode == Mode::Exam && self.review_round == 0
    }

    /// Whether the countdown is active
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Seconds left on a running countdown
    pub fn remaining(&self) -> Option<Duration> {
        self.timer.is_running().then(|| self.timer.remaining())
    }

    /// Answered/total counter
    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.question_set.len(),
        }
    }

    /// Explanation for a question in the current set, on demand
    pub fn feedback(&self, id: &QuestionId) -> Result<Feedback> {
        let question = self
            .question_set
            .iter()
            .find(|q| &q.id == id)
            .ok_or_else(|| QuizError::QuestionNotFound(id.to_string()))?;
        Ok(Feedback::for_question(question, self.answer_for(id)))
    }

    /// Feedback the presentation should display without being asked:
    /// instantly in practice once answered, and for every question once graded
    pub fn visible_feedback(&self, id: &QuestionId) -> Option<Feedback> {
        let show = match self.state {
            SessionState::Graded => true,
            SessionState::InProgress => {
                self.mode.instant_feedback() && self.answers.contains_key(id)
            }
            _ => false,
        };
        if show {
            self.feedback(id).ok()
        } else {
            None
        }
    }

    fn forced_grading(&self) -> bool {
        self.is_timed()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("questions", &self.question_set.len())
            .field("answers", &self.answers.len())
            .field("position", &self.position)
            .field("timer_running", &self.timer.is_running())
            .field("observers", &self.observers.len())
            .finish()
    }
}
