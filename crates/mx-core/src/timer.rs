//! Countdown timer for exam sessions
//!
//! Remaining time is always recomputed from an absolute deadline, never by
//! decrementing a counter, so late or irregular ticks cannot cause drift.

use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Smallest allowed tick interval in milliseconds
pub const MIN_TICK_MS: u64 = 250;

/// Largest allowed tick interval in milliseconds
pub const MAX_TICK_MS: u64 = 1000;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Timer is not running (never started, stopped, or already expired)
    Inactive,
    /// Timer is counting down
    Running { remaining: Duration },
    /// Deadline reached on this tick; reported exactly once
    Expired,
}

/// Single countdown clock owned by one session
#[derive(Debug, Clone)]
pub struct ExamTimer {
    clock: Clock,
    started_at: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    running: bool,
    expired: bool,
}

impl ExamTimer {
    /// Create an idle timer reading time from `clock`
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            started_at: None,
            deadline: None,
            stopped_at: None,
            running: false,
            expired: false,
        }
    }

    /// Start counting down; any previous countdown is discarded
    pub fn start(&mut self, duration: Duration) {
        let now = self.clock.now();
        let duration = duration.max(Duration::zero());
        self.started_at = Some(now);
        self.deadline = Some(now + duration);
        self.stopped_at = None;
        self.running = true;
        self.expired = false;
        debug!("Timer started: {}s", duration.num_seconds());
    }

    /// Recompute remaining time; fires `Expired` once when the deadline passes
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Inactive;
        }
        let remaining = self.remaining();
        if remaining > Duration::zero() {
            return TimerTick::Running { remaining };
        }

        self.running = false;
        self.expired = true;
        self.stopped_at = self.deadline;
        debug!("Timer expired");
        TimerTick::Expired
    }

    /// Cancel the countdown; safe to call when not running
    ///
    /// Returns `true` if a running countdown was cancelled.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now = self.clock.now();
        self.stopped_at = Some(match self.deadline {
            Some(deadline) if deadline < now => deadline,
            _ => now,
        });
        self.running = false;
        debug!("Timer stopped");
        true
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Duration {
        if self.expired {
            return Duration::zero();
        }
        let Some(deadline) = self.deadline else {
            return Duration::zero();
        };
        let reference = if self.running {
            self.clock.now()
        } else {
            self.stopped_at.unwrap_or(deadline)
        };
        (deadline - reference).max(Duration::zero())
    }

    /// Time spent between start and stop/expiry (or now, while running)
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.started_at?;
        let deadline = self.deadline?;
        let end = if self.running {
            self.clock.now().min(deadline)
        } else {
            self.stopped_at.unwrap_or(deadline)
        };
        Some((end - started).max(Duration::zero()))
    }

    /// Whether the countdown is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the deadline was reached
    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// The clock this timer reads
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

/// Clamp a configured tick interval into the supported range
pub fn clamp_tick_interval(ms: u64) -> std::time::Duration {
    std::time::Duration::from_millis(ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
}

/// Render a duration as `m:ss`, flooring partial seconds
pub fn format_remaining(remaining: Duration) -> String {
    let total_ms = remaining.num_milliseconds().max(0);
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}
