//! Wall-clock abstraction so timers can run against simulated time

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time.
///
/// `Manual` clocks share their instant between clones, so a test can keep a
/// handle, hand a clone to a session, and advance both at once.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    System,
    Manual(Rc<Cell<DateTime<Utc>>>),
}

impl Clock {
    /// Real system time
    pub fn system() -> Self {
        Self::System
    }

    /// A clock frozen at `at` until advanced
    pub fn manual(at: DateTime<Utc>) -> Self {
        Self::Manual(Rc::new(Cell::new(at)))
    }

    /// Current time according to the clock
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Manual(t) => t.get(),
        }
    }

    /// Advance a manual clock; no effect on the system clock
    pub fn advance(&self, delta: Duration) {
        if let Clock::Manual(t) = self {
            t.set(t.get() + delta);
        }
    }

    /// Whether this clock follows real time
    pub fn is_system(&self) -> bool {
        matches!(self, Clock::System)
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z)
#[cfg(any(test, feature = "test-util"))]
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// A manual clock starting at the fixed test timestamp
#[cfg(any(test, feature = "test-util"))]
pub fn fixed_clock() -> Clock {
    let at = DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default();
    Clock::manual(at)
}
