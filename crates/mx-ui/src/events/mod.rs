//! Event handling

use anyhow::Result;
use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input
    Input(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Periodic tick
    Tick,
}

/// Polls the terminal and interleaves ticks at a fixed rate
#[derive(Debug)]
pub struct EventLoop {
    tick_rate: Duration,
    last_tick: Instant,
}

impl EventLoop {
    /// Create an event loop ticking every `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            tick_rate,
            last_tick: Instant::now(),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Time left until the next tick is due
    fn timeout(&self, now: Instant) -> Duration {
        self.tick_rate
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    fn tick_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.tick_rate
    }

    /// Wait for the next event, at most until the next tick
    pub fn next(&mut self) -> Result<Option<Event>> {
        if event::poll(self.timeout(Instant::now()))? {
            match event::read()? {
                event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(Event::Input(key)));
                }
                event::Event::Resize(w, h) => return Ok(Some(Event::Resize(w, h))),
                _ => {}
            }
        }

        let now = Instant::now();
        if self.tick_due(now) {
            self.last_tick = now;
            return Ok(Some(Event::Tick));
        }
        Ok(None)
    }
}
