//! Application shell: terminal setup, event loop and drawing

mod controller;
mod render;
mod state;

pub use controller::{Controller, PERFECT_SCORE_NOTICE};
pub use state::{AppMode, AppState, Notice, NoticeKind, Screen, SetupField};

use crate::events::{Event, EventLoop};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mx_core::bookmark::BookmarkStorage;
use mx_core::config::Config;
use mx_core::session::QuizSession;
use mx_core::timer::{clamp_tick_interval, MIN_TICK_MS};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::debug;

/// Presentation options taken from configuration
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Countdown refresh interval
    pub tick_rate: Duration,
    pub theme: Theme,
    /// Show domain and difficulty badges on questions
    pub show_badges: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tick_rate: clamp_tick_interval(MIN_TICK_MS),
            theme: Theme::default(),
            show_badges: true,
        }
    }
}

impl AppOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_rate: config.timer.tick_interval(),
            theme: Theme::named(&config.ui.theme),
            show_badges: config.ui.show_badges,
        }
    }

    /// Drop colors regardless of the configured theme
    pub fn monochrome(mut self) -> Self {
        self.theme = Theme::mono();
        self
    }
}

/// Main application
pub struct App {
    controller: Controller,
    options: AppOptions,
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create the app and take over the terminal
    pub fn new(
        session: QuizSession,
        store: Box<dyn BookmarkStorage>,
        options: AppOptions,
    ) -> Result<Self> {
        // Restore the terminal before the default hook prints the panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            controller: Controller::new(session, store),
            options,
            terminal,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        let mut events = EventLoop::new(self.options.tick_rate);
        debug!("Event loop ticking every {:?}", events.tick_rate());

        loop {
            self.draw()?;

            match events.next()? {
                Some(Event::Input(key)) => self.controller.handle_key(key),
                Some(Event::Tick) => self.controller.on_tick(),
                Some(Event::Resize(..)) | None => {}
            }

            if self.controller.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let controller = &self.controller;
        let options = &self.options;
        self.terminal
            .draw(|frame| render::draw(frame, controller, options))?;
        Ok(())
    }

    /// Session as left when the app exits
    pub fn session(&self) -> &QuizSession {
        self.controller.session()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::session::Mode;

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.timer.tick_ms = 5000;
        config.ui.theme = "mono".to_string();
        config.ui.show_badges = false;

        let options = AppOptions::from_config(&config);
        assert_eq!(options.tick_rate, Duration::from_millis(1000));
        assert_eq!(options.theme, Theme::mono());
        assert!(!options.show_badges);
    }

    #[test]
    fn test_monochrome_overrides_theme() {
        let options = AppOptions::default().monochrome();
        assert_eq!(options.theme, Theme::mono());
        assert_eq!(options.tick_rate, Duration::from_millis(250));
    }

    #[test]
    fn test_controller_starts_idle() {
        let controller = testing::controller();
        assert_eq!(controller.screen(), Screen::Setup);
        assert_eq!(controller.session().setup().mode, Mode::Practice);
    }
}
