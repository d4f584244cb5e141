//! Theme system

use ratatui::prelude::*;

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Border color for focused elements
    pub focus_border: Color,
    /// Border color for unfocused elements
    pub unfocus_border: Color,
    /// Header and status bar background
    pub bar_bg: Color,
    /// Header and status bar foreground
    pub bar_fg: Color,
    /// Correct answers and success notices
    pub correct: Color,
    /// Incorrect answers and error notices
    pub incorrect: Color,
    /// Warnings and the exam countdown
    pub warning: Color,
    /// Informational notices and badges
    pub info: Color,
    /// Secondary text
    pub muted: Color,
    /// Bookmark marker
    pub bookmark: Color,
    /// Highlight background for the cursor row
    pub cursor_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            unfocus_border: Color::DarkGray,
            bar_bg: Color::Blue,
            bar_fg: Color::White,
            correct: Color::Green,
            incorrect: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            muted: Color::DarkGray,
            bookmark: Color::Magenta,
            cursor_bg: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Theme without colors, for terminals where they are unwanted
    pub fn mono() -> Self {
        Self {
            focus_border: Color::Reset,
            unfocus_border: Color::Reset,
            bar_bg: Color::Reset,
            bar_fg: Color::Reset,
            correct: Color::Reset,
            incorrect: Color::Reset,
            warning: Color::Reset,
            info: Color::Reset,
            muted: Color::Reset,
            bookmark: Color::Reset,
            cursor_bg: Color::Reset,
        }
    }

    /// Look up a theme by its config name; unknown names get the default
    pub fn named(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" | "none" => Self::mono(),
            _ => Self::default(),
        }
    }

    /// Style of the cursor row (reverse video when the theme has no colors)
    pub fn cursor(&self) -> Style {
        if self.cursor_bg == Color::Reset {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
                .bg(self.cursor_bg)
                .add_modifier(Modifier::BOLD)
        }
    }

    /// Style for the header and status bars
    pub fn bar(&self) -> Style {
        Style::default().bg(self.bar_bg).fg(self.bar_fg)
    }
}
