//! Color groups for the transcript and prompt.
//!
//! Each group is a complete `Style` applied to its own span, so attributes
//! never bleed into neighbouring text.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub datetime: Style,
    pub nick: Style,
    pub separator: Style,
    pub body: Style,
    pub prompt: Style,
    pub status: Style,
}

impl Palette {
    pub fn colored() -> Self {
        Self {
            datetime: Style::default().fg(Color::Cyan),
            nick: Style::default().fg(Color::Green),
            separator: Style::default().fg(Color::Cyan),
            body: Style::default().fg(Color::White),
            prompt: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(Color::Black).bg(Color::Cyan),
        }
    }

    /// No colors at all; the prompt keeps its bold weight and the status
    /// bar is reversed so it still stands out.
    pub fn plain() -> Self {
        Self {
            datetime: Style::default(),
            nick: Style::default(),
            separator: Style::default(),
            body: Style::default(),
            prompt: Style::default().add_modifier(Modifier::BOLD),
            status: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Colored palette if enabled and the terminal reports at least 8 colors.
    pub fn detect(enabled: bool) -> Self {
        if enabled && crossterm::style::available_color_count() >= 8 {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}
