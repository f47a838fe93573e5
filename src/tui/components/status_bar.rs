//! # StatusBar Component
//!
//! One row between the transcript and the prompt showing where this session
//! lives: `[network] [channel]`.
//!
//! The text is a pure function of the session path, so the bar has no state
//! of its own. It is rebuilt at startup and on every resize.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct StatusBar {
    /// Network name, the second-to-last path segment
    pub network: String,
    /// Channel name, the last path segment
    pub channel: String,
    pub style: Style,
}

impl StatusBar {
    pub fn new(network: &str, channel: &str, style: Style) -> Self {
        Self {
            network: network.to_string(),
            channel: channel.to_string(),
            style,
        }
    }

    pub fn text(&self) -> String {
        format!("[{}] [{}]", self.network, self.channel)
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // The style covers the whole row, not just the text
        let bar = Paragraph::new(Span::raw(self.text())).style(self.style);
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::{Color, Modifier};

    #[test]
    fn test_status_text() {
        let bar = StatusBar::new("irc.libera.chat", "#rust", Style::default());
        assert_eq!(bar.text(), "[irc.libera.chat] [#rust]");
    }

    #[test]
    fn test_status_bar_renders_full_row() {
        let backend = TestBackend::new(40, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let style = Style::default().add_modifier(Modifier::REVERSED);
        let mut bar = StatusBar::new("net", "#chan", style);

        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.starts_with("[net] [#chan]"));
        // Padding cells past the text carry the bar style too
        assert!(buffer[(39, 0)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(0, 0)].fg, Color::Reset);
    }
}
