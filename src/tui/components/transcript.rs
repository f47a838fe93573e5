//! # Transcript Surface
//!
//! The scrolling record of the conversation, occupying every row above the
//! status bar and prompt.
//!
//! ## Responsibilities
//!
//! - Format each [`Message`] into one styled line: `date time nick | body`
//! - Keep only as many records as fit on screen; older ones scroll off
//! - Replay the whole `out` file on [`Transcript::redraw`]
//!
//! ## No backlog
//!
//! Records that scroll above the visible area are dropped. The backend's
//! `out` file is the history; a resize recreates this surface and replays
//! the file from byte 0, which yields exactly what sequential appends of the
//! same lines would have shown.
//!
//! ## Layout
//!
//! ```text
//! 2024-01-01 10:00:00        alice | hello world
//! 2024-01-01 10:00:05            * | bob waves
//! └──── datetime ───┘ └─ nick ───┘ └sep┘└body┘
//! ```
//!
//! The nick column is right-aligned and cut to `nick_width` display columns.

use std::collections::VecDeque;
use std::io;

use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::core::line::{LineFormat, Message};
use crate::core::session::Session;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Glyph between the nick column and the body.
pub const SEPARATOR: &str = "| ";

/// One formatted record and the number of rows it wraps to.
struct Record {
    line: Line<'static>,
    rows: u16,
}

pub struct Transcript {
    records: VecDeque<Record>,
    width: u16,
    height: u16,
    nick_width: u16,
    palette: Palette,
    format: LineFormat,
}

impl Transcript {
    /// Create an empty surface sized for `area`.
    pub fn new(area: Rect, nick_width: u16, palette: Palette, format: LineFormat) -> Self {
        Self {
            records: VecDeque::new(),
            width: area.width,
            height: area.height,
            nick_width,
            palette,
            format,
        }
    }

    /// Parse raw `out` lines and append the well-formed ones.
    pub fn append_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        for raw in lines {
            match self.format.parse(raw.as_ref()) {
                Some(message) => self.append(&message),
                None => debug!("Skipping malformed line: {:?}", raw.as_ref()),
            }
        }
    }

    /// Render one record at the bottom, scrolling older records off the top.
    pub fn append(&mut self, message: &Message) {
        let line = format_record(message, self.nick_width, &self.palette);
        let rows = self.rows_for(&line);
        self.records.push_back(Record { line, rows });
        self.trim();
    }

    /// Clear and replay the session's `out` file from byte 0.
    pub fn redraw(&mut self, session: &mut Session) -> io::Result<()> {
        self.records.clear();
        let lines = session.replay()?;
        debug!("Redraw: replaying {} lines", lines.len());
        self.append_lines(&lines);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The visible records, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &Line<'static>> {
        self.records.iter().map(|r| &r.line)
    }

    fn rows_for(&self, line: &Line<'static>) -> u16 {
        if self.width == 0 {
            return 1;
        }
        let count = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(self.width);
        u16::try_from(count).unwrap_or(u16::MAX).max(1)
    }

    /// Drop records that are entirely above the visible area.
    fn trim(&mut self) {
        let capacity = self.height.max(1);
        let mut total: u16 = self.records.iter().map(|r| r.rows).fold(0, u16::saturating_add);
        while let Some(front) = self.records.front() {
            if total.saturating_sub(front.rows) < capacity {
                break;
            }
            total -= front.rows;
            self.records.pop_front();
        }
    }

    fn total_rows(&self) -> u16 {
        self.records.iter().map(|r| r.rows).fold(0, u16::saturating_add)
    }
}

impl Component for Transcript {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overflow = self.total_rows().saturating_sub(area.height);
        let text: Vec<Line<'static>> = self.lines().cloned().collect();
        let paragraph = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((overflow, 0));
        frame.render_widget(paragraph, area);
    }
}

/// Build the styled line for one record. Each color group is its own span.
pub fn format_record(message: &Message, nick_width: u16, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} {} ", message.date, message.time),
            palette.datetime,
        ),
        Span::styled(
            format!("{} ", fit_nick(&message.nick, nick_width as usize)),
            palette.nick,
        ),
        Span::styled(SEPARATOR, palette.separator),
        Span::styled(printable(&message.body), palette.body),
    ])
}

/// Right-align `nick` in exactly `width` display columns, cutting it if
/// it is wider.
pub fn fit_nick(nick: &str, width: usize) -> String {
    let mut used = 0;
    let mut kept = String::new();
    for c in nick.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(c);
    }
    format!("{}{}", " ".repeat(width - used), kept)
}

/// Control bytes (IRC formatting codes and the like) would corrupt cell
/// widths; tabs become a single space and the rest are dropped.
fn printable(body: &str) -> String {
    body.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
