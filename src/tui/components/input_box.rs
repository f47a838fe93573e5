//! # InputBox Component
//!
//! The single-line prompt on the last row of the terminal.
//!
//! ## Responsibilities
//!
//! - Capture text input, bounded to `max_len` characters
//! - Handle editing (backspace, delete, cursor movement, paste, Ctrl+U)
//! - Emit the whole line on Enter, then clear itself
//! - Draw the prompt decoration (`[#channel] `) in front of the buffer
//!
//! ## Truncation
//!
//! Input beyond `max_len` characters is dropped as it is typed or pasted,
//! so a submitted line is never longer than the bound and never rejected.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Decoration used when there is no channel name to show.
pub const BARE_PROMPT: &str = "> ";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the line (Enter pressed). May be empty.
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
    /// Maximum number of characters accepted
    max_len: usize,
    /// Decoration drawn before the buffer (Prop)
    prompt: String,
    /// Style of the decoration (Prop)
    prompt_style: Style,
}

impl InputBox {
    pub fn new(channel: &str, max_len: usize, prompt_style: Style) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            max_len,
            prompt: prompt_for(channel),
            prompt_style,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert as much of `text` as fits under `max_len`.
    fn insert(&mut self, text: &str) -> bool {
        let room = self.max_len.saturating_sub(self.char_count());
        let accepted: String = text.chars().take(room).collect();
        if accepted.is_empty() {
            return false;
        }
        self.buffer.insert_str(self.cursor, &accepted);
        self.cursor += accepted.len();
        true
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

/// `[#channel] ` or the bare marker.
pub fn prompt_for(channel: &str) -> String {
    if channel.is_empty() {
        BARE_PROMPT.to_string()
    } else {
        format!("[{channel}] ")
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let prompt_width = self.prompt.width() as u16;
        let cursor_width = self.buffer[..self.cursor].width() as u16;

        // Scroll horizontally so the cursor cell stays on screen
        let cursor_col = prompt_width.saturating_add(cursor_width);
        let scroll_x = cursor_col
            .saturating_add(1)
            .saturating_sub(area.width);

        let line = Line::from(vec![
            Span::styled(self.prompt.clone(), self.prompt_style),
            Span::raw(self.buffer.clone()),
        ]);
        frame.render_widget(Paragraph::new(line).scroll((0, scroll_x)), area);

        if area.width > 0 && area.height > 0 {
            let x = area.x + cursor_col.saturating_sub(scroll_x).min(area.width - 1);
            frame.set_cursor_position((x, area.y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp))
                    .then_some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => self.insert(text).then_some(InputEvent::ContentChanged),
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::ClearLine => (!self.buffer.is_empty()).then(|| {
                self.clear();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
