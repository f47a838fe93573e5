//! # Window Manager
//!
//! Owns the surfaces and decides where they go.
//!
//! - Startup and every resize go through [`WindowManager::resize`]: the
//!   layout is recomputed, the transcript and status bar are recreated, and
//!   `out` is replayed from byte 0.
//! - New backend output goes through [`WindowManager::refresh`], which only
//!   reads what was appended since the last read.
//!
//! The prompt's typed-but-unsent text survives a resize.

use std::io;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::config::ResolvedConfig;
use crate::core::line::LineFormat;
use crate::core::session::Session;
use crate::core::tail::TailRead;
use crate::tui::component::Component;
use crate::tui::components::{InputBox, StatusBar, Transcript};
use crate::tui::theme::Palette;

/// Regions for each surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub transcript: Rect,
    pub status: Option<Rect>,
    pub input: Rect,
}

impl SurfaceLayout {
    pub fn compute(area: Rect, status_bar: bool) -> Self {
        use Constraint::{Length, Min};
        if status_bar {
            let [transcript, status, input] =
                Layout::vertical([Min(0), Length(1), Length(1)]).areas(area);
            Self {
                transcript,
                status: Some(status),
                input,
            }
        } else {
            let [transcript, input] = Layout::vertical([Min(0), Length(1)]).areas(area);
            Self {
                transcript,
                status: None,
                input,
            }
        }
    }
}

/// Whether an incremental read needs the full redraw path instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Appended(usize),
    Truncated,
}

pub struct WindowManager {
    layout: SurfaceLayout,
    transcript: Transcript,
    status: Option<StatusBar>,
    pub input: InputBox,
    nick_width: u16,
    status_bar: bool,
    palette: Palette,
    format: LineFormat,
}

impl WindowManager {
    /// Build the surfaces for `area` and replay the session's history.
    pub fn new(
        area: Rect,
        session: &mut Session,
        config: &ResolvedConfig,
        palette: Palette,
    ) -> io::Result<Self> {
        let format = LineFormat::new(config.action_prefix.clone());
        let layout = SurfaceLayout::compute(area, config.status_bar);
        let mut windows = Self {
            layout,
            transcript: Transcript::new(
                layout.transcript,
                config.nick_width,
                palette,
                format.clone(),
            ),
            status: None,
            input: InputBox::new(session.channel(), config.max_input_len, palette.prompt),
            nick_width: config.nick_width,
            status_bar: config.status_bar,
            palette,
            format,
        };
        windows.resize(area, session)?;
        Ok(windows)
    }

    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Recreate the surfaces for a new terminal size and replay `out`.
    pub fn resize(&mut self, area: Rect, session: &mut Session) -> io::Result<()> {
        log::debug!("Resize to {}x{}", area.width, area.height);
        self.layout = SurfaceLayout::compute(area, self.status_bar);
        self.transcript = Transcript::new(
            self.layout.transcript,
            self.nick_width,
            self.palette,
            self.format.clone(),
        );
        self.status = self.layout.status.map(|_| {
            StatusBar::new(session.network(), session.channel(), self.palette.status)
        });
        self.transcript.redraw(session)
    }

    /// Append whatever the backend wrote since the last read.
    pub fn refresh(&mut self, session: &mut Session) -> io::Result<Refresh> {
        match session.read_new()? {
            TailRead::Lines(lines) => {
                self.transcript.append_lines(&lines);
                Ok(Refresh::Appended(lines.len()))
            }
            TailRead::Truncated => Ok(Refresh::Truncated),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let layout = self.layout;
        self.transcript.render(frame, layout.transcript);
        if let (Some(bar), Some(area)) = (self.status.as_mut(), layout.status) {
            bar.render(frame, area);
        }
        // Last, so the terminal cursor ends up in the prompt
        self.input.render(frame, layout.input);
    }
}
