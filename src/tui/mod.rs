//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, renders the surfaces, and
//! runs the dispatch loop.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Dispatch Loop
//!
//! One task, one wait point. Each iteration draws, then a `tokio::select!`
//! waits on whichever wakes first:
//!
//! - the crossterm `EventStream` (keys, paste, and terminal resize), or
//! - the [`OutWatcher`] channel (the backend touched `out`).
//!
//! A backend line therefore shows up while the user is mid-typing, and a
//! resize is just another event rather than a signal handler.
//!
//! ```text
//!            ┌──────────────┐     ┌──────────────┐
//!            │ EventStream  │     │  OutWatcher  │
//!            └──────┬───────┘     └──────┬───────┘
//!                   └──── select! ───────┘
//!                            │
//!                  Action → update() → Effect
//!                            │
//!          Send(line) · Redraw · Refresh · Quit
//! ```

pub mod component;
pub mod components;
pub mod event;
pub mod theme;
pub mod window;

use log::{debug, info, warn};
use std::io::{self, stdout};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, EventStream};
use crossterm::execute;
use futures::StreamExt;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::Session;
use crate::core::state::App;
use crate::core::watcher::{OutWatcher, WatchEvent};
use crate::tui::component::EventHandler;
use crate::tui::components::InputEvent;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;
use crate::tui::window::{Refresh, WindowManager};

/// How the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user asked to leave.
    Closed,
    /// The backend went away; the message is meant for the user.
    BackendLost(String),
}

/// Releases the terminal on every exit path, including `?` and panics
/// (ratatui's own panic hook covers the latter).
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> Self {
        match execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => info!("Terminal modes enabled (bracketed paste)"),
            Err(e) => warn!("Bracketed paste unavailable: {}", e),
        }
        Self
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
    }
}

/// State and handlers of the dispatch loop, without the terminal or the
/// event sources. Everything here is driven by plain method calls.
pub struct Dispatcher {
    app: App,
    session: Session,
    windows: WindowManager,
    /// Current terminal size, the input to every redraw.
    area: Rect,
}

impl Dispatcher {
    pub fn new(
        mut session: Session,
        config: &ResolvedConfig,
        palette: Palette,
        area: Rect,
    ) -> io::Result<Self> {
        let windows = WindowManager::new(area, &mut session, config, palette)?;
        Ok(Self {
            app: App::from_config(config),
            session,
            windows,
            area,
        })
    }

    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        self.windows.draw(frame);
    }

    /// Route one terminal event.
    pub fn on_terminal_event(&mut self, event: TuiEvent) -> io::Result<()> {
        match event {
            TuiEvent::Resize(cols, rows) => {
                self.area = Rect::new(0, 0, cols, rows);
                self.handle(Action::Resize)
            }
            TuiEvent::Quit => self.handle(Action::Quit),
            other => match self.windows.input.handle_event(&other) {
                Some(InputEvent::Submit(line)) => self.handle(Action::Submit(line)),
                Some(InputEvent::ContentChanged) | None => Ok(()),
            },
        }
    }

    /// Route one watcher wake-up.
    pub fn on_watch_event(&mut self, event: WatchEvent) -> io::Result<()> {
        match event {
            WatchEvent::Changed => self.handle(Action::BackendActivity),
            WatchEvent::Removed => self.handle(Action::BackendLost(format!(
                "{} was removed",
                self.session.out_path().display()
            ))),
        }
    }

    /// Apply an action and carry out its effect.
    pub fn handle(&mut self, action: Action) -> io::Result<()> {
        debug!("Dispatch: {:?}", action);
        match update(&mut self.app, action) {
            Effect::None | Effect::Quit => Ok(()),
            Effect::Send(line) => {
                if let Err(e) = self.session.send(&line) {
                    return self.handle(Action::BackendLost(format!("cannot write to backend: {e}")));
                }
                Ok(())
            }
            Effect::Redraw => {
                if let Err(e) = self.session.reopen_if_replaced() {
                    return self.handle(Action::BackendLost(format!("cannot reopen backend: {e}")));
                }
                let area = self.area;
                if let Err(e) = self.windows.resize(area, &mut self.session) {
                    return self.handle(Action::BackendLost(format!("cannot read backend: {e}")));
                }
                Ok(())
            }
            Effect::Refresh => {
                if !self.session.backend_alive() {
                    return self.handle(Action::BackendLost(format!(
                        "{} is gone",
                        self.session.out_path().display()
                    )));
                }
                match self.session.reopen_if_replaced() {
                    Ok(true) => {
                        warn!("out file was replaced, replaying the new one");
                        return self.handle(Action::BackendReset);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        return self.handle(Action::BackendLost(format!("cannot reopen backend: {e}")));
                    }
                }
                match self.windows.refresh(&mut self.session) {
                    Ok(Refresh::Appended(n)) => {
                        if n > 0 {
                            debug!("Appended {} lines", n);
                        }
                        Ok(())
                    }
                    Ok(Refresh::Truncated) => {
                        warn!("out file shrank, replaying from the start");
                        self.handle(Action::BackendReset)
                    }
                    Err(e) => self.handle(Action::BackendLost(format!("cannot read backend: {e}"))),
                }
            }
        }
    }

    pub fn into_outcome(self) -> Outcome {
        match self.app.notice {
            Some(notice) => Outcome::BackendLost(notice),
            None => Outcome::Closed,
        }
    }
}

/// Take over the terminal and run the session until it terminates.
pub async fn run(session: Session, config: ResolvedConfig) -> io::Result<Outcome> {
    let palette = Palette::detect(config.colors);

    let mut terminal = ratatui::try_init()?;
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Watch before the first replay so nothing appended in between is missed
    let mut watcher = OutWatcher::start(session.out_path(), config.watch, config.poll_interval);

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let mut dispatcher = Dispatcher::new(session, &config, palette, area)?;
    let mut events = EventStream::new();
    info!("Dispatch loop started ({:?} watcher)", watcher.mode());

    while dispatcher.is_running() {
        terminal.draw(|f| dispatcher.draw(f))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(raw)) => {
                    if let Some(event) = event::translate(raw) {
                        dispatcher.on_terminal_event(event)?;
                    }
                }
                Some(Err(e)) => return Err(e),
                None => {
                    info!("Terminal input closed");
                    dispatcher.handle(Action::Quit)?;
                }
            },
            maybe_watch = watcher.next() => match maybe_watch {
                Some(first) => {
                    let merged = watcher.drain(first);
                    dispatcher.on_watch_event(merged)?;
                }
                None => {
                    dispatcher.handle(Action::BackendLost("file watcher stopped".to_string()))?;
                }
            },
        }
    }

    info!("Dispatch loop finished");
    Ok(dispatcher.into_outcome())
}
