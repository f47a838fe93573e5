//! # Actions
//!
//! Everything that can happen to a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit(line)`.
//! Backend appended to `out`? That's `Action::BackendActivity`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the dispatch loop must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  Effect
//! ```

use log::{info, warn};

use crate::core::state::{App, RunState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A completed input line (Enter pressed).
    Submit(String),
    /// Ctrl+C / Ctrl+D.
    Quit,
    /// The terminal changed size.
    Resize,
    /// The out file may have grown.
    BackendActivity,
    /// The out file was truncated or replaced.
    BackendReset,
    /// The out file is gone or unreadable.
    BackendLost(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Write the line to the backend's `in` file.
    Send(String),
    /// Recreate the surfaces and replay `out` from byte 0.
    Redraw,
    /// Read what was appended to `out` since the last read.
    Refresh,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    if app.run_state == RunState::Terminating {
        return Effect::Quit;
    }

    match action {
        Action::Submit(line) => {
            if line == app.escape_command {
                info!("Escape command submitted, terminating session");
                app.run_state = RunState::Terminating;
                Effect::Quit
            } else if line.is_empty() {
                Effect::None
            } else {
                Effect::Send(line)
            }
        }
        Action::Quit => {
            info!("Quit requested");
            app.run_state = RunState::Terminating;
            Effect::Quit
        }
        Action::Resize | Action::BackendReset => Effect::Redraw,
        Action::BackendActivity => Effect::Refresh,
        Action::BackendLost(reason) => {
            warn!("Backend lost: {}", reason);
            app.notice = Some(format!("backend connection lost: {reason}"));
            app.run_state = RunState::Terminating;
            Effect::Quit
        }
    }
}
