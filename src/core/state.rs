//! # Application State
//!
//! Core state for the session front-end. No TUI types live here; the
//! surfaces are owned by the window manager in the `tui` module.
//!
//! ```text
//! App
//! ├── run_state: RunState        // Running → Terminating (absorbing)
//! ├── escape_command: String     // input line that ends the session
//! └── notice: Option<String>     // why the session ended, if not by the user
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;

/// Dispatch loop state. `Terminating` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Terminating,
}

pub struct App {
    pub run_state: RunState,
    pub escape_command: String,
    /// User-visible reason for a termination the user did not ask for.
    pub notice: Option<String>,
}

impl App {
    pub fn new(escape_command: impl Into<String>) -> Self {
        Self {
            run_state: RunState::Running,
            escape_command: escape_command.into(),
            notice: None,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.escape_command.clone())
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}
