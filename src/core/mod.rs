//! # Core Session Logic
//!
//! Everything about a session that does not depend on the terminal.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • line (parser)        │
//!                    │  • session (in/out)     │
//!                    │  • watcher (wake-ups)   │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`line`]: one `out` line → [`line::Message`]
//! - [`session`]: the session directory and its two backend files
//! - [`tail`]: persistent read cursor over `out`
//! - [`watcher`]: notifications that `out` changed
//! - [`state`]: the `App` struct and [`state::RunState`]
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: layered configuration
//! - [`error`]: fatal startup errors

pub mod action;
pub mod config;
pub mod error;
pub mod line;
pub mod session;
pub mod state;
pub mod tail;
pub mod watcher;
