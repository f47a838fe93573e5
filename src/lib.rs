//! niii library exports for testing

pub mod core;
pub mod tui;

pub use crate::core::config::ResolvedConfig;
pub use crate::core::line::{LineFormat, Message, parse_line};
pub use crate::core::session::Session;
pub use crate::tui::{Dispatcher, Outcome};
