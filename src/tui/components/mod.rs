//! # TUI Components
//!
//! The three surfaces that tile the terminal:
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ transcript.rs  (all rows but 1-2)  │
//! │                                    │
//! ├────────────────────────────────────┤
//! │ status_bar.rs  (optional, 1 row)   │
//! ├────────────────────────────────────┤
//! │ input_box.rs   (last row)          │
//! └────────────────────────────────────┘
//! ```
//!
//! `StatusBar` is purely presentational. `Transcript` and `InputBox` hold
//! local state; the input box also turns key events into submitted lines.

pub mod input_box;
pub mod status_bar;
pub mod transcript;

pub use input_box::{InputBox, InputEvent};
pub use status_bar::StatusBar;
pub use transcript::Transcript;
