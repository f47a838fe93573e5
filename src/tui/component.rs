use ratatui::Frame;
use ratatui::layout::Rect;

/// A surface that can draw itself into a region of the terminal.
///
/// Surfaces receive data via props (struct fields) and may hold internal
/// state. Anything derived from content, such as the transcript's wrapped
/// row counts, is computed when the content changes; `render` only draws.
/// It takes `&mut self` to mirror Ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
