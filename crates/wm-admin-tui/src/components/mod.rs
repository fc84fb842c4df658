//! Reusable UI components
//!
//! - `JsonEditor` - multi-line JSON editor widget
//! - `LineInput` - cursor handling for single-line fields
//! - `highlight` - JSON syntax coloring shared by the editor and read-only panes

pub mod highlight;
mod json_editor;
mod line_input;

pub use json_editor::{Cursor, EditorAction, JsonEditor};
pub use line_input::LineInput;

// Re-export ecosystem widgets for convenience
pub use tui_popup::Popup;
