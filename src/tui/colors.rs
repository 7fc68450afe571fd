//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Focused pane borders and the selected form field.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Success notices.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Error notices, invalid form fields and the delete confirmation.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
