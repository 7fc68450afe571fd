//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
///
/// Every screen draws the same single page (form, active list, completed
/// list, status bar); the state decides where key input is routed and
/// whether the confirmation dialog or help screen sits on top.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    ActiveList,
    CompletedList,
    Form,
    Confirm,
    Help,
}
