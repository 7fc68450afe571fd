//! Task form handling for the terminal user interface.
//!
//! The form holds the title and description inputs for adding or updating
//! a task, and tracks which field currently receives keystrokes.

use crate::controller::Draft;
use crate::tui::input::InputField;

/// Field order in the form.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;

const FIELD_COUNT: usize = 2;

/// Title and description inputs with a field cursor.
#[derive(Default)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub current_field: usize,
}

impl TaskForm {
    /// Create a new empty form focused on the title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form pre-populated from an edit draft.
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            title: InputField::with_value(&draft.title),
            description: InputField::with_value(&draft.description),
            current_field: TITLE_FIELD,
        }
    }

    /// Reset both fields and put the focus back on the title.
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.current_field = TITLE_FIELD;
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
    }

    fn current_mut(&mut self) -> &mut InputField {
        match self.current_field {
            TITLE_FIELD => &mut self.title,
            _ => &mut self.description,
        }
    }

    /// Currently focused field, for cursor placement.
    pub fn current(&self) -> &InputField {
        match self.current_field {
            TITLE_FIELD => &self.title,
            _ => &self.description,
        }
    }

    /// Handle character input for the currently focused field.
    pub fn handle_char(&mut self, c: char) {
        self.current_mut().handle_char(c);
    }

    /// Handle backspace input for the currently focused field.
    pub fn handle_backspace(&mut self) {
        self.current_mut().handle_backspace();
    }

    /// Handle delete input for the currently focused field.
    pub fn handle_delete(&mut self) {
        self.current_mut().handle_delete();
    }

    /// Handle left/right arrow keys for cursor movement.
    pub fn handle_left_right(&mut self, right: bool) {
        if right {
            self.current_mut().move_cursor_right();
        } else {
            self.current_mut().move_cursor_left();
        }
    }
}
