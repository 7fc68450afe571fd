//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and forwards user intents to
//! the task list controller. The whole UI is a single page: entry form and
//! search on top, the active list in the middle, the completed list below,
//! and a status bar; the confirmation dialog and help screen overlay it.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::controller::{Submitted, TaskList};
use crate::notify::{Notice, NoticeKind};
use crate::task::ListKind;
use crate::tui::{
    colors::{DARK_GREEN, DARK_RED, GOLD},
    enums::AppState,
    input::InputField,
    task_form::{TaskForm, DESCRIPTION_FIELD, TITLE_FIELD},
    utils::centered_rect,
};
use crate::validate::{Field, DESC_MAX, DESC_MIN, TITLE_MAX, TITLE_MIN};

/// Re-select the row holding `old`, or fall back to the first row.
fn restore_selection(state: &mut TableState, rows: &[u64], old: Option<u64>) {
    let idx = old.and_then(|id| rows.iter().position(|&x| x == id));
    state.select(match idx {
        Some(i) => Some(i),
        None if rows.is_empty() => None,
        None => Some(0),
    });
}

/// Main application state for the terminal user interface.
///
/// Owns the task list controller and all view state: the row caches that
/// map table positions to task ids, table selections, the entry form, the
/// search input, the pending delete confirmation, and the current notice.
/// Ids are resolved from selections at the render boundary; the controller
/// never sees a row position.
pub struct App {
    state: AppState,
    tasks: TaskList,
    active_rows: Vec<u64>,
    completed_rows: Vec<u64>,
    active_state: TableState,
    completed_state: TableState,
    form: TaskForm,
    form_error: Option<Field>,
    search: InputField,
    search_active: bool,
    pending_delete: Option<(u64, ListKind)>,
    notice: Option<Notice>,
}

impl App {
    /// Create a new App with an empty task list.
    pub fn new() -> Self {
        let mut app = App {
            state: AppState::ActiveList,
            tasks: TaskList::new(),
            active_rows: Vec::new(),
            completed_rows: Vec::new(),
            active_state: TableState::default(),
            completed_state: TableState::default(),
            form: TaskForm::new(),
            form_error: None,
            search: InputField::new(),
            search_active: false,
            pending_delete: None,
            notice: None,
        };
        app.update_visible_rows();
        app
    }

    /// Refresh the row caches from the controller, preserving selection
    /// where the same task is still visible.
    fn update_visible_rows(&mut self) {
        let old_active = self.selected_id(ListKind::Active);
        let old_completed = self.selected_id(ListKind::Completed);

        self.active_rows = self.tasks.visible_active().map(|t| t.id).collect();
        self.completed_rows = self
            .tasks
            .visible_completed()
            .iter()
            .map(|t| t.id)
            .collect();

        restore_selection(&mut self.active_state, &self.active_rows, old_active);
        restore_selection(
            &mut self.completed_state,
            &self.completed_rows,
            old_completed,
        );
    }

    /// Resolve the current table selection to a task id.
    fn selected_id(&self, list: ListKind) -> Option<u64> {
        let (state, rows) = match list {
            ListKind::Active => (&self.active_state, &self.active_rows),
            ListKind::Completed => (&self.completed_state, &self.completed_rows),
        };
        state.selected().and_then(|idx| rows.get(idx)).copied()
    }

    fn move_selection(&mut self, list: ListKind, down: bool) {
        let (state, len) = match list {
            ListKind::Active => (&mut self.active_state, self.active_rows.len()),
            ListKind::Completed => (&mut self.completed_state, self.completed_rows.len()),
        };
        if len == 0 {
            return;
        }
        let next = match state.selected() {
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(next));
    }

    fn raise(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Drop the current notice once it outlives its TTL.
    fn expire_notice(&mut self) {
        if self.notice.as_ref().is_some_and(Notice::is_expired) {
            self.notice = None;
        }
    }

    /// Label for the submit affordance, reflecting add vs update mode.
    fn submit_label(&self) -> &'static str {
        if self.tasks.edit_target().is_some() {
            "Update Task"
        } else {
            "Add Task"
        }
    }

    /// Forward the form contents to the controller and reflect the outcome.
    fn submit_form(&mut self) {
        let title = self.form.title.value.clone();
        let description = self.form.description.value.clone();
        match self.tasks.submit(&title, &description) {
            Ok(outcome) => {
                self.form.clear();
                self.form_error = None;
                self.state = AppState::ActiveList;
                self.update_visible_rows();
                let text = match outcome {
                    Submitted::Added => "Task added successfully",
                    Submitted::Updated => "Task updated successfully",
                };
                tracing::info!(title = %title, outcome = ?outcome, "submission accepted");
                self.raise(Notice::success(text));
            }
            Err(err) => {
                self.form_error = Some(err.field());
                tracing::debug!(%err, "submission rejected");
                self.raise(Notice::error(err.to_string()));
            }
        }
    }

    fn set_search(&mut self) {
        self.tasks.set_search_query(self.search.value.clone());
        self.update_visible_rows();
    }

    fn clear_search(&mut self) {
        self.search.clear();
        self.search_active = false;
        self.set_search();
    }

    /// Handle keyboard input when the active list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_active_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        if self.search_active {
            match key {
                KeyCode::Esc => {
                    self.clear_search();
                }
                KeyCode::Enter => {
                    self.search_active = false;
                }
                KeyCode::Backspace => {
                    self.search.handle_backspace();
                    self.set_search();
                }
                KeyCode::Char(c) => {
                    self.search.handle_char(c);
                    self.set_search();
                }
                _ => {}
            }
            return Ok(false);
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc => {
                if !self.search.value.is_empty() {
                    self.clear_search();
                } else {
                    return Ok(true);
                }
            }
            KeyCode::Up => self.move_selection(ListKind::Active, false),
            KeyCode::Down => self.move_selection(ListKind::Active, true),
            KeyCode::Tab => {
                self.state = AppState::CompletedList;
            }
            KeyCode::Char('a') => {
                self.tasks.cancel_edit();
                self.form = TaskForm::new();
                self.form_error = None;
                self.state = AppState::Form;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id(ListKind::Active) {
                    match self.tasks.begin_edit(id) {
                        Ok(draft) => {
                            self.form = TaskForm::from_draft(&draft);
                            self.form_error = None;
                            self.state = AppState::Form;
                        }
                        Err(err) => {
                            tracing::warn!(%err, "edit request for missing task");
                            self.raise(Notice::error(err.to_string()));
                        }
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id(ListKind::Active) {
                    self.pending_delete = Some((id, ListKind::Active));
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id(ListKind::Active) {
                    match self.tasks.toggle_complete(id) {
                        Ok(()) => {
                            tracing::info!(id, "task completed");
                            self.update_visible_rows();
                        }
                        Err(err) => {
                            tracing::warn!(%err, "complete request for missing task");
                            self.raise(Notice::error(err.to_string()));
                        }
                    }
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when the completed list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_completed_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Tab => {
                self.state = AppState::ActiveList;
            }
            KeyCode::Up => self.move_selection(ListKind::Completed, false),
            KeyCode::Down => self.move_selection(ListKind::Completed, true),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id(ListKind::Completed) {
                    self.pending_delete = Some((id, ListKind::Completed));
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input while the entry form has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_form_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.form.clear();
                self.form_error = None;
                self.tasks.cancel_edit();
                self.state = AppState::ActiveList;
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left_right(false),
            KeyCode::Right => self.form.handle_left_right(true),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input in the delete confirmation dialog.
    ///
    /// A declined confirmation is a no-op by design.
    /// Returns true if the application should quit.
    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some((id, list)) = self.pending_delete.take() {
                    match self.tasks.delete(id, list) {
                        Ok(task) => {
                            tracing::info!(id, title = %task.title, %list, "task deleted");
                            self.update_visible_rows();
                            self.raise(Notice::success("Task deleted successfully"));
                        }
                        Err(err) => {
                            tracing::warn!(%err, "delete request for missing task");
                            self.raise(Notice::error(err.to_string()));
                        }
                    }
                    self.state = match list {
                        ListKind::Active => AppState::ActiveList,
                        ListKind::Completed => AppState::CompletedList,
                    };
                } else {
                    self.state = AppState::ActiveList;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                let origin = self.pending_delete.take();
                self.state = match origin {
                    Some((_, ListKind::Completed)) => AppState::CompletedList,
                    _ => AppState::ActiveList,
                };
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when viewing the help screen.
    ///
    /// Returns true if the application should quit.
    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::ActiveList;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Dispatch a key press to the handler for the current state.
    ///
    /// Returns true if the application should quit.
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match self.state {
            AppState::ActiveList => self.handle_active_list_input(key, modifiers),
            AppState::CompletedList => self.handle_completed_list_input(key, modifiers),
            AppState::Form => self.handle_form_input(key, modifiers),
            AppState::Confirm => self.handle_confirm_input(key, modifiers),
            AppState::Help => self.handle_help_input(key, modifiers),
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                return self.handle_key(key.code, key.modifiers);
            }
        }
        Ok(false)
    }

    /// Render the title header with the current date.
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let today = Local::now().format("%a %e %b %Y").to_string();
        let header_text = vec![Line::from(vec![
            Span::styled("MY TO DO LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                today,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the entry form inputs, the search input and the submit label.
    fn render_inputs(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Percentage(28), // Title
                    Constraint::Percentage(34), // Description
                    Constraint::Percentage(22), // Search
                    Constraint::Percentage(16), // Submit label
                ]
                .as_ref(),
            )
            .split(area);

        let in_form = self.state == AppState::Form;

        let title_style = if self.form_error == Some(Field::Title) {
            Style::default().fg(DARK_RED)
        } else if in_form && self.form.current_field == TITLE_FIELD {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let title_input = Paragraph::new(self.form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title")
                .border_style(title_style),
        );
        f.render_widget(title_input, chunks[0]);

        let desc_style = if self.form_error == Some(Field::Description) {
            Style::default().fg(DARK_RED)
        } else if in_form && self.form.current_field == DESCRIPTION_FIELD {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let desc_input = Paragraph::new(self.form.description.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Description")
                .border_style(desc_style),
        );
        f.render_widget(desc_input, chunks[1]);

        let search_style = if self.search_active {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let search_input = Paragraph::new(self.search.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search")
                .border_style(search_style),
        );
        f.render_widget(search_input, chunks[2]);

        let button = Paragraph::new(self.submit_label())
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(button, chunks[3]);

        // Place the terminal cursor in whichever input receives keys.
        if self.search_active {
            let x = chunks[2].x + 1 + self.search.cursor.min(chunks[2].width as usize) as u16;
            f.set_cursor_position((x, chunks[2].y + 1));
        } else if in_form {
            let chunk = if self.form.current_field == TITLE_FIELD {
                chunks[0]
            } else {
                chunks[1]
            };
            let field = self.form.current();
            let x = chunk.x + 1 + field.cursor.min(chunk.width as usize) as u16;
            f.set_cursor_position((x, chunk.y + 1));
        }
    }

    /// Render the searchable active task table.
    fn render_active_list(&mut self, f: &mut Frame, area: Rect) {
        let header_cells = ["ID", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .active_rows
            .iter()
            .filter_map(|&id| self.tasks.get(id))
            .map(|task| {
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(task.title.clone()),
                    Cell::from(task.description.clone()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),  // ID
            Constraint::Length(17), // Title
            Constraint::Min(25),    // Description
        ];

        let title = if self.tasks.search_query().is_empty() {
            format!("Active Tasks ({})", self.active_rows.len())
        } else {
            format!(
                "Active Tasks ({}/{}) - filtered by '{}'",
                self.active_rows.len(),
                self.tasks.active().len(),
                self.tasks.search_query()
            )
        };

        let border_style = if self.state == AppState::ActiveList {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.active_state);
    }

    /// Render the completed task table. Search never filters it.
    fn render_completed_list(&mut self, f: &mut Frame, area: Rect) {
        let header_cells = ["ID", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .tasks
            .visible_completed()
            .iter()
            .map(|task| {
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(task.title.clone()),
                    Cell::from(task.description.clone()),
                ])
                .style(Style::default().fg(Color::DarkGray))
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(17),
            Constraint::Min(25),
        ];

        let border_style = if self.state == AppState::CompletedList {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        "Completed Tasks ({})",
                        self.tasks.completed().len()
                    ))
                    .border_style(border_style),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.completed_state);
    }

    /// Render a confirmation dialog for deletions.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let title = self
            .pending_delete
            .and_then(|(id, _)| self.tasks.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the help screen.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from("Lists"),
            Line::from("  Up/Down     select task"),
            Line::from("  Tab         switch between active and completed"),
            Line::from("  a           add a task"),
            Line::from("  e           edit the selected active task"),
            Line::from("  c / Space   complete the selected active task"),
            Line::from("  d           delete the selected task (asks first)"),
            Line::from("  /           search active tasks"),
            Line::from("  q / Esc     quit"),
            Line::from(""),
            Line::from("Form"),
            Line::from("  Tab/Up/Down move between fields"),
            Line::from("  Enter       submit"),
            Line::from("  Esc         cancel"),
            Line::from(""),
            Line::from("Validation"),
            Line::from(format!(
                "  Title: {TITLE_MIN}-{TITLE_MAX} characters; letters, numbers and spaces"
            )),
            Line::from(format!("  Description: {DESC_MIN}-{DESC_MAX} characters")),
            Line::from(""),
            Line::from("Completed tasks can only be deleted; there is no reopen."),
        ];

        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    /// Render the status bar: the current notice, or contextual hints.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, style) = if let Some(notice) = &self.notice {
            let bg = match notice.kind {
                NoticeKind::Success => DARK_GREEN,
                NoticeKind::Error => DARK_RED,
            };
            (
                notice.text.clone(),
                Style::default().bg(bg).fg(Color::White),
            )
        } else {
            let hint = if self.search_active {
                "Search: type to filter, Enter to apply, Esc to clear".to_string()
            } else {
                match self.state {
                    AppState::ActiveList => {
                        "a add  e edit  c complete  d delete  / search  Tab completed  h help  q quit"
                            .to_string()
                    }
                    AppState::CompletedList => {
                        "d delete  Tab active list  h help  q quit".to_string()
                    }
                    AppState::Form => format!(
                        "{}: Tab next field, Enter to submit, Esc to cancel",
                        self.submit_label()
                    ),
                    AppState::Confirm => "Confirm Action".to_string(),
                    AppState::Help => "Help".to_string(),
                }
            };
            (hint, Style::default().bg(Color::DarkGray).fg(Color::White))
        };

        let status = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Render the single-page layout.
    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3), // header
                    Constraint::Length(3), // inputs
                    Constraint::Min(5),    // active list
                    Constraint::Length(9), // completed list
                ]
                .as_ref(),
            )
            .split(area);

        self.render_header(f, chunks[0]);
        self.render_inputs(f, chunks[1]);
        self.render_active_list(f, chunks[2]);
        self.render_completed_list(f, chunks[3]);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        if self.state == AppState::Help {
            self.render_help(f, chunks[0]);
        } else {
            self.render_main(f, chunks[0]);
            if self.state == AppState::Confirm {
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering, notice expiry and input processing until the
    /// user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.expire_notice();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
