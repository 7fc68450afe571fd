//! In-memory task list controller.
//!
//! `TaskList` owns all task state for the session and is the only path by
//! which it changes. Tasks live in one of two ordered lists: active
//! (insertion order, minus removals) or completed (append order). Moving a
//! task between lists is a value move with the `completed` flag rewritten;
//! the id travels with the value.
//!
//! Everything here is addressed by task id. The presentation layer resolves
//! row selections to ids against current state, so a stale position can
//! never reach the model.

use thiserror::Error;

use crate::task::{ListKind, Task};
use crate::validate::{validate, ValidationError};

/// Addressed a task id that is not in the named list.
///
/// With id-based addressing this is a caller bug rather than a runtime
/// condition; it is surfaced instead of panicking so a buggy caller
/// degrades to a visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no task {id} in the {list} list")]
pub struct PreconditionViolation {
    pub id: u64,
    pub list: ListKind,
}

/// Which path a successful [`TaskList::submit`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Added,
    Updated,
}

/// Title/description pair handed back by [`TaskList::begin_edit`] so the
/// form can pre-populate its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

/// Owns the session's task state and every operation over it.
#[derive(Debug, Default)]
pub struct TaskList {
    active: Vec<Task>,
    completed: Vec<Task>,
    edit_target: Option<u64>,
    search_query: String,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Validate and accept a submission.
    ///
    /// While an edit target is set, the submission overwrites that task's
    /// fields in place and leaves edit mode; otherwise it appends a new
    /// active task. A rejected submission changes nothing, including the
    /// edit target.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's [`ValidationError`].
    pub fn submit(
        &mut self,
        title: &str,
        description: &str,
    ) -> Result<Submitted, ValidationError> {
        validate(title, description)?;

        if let Some(target) = self.edit_target.take() {
            // The target is cleared whenever its task leaves the active
            // list; a miss here falls through to append.
            if let Some(task) = self.active.iter_mut().find(|t| t.id == target) {
                task.title = title.to_string();
                task.description = description.to_string();
                task.completed = false;
                return Ok(Submitted::Updated);
            }
        }

        let id = self.allocate_id();
        self.active.push(Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        });
        Ok(Submitted::Added)
    }

    /// Start editing the given active task.
    ///
    /// Overwrites any previous edit target. Returns the task's current
    /// fields for the form to pre-populate; no validation happens here.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] if the id is not in the active
    /// list; the previous edit target is left untouched.
    pub fn begin_edit(&mut self, id: u64) -> Result<Draft, PreconditionViolation> {
        let task = self
            .active
            .iter()
            .find(|t| t.id == id)
            .ok_or(PreconditionViolation {
                id,
                list: ListKind::Active,
            })?;
        let draft = Draft {
            title: task.title.clone(),
            description: task.description.clone(),
        };
        self.edit_target = Some(id);
        Ok(draft)
    }

    /// Leave edit mode without submitting; the next submit appends.
    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    /// Remove a task from the named list and return it.
    ///
    /// The confirmation gate lives with the caller; this method is only
    /// reached once the user has confirmed. Deleting the current edit
    /// target leaves edit mode.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] if the id is not in the named
    /// list; nothing changes.
    pub fn delete(&mut self, id: u64, from: ListKind) -> Result<Task, PreconditionViolation> {
        let list = match from {
            ListKind::Active => &mut self.active,
            ListKind::Completed => &mut self.completed,
        };
        let pos = list
            .iter()
            .position(|t| t.id == id)
            .ok_or(PreconditionViolation { id, list: from })?;
        let task = list.remove(pos);
        if self.edit_target == Some(id) {
            self.edit_target = None;
        }
        Ok(task)
    }

    /// Move an active task to the end of the completed list.
    ///
    /// Only the active -> completed direction exists; a completed task can
    /// only be deleted. Completing the current edit target leaves edit
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] if the id is not in the active
    /// list; nothing changes.
    pub fn toggle_complete(&mut self, id: u64) -> Result<(), PreconditionViolation> {
        let pos = self
            .active
            .iter()
            .position(|t| t.id == id)
            .ok_or(PreconditionViolation {
                id,
                list: ListKind::Active,
            })?;
        let mut task = self.active.remove(pos);
        task.completed = true;
        self.completed.push(task);
        if self.edit_target == Some(id) {
            self.edit_target = None;
        }
        Ok(())
    }

    /// Replace the search query. No validation; empty matches everything.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Active tasks matching the current search query, in list order.
    ///
    /// Matches case-insensitively against title and description. The
    /// completed flag is re-checked on the way out even though the active
    /// list never stores completed tasks.
    pub fn visible_active(&self) -> impl Iterator<Item = &Task> + '_ {
        let needle = self.search_query.to_lowercase();
        self.active.iter().filter(move |t| {
            !t.completed
                && (t.title.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle))
        })
    }

    /// The full completed list; search does not apply to it.
    pub fn visible_completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// Id of the task currently being edited, if any.
    pub fn edit_target(&self) -> Option<u64> {
        self.edit_target
    }

    /// Look up a task by id in either list.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;

    fn seeded() -> TaskList {
        let mut list = TaskList::new();
        list.submit("Buy Milk", "Two litres semi").unwrap();
        list.submit("Walk Dog", "Around the park").unwrap();
        list
    }

    // --- submit tests ---

    #[test]
    fn submit_appends_active_task() {
        let mut list = TaskList::new();
        let outcome = list.submit("Buy Groceries", "Milk eggs and bread").unwrap();
        assert_eq!(outcome, Submitted::Added);
        assert_eq!(list.active().len(), 1);
        assert!(list.completed().is_empty());
        let task = &list.active()[0];
        assert_eq!(task.title, "Buy Groceries");
        assert_eq!(task.description, "Milk eggs and bread");
        assert!(!task.completed);
    }

    #[test]
    fn submit_rejects_invalid_title_and_changes_nothing() {
        let mut list = seeded();
        let err = list.submit("Hi", "Milk eggs and bread").unwrap_err();
        assert_eq!(err, ValidationError::TitleTooShort);
        assert_eq!(list.active().len(), 2);
        assert!(list.completed().is_empty());
    }

    #[test]
    fn submit_rejects_invalid_description_and_changes_nothing() {
        let mut list = seeded();
        let err = list.submit("Buy Bread", "abc").unwrap_err();
        assert_eq!(err, ValidationError::DescriptionTooShort);
        assert_eq!(list.active().len(), 2);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut list = seeded();
        list.submit("Water Plants", "Front and back garden").unwrap();
        let ids: Vec<u64> = list.active().iter().map(|t| t.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    // --- toggle tests ---

    #[test]
    fn toggle_moves_task_to_completed_tail() {
        let mut list = seeded();
        let first = list.active()[0].clone();
        list.toggle_complete(first.id).unwrap();

        assert_eq!(list.active().len(), 1);
        assert_eq!(list.completed().len(), 1);
        let moved = &list.completed()[0];
        assert_eq!(moved.id, first.id);
        assert_eq!(moved.title, first.title);
        assert_eq!(moved.description, first.description);
        assert!(moved.completed);
    }

    #[test]
    fn toggle_appends_in_completion_order() {
        let mut list = seeded();
        let second = list.active()[1].id;
        let first = list.active()[0].id;
        list.toggle_complete(second).unwrap();
        list.toggle_complete(first).unwrap();
        let order: Vec<u64> = list.completed().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn toggle_is_one_directional() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.toggle_complete(id).unwrap();
        // The task is no longer active, so a second toggle is a
        // precondition violation and the completed list keeps it.
        let err = list.toggle_complete(id).unwrap_err();
        assert_eq!(
            err,
            PreconditionViolation {
                id,
                list: ListKind::Active
            }
        );
        assert_eq!(list.completed().len(), 1);
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let mut list = seeded();
        assert!(list.toggle_complete(99).is_err());
        assert_eq!(list.active().len(), 2);
        assert!(list.completed().is_empty());
    }

    // --- delete tests ---

    #[test]
    fn delete_removes_exactly_one_active_task() {
        let mut list = seeded();
        let id = list.active()[0].id;
        let removed = list.delete(id, ListKind::Active).unwrap();
        assert_eq!(removed.title, "Buy Milk");
        assert_eq!(list.active().len(), 1);
        assert_eq!(list.active()[0].title, "Walk Dog");
        assert!(list.completed().is_empty());
    }

    #[test]
    fn delete_removes_from_completed_list() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.toggle_complete(id).unwrap();
        list.delete(id, ListKind::Completed).unwrap();
        assert!(list.completed().is_empty());
        assert_eq!(list.active().len(), 1);
    }

    #[test]
    fn delete_checks_the_named_list_only() {
        let mut list = seeded();
        let id = list.active()[0].id;
        let err = list.delete(id, ListKind::Completed).unwrap_err();
        assert_eq!(
            err,
            PreconditionViolation {
                id,
                list: ListKind::Completed
            }
        );
        assert_eq!(list.active().len(), 2);
    }

    // --- search tests ---

    #[test]
    fn search_matches_title_case_insensitively() {
        let mut list = seeded();
        list.set_search_query("mil");
        let visible: Vec<&str> = list.visible_active().map(|t| t.title.as_str()).collect();
        assert_eq!(visible, vec!["Buy Milk"]);
    }

    #[test]
    fn search_matches_description_too() {
        let mut list = seeded();
        list.set_search_query("PARK");
        let visible: Vec<&str> = list.visible_active().map(|t| t.title.as_str()).collect();
        assert_eq!(visible, vec!["Walk Dog"]);
    }

    #[test]
    fn empty_query_matches_everything_in_order() {
        let list = seeded();
        let visible: Vec<&str> = list.visible_active().map(|t| t.title.as_str()).collect();
        assert_eq!(visible, vec!["Buy Milk", "Walk Dog"]);
    }

    #[test]
    fn same_query_twice_yields_identical_output() {
        let mut list = seeded();
        list.set_search_query("dog");
        let first: Vec<u64> = list.visible_active().map(|t| t.id).collect();
        list.set_search_query("dog");
        let second: Vec<u64> = list.visible_active().map(|t| t.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn search_does_not_filter_completed_list() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.toggle_complete(id).unwrap();
        list.set_search_query("no such task");
        assert!(list.visible_active().next().is_none());
        assert_eq!(list.visible_completed().len(), 1);
    }

    // --- edit tests ---

    #[test]
    fn begin_edit_prefills_draft_and_sets_target() {
        let mut list = seeded();
        let id = list.active()[0].id;
        let draft = list.begin_edit(id).unwrap();
        assert_eq!(draft.title, "Buy Milk");
        assert_eq!(draft.description, "Two litres semi");
        assert_eq!(list.edit_target(), Some(id));
    }

    #[test]
    fn begin_edit_overwrites_previous_target() {
        let mut list = seeded();
        let first = list.active()[0].id;
        let second = list.active()[1].id;
        list.begin_edit(first).unwrap();
        list.begin_edit(second).unwrap();
        assert_eq!(list.edit_target(), Some(second));
    }

    #[test]
    fn begin_edit_unknown_id_keeps_previous_target() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        assert!(list.begin_edit(99).is_err());
        assert_eq!(list.edit_target(), Some(id));
    }

    #[test]
    fn edit_then_submit_replaces_in_place() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        let outcome = list.submit("Buy Oat Milk", "One litre barista").unwrap();
        assert_eq!(outcome, Submitted::Updated);
        assert_eq!(list.active().len(), 2);
        let task = &list.active()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.title, "Buy Oat Milk");
        assert_eq!(task.description, "One litre barista");
        assert!(!task.completed);
        assert_eq!(list.edit_target(), None);
    }

    #[test]
    fn submit_after_update_appends_again() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        list.submit("Buy Oat Milk", "One litre barista").unwrap();
        let outcome = list.submit("Clean Desk", "File the paper stack").unwrap();
        assert_eq!(outcome, Submitted::Added);
        assert_eq!(list.active().len(), 3);
    }

    #[test]
    fn rejected_submit_keeps_edit_target() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        assert!(list.submit("x", "y").is_err());
        assert_eq!(list.edit_target(), Some(id));
        // A corrected resubmission still updates in place.
        assert_eq!(
            list.submit("Buy Oat Milk", "One litre barista").unwrap(),
            Submitted::Updated
        );
    }

    #[test]
    fn cancel_edit_makes_next_submit_append() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        list.cancel_edit();
        let outcome = list.submit("Buy Oat Milk", "One litre barista").unwrap();
        assert_eq!(outcome, Submitted::Added);
        assert_eq!(list.active().len(), 3);
        assert_eq!(list.active()[0].title, "Buy Milk");
    }

    #[test]
    fn deleting_edit_target_leaves_edit_mode() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        list.delete(id, ListKind::Active).unwrap();
        assert_eq!(list.edit_target(), None);
        assert_eq!(
            list.submit("Buy Oat Milk", "One litre barista").unwrap(),
            Submitted::Added
        );
    }

    #[test]
    fn completing_edit_target_leaves_edit_mode() {
        let mut list = seeded();
        let id = list.active()[0].id;
        list.begin_edit(id).unwrap();
        list.toggle_complete(id).unwrap();
        assert_eq!(list.edit_target(), None);
    }

    #[test]
    fn deleting_other_task_keeps_edit_target() {
        let mut list = seeded();
        let first = list.active()[0].id;
        let second = list.active()[1].id;
        list.begin_edit(first).unwrap();
        list.delete(second, ListKind::Active).unwrap();
        assert_eq!(list.edit_target(), Some(first));
    }

    // --- lookup tests ---

    #[test]
    fn get_finds_tasks_in_both_lists() {
        let mut list = seeded();
        let id = list.active()[0].id;
        assert_eq!(list.get(id).unwrap().title, "Buy Milk");
        list.toggle_complete(id).unwrap();
        assert!(list.get(id).unwrap().completed);
        assert!(list.get(99).is_none());
    }
}
