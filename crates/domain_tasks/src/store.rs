//! Task store: the active task list and the selection pointer

use std::collections::HashSet;

use core_kernel::TaskId;
use crate::task::Task;

/// Owns the fetched tasks and the currently selected task id
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected: Option<TaskId>,
    executed: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the task list with a fresh fetch
    ///
    /// The current selection survives if its id is still present; otherwise
    /// the first task (if any) becomes selected.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;

        let still_present = self
            .selected
            .as_ref()
            .map(|id| self.contains(id))
            .unwrap_or(false);

        if !still_present {
            self.selected = self.tasks.first().map(|t| t.id.clone());
        }
    }

    /// Active tasks in list order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up an active task
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Index of a task in list order
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Id of the selected task
    pub fn selected_id(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// The selected task
    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Selects a task. Returns false (and changes nothing) if the id is unknown.
    pub fn select(&mut self, id: &TaskId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Removes executed tasks from the active list
    ///
    /// Removed tasks are flagged completed and kept in the executed history.
    /// Clears the selection if the selected task was removed. Returns the ids
    /// that were actually removed, in list order.
    pub fn mark_executed(&mut self, ids: &HashSet<TaskId>) -> Vec<TaskId> {
        let (done, remaining): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| ids.contains(&t.id));

        self.tasks = remaining;

        if let Some(selected) = &self.selected {
            if ids.contains(selected) {
                self.selected = None;
            }
        }

        let removed: Vec<TaskId> = done.iter().map(|t| t.id.clone()).collect();
        self.executed.extend(done.into_iter().map(|mut t| {
            t.completed = true;
            t
        }));
        removed
    }

    /// Tasks executed during this session, oldest first
    pub fn executed(&self) -> &[Task] {
        &self.executed
    }
}
