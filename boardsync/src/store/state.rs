//! Normalized board state and its pure mutation helpers

use crate::types::{Board, BoardId, List, ListId, Priority, PriorityId, Task, TaskId};

/// Canonical client-side state for a single board view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub id: BoardId,
    pub title: String,
    pub lists: Vec<List>,
    pub priorities: Vec<Priority>,
    pub selected: SelectedTask,
}

/// State of the task-detail panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedTask {
    pub visible: bool,
    pub loading: bool,
    pub info: Option<Task>,
}

impl BoardState {
    /// Find a list by ID
    pub fn find_list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Find a list by ID (mutable)
    pub fn find_list_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    /// The list currently containing a task
    pub fn list_of_task(&self, task_id: TaskId) -> Option<&List> {
        self.lists
            .iter()
            .find(|l| l.tasks.iter().any(|t| t.id == task_id))
    }

    /// Find a priority in the lookup set
    pub fn find_priority(&self, id: PriorityId) -> Option<&Priority> {
        self.priorities.iter().find(|p| p.id == id)
    }

    /// Apply a confirmed field change to a task wherever it is held:
    /// in its list and, if it is the open one, in the detail panel.
    pub fn update_task(&mut self, task_id: TaskId, apply: impl Fn(&mut Task)) {
        for list in &mut self.lists {
            for task in &mut list.tasks {
                if task.id == task_id {
                    apply(task);
                }
            }
        }
        if let Some(info) = self.selected.info.as_mut() {
            if info.id == task_id {
                apply(info);
            }
        }
    }

    /// Replace board identity, lists and (when provided) priorities from a
    /// fetched board, normalizing task order
    pub fn load_board(&mut self, board: Board) {
        self.id = board.id;
        self.title = board.title;
        self.lists = board.lists;
        if !board.priorities.is_empty() {
            self.priorities = board.priorities;
        }
        self.normalize();
    }

    /// Sort every list by the server-reported positions, then re-enumerate
    /// so the dense zero-based invariant holds regardless of what arrived
    pub fn normalize(&mut self) {
        for list in &mut self.lists {
            list.tasks.sort_by_key(|t| t.position);
            for task in &mut list.tasks {
                task.list_id = list.id;
                task.ensure_uid();
            }
            list.renumber();
        }
    }
}
