//! Board-level types: Board, BoardSummary, List, Priority

use super::ids::{BoardId, ListId, PriorityId};
use super::task::Task;
use serde::{Deserialize, Serialize};

/// A board: the root of state for a single board view
///
/// A board exclusively owns its list sequence; each list exclusively owns
/// its task sequence. The order of `lists` is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
}

/// A board as it appears in the boards listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
}

/// An ordered list of tasks, owned by exactly one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl List {
    /// Create an empty list
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Index of a task within this list, if present
    pub fn task_index(&self, id: crate::types::TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Recompute every task's `position` as its index in the sequence
    ///
    /// Structural changes always re-enumerate the whole list rather than
    /// patching positions incrementally, so ranks can never drift.
    pub fn renumber(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.position = i;
        }
    }
}

/// A priority label in the shared lookup set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskId;

    fn task(id: i64, list: ListId, position: usize) -> Task {
        Task::new(TaskId::from(id), list, format!("t{id}"), position)
    }

    #[test]
    fn test_renumber_dense_zero_based() {
        let mut list = List::new(ListId::from(1), "Todo");
        list.tasks.push(task(1, list.id, 7));
        list.tasks.push(task(2, list.id, 7));
        list.tasks.push(task(3, list.id, 7));

        list.renumber();

        let positions: Vec<usize> = list.tasks.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_task_index() {
        let mut list = List::new(ListId::from(1), "Todo");
        list.tasks.push(task(1, list.id, 0));
        list.tasks.push(task(2, list.id, 1));

        assert_eq!(list.task_index(TaskId::from(2)), Some(1));
        assert_eq!(list.task_index(TaskId::from(9)), None);
    }

    #[test]
    fn test_board_deserialize_defaults() {
        let board: Board = serde_json::from_str(r#"{"id": 4, "title": "Sprint 1"}"#).unwrap();
        assert_eq!(board.id, BoardId::from(4));
        assert!(board.lists.is_empty());
        assert!(board.priorities.is_empty());
    }
}
