//! Closed command protocol for the board store
//!
//! Commands form a tagged union dispatched with an exhaustive match, so a
//! new variant fails to compile until every dispatcher handles it.

use super::BoardStore;
use crate::error::Result;
use crate::types::{BoardId, ListId, PriorityId, TaskId};

/// A command against the board store
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchBoard {
        board_id: BoardId,
    },
    FetchPriorities,
    CreateList {
        board_id: BoardId,
        title: String,
    },
    DeleteList {
        list_id: ListId,
    },
    RenameList {
        list_id: ListId,
        title: String,
    },
    CreateTask {
        list_id: ListId,
        title: String,
    },
    DeleteTask {
        task_id: TaskId,
    },
    ReorderWithinList {
        list_id: ListId,
        from_index: usize,
        to_index: usize,
    },
    MoveAcrossLists {
        origin_list_id: ListId,
        dest_list_id: ListId,
        task_id: TaskId,
        dest_index: usize,
    },
    UpdateTaskPriority {
        task_id: TaskId,
        priority_id: PriorityId,
    },
    UpdateTaskTitle {
        task_id: TaskId,
        title: String,
    },
    UpdateTaskDescription {
        task_id: TaskId,
        description: String,
    },
    SelectTask {
        task_id: TaskId,
    },
    ResetSelection,
    ResetBoard,
}

impl BoardStore {
    /// Run a single command to completion
    pub async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::FetchBoard { board_id } => self.fetch_board(board_id).await,
            Command::FetchPriorities => self.fetch_priorities().await,
            Command::CreateList { board_id, title } => self.create_list(board_id, &title).await,
            Command::DeleteList { list_id } => self.delete_list(list_id).await,
            Command::RenameList { list_id, title } => self.rename_list(list_id, &title).await,
            Command::CreateTask { list_id, title } => self.create_task(list_id, &title).await,
            Command::DeleteTask { task_id } => self.delete_task(task_id).await,
            Command::ReorderWithinList {
                list_id,
                from_index,
                to_index,
            } => self.reorder_within_list(list_id, from_index, to_index).await,
            Command::MoveAcrossLists {
                origin_list_id,
                dest_list_id,
                task_id,
                dest_index,
            } => {
                self.move_across_lists(origin_list_id, dest_list_id, task_id, dest_index)
                    .await
            }
            Command::UpdateTaskPriority {
                task_id,
                priority_id,
            } => self.update_task_priority(task_id, priority_id).await,
            Command::UpdateTaskTitle { task_id, title } => {
                self.update_task_title(task_id, &title).await
            }
            Command::UpdateTaskDescription {
                task_id,
                description,
            } => self.update_task_description(task_id, &description).await,
            Command::SelectTask { task_id } => self.select_task(task_id).await,
            Command::ResetSelection => {
                self.reset_selection();
                Ok(())
            }
            Command::ResetBoard => {
                self.reset_board();
                Ok(())
            }
        }
    }
}
