//! Task type

use super::ids::{ListId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task/card on the kanban board
///
/// `position` is the dense zero-based rank of the task within its list and
/// must always equal the task's index in the containing list's sequence.
/// `priority` holds a value-copy of the priority label at assignment time,
/// not a live reference into the priority lookup set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Client-generated stable key for UI reconciliation
    #[serde(default)]
    pub uid: String,
    pub list_id: ListId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl Task {
    /// Create a new task with the given title, list and position
    pub fn new(id: TaskId, list_id: ListId, title: impl Into<String>, position: usize) -> Self {
        Self {
            id,
            uid: Self::generate_uid(),
            list_id,
            title: title.into(),
            description: None,
            position,
            created_at: None,
            priority: None,
        }
    }

    /// Assign a fresh stable key if the server payload did not carry one
    pub fn ensure_uid(&mut self) {
        if self.uid.is_empty() {
            self.uid = Self::generate_uid();
        }
    }

    fn generate_uid() -> String {
        ulid::Ulid::new().to_string()
    }
}
