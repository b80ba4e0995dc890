//! Error types for the sync engine

use thiserror::Error;

use crate::types::{BoardId, ListId, PriorityId, TaskId};

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while synchronizing client state
#[derive(Debug, Error)]
pub enum SyncError {
    /// The backend rejected a request with a non-2xx status
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// Board not found in client state
    #[error("board not found: {id}")]
    BoardNotFound { id: BoardId },

    /// List not found in client state
    #[error("list not found: {id}")]
    ListNotFound { id: ListId },

    /// Task not found in client state
    #[error("task not found: {id}")]
    TaskNotFound { id: TaskId },

    /// Priority not found in the loaded lookup set
    #[error("priority not found: {id}")]
    PriorityNotFound { id: PriorityId },

    /// Index outside the task sequence of a list
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A structural mutation is already in flight for the list
    #[error("structural mutation already in flight for list {list}")]
    MutationInFlight { list: ListId },

    /// HTTP transport error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the persistence port
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create an API error from a status code and server message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
