//! Core types for the sync engine

mod board;
mod ids;
mod task;

// Re-export all types
pub use board::{Board, BoardSummary, List, Priority};
pub use ids::{BoardId, ListId, PriorityId, TaskId, UserId};
pub use task::Task;
