//! Client-side state synchronization engine for kanban boards
//!
//! This crate holds the canonical client-side state for a kanban client
//! (boards containing ordered lists of ordered, drag-and-reorderable tasks)
//! and keeps it synchronized with a remote REST backend. Structural
//! mutations (reorder, cross-list move, delete) are applied optimistically
//! and rolled back atomically to a pre-mutation snapshot when the backend
//! rejects them; everything else is applied only after server confirmation.
//!
//! ## Overview
//!
//! - **One store = one board view** - [`BoardStore`] owns the lists/tasks of
//!   the board being looked at, plus the task-detail panel
//! - **Closed command protocol** - [`Command`] is a tagged union dispatched
//!   exhaustively; see [`BoardStore::dispatch`]
//! - **Dense positions** - after every structural mutation, each task's
//!   `position` equals its index in its list, recomputed by re-enumeration
//! - **Injected persistence** - the session token and consent flags live
//!   behind the [`persist::KeyValueStore`] port, not a global cookie jar
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use boardsync::{ApiClient, ApiConfig, BoardStore, Command, Notifier};
//! use boardsync::persist::MemoryStore;
//! use boardsync::types::BoardId;
//!
//! # async fn example() -> boardsync::Result<()> {
//! let api = ApiClient::new(&ApiConfig::from_env(), Arc::new(MemoryStore::new()))?;
//! let (notifier, mut notices) = Notifier::channel();
//! let store = BoardStore::new(api, notifier);
//!
//! store.dispatch(Command::FetchBoard { board_id: BoardId::from(1) }).await?;
//! store.dispatch(Command::FetchPriorities).await?;
//!
//! let mut changes = store.subscribe();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod error;
pub mod notify;
pub mod persist;
pub mod session;
pub mod store;
pub mod types;

pub use api::{ApiClient, SessionPayload};
pub use config::ApiConfig;
pub use error::{Result, SyncError};
pub use notify::{Notice, Notifier};
pub use session::{Session, SessionState, SessionUser};
pub use store::{BoardDirectory, BoardState, BoardStore, Command, SelectedTask};
