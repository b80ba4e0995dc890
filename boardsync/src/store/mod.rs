//! Normalized state store with the optimistic-update/rollback protocol
//!
//! The store holds the canonical client-side board state and exposes the
//! command protocol. Structural commands (reorder, move, delete-task) apply
//! an optimistic local mutation, issue the matching remote call, and roll
//! back to the captured snapshot if the backend rejects it; every other
//! mutation is applied only from the server's confirmed response.
//!
//! Locking discipline: `state` is a plain mutex locked only for synchronous
//! mutation sections, never across an await. Commands therefore interleave
//! only at remote-call boundaries, and the per-list [`guard`] tickets keep
//! two structural mutations from capturing each other's unconfirmed state.

mod command;
mod directory;
mod guard;
mod state;

pub use command::Command;
pub use directory::BoardDirectory;
pub use state::{BoardState, SelectedTask};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, error};

use crate::api::ApiClient;
use crate::error::{Result, SyncError};
use crate::notify::Notifier;
use crate::types::{BoardId, List, ListId, Priority, PriorityId, TaskId};

use guard::MutationGuards;

/// The canonical client-side store for a single board view
pub struct BoardStore {
    api: ApiClient,
    notifier: Notifier,
    state: Mutex<BoardState>,
    guards: MutationGuards,
    version: watch::Sender<u64>,
    epoch: AtomicU64,
}

impl BoardStore {
    /// Create an empty store
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            api,
            notifier,
            state: Mutex::new(BoardState::default()),
            guards: MutationGuards::new(),
            version,
            epoch: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Subscribe / select
    // =========================================================================

    /// Subscribe to state changes; the receiver yields a bumped version
    /// counter after every committed mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Clone out the full current state
    pub fn snapshot(&self) -> BoardState {
        self.state.lock().unwrap().clone()
    }

    /// The current board id
    pub fn board_id(&self) -> BoardId {
        self.state.lock().unwrap().id
    }

    /// The current board title
    pub fn board_title(&self) -> String {
        self.state.lock().unwrap().title.clone()
    }

    /// The current list sequence
    pub fn lists(&self) -> Vec<List> {
        self.state.lock().unwrap().lists.clone()
    }

    /// The loaded priority lookup set
    pub fn priorities(&self) -> Vec<Priority> {
        self.state.lock().unwrap().priorities.clone()
    }

    /// The task-detail panel state
    pub fn selected_task(&self) -> SelectedTask {
        self.state.lock().unwrap().selected.clone()
    }

    fn publish(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    // =========================================================================
    // Epoch (mounted-view check)
    // =========================================================================

    /// Epoch at the start of a command; completion paths compare against it
    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Whether the board view a command started under is still the live one
    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    // =========================================================================
    // Read commands
    // =========================================================================

    /// Fetch a board and replace the current view state with it
    ///
    /// A failure is fatal for the view: the UI is told to route to its
    /// not-found page rather than retry.
    pub async fn fetch_board(&self, board_id: BoardId) -> Result<()> {
        let epoch = self.epoch();

        match self.api.boards().fetch_board(board_id).await {
            Ok(board) => {
                if self.is_current(epoch) {
                    self.state.lock().unwrap().load_board(board);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                error!(%board_id, %err, "board fetch failed");
                self.notifier.fatal_not_found();
                Err(err)
            }
        }
    }

    /// Fetch the shared priority lookup set
    ///
    /// Read failures are diagnostics only; the loaded set stays unchanged.
    pub async fn fetch_priorities(&self) -> Result<()> {
        let epoch = self.epoch();

        match self.api.priorities().fetch_priorities().await {
            Ok(priorities) => {
                if self.is_current(epoch) {
                    self.state.lock().unwrap().priorities = priorities;
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                error!(%err, "priorities fetch failed");
                Err(err)
            }
        }
    }

    // =========================================================================
    // List commands (applied after server confirmation)
    // =========================================================================

    /// Create a list on the current board; appended only once the server
    /// returns it
    pub async fn create_list(&self, board_id: BoardId, title: &str) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            if state.id != board_id {
                return Err(SyncError::BoardNotFound { id: board_id });
            }
        }
        let epoch = self.epoch();

        match self.api.boards().create_board_list(board_id, title).await {
            Ok(mut list) => {
                self.notifier.success("Your list has been created");
                if self.is_current(epoch) {
                    for task in &mut list.tasks {
                        task.ensure_uid();
                    }
                    let mut state = self.state.lock().unwrap();
                    state.lists.push(list);
                    drop(state);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem creating your list");
                Err(err)
            }
        }
    }

    /// Delete a list; removed locally only once the server confirms
    pub async fn delete_list(&self, list_id: ListId) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            if state.find_list(list_id).is_none() {
                return Err(SyncError::ListNotFound { id: list_id });
            }
        }
        let epoch = self.epoch();

        match self.api.lists().delete_list(list_id).await {
            Ok(()) => {
                self.notifier.info("List deleted successfully");
                if self.is_current(epoch) {
                    let mut state = self.state.lock().unwrap();
                    state.lists.retain(|l| l.id != list_id);
                    drop(state);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem deleting your list");
                Err(err)
            }
        }
    }

    /// Rename a list, applying the server-confirmed title
    pub async fn rename_list(&self, list_id: ListId, title: &str) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            if state.find_list(list_id).is_none() {
                return Err(SyncError::ListNotFound { id: list_id });
            }
        }
        let epoch = self.epoch();

        match self.api.lists().edit_list_title(list_id, title).await {
            Ok(confirmed) => {
                if self.is_current(epoch) {
                    let mut state = self.state.lock().unwrap();
                    if let Some(list) = state.find_list_mut(list_id) {
                        list.title = confirmed;
                    }
                    drop(state);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem renaming your list");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Task commands
    // =========================================================================

    /// Create a task in a list; appended only once the server returns it
    pub async fn create_task(&self, list_id: ListId, title: &str) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            if state.find_list(list_id).is_none() {
                return Err(SyncError::ListNotFound { id: list_id });
            }
        }
        let epoch = self.epoch();

        match self.api.lists().create_list_task(list_id, title).await {
            Ok(mut task) => {
                self.notifier.success("Your task has been created successfully");
                if self.is_current(epoch) {
                    task.ensure_uid();
                    task.list_id = list_id;
                    let mut state = self.state.lock().unwrap();
                    if let Some(list) = state.find_list_mut(list_id) {
                        list.tasks.push(task);
                        list.renumber();
                    }
                    drop(state);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem creating your task");
                Err(err)
            }
        }
    }

    /// Delete a task: removed from its list immediately, reinserted from the
    /// pre-mutation snapshot if the server rejects the delete
    pub async fn delete_task(&self, task_id: TaskId) -> Result<()> {
        let list_id = {
            let state = self.state.lock().unwrap();
            state
                .list_of_task(task_id)
                .map(|l| l.id)
                .ok_or(SyncError::TaskNotFound { id: task_id })?
        };
        let _ticket = self.guards.acquire(&[list_id])?;
        let epoch = self.epoch();

        let snapshot = {
            let mut state = self.state.lock().unwrap();
            let snapshot = state.lists.clone();
            if let Some(list) = state.find_list_mut(list_id) {
                list.tasks.retain(|t| t.id != task_id);
                list.renumber();
            }
            snapshot
        };
        self.publish();

        match self.api.tasks().delete_task(task_id).await {
            Ok(()) => {
                self.notifier.info("Task deleted successfully");
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem deleting your task");
                if self.is_current(epoch) {
                    self.state.lock().unwrap().lists = snapshot;
                    self.publish();
                }
                Err(err)
            }
        }
    }

    /// Reorder a task within its list
    ///
    /// Optimistic: the task is spliced to its new index and the whole list
    /// re-enumerated before the sorted id order is posted. A rejection
    /// restores the list's pre-mutation task sequence.
    pub async fn reorder_within_list(
        &self,
        list_id: ListId,
        from_index: usize,
        to_index: usize,
    ) -> Result<()> {
        let _ticket = self.guards.acquire(&[list_id])?;
        let epoch = self.epoch();

        let (snapshot, order) = {
            let mut state = self.state.lock().unwrap();
            let list = state
                .find_list_mut(list_id)
                .ok_or(SyncError::ListNotFound { id: list_id })?;
            let len = list.tasks.len();
            if from_index >= len {
                return Err(SyncError::IndexOutOfBounds {
                    index: from_index,
                    len,
                });
            }
            if to_index >= len {
                return Err(SyncError::IndexOutOfBounds {
                    index: to_index,
                    len,
                });
            }

            let snapshot = list.tasks.clone();
            let task = list.tasks.remove(from_index);
            list.tasks.insert(to_index, task);
            list.renumber();

            let order: Vec<TaskId> = list.tasks.iter().map(|t| t.id).collect();
            (snapshot, order)
        };
        self.publish();
        debug!(%list_id, from_index, to_index, "reordered optimistically");

        match self.api.lists().sort_list_tasks(list_id, &order).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notifier.error("There was a problem updating your task");
                if self.is_current(epoch) {
                    let mut state = self.state.lock().unwrap();
                    if let Some(list) = state.find_list_mut(list_id) {
                        list.tasks = snapshot;
                    }
                    drop(state);
                    self.publish();
                }
                Err(err)
            }
        }
    }

    /// Move a task to another list at a given index
    ///
    /// Optimistic-then-confirmed, and the one command with genuine
    /// all-or-nothing rollback: the full prior `lists` snapshot is captured
    /// before the move, and any rejection restores it wholesale, so either
    /// the move is visible or the exact pre-move state is.
    pub async fn move_across_lists(
        &self,
        origin_list_id: ListId,
        dest_list_id: ListId,
        task_id: TaskId,
        dest_index: usize,
    ) -> Result<()> {
        let _ticket = self.guards.acquire(&[origin_list_id, dest_list_id])?;
        let epoch = self.epoch();

        let snapshot = {
            let mut state = self.state.lock().unwrap();

            let origin = state
                .find_list(origin_list_id)
                .ok_or(SyncError::ListNotFound { id: origin_list_id })?;
            let task_index = origin
                .task_index(task_id)
                .ok_or(SyncError::TaskNotFound { id: task_id })?;
            let dest = state
                .find_list(dest_list_id)
                .ok_or(SyncError::ListNotFound { id: dest_list_id })?;
            // When origin and destination coincide the task is removed
            // before reinsertion, so the last valid slot is len - 1.
            let insert_cap = if origin_list_id == dest_list_id {
                dest.tasks.len().saturating_sub(1)
            } else {
                dest.tasks.len()
            };
            if dest_index > insert_cap {
                return Err(SyncError::IndexOutOfBounds {
                    index: dest_index,
                    len: insert_cap,
                });
            }

            let snapshot = state.lists.clone();

            let mut task = {
                let origin = state
                    .find_list_mut(origin_list_id)
                    .ok_or(SyncError::ListNotFound { id: origin_list_id })?;
                let task = origin.tasks.remove(task_index);
                origin.renumber();
                task
            };
            task.list_id = dest_list_id;

            let dest = state
                .find_list_mut(dest_list_id)
                .ok_or(SyncError::ListNotFound { id: dest_list_id })?;
            dest.tasks.insert(dest_index, task);
            dest.renumber();

            snapshot
        };
        self.publish();
        debug!(%task_id, %origin_list_id, %dest_list_id, dest_index, "moved optimistically");

        match self
            .api
            .tasks()
            .update_task_list(task_id, dest_list_id, dest_index)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notifier.error("There was a problem updating your task");
                if self.is_current(epoch) {
                    self.state.lock().unwrap().lists = snapshot;
                    self.publish();
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Task field commands (applied after server confirmation)
    // =========================================================================

    /// Update a task's priority to a value-copy of the looked-up label
    ///
    /// The label string is snapshotted at assignment: renaming the priority
    /// later does not relabel tasks already holding the old value.
    pub async fn update_task_priority(
        &self,
        task_id: TaskId,
        priority_id: PriorityId,
    ) -> Result<()> {
        let label = {
            let state = self.state.lock().unwrap();
            if state.list_of_task(task_id).is_none() {
                return Err(SyncError::TaskNotFound { id: task_id });
            }
            state
                .find_priority(priority_id)
                .map(|p| p.value.clone())
                .ok_or(SyncError::PriorityNotFound { id: priority_id })?
        };
        let epoch = self.epoch();
        self.set_panel_loading_if(task_id, true);

        let result = self
            .api
            .tasks()
            .update_task_priority(task_id, priority_id)
            .await;

        match result {
            Ok(()) => {
                if self.is_current(epoch) {
                    let mut state = self.state.lock().unwrap();
                    state.update_task(task_id, |t| t.priority = Some(label.clone()));
                    drop(state);
                }
                self.set_panel_loading_if(task_id, false);
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.set_panel_loading_if(task_id, false);
                self.publish();
                self.notifier.error("There was a problem updating your task");
                Err(err)
            }
        }
    }

    /// Update a task's title, applied once the server confirms
    pub async fn update_task_title(&self, task_id: TaskId, title: &str) -> Result<()> {
        self.update_task_field(task_id, title, FieldKind::Title).await
    }

    /// Update a task's description, applied once the server confirms
    pub async fn update_task_description(&self, task_id: TaskId, description: &str) -> Result<()> {
        self.update_task_field(task_id, description, FieldKind::Description)
            .await
    }

    async fn update_task_field(&self, task_id: TaskId, value: &str, kind: FieldKind) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            let in_lists = state.list_of_task(task_id).is_some();
            let in_panel = state
                .selected
                .info
                .as_ref()
                .is_some_and(|t| t.id == task_id);
            if !in_lists && !in_panel {
                return Err(SyncError::TaskNotFound { id: task_id });
            }
        }
        let epoch = self.epoch();
        self.set_panel_loading_if(task_id, true);

        let result = match kind {
            FieldKind::Title => self.api.tasks().update_task_title(task_id, value).await,
            FieldKind::Description => {
                self.api
                    .tasks()
                    .update_task_description(task_id, value)
                    .await
            }
        };

        match result {
            Ok(()) => {
                if self.is_current(epoch) {
                    let value = value.to_string();
                    let mut state = self.state.lock().unwrap();
                    state.update_task(task_id, |t| match kind {
                        FieldKind::Title => t.title = value.clone(),
                        FieldKind::Description => t.description = Some(value.clone()),
                    });
                    drop(state);
                }
                self.set_panel_loading_if(task_id, false);
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.set_panel_loading_if(task_id, false);
                self.publish();
                self.notifier.error("There was a problem updating your task");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Task-detail panel
    // =========================================================================

    /// Open the detail panel for a task and fetch its full record
    pub async fn select_task(&self, task_id: TaskId) -> Result<()> {
        let epoch = self.epoch();
        {
            let mut state = self.state.lock().unwrap();
            state.selected.visible = true;
            state.selected.loading = true;
        }
        self.publish();

        match self.api.tasks().fetch_task(task_id).await {
            Ok(mut task) => {
                if self.is_current(epoch) {
                    task.ensure_uid();
                    let mut state = self.state.lock().unwrap();
                    state.selected.loading = false;
                    state.selected.info = Some(task);
                    drop(state);
                    self.publish();
                }
                Ok(())
            }
            Err(err) => {
                if self.is_current(epoch) {
                    self.state.lock().unwrap().selected.loading = false;
                    self.publish();
                }
                self.notifier.error("There was a problem loading your task");
                Err(err)
            }
        }
    }

    /// Close the detail panel and drop its task copy
    pub fn reset_selection(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.selected = SelectedTask::default();
        }
        self.publish();
    }

    /// Reset the whole view state to defaults, e.g. when navigating away
    ///
    /// Bumps the epoch so completion callbacks of still-in-flight commands
    /// become no-ops instead of mutating the next view's state.
    pub fn reset_board(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.lock().unwrap();
            *state = BoardState::default();
        }
        self.publish();
    }

    fn set_panel_loading_if(&self, task_id: TaskId, loading: bool) {
        let mut state = self.state.lock().unwrap();
        let matches = state
            .selected
            .info
            .as_ref()
            .is_some_and(|t| t.id == task_id);
        if matches {
            state.selected.loading = loading;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Title,
    Description,
}
