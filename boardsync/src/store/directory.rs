//! Boards listing: the directory of boards the user can open

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::error;

use crate::api::ApiClient;
use crate::error::Result;
use crate::notify::Notifier;
use crate::types::{BoardId, BoardSummary};

/// State backing the boards overview page
pub struct BoardDirectory {
    api: ApiClient,
    notifier: Notifier,
    boards: Mutex<Vec<BoardSummary>>,
    version: watch::Sender<u64>,
}

impl BoardDirectory {
    /// Create an empty directory
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            api,
            notifier,
            boards: Mutex::new(Vec::new()),
            version,
        }
    }

    /// Subscribe to directory changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// The current board summaries
    pub fn boards(&self) -> Vec<BoardSummary> {
        self.boards.lock().unwrap().clone()
    }

    fn publish(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    /// Fetch all boards, replacing the listing
    pub async fn fetch_boards(&self) -> Result<()> {
        match self.api.boards().fetch_boards().await {
            Ok(boards) => {
                *self.boards.lock().unwrap() = boards;
                self.publish();
                Ok(())
            }
            Err(err) => {
                error!(%err, "boards fetch failed");
                Err(err)
            }
        }
    }

    /// Create a board, appending the server-returned summary
    pub async fn create_board(&self, title: &str) -> Result<BoardSummary> {
        match self.api.boards().create_board(title).await {
            Ok(board) => {
                self.notifier.success("Your board has been created");
                self.boards.lock().unwrap().push(board.clone());
                self.publish();
                Ok(board)
            }
            Err(err) => {
                self.notifier.error("There was a problem creating your board");
                Err(err)
            }
        }
    }

    /// Delete a board, filtering it out of the listing on confirmation
    pub async fn delete_board(&self, board_id: BoardId) -> Result<()> {
        match self.api.boards().delete_board(board_id).await {
            Ok(()) => {
                self.notifier.info("Board deleted successfully");
                self.boards.lock().unwrap().retain(|b| b.id != board_id);
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.notifier.error("There was a problem deleting your board");
                Err(err)
            }
        }
    }
}
