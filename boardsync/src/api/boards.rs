//! Board endpoints

use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;
use crate::types::{Board, BoardId, BoardSummary, List};

/// Accessor for `/boards` endpoints
pub struct BoardsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl BoardsApi<'_> {
    /// GET /boards
    pub async fn fetch_boards(&self) -> Result<Vec<BoardSummary>> {
        let response = self.client.call(Method::GET, "/boards", None).await?;
        Ok(response.json().await?)
    }

    /// POST /boards
    pub async fn create_board(&self, board_name: &str) -> Result<BoardSummary> {
        let response = self
            .client
            .call(Method::POST, "/boards", Some(json!({ "boardName": board_name })))
            .await?;
        Ok(response.json().await?)
    }

    /// GET /boards/:id
    pub async fn fetch_board(&self, board_id: BoardId) -> Result<Board> {
        let response = self
            .client
            .call(Method::GET, &format!("/boards/{board_id}"), None)
            .await?;
        Ok(response.json().await?)
    }

    /// DELETE /boards/:id
    pub async fn delete_board(&self, board_id: BoardId) -> Result<()> {
        self.client
            .call(Method::DELETE, &format!("/boards/{board_id}"), None)
            .await?;
        Ok(())
    }

    /// POST /boards/:id/lists
    pub async fn create_board_list(&self, board_id: BoardId, title: &str) -> Result<List> {
        let response = self
            .client
            .call(
                Method::POST,
                &format!("/boards/{board_id}/lists"),
                Some(json!({ "title": title })),
            )
            .await?;
        Ok(response.json().await?)
    }
}
