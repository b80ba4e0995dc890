//! List endpoints

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;
use crate::types::{ListId, Task, TaskId};

/// Envelope for task creation: the backend wraps the new task in `result`
#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    result: Task,
}

/// Envelope for a rename: the backend echoes the confirmed title
#[derive(Debug, Deserialize)]
struct TitleEnvelope {
    title: String,
}

/// Accessor for `/lists` endpoints
pub struct ListsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl ListsApi<'_> {
    /// DELETE /lists/:id
    pub async fn delete_list(&self, list_id: ListId) -> Result<()> {
        self.client
            .call(Method::DELETE, &format!("/lists/{list_id}"), None)
            .await?;
        Ok(())
    }

    /// POST /lists/:id/task
    pub async fn create_list_task(&self, list_id: ListId, title: &str) -> Result<Task> {
        let response = self
            .client
            .call(
                Method::POST,
                &format!("/lists/{list_id}/task"),
                Some(json!({ "title": title })),
            )
            .await?;
        let envelope: TaskEnvelope = response.json().await?;
        Ok(envelope.result)
    }

    /// PATCH /lists/:id/title, returning the server-confirmed title
    pub async fn edit_list_title(&self, list_id: ListId, title: &str) -> Result<String> {
        let response = self
            .client
            .call(
                Method::PATCH,
                &format!("/lists/{list_id}/title"),
                Some(json!({ "title": title })),
            )
            .await?;
        let envelope: TitleEnvelope = response.json().await?;
        Ok(envelope.title)
    }

    /// POST /lists/:id/sort with the full task-id order for the list
    pub async fn sort_list_tasks(&self, list_id: ListId, order: &[TaskId]) -> Result<()> {
        self.client
            .call(
                Method::POST,
                &format!("/lists/{list_id}/sort"),
                Some(json!({ "order": order })),
            )
            .await?;
        Ok(())
    }
}
