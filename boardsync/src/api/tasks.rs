//! Task endpoints

use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;
use crate::types::{ListId, PriorityId, Task, TaskId};

/// Accessor for `/tasks` endpoints
pub struct TasksApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl TasksApi<'_> {
    /// GET /tasks/:id
    pub async fn fetch_task(&self, task_id: TaskId) -> Result<Task> {
        let response = self
            .client
            .call(Method::GET, &format!("/tasks/{task_id}"), None)
            .await?;
        Ok(response.json().await?)
    }

    /// DELETE /tasks/:id
    pub async fn delete_task(&self, task_id: TaskId) -> Result<()> {
        self.client
            .call(Method::DELETE, &format!("/tasks/{task_id}"), None)
            .await?;
        Ok(())
    }

    /// PATCH /tasks/:id/list - reassign the task's list and position
    pub async fn update_task_list(
        &self,
        task_id: TaskId,
        list_id: ListId,
        position: usize,
    ) -> Result<()> {
        self.client
            .call(
                Method::PATCH,
                &format!("/tasks/{task_id}/list"),
                Some(json!({ "listId": list_id, "position": position })),
            )
            .await?;
        Ok(())
    }

    /// PATCH /tasks/:id/description
    pub async fn update_task_description(
        &self,
        task_id: TaskId,
        description: &str,
    ) -> Result<()> {
        self.client
            .call(
                Method::PATCH,
                &format!("/tasks/{task_id}/description"),
                Some(json!({ "description": description })),
            )
            .await?;
        Ok(())
    }

    /// PATCH /tasks/:id/title
    pub async fn update_task_title(&self, task_id: TaskId, title: &str) -> Result<()> {
        self.client
            .call(
                Method::PATCH,
                &format!("/tasks/{task_id}/title"),
                Some(json!({ "title": title })),
            )
            .await?;
        Ok(())
    }

    /// PATCH /tasks/:id/priority
    pub async fn update_task_priority(
        &self,
        task_id: TaskId,
        priority_id: PriorityId,
    ) -> Result<()> {
        self.client
            .call(
                Method::PATCH,
                &format!("/tasks/{task_id}/priority"),
                Some(json!({ "priority": priority_id })),
            )
            .await?;
        Ok(())
    }
}
