//! Task endpoints.

use uuid::Uuid;

use deck_core::entities::Task;
use deck_core::envelope::Pagination;
use deck_core::enums::TaskStatus;
use deck_core::patch::{TaskDraft, TaskPatch};

use crate::error::ApiError;
use crate::http::{check_response, read_data, read_envelope};
use crate::ApiClient;

/// One page of a status-scoped task list, with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

impl ApiClient {
    /// `GET /api/tasks?status=&page=&pageSize=`: paginated list by status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a problem details
    /// response, or an envelope missing `data`/`pagination`.
    pub async fn list_tasks(
        &self,
        status: TaskStatus,
        page: u32,
        page_size: u32,
    ) -> Result<TaskPage, ApiError> {
        let url = self.url(&format!(
            "/tasks?status={status}&page={page}&pageSize={page_size}"
        ));
        let resp = check_response(self.authed(self.http.get(&url)).send().await?).await?;
        let envelope = read_envelope::<Vec<Task>>(resp).await?;

        let tasks = envelope.data.unwrap_or_default();
        let pagination = envelope
            .meta_data
            .pagination
            .ok_or_else(|| ApiError::Parse("list response missing pagination".to_string()))?;
        Ok(TaskPage { tasks, pagination })
    }

    /// `GET /api/tasks/:id`: single task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response
    /// (404 when the task does not exist or is soft-deleted).
    pub async fn fetch_task(&self, id: Uuid) -> Result<Task, ApiError> {
        let url = self.url(&format!("/tasks/{id}"));
        let resp = check_response(self.authed(self.http.get(&url)).send().await?).await?;
        read_data(resp).await
    }

    /// `POST /api/tasks`: create. Returns the server's authoritative task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, validation problems, or
    /// the weekly creation limit (429).
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let url = self.url("/tasks");
        let resp =
            check_response(self.authed(self.http.post(&url)).json(draft).send().await?).await?;
        read_data(resp).await
    }

    /// `PUT /api/tasks/:id`: partial update. Absent patch fields are left
    /// unchanged server-side.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response.
    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError> {
        let url = self.url(&format!("/tasks/{id}"));
        let resp =
            check_response(self.authed(self.http.put(&url)).json(patch).send().await?).await?;
        read_data(resp).await
    }

    /// `DELETE /api/tasks/:id`: soft delete, 204 with empty data.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response.
    pub async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        let url = self.url(&format!("/tasks/{id}"));
        check_response(self.authed(self.http.delete(&url)).send().await?).await?;
        Ok(())
    }
}
