//! The network seam between the cache and the REST API.
//!
//! The coordinator is generic over this trait so tests can drive it with a
//! scripted fake while production uses [`deck_api::ApiClient`].

use uuid::Uuid;

use deck_api::{ApiClient, ApiError, TaskPage};
use deck_core::entities::Task;
use deck_core::enums::TaskStatus;
use deck_core::patch::{TaskDraft, TaskPatch};

/// Task traffic issued by the cache coordinator.
pub trait TaskTransport {
    fn fetch_list(
        &self,
        status: TaskStatus,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<TaskPage, ApiError>> + Send;

    fn fetch_detail(&self, id: Uuid) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn create(&self, draft: &TaskDraft) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn update(
        &self,
        id: Uuid,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl TaskTransport for ApiClient {
    async fn fetch_list(
        &self,
        status: TaskStatus,
        page: u32,
        page_size: u32,
    ) -> Result<TaskPage, ApiError> {
        self.list_tasks(status, page, page_size).await
    }

    async fn fetch_detail(&self, id: Uuid) -> Result<Task, ApiError> {
        self.fetch_task(id).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.create_task(draft).await
    }

    async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.update_task(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete_task(id).await
    }
}
