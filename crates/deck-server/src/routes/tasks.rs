//! Task handlers: status-scoped paginated list, detail, create (rate
//! limited), partial update via PUT, soft delete.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use deck_core::entities::Task;
use deck_core::envelope::{Envelope, Pagination};
use deck_core::enums::TaskStatus;
use deck_core::patch::{TaskDraft, TaskPatch};
use deck_core::problem::InvalidParam;

use crate::AppState;
use crate::error::ServerError;
use crate::routes::CurrentUser;
use crate::{rate_limit, repos, validate};

const MAX_PAGE_SIZE: u32 = 100;

const fn default_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Task>>>, ServerError> {
    let status = TaskStatus::from_str(&query.status).map_err(|reason| {
        ServerError::Validation(vec![InvalidParam {
            name: "status".to_string(),
            reason,
        }])
    })?;
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);

    let (tasks, total) = repos::tasks::list_by_status(&state.db, user.id, status, page, page_size)?;
    Ok(Json(Envelope::paginated(
        tasks,
        Pagination::new(page, page_size, total),
    )))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Envelope<Task>>), ServerError> {
    validate::draft(&draft)?;
    let now = Utc::now();
    rate_limit::check(&state.db, &state.config.rate_limit, &user, now)?;
    let task = repos::tasks::insert(&state.db, user.id, &draft, now)?;
    tracing::debug!(task = %task.id, status = %task.status, "task created");
    Ok((StatusCode::CREATED, Json(Envelope::created(task))))
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Task>>, ServerError> {
    let task = repos::tasks::find(&state.db, user.id, id)?.ok_or(ServerError::NotFound {
        entity: "task",
        id: id.to_string(),
    })?;
    Ok(Json(Envelope::ok(task)))
}

/// PUT with PATCH semantics: absent fields are left unchanged. The patched
/// row is re-validated in full, so an update cannot move a task into
/// `blocked` without a reason.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Envelope<Task>>, ServerError> {
    let mut task = repos::tasks::find(&state.db, user.id, id)?.ok_or(ServerError::NotFound {
        entity: "task",
        id: id.to_string(),
    })?;
    patch.apply_to(&mut task);
    task.updated_at = Utc::now();
    validate::patched_task(&task)?;
    repos::tasks::save(&state.db, &task)?;
    tracing::debug!(task = %task.id, status = %task.status, "task updated");
    Ok(Json(Envelope::ok(task)))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let deleted = repos::tasks::soft_delete(&state.db, user.id, id, Utc::now())?;
    if !deleted {
        return Err(ServerError::NotFound {
            entity: "task",
            id: id.to_string(),
        });
    }
    tracing::debug!(task = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
