//! Task rows. Lists are status-scoped and paginated; reads exclude
//! soft-deleted rows, the weekly creation count does not.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use deck_core::entities::Task;
use deck_core::enums::TaskStatus;
use deck_core::patch::TaskDraft;

use crate::db::{
    Db, datetime_col, datetime_param, opt_datetime_col, opt_datetime_param, uuid_col,
};
use crate::error::ServerError;

const COLUMNS: &str = "id, user_id, name, description, notes, status, priority, effort, \
                       due_date, start_by, blocked_reason, started_at, completed_at, \
                       created_at, updated_at, deleted_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status_raw: String = row.get(5)?;
    let status = TaskStatus::from_str(&status_raw).map_err(|msg| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
        )
    })?;
    Ok(Task {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        notes: row.get(4)?,
        status,
        priority: row.get(6)?,
        effort: row.get(7)?,
        due_date: opt_datetime_col(row, 8)?,
        start_by: opt_datetime_col(row, 9)?,
        blocked_reason: row.get(10)?,
        started_at: opt_datetime_col(row, 11)?,
        completed_at: opt_datetime_col(row, 12)?,
        created_at: datetime_col(row, 13)?,
        updated_at: datetime_col(row, 14)?,
        deleted_at: opt_datetime_col(row, 15)?,
    })
}

/// Insert a new task from a draft. The server owns id and timestamps.
pub fn insert(
    db: &Db,
    user_id: Uuid,
    draft: &TaskDraft,
    now: DateTime<Utc>,
) -> Result<Task, ServerError> {
    let task = Task {
        id: Uuid::new_v4(),
        user_id,
        name: draft.name.clone(),
        description: draft.description.clone(),
        notes: draft.notes.clone(),
        status: draft.status,
        priority: draft.priority,
        effort: draft.effort,
        due_date: draft.due_date,
        start_by: draft.start_by,
        blocked_reason: draft.blocked_reason.clone(),
        started_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    db.with(|conn| {
        conn.execute(
            "INSERT INTO tasks (id, user_id, name, description, notes, status, priority, effort,
                                due_date, start_by, blocked_reason, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.name,
                task.description,
                task.notes,
                task.status.as_str(),
                task.priority,
                task.effort,
                opt_datetime_param(task.due_date),
                opt_datetime_param(task.start_by),
                task.blocked_reason,
                datetime_param(task.created_at),
                datetime_param(task.updated_at),
            ],
        )
    })?;
    Ok(task)
}

/// Look up one of the user's tasks, excluding soft-deleted rows.
pub fn find(db: &Db, user_id: Uuid, id: Uuid) -> Result<Option<Task>, ServerError> {
    db.with(|conn| {
        conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM tasks
                 WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL"
            ),
            params![id.to_string(), user_id.to_string()],
            from_row,
        )
        .optional()
    })
}

/// One page of the user's tasks in one status, plus the status's total
/// row count. Ordered by creation time so pages are stable.
pub fn list_by_status(
    db: &Db,
    user_id: Uuid,
    status: TaskStatus,
    page: u32,
    page_size: u32,
) -> Result<(Vec<Task>, u64), ServerError> {
    let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
    let tasks = db.with(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = ?1 AND status = ?2 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC
             LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt.query_map(
            params![
                user_id.to_string(),
                status.as_str(),
                i64::try_from(u64::from(page_size)).unwrap_or(i64::MAX),
                i64::try_from(offset).unwrap_or(i64::MAX),
            ],
            from_row,
        )?;
        rows.collect::<rusqlite::Result<Vec<Task>>>()
    })?;
    let total: i64 = db.with(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM tasks
             WHERE user_id = ?1 AND status = ?2 AND deleted_at IS NULL",
            params![user_id.to_string(), status.as_str()],
            |row| row.get(0),
        )
    })?;
    Ok((tasks, u64::try_from(total).unwrap_or(0)))
}

/// Persist the full mutable state of a task (after a patch was applied).
pub fn save(db: &Db, task: &Task) -> Result<(), ServerError> {
    db.with(|conn| {
        conn.execute(
            "UPDATE tasks SET name = ?1, description = ?2, notes = ?3, status = ?4,
                              priority = ?5, effort = ?6, due_date = ?7, start_by = ?8,
                              blocked_reason = ?9, started_at = ?10, completed_at = ?11,
                              updated_at = ?12
             WHERE id = ?13 AND deleted_at IS NULL",
            params![
                task.name,
                task.description,
                task.notes,
                task.status.as_str(),
                task.priority,
                task.effort,
                opt_datetime_param(task.due_date),
                opt_datetime_param(task.start_by),
                task.blocked_reason,
                opt_datetime_param(task.started_at),
                opt_datetime_param(task.completed_at),
                datetime_param(task.updated_at),
                task.id.to_string(),
            ],
        )
    })?;
    Ok(())
}

/// Soft-delete one of the user's tasks. Returns whether a row was hit.
pub fn soft_delete(
    db: &Db,
    user_id: Uuid,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, ServerError> {
    let affected = db.with(|conn| {
        conn.execute(
            "UPDATE tasks SET deleted_at = ?1, updated_at = ?1
             WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL",
            params![datetime_param(now), id.to_string(), user_id.to_string()],
        )
    })?;
    Ok(affected > 0)
}

/// Number of tasks the user created at or after `cutoff`. Soft-deleted rows
/// count: deleting a task does not refund the weekly budget.
pub fn count_created_since(
    db: &Db,
    user_id: Uuid,
    cutoff: DateTime<Utc>,
) -> Result<u64, ServerError> {
    let count: i64 = db.with(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE user_id = ?1 AND created_at >= ?2",
            params![user_id.to_string(), datetime_param(cutoff)],
            |row| row.get(0),
        )
    })?;
    Ok(u64::try_from(count).unwrap_or(0))
}
