//! Request validation. Failures collect into field-level `invalidParams`
//! so a single response reports every bad field at once.

use deck_core::entities::{EFFORT_RANGE, NAME_MAX_LEN, PRIORITY_RANGE, Task};
use deck_core::enums::TaskStatus;
use deck_core::patch::TaskDraft;
use deck_core::problem::InvalidParam;

use crate::error::ServerError;

fn invalid(name: &str, reason: impl Into<String>) -> InvalidParam {
    InvalidParam {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn check_common(
    params: &mut Vec<InvalidParam>,
    name: &str,
    status: TaskStatus,
    priority: u8,
    effort: u8,
    blocked_reason: &str,
) {
    if name.trim().is_empty() {
        params.push(invalid("name", "Name is required"));
    } else if name.chars().count() > NAME_MAX_LEN {
        params.push(invalid(
            "name",
            format!("Name must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    if !PRIORITY_RANGE.contains(&priority) {
        params.push(invalid("priority", "Priority must be between 1 and 3"));
    }
    if !EFFORT_RANGE.contains(&effort) {
        params.push(invalid("effort", "Effort must be between 1 and 5"));
    }
    if status == TaskStatus::Blocked && blocked_reason.trim().is_empty() {
        params.push(invalid(
            "blockedReason",
            "Blocked reason is required when status is blocked",
        ));
    }
}

/// Validate a creation draft.
///
/// # Errors
///
/// Returns [`ServerError::Validation`] listing every failing field.
pub fn draft(draft: &TaskDraft) -> Result<(), ServerError> {
    let mut params = Vec::new();
    check_common(
        &mut params,
        &draft.name,
        draft.status,
        draft.priority,
        draft.effort,
        &draft.blocked_reason,
    );
    if params.is_empty() {
        Ok(())
    } else {
        Err(ServerError::Validation(params))
    }
}

/// Validate a task after a patch has been applied, so partial updates are
/// held to the same rules as creation (including the blocked-reason
/// invariant across status changes).
///
/// # Errors
///
/// Returns [`ServerError::Validation`] listing every failing field.
pub fn patched_task(task: &Task) -> Result<(), ServerError> {
    let mut params = Vec::new();
    check_common(
        &mut params,
        &task.name,
        task.status,
        task.priority,
        task.effort,
        &task.blocked_reason,
    );
    if params.is_empty() {
        Ok(())
    } else {
        Err(ServerError::Validation(params))
    }
}
