//! Status transition side effects.
//!
//! Moving a task between status buckets carries bookkeeping with it:
//!
//! - into `in_progress`: `started_at` is set to now only if unset, so
//!   resuming an already-started task keeps its original start time;
//! - into `completed`: `completed_at` is set to now unconditionally;
//! - out of `blocked`: `blocked_reason` is cleared and a dated
//!   "Unblocked on …" line is appended to `notes`, preserving prior content.
//!
//! The patch builders here are used by the cache coordinator and the CLI
//! quick actions; the server stores whatever validated patch it receives.

use chrono::{DateTime, Utc};

use crate::entities::Task;
use crate::enums::TaskStatus;
use crate::errors::CoreError;
use crate::patch::TaskPatch;

/// Build the patch that moves `task` to `next`, including all
/// status-derived side effects. Does not check the quick-action state
/// machine; direct edits may set any status.
#[must_use]
pub fn status_change_patch(task: &Task, next: TaskStatus, now: DateTime<Utc>) -> TaskPatch {
    let mut patch = TaskPatch::status(next);

    if next == TaskStatus::InProgress && task.started_at.is_none() {
        patch.started_at = Some(now);
    }
    if next == TaskStatus::Completed {
        patch.completed_at = Some(now);
    }
    if task.status == TaskStatus::Blocked && next != TaskStatus::Blocked {
        patch.blocked_reason = Some(String::new());
        patch.notes = Some(format!(
            "{} \n\nUnblocked on {}",
            task.notes,
            now.format("%Y-%m-%d")
        ));
    }

    patch
}

/// Build a quick-action transition patch, enforcing the state machine.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTransition`] when the quick-action state
/// machine does not allow `task.status → next`.
pub fn quick_transition(
    task: &Task,
    next: TaskStatus,
    now: DateTime<Utc>,
) -> Result<TaskPatch, CoreError> {
    if !task.status.can_transition_to(next) {
        return Err(CoreError::InvalidTransition {
            from: task.status,
            to: next,
        });
    }
    Ok(status_change_patch(task, next, now))
}
