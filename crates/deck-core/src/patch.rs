//! Create and partial-update payloads for tasks.
//!
//! `TaskPatch` follows the PATCH-like PUT contract: absent fields are left
//! unchanged. String fields use `Some(String::new())` to clear; this is
//! how a transition out of `blocked` erases `blocked_reason` on the wire.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::TaskStatus;

/// Payload for `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default = "default_effort")]
    pub effort: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocked_reason: String,
}

const fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

const fn default_priority() -> u8 {
    2
}

const fn default_effort() -> u8 {
    1
}

impl TaskDraft {
    /// A draft with defaults (status `todo`, medium priority, effort 1).
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            notes: String::new(),
            status: default_status(),
            priority: default_priority(),
            effort: default_effort(),
            due_date: None,
            start_by: None,
            blocked_reason: String::new(),
        }
    }
}

/// Payload for `PUT /api/tasks/:id`. Every field is optional; only present
/// fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_by: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// A patch that only changes `status`.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether applying this patch to a task in `current` status would move
    /// it to a different status bucket.
    #[must_use]
    pub fn changes_status_from(&self, current: TaskStatus) -> bool {
        self.status.is_some_and(|next| next != current)
    }

    /// Apply every present field to `task` in place. Does not touch
    /// `updated_at`; callers decide whether the change is authoritative.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(notes) = &self.notes {
            task.notes.clone_from(notes);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(effort) = self.effort {
            task.effort = effort;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(start_by) = self.start_by {
            task.start_by = Some(start_by);
        }
        if let Some(blocked_reason) = &self.blocked_reason {
            task.blocked_reason.clone_from(blocked_reason);
        }
        if let Some(started_at) = self.started_at {
            task.started_at = Some(started_at);
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = Some(completed_at);
        }
    }
}
