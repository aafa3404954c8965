use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::TaskStatus;

/// Task name length limit enforced by validation.
pub const NAME_MAX_LEN: usize = 512;
/// Priority range (1 = low, 2 = medium, 3 = high).
pub const PRIORITY_RANGE: std::ops::RangeInclusive<u8> = 1..=3;
/// Effort range (1 = trivial .. 5 = heavy).
pub const EFFORT_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A tracked work item on the board, owned by exactly one user.
///
/// Soft-deleted tasks keep their row with `deleted_at` set and are excluded
/// from list and detail reads. Invariant: `blocked_reason` is non-empty
/// whenever `status` is `blocked`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    pub status: TaskStatus,
    pub priority: u8,
    pub effort: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocked_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}
