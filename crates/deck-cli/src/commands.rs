//! Command handlers. Task traffic flows through the optimistic cache so
//! the board and list views reuse exactly the pipeline the tests cover.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use deck_api::ApiClient;
use deck_cache::TaskCache;
use deck_core::enums::TaskStatus;
use deck_core::patch::{TaskDraft, TaskPatch};
use deck_core::transitions;

use crate::cli::OutputFormat;
use crate::{output, session};

pub async fn login(mut client: ApiClient, email: &str, name: &str) -> Result<()> {
    let opened = client.login(email, name).await?;
    session::store(&opened.session_token)?;
    println!(
        "Logged in as {email}. Session expires {}.",
        opened.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

pub async fn logout(mut client: ApiClient) -> Result<()> {
    // Revoke server-side when possible, but always drop the local token.
    if let Err(err) = client.logout().await {
        tracing::warn!(%err, "server-side logout failed");
    }
    session::clear()?;
    println!("Logged out.");
    Ok(())
}

pub async fn me(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let user = client.me().await?;
    output::user(&user, format);
    Ok(())
}

pub async fn board(cache: &mut TaskCache<ApiClient>, page_size: u32, format: OutputFormat) -> Result<()> {
    for status in TaskStatus::ALL {
        let entry = cache.list(status, 1, page_size).await?;
        output::task_list(status, &entry.tasks, entry.pagination, format);
    }
    Ok(())
}

pub async fn list(
    cache: &mut TaskCache<ApiClient>,
    status: &str,
    page: u32,
    page_size: u32,
    format: OutputFormat,
) -> Result<()> {
    let status = parse_status(status)?;
    let entry = cache.list(status, page, page_size).await?;
    output::task_list(status, &entry.tasks, entry.pagination, format);
    Ok(())
}

pub async fn show(cache: &mut TaskCache<ApiClient>, id: Uuid, format: OutputFormat) -> Result<()> {
    let task = cache.detail(id).await?;
    output::task_detail(&task, format);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    cache: &mut TaskCache<ApiClient>,
    name: String,
    description: Option<String>,
    notes: Option<String>,
    priority: u8,
    effort: u8,
    due: Option<&str>,
    start_by: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let draft = TaskDraft {
        description: description.unwrap_or_default(),
        notes: notes.unwrap_or_default(),
        priority,
        effort,
        due_date: due.map(parse_date).transpose()?,
        start_by: start_by.map(parse_date).transpose()?,
        ..TaskDraft::named(name)
    };
    let task = cache.create(&draft).await?;
    output::task_detail(&task, format);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn edit(
    cache: &mut TaskCache<ApiClient>,
    id: Uuid,
    name: Option<String>,
    description: Option<String>,
    notes: Option<String>,
    status: Option<&str>,
    priority: Option<u8>,
    effort: Option<u8>,
    due: Option<&str>,
    start_by: Option<&str>,
    blocked_reason: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let patch = TaskPatch {
        name,
        description,
        notes,
        status: status.map(parse_status).transpose()?,
        priority,
        effort,
        due_date: due.map(parse_date).transpose()?,
        start_by: start_by.map(parse_date).transpose()?,
        blocked_reason,
        ..TaskPatch::default()
    };
    if patch.is_empty() {
        bail!("nothing to change: pass at least one field flag");
    }
    // Prime the cache so status edits know which column the task left.
    cache.detail(id).await?;
    let task = cache.update(id, &patch).await?;
    output::task_detail(&task, format);
    Ok(())
}

pub async fn delete(cache: &mut TaskCache<ApiClient>, id: Uuid) -> Result<()> {
    cache.delete(id).await?;
    println!("Deleted {id}.");
    Ok(())
}

/// Quick status action through the state machine.
pub async fn quick(
    cache: &mut TaskCache<ApiClient>,
    id: Uuid,
    next: TaskStatus,
    format: OutputFormat,
) -> Result<()> {
    cache.detail(id).await?;
    let task = cache.quick_transition(id, next).await?;
    output::task_detail(&task, format);
    Ok(())
}

/// Block with a reason: the quick-transition patch plus the reason the
/// server requires for the `blocked` status.
pub async fn block(
    cache: &mut TaskCache<ApiClient>,
    id: Uuid,
    reason: String,
    format: OutputFormat,
) -> Result<()> {
    let current = cache.detail(id).await?;
    let mut patch = transitions::quick_transition(&current, TaskStatus::Blocked, Utc::now())?;
    patch.blocked_reason = Some(reason);
    let task = cache.update(id, &patch).await?;
    output::task_detail(&task, format);
    Ok(())
}

fn parse_status(raw: &str) -> Result<TaskStatus> {
    TaskStatus::from_str(raw).map_err(|reason| anyhow::anyhow!(reason))
}

/// `YYYY-MM-DD` taken as midnight UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}': expected YYYY-MM-DD"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dates_parse_as_utc_midnight() {
        let parsed = parse_date("2026-09-15").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-09-15T00:00:00+00:00");
        assert!(parse_date("15/09/2026").is_err());
    }

    #[test]
    fn status_parse_matches_wire_values() {
        assert_eq!(parse_status("in_progress").unwrap(), TaskStatus::InProgress);
        assert!(parse_status("doing").is_err());
    }
}
