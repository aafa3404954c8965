//! Weekly task-creation limit.
//!
//! The window is the ISO week: Monday 00:00 UTC through the following
//! Sunday. Limits and the whitelist are read from config at enforcement
//! time, so a reloaded config takes effect without a restart. Deleted
//! tasks still count against the week they were created in.

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};

use deck_config::RateLimitConfig;
use deck_core::entities::User;

use crate::db::Db;
use crate::error::ServerError;
use crate::repos;

/// Start of the ISO week containing `now`: Monday 00:00 UTC.
#[must_use]
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date);
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// Enforce the weekly creation limit for `user` before a create.
///
/// # Errors
///
/// Returns [`ServerError::RateLimited`] when the user has exhausted this
/// week's budget and is not whitelisted.
pub fn check(
    db: &Db,
    config: &RateLimitConfig,
    user: &User,
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    if config.is_whitelisted(&user.email) {
        return Ok(());
    }
    let created = repos::tasks::count_created_since(db, user.id, week_start(now))?;
    if created >= u64::from(config.weekly_task_limit) {
        tracing::debug!(
            user = %user.email,
            created,
            limit = config.weekly_task_limit,
            "weekly task limit reached"
        );
        return Err(ServerError::RateLimited {
            limit: config.weekly_task_limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    #[rstest]
    // 2026-08-24 is a Monday.
    #[case("2026-08-24T00:00:00Z", "2026-08-24T00:00:00Z")]
    #[case("2026-08-24T23:59:59Z", "2026-08-24T00:00:00Z")]
    #[case("2026-08-26T12:30:00Z", "2026-08-24T00:00:00Z")]
    #[case("2026-08-30T23:59:59Z", "2026-08-24T00:00:00Z")]
    // Next Monday opens a fresh window.
    #[case("2026-08-31T00:00:00Z", "2026-08-31T00:00:00Z")]
    fn week_starts_on_monday_utc(#[case] now: &str, #[case] expected: &str) {
        assert_eq!(week_start(at(now)), at(expected));
    }

    #[test]
    fn year_boundary_weeks_stay_contiguous() {
        // 2026-01-01 is a Thursday; its week began Monday 2025-12-29.
        assert_eq!(
            week_start(at("2026-01-01T09:00:00Z")),
            at("2025-12-29T00:00:00Z")
        );
    }
}
