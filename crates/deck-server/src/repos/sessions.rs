//! Session rows. Sessions are soft-deleted at logout and checked for
//! expiry on every authenticated request.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use deck_core::entities::Session;

use crate::db::{Db, datetime_col, datetime_param, opt_datetime_col, uuid_col};
use crate::error::ServerError;

const COLUMNS: &str = "id, user_id, session_token, expires_at, created_at, updated_at, deleted_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        session_token: row.get(2)?,
        expires_at: datetime_col(row, 3)?,
        created_at: datetime_col(row, 4)?,
        updated_at: datetime_col(row, 5)?,
        deleted_at: opt_datetime_col(row, 6)?,
    })
}

/// Open a session for the user with an opaque random token.
pub fn create(
    db: &Db,
    user_id: Uuid,
    ttl_hours: u32,
    now: DateTime<Utc>,
) -> Result<Session, ServerError> {
    let session = Session {
        id: Uuid::new_v4(),
        user_id,
        session_token: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
        expires_at: now + Duration::hours(i64::from(ttl_hours)),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    db.with(|conn| {
        conn.execute(
            "INSERT INTO sessions (id, user_id, session_token, expires_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                session.session_token,
                datetime_param(session.expires_at),
                datetime_param(session.created_at),
                datetime_param(session.updated_at),
            ],
        )
    })?;
    Ok(session)
}

/// Look up a usable session by token: not revoked, not expired at `now`.
pub fn find_active(
    db: &Db,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Session>, ServerError> {
    let session: Option<Session> = db.with(|conn| {
        conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM sessions WHERE session_token = ?1 AND deleted_at IS NULL"
            ),
            [token],
            from_row,
        )
        .optional()
    })?;
    Ok(session.filter(|s| s.is_active(now)))
}

/// Soft-delete the session with this token. Revoking an unknown or
/// already-revoked token is a no-op.
pub fn revoke(db: &Db, token: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
    db.with(|conn| {
        conn.execute(
            "UPDATE sessions SET deleted_at = ?1, updated_at = ?1
             WHERE session_token = ?2 AND deleted_at IS NULL",
            params![datetime_param(now), token],
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::users;
    use pretty_assertions::assert_eq;

    fn seeded_user(db: &Db) -> Uuid {
        users::upsert_dev(db, "dev@example.com", "Dev", Utc::now())
            .unwrap()
            .id
    }

    #[test]
    fn create_and_find_active() {
        let db = Db::open_in_memory().unwrap();
        let user_id = seeded_user(&db);
        let now = Utc::now();

        let session = create(&db, user_id, 24, now).unwrap();
        let found = find_active(&db, &session.session_token, now).unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, user_id);
    }

    #[test]
    fn expired_sessions_are_not_active() {
        let db = Db::open_in_memory().unwrap();
        let user_id = seeded_user(&db);
        let now = Utc::now();

        let session = create(&db, user_id, 1, now).unwrap();
        let later = now + Duration::hours(2);
        assert!(find_active(&db, &session.session_token, later).unwrap().is_none());
    }

    #[test]
    fn revoked_sessions_are_not_active() {
        let db = Db::open_in_memory().unwrap();
        let user_id = seeded_user(&db);
        let now = Utc::now();

        let session = create(&db, user_id, 24, now).unwrap();
        revoke(&db, &session.session_token, now).unwrap();
        assert!(find_active(&db, &session.session_token, now).unwrap().is_none());

        // Revoking again is harmless.
        revoke(&db, &session.session_token, now).unwrap();
    }
}
