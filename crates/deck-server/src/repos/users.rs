//! User rows.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use deck_core::entities::User;

use crate::db::{Db, datetime_col, datetime_param, opt_datetime_col, uuid_col};
use crate::error::ServerError;

const COLUMNS: &str = "id, email, name, sso_type, sso_id, created_at, updated_at, deleted_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        sso_type: row.get(3)?,
        sso_id: row.get(4)?,
        created_at: datetime_col(row, 5)?,
        updated_at: datetime_col(row, 6)?,
        deleted_at: opt_datetime_col(row, 7)?,
    })
}

/// Look up a user by id, excluding soft-deleted rows.
pub fn find(db: &Db, id: Uuid) -> Result<Option<User>, ServerError> {
    db.with(|conn| {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ?1 AND deleted_at IS NULL"),
            [id.to_string()],
            from_row,
        )
        .optional()
    })
}

/// Create-or-update by email for the dev login flow: an existing account
/// gets its display name refreshed, a new one is created with `sso_type`
/// `dev`.
pub fn upsert_dev(
    db: &Db,
    email: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<User, ServerError> {
    let existing: Option<User> = db.with(|conn| {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE email = ?1 AND deleted_at IS NULL"),
            [email],
            from_row,
        )
        .optional()
    })?;

    if let Some(mut user) = existing {
        if user.name != name {
            db.with(|conn| {
                conn.execute(
                    "UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3",
                    params![name, datetime_param(now), user.id.to_string()],
                )
            })?;
            user.name = name.to_string();
            user.updated_at = now;
        }
        return Ok(user);
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: name.to_string(),
        sso_type: "dev".to_string(),
        sso_id: email.to_string(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    db.with(|conn| {
        conn.execute(
            "INSERT INTO users (id, email, name, sso_type, sso_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.email,
                user.name,
                user.sso_type,
                user.sso_id,
                datetime_param(user.created_at),
                datetime_param(user.updated_at),
            ],
        )
    })?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn upsert_creates_then_reuses_by_email() {
        let db = Db::open_in_memory().unwrap();
        let now = Utc::now();

        let created = upsert_dev(&db, "dev@example.com", "Dev", now).unwrap();
        assert_eq!(created.sso_type, "dev");

        let renamed = upsert_dev(&db, "dev@example.com", "Developer", now).unwrap();
        assert_eq!(renamed.id, created.id);
        assert_eq!(renamed.name, "Developer");

        let found = find(&db, created.id).unwrap().unwrap();
        assert_eq!(found.name, "Developer");
    }

    #[test]
    fn find_misses_on_unknown_id() {
        let db = Db::open_in_memory().unwrap();
        assert!(find(&db, Uuid::new_v4()).unwrap().is_none());
    }
}
