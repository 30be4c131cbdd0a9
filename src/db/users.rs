use rusqlite::{params, OptionalExtension};

use crate::db::models::User;
use crate::db::{StoreError, StoreResult};
use crate::state::DbPool;

pub fn find_by_email(pool: &DbPool, email: &str) -> StoreResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            "SELECT id, email, password_hash FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

/// Insert a new account. A UNIQUE violation on the email column surfaces
/// as DuplicateEmail so the caller can show a specific message; SQLite
/// rejects the statement atomically, so no partial row is left behind.
pub fn create(pool: &DbPool, email: &str, password_hash: &str) -> StoreResult<i64> {
    let conn = pool.get()?;
    match conn.execute(
        "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
        params![email, password_hash],
    ) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
