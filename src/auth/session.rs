use rand::Rng;
use rusqlite::{params, OptionalExtension};

use crate::db::StoreResult;
use crate::state::DbPool;

/// Create a new session for a signed-in email. Returns the session token.
pub fn create_session(pool: &DbPool, email: &str, hours: u64) -> StoreResult<String> {
    let conn = pool.get()?;

    let token = generate_token();
    let id = uuid::Uuid::now_v7().to_string();

    conn.execute(
        "INSERT INTO sessions (id, email, token, expires_at) \
         VALUES (?1, ?2, ?3, datetime('now', ?4))",
        params![id, email, token, format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// Delete a session by token.
pub fn delete_session(pool: &DbPool, token: &str) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// The signed-in email for a live session token, if any.
pub fn lookup_email(pool: &DbPool, token: &str) -> StoreResult<Option<String>> {
    let conn = pool.get()?;
    let email = conn
        .query_row(
            "SELECT email FROM sessions WHERE token = ?1 AND expires_at > datetime('now')",
            params![token],
            |row| row.get(0),
        )
        .optional()?;
    Ok(email)
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
