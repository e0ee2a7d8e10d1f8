use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal audit line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Audit line attributed to the acting user.
pub fn audit(
    conn: &Connection,
    actor_id: i64,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    ttlog(
        conn,
        operation,
        target,
        &format!("[user {}] {}", actor_id, message),
    )
}
