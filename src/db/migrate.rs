use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// A single schema step, applied at most once and recorded in `log`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            name          TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'MONITOR' CHECK(role IN ('MONITOR','DIRECTOR')),
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0002_create_schedule_slots",
        description: "Created schedule_slots table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedule_slots (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            weekday  INTEGER NOT NULL CHECK(weekday BETWEEN 0 AND 6),
            shift    TEXT NOT NULL CHECK(shift IN ('M','T')),
            site     TEXT NOT NULL CHECK(site IN ('SA','BA')),
            UNIQUE(user_id, weekday, shift)
        );

        CREATE INDEX IF NOT EXISTS idx_slots_weekday ON schedule_slots(weekday, shift);
        "#,
    },
    Migration {
        version: "20250301_0003_create_attendance",
        description: "Created attendance table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            slot_id    INTEGER NOT NULL REFERENCES schedule_slots(id) ON DELETE CASCADE,
            date       TEXT NOT NULL,
            present    INTEGER NOT NULL DEFAULT 0,
            state      TEXT NOT NULL DEFAULT 'pendiente'
                       CHECK(state IN ('pendiente','autorizado','rechazado','recuperado')),
            hours      REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, date, slot_id)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        CREATE INDEX IF NOT EXISTS idx_attendance_user_date ON attendance(user_id, date);
        "#,
    },
    Migration {
        version: "20250301_0004_create_hour_adjustments",
        description: "Created hour_adjustments table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS hour_adjustments (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            director_id   INTEGER NOT NULL REFERENCES users(id),
            date          TEXT NOT NULL,
            delta_hours   REAL NOT NULL CHECK(delta_hours BETWEEN -24 AND 24 AND delta_hours <> 0),
            reason        TEXT NOT NULL,
            attendance_id INTEGER REFERENCES attendance(id) ON DELETE SET NULL,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_adjustments_user_date ON hour_adjustments(user_id, date);
        "#,
    },
    Migration {
        version: "20250301_0005_create_system_config",
        description: "Created system_config table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS system_config (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            kind        TEXT NOT NULL CHECK(kind IN ('decimal','integer','boolean','string')),
            description TEXT NOT NULL DEFAULT '',
            created_by  INTEGER REFERENCES users(id) ON DELETE SET NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations, returns how many ran.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    if applied > 0 {
        success(format!("Applied {} database migration(s).", applied));
    }

    Ok(applied)
}

/// Versions already recorded in the log, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
