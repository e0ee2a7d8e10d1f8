use crate::errors::{AppError, AppResult};
use crate::models::setting::{Setting, SettingType, SettingValue};
use chrono::Local;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_setting(row: &Row) -> Result<Setting> {
    let kind_str: String = row.get("kind")?;
    let kind = SettingType::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::InvalidSettingValue(format!("type {}", kind_str))),
        )
    })?;

    let raw: String = row.get("value")?;
    let value = SettingValue::parse(&raw, kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(Setting {
        key: row.get("key")?,
        value,
        kind,
        description: row.get("description")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn load_setting(conn: &Connection, key: &str) -> AppResult<Option<Setting>> {
    let s = conn
        .query_row(
            "SELECT * FROM system_config WHERE key = ?1",
            [key],
            map_setting,
        )
        .optional()?;
    Ok(s)
}

pub fn load_settings(conn: &Connection) -> AppResult<Vec<Setting>> {
    let mut stmt = conn.prepare("SELECT * FROM system_config ORDER BY key ASC")?;
    let rows = stmt.query_map([], map_setting)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_setting(
    conn: &Connection,
    key: &str,
    value: &SettingValue,
    description: &str,
    created_by: i64,
) -> AppResult<()> {
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO system_config (key, value, kind, description, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            key,
            value.to_db_string(),
            value.kind().to_db_str(),
            description,
            created_by,
            now
        ],
    )?;
    Ok(())
}

pub fn update_setting(
    conn: &Connection,
    key: &str,
    value: &SettingValue,
    description: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE system_config SET value = ?1, description = ?2, updated_at = ?3 WHERE key = ?4",
        params![
            value.to_db_string(),
            description,
            Local::now().to_rfc3339(),
            key
        ],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM system_config WHERE key = ?1", [key])?)
}
