use crate::db::queries::date_to_db;
use crate::errors::{AppError, AppResult};
use crate::models::adjustment::{HourAdjustment, NewAdjustment};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql, params};

pub fn map_adjustment(row: &Row) -> Result<HourAdjustment> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::InvalidInput(format!("date {}", date_str))),
        )
    })?;

    Ok(HourAdjustment {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        director_id: row.get("director_id")?,
        date,
        delta_hours: row.get("delta_hours")?,
        reason: row.get("reason")?,
        attendance_id: row.get("attendance_id")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_adjustment(
    conn: &Connection,
    adj: &NewAdjustment,
    director_id: i64,
) -> AppResult<HourAdjustment> {
    let created_at = Local::now().to_rfc3339();

    conn.execute(
        "INSERT INTO hour_adjustments
            (user_id, director_id, date, delta_hours, reason, attendance_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            adj.user_id,
            director_id,
            date_to_db(&adj.date),
            adj.delta_hours,
            adj.reason,
            adj.attendance_id,
            created_at,
        ],
    )?;

    Ok(HourAdjustment {
        id: conn.last_insert_rowid(),
        user_id: adj.user_id,
        director_id,
        date: adj.date,
        delta_hours: adj.delta_hours,
        reason: adj.reason.clone(),
        attendance_id: adj.attendance_id,
        created_at,
    })
}

pub fn load_adjustment(conn: &Connection, id: i64) -> AppResult<Option<HourAdjustment>> {
    let adj = conn
        .query_row(
            "SELECT * FROM hour_adjustments WHERE id = ?1",
            [id],
            map_adjustment,
        )
        .optional()?;
    Ok(adj)
}

/// Adjustments, newest first. Every bound is optional.
pub fn load_adjustments(
    conn: &Connection,
    user_id: Option<i64>,
    from: Option<&NaiveDate>,
    to: Option<&NaiveDate>,
) -> AppResult<Vec<HourAdjustment>> {
    let mut sql = String::from("SELECT * FROM hour_adjustments WHERE 1 = 1");
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(uid) = user_id {
        sql.push_str(" AND user_id = ?");
        args.push(Box::new(uid));
    }
    if let Some(f) = from {
        sql.push_str(" AND date >= ?");
        args.push(Box::new(date_to_db(f)));
    }
    if let Some(t) = to {
        sql.push_str(" AND date <= ?");
        args.push(Box::new(date_to_db(t)));
    }
    sql.push_str(" ORDER BY date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_adjustment,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_adjustment(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM hour_adjustments WHERE id = ?1", [id])?)
}

/// Adjustments booked by a director.
pub fn count_authored(conn: &Connection, director_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM hour_adjustments WHERE director_id = ?1",
        [director_id],
        |r| r.get(0),
    )?)
}
