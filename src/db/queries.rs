use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::authorization::AuthorizationState;
use crate::models::role::Role;
use crate::models::shift::Shift;
use crate::models::site::Site;
use crate::models::slot::ScheduleSlot;
use crate::models::user::User;
use chrono::{Local, NaiveDate, Weekday};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, ToSql, params};

/// Optional narrowing applied to slot and attendance listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotFilter {
    pub user_id: Option<i64>,
    pub weekday: Option<Weekday>,
    pub shift: Option<Shift>,
    pub site: Option<Site>,
}

impl SlotFilter {
    pub fn shift_site(shift: Option<Shift>, site: Option<Site>) -> Self {
        Self {
            shift,
            site,
            ..Default::default()
        }
    }

    /// Append `AND ...` clauses for the slot table aliased `s`.
    fn push_clauses(&self, sql: &mut String, args: &mut Vec<Box<dyn ToSql>>) {
        if let Some(uid) = self.user_id {
            sql.push_str(" AND s.user_id = ?");
            args.push(Box::new(uid));
        }
        if let Some(day) = self.weekday {
            sql.push_str(" AND s.weekday = ?");
            args.push(Box::new(day.num_days_from_monday() as i64));
        }
        if let Some(shift) = self.shift {
            sql.push_str(" AND s.shift = ?");
            args.push(Box::new(shift.to_db_str()));
        }
        if let Some(site) = self.site {
            sql.push_str(" AND s.site = ?");
            args.push(Box::new(site.to_db_str()));
        }
    }
}

pub fn date_to_db(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Users
// ---------------------------

pub fn map_user(row: &Row) -> Result<User> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str)
        .ok_or_else(|| conversion_error(0, AppError::Other(format!("Invalid role: {}", role_str))))?;

    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        name: row.get("name")?,
        role,
        password_hash: row.get("password_hash")?,
        is_active: row.get::<_, i32>("is_active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_user(
    conn: &Connection,
    username: &str,
    name: &str,
    password_hash: &str,
    role: Role,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO users (username, name, password_hash, role, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        params![
            username,
            name,
            password_hash,
            role.to_db_str(),
            Local::now().to_rfc3339()
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateUsername(username.into())),
        Err(e) => Err(e.into()),
    }
}

pub fn load_user(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row("SELECT * FROM users WHERE id = ?1", [id], map_user)
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection, role: Option<Role>) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM users
         WHERE (?1 IS NULL OR role = ?1)
         ORDER BY name ASC, id ASC",
    )?;
    let rows = stmt.query_map([role.map(|r| r.to_db_str())], map_user)?;
    collect(rows)
}

/// Case-insensitive substring match over username and name (monitors only).
pub fn search_monitors(conn: &Connection, query: &str) -> AppResult<Vec<User>> {
    let pattern = format!("%{}%", query.trim().to_lowercase());
    let mut stmt = conn.prepare(
        "SELECT * FROM users
         WHERE role = 'MONITOR'
           AND (lower(username) LIKE ?1 OR lower(name) LIKE ?1)
         ORDER BY name ASC, id ASC",
    )?;
    let rows = stmt.query_map([pattern], map_user)?;
    collect(rows)
}

pub fn delete_user(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?)
}

// ---------------------------
// Schedule slots
// ---------------------------

pub fn map_slot(row: &Row) -> Result<ScheduleSlot> {
    let day: i64 = row.get("weekday")?;
    let weekday = u8::try_from(day)
        .ok()
        .and_then(|d| Weekday::try_from(d).ok())
        .ok_or_else(|| conversion_error(0, AppError::InvalidSlotData(format!("weekday {}", day))))?;

    let shift_str: String = row.get("shift")?;
    let shift = Shift::from_db_str(&shift_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidSlotData(format!("shift {}", shift_str)))
    })?;

    let site_str: String = row.get("site")?;
    let site = Site::from_db_str(&site_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidSlotData(format!("site {}", site_str)))
    })?;

    Ok(ScheduleSlot {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        weekday,
        shift,
        site,
    })
}

pub fn insert_slot(
    conn: &Connection,
    user_id: i64,
    weekday: Weekday,
    shift: Shift,
    site: Site,
) -> AppResult<ScheduleSlot> {
    let res = conn.execute(
        "INSERT INTO schedule_slots (user_id, weekday, shift, site)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            user_id,
            weekday.num_days_from_monday(),
            shift.to_db_str(),
            site.to_db_str()
        ],
    );

    match res {
        Ok(_) => Ok(ScheduleSlot {
            id: conn.last_insert_rowid(),
            user_id,
            weekday,
            shift,
            site,
        }),
        Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateSlot(format!(
            "{} {}",
            crate::models::slot::weekday_name(weekday),
            shift.label()
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn update_slot(conn: &Connection, slot: &ScheduleSlot) -> AppResult<()> {
    let res = conn.execute(
        "UPDATE schedule_slots SET weekday = ?1, shift = ?2, site = ?3 WHERE id = ?4",
        params![
            slot.weekday.num_days_from_monday(),
            slot.shift.to_db_str(),
            slot.site.to_db_str(),
            slot.id
        ],
    );

    match res {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateSlot(format!(
            "{} {}",
            crate::models::slot::weekday_name(slot.weekday),
            slot.shift.label()
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn load_slot(conn: &Connection, id: i64) -> AppResult<Option<ScheduleSlot>> {
    let slot = conn
        .query_row("SELECT * FROM schedule_slots WHERE id = ?1", [id], map_slot)
        .optional()?;
    Ok(slot)
}

pub fn find_slot(
    conn: &Connection,
    user_id: i64,
    weekday: Weekday,
    shift: Shift,
) -> AppResult<Option<ScheduleSlot>> {
    let slot = conn
        .query_row(
            "SELECT * FROM schedule_slots WHERE user_id = ?1 AND weekday = ?2 AND shift = ?3",
            params![user_id, weekday.num_days_from_monday(), shift.to_db_str()],
            map_slot,
        )
        .optional()?;
    Ok(slot)
}

/// Slots matching the filter, ordered by weekday and shift.
pub fn load_slots(conn: &Connection, filter: &SlotFilter) -> AppResult<Vec<ScheduleSlot>> {
    let mut sql = String::from("SELECT s.* FROM schedule_slots s WHERE 1 = 1");
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_clauses(&mut sql, &mut args);
    sql.push_str(" ORDER BY s.weekday ASC, s.shift ASC, s.user_id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_slot,
    )?;
    collect(rows)
}

/// Slots of MONITOR users joined with the owner's name, ordered for display.
pub fn load_fleet_slots(
    conn: &Connection,
    filter: &SlotFilter,
) -> AppResult<Vec<(ScheduleSlot, String)>> {
    let mut sql = String::from(
        "SELECT s.*, u.name AS owner_name
         FROM schedule_slots s
         JOIN users u ON u.id = s.user_id
         WHERE u.role = 'MONITOR'",
    );
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_clauses(&mut sql, &mut args);
    sql.push_str(" ORDER BY u.name ASC, s.weekday ASC, s.shift ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        |row| Ok((map_slot(row)?, row.get::<_, String>("owner_name")?)),
    )?;
    collect(rows)
}

pub fn count_slots(conn: &Connection, user_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM schedule_slots WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?)
}

pub fn delete_slot(conn: &Connection, user_id: i64, slot_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM schedule_slots WHERE id = ?1 AND user_id = ?2",
        params![slot_id, user_id],
    )?)
}

pub fn delete_slots_for_user(conn: &Connection, user_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM schedule_slots WHERE user_id = ?1",
        [user_id],
    )?)
}

// ---------------------------
// Attendance
// ---------------------------

const RECORD_SELECT: &str = "SELECT a.id, a.user_id, a.slot_id, a.date, a.present, a.state,
            a.updated_at, s.shift, s.site
     FROM attendance a
     JOIN schedule_slots s ON s.id = a.slot_id";

pub fn map_record(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidInput(format!("date {}", date_str))))?;

    let state_str: String = row.get("state")?;
    let state = AuthorizationState::from_db_str(&state_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidInput(format!("state {}", state_str)))
    })?;

    let shift_str: String = row.get("shift")?;
    let shift = Shift::from_db_str(&shift_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidSlotData(format!("shift {}", shift_str)))
    })?;

    let site_str: String = row.get("site")?;
    let site = Site::from_db_str(&site_str).ok_or_else(|| {
        conversion_error(0, AppError::InvalidSlotData(format!("site {}", site_str)))
    })?;

    Ok(AttendanceRecord::restore(
        row.get("id")?,
        row.get("user_id")?,
        row.get("slot_id")?,
        date,
        shift,
        site,
        row.get::<_, i32>("present")? == 1,
        state,
        row.get("updated_at")?,
    ))
}

/// Insert a default record unless (user, date, slot) already exists.
///
/// The unique key is the guard: a concurrent insert of the same key is a
/// no-op here, never an error. Returns true when a row was created.
pub fn insert_record_if_absent(
    conn: &Connection,
    user_id: i64,
    slot_id: i64,
    date: &NaiveDate,
) -> AppResult<bool> {
    let inserted = conn.execute(
        "INSERT INTO attendance (user_id, slot_id, date, present, state, hours, updated_at)
         VALUES (?1, ?2, ?3, 0, 'pendiente', 0, ?4)
         ON CONFLICT(user_id, date, slot_id) DO NOTHING",
        params![user_id, slot_id, date_to_db(date), Local::now().to_rfc3339()],
    )?;
    Ok(inserted == 1)
}

pub fn load_record(conn: &Connection, id: i64) -> AppResult<Option<AttendanceRecord>> {
    let sql = format!("{RECORD_SELECT} WHERE a.id = ?1");
    let rec = conn.query_row(&sql, [id], map_record).optional()?;
    Ok(rec)
}

pub fn find_record(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
    slot_id: i64,
) -> AppResult<Option<AttendanceRecord>> {
    let sql = format!("{RECORD_SELECT} WHERE a.user_id = ?1 AND a.date = ?2 AND a.slot_id = ?3");
    let rec = conn
        .query_row(&sql, params![user_id, date_to_db(date), slot_id], map_record)
        .optional()?;
    Ok(rec)
}

/// Records on `date` whose slot matches the filter, optionally by state.
pub fn load_records_for_date(
    conn: &Connection,
    date: &NaiveDate,
    filter: &SlotFilter,
    state: Option<AuthorizationState>,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut sql = format!("{RECORD_SELECT} WHERE a.date = ?");
    let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(date_to_db(date))];
    filter.push_clauses(&mut sql, &mut args);
    if let Some(st) = state {
        sql.push_str(" AND a.state = ?");
        args.push(Box::new(st.to_db_str()));
    }
    sql.push_str(" ORDER BY a.user_id ASC, s.shift ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_record,
    )?;
    collect(rows)
}

/// Records of one monitor in `[from, to]`, filtered by slot shift/site.
pub fn load_records_in_range(
    conn: &Connection,
    user_id: i64,
    from: &NaiveDate,
    to: &NaiveDate,
    filter: &SlotFilter,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut sql = format!("{RECORD_SELECT} WHERE a.user_id = ? AND a.date BETWEEN ? AND ?");
    let mut args: Vec<Box<dyn ToSql>> = vec![
        Box::new(user_id),
        Box::new(date_to_db(from)),
        Box::new(date_to_db(to)),
    ];
    filter.push_clauses(&mut sql, &mut args);
    sql.push_str(" ORDER BY a.date ASC, s.shift ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_record,
    )?;
    collect(rows)
}

/// Persist the mutable part of a record (presence, state, derived hours).
pub fn save_record(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET present = ?1, state = ?2, hours = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            if rec.present() { 1 } else { 0 },
            rec.state().to_db_str(),
            rec.hours(),
            rec.updated_at,
            rec.id
        ],
    )?;
    Ok(())
}

pub fn delete_record(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM attendance WHERE id = ?1", [id])?)
}
