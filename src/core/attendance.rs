use crate::core::users::UserLogic;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    SlotFilter, delete_record, find_record, find_slot, insert_record_if_absent,
    load_records_for_date, load_record, load_slots, save_record,
};
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::attendance::AttendanceRecord;
use crate::models::authorization::AuthorizationState;
use crate::models::shift::Shift;
use crate::models::slot::weekday_name;
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;

/// Get-or-create the attendance rows of `date` for every slot that falls on
/// that weekday and matches `filter`. Safe to repeat: existing rows are left
/// untouched. Returns how many rows were created.
pub fn ensure_records_for(
    conn: &Connection,
    filter: &SlotFilter,
    date: &NaiveDate,
) -> AppResult<usize> {
    let filter = SlotFilter {
        weekday: Some(date.weekday()),
        ..*filter
    };

    let mut created = 0;
    for slot in load_slots(conn, &filter)? {
        if insert_record_if_absent(conn, slot.user_id, slot.id, date)? {
            created += 1;
        }
    }
    Ok(created)
}

/// The attendance state machine: lazy generation, director decisions and
/// monitor presence marking.
pub struct AttendanceLogic;

impl AttendanceLogic {
    fn load(pool: &DbPool, record_id: i64) -> AppResult<AttendanceRecord> {
        load_record(&pool.conn, record_id)?.ok_or(AppError::RecordNotFound(record_id))
    }

    fn store(
        pool: &DbPool,
        actor: &Actor,
        rec: &mut AttendanceRecord,
        operation: &str,
    ) -> AppResult<()> {
        rec.updated_at = Local::now().to_rfc3339();
        save_record(&pool.conn, rec)?;

        audit(
            &pool.conn,
            actor.id,
            operation,
            &format!("record {}", rec.id),
            &format!(
                "monitor {} {} {} → {} ({:.2}h)",
                rec.user_id,
                rec.date_str(),
                rec.shift.code(),
                rec.state().to_db_str(),
                rec.hours()
            ),
        )
    }

    fn decide(
        pool: &mut DbPool,
        actor: &Actor,
        record_id: i64,
        state: AuthorizationState,
        operation: &str,
    ) -> AppResult<AttendanceRecord> {
        actor.require_director()?;
        let mut rec = Self::load(pool, record_id)?;

        rec.set_state(state);
        Self::store(pool, actor, &mut rec, operation)?;
        Ok(rec)
    }

    pub fn authorize(
        pool: &mut DbPool,
        actor: &Actor,
        record_id: i64,
    ) -> AppResult<AttendanceRecord> {
        Self::decide(
            pool,
            actor,
            record_id,
            AuthorizationState::Authorized,
            "authorize",
        )
    }

    pub fn reject(
        pool: &mut DbPool,
        actor: &Actor,
        record_id: i64,
    ) -> AppResult<AttendanceRecord> {
        Self::decide(
            pool,
            actor,
            record_id,
            AuthorizationState::Rejected,
            "reject",
        )
    }

    /// Turn a missed pending block of a past day into a creditable one.
    pub fn recover(
        pool: &mut DbPool,
        actor: &Actor,
        record_id: i64,
        today: NaiveDate,
    ) -> AppResult<AttendanceRecord> {
        actor.require_director()?;
        let mut rec = Self::load(pool, record_id)?;

        if rec.state() != AuthorizationState::Pending {
            return Err(AppError::InvalidState(format!(
                "record {} is '{}', only pending records can be recovered",
                rec.id,
                rec.state().to_db_str()
            )));
        }
        if rec.date >= today {
            return Err(AppError::InvalidDate(format!(
                "record {} is dated {}, only days before {} can be recovered",
                rec.id,
                rec.date_str(),
                today
            )));
        }

        rec.set_state(AuthorizationState::Recovered);
        Self::store(pool, actor, &mut rec, "recover")?;
        Ok(rec)
    }

    /// Monitor marks presence for one shift of `date`.
    ///
    /// The time of day is not checked against the shift: only the date and
    /// the director's decision matter.
    pub fn mark_present(
        pool: &mut DbPool,
        actor: &Actor,
        date: NaiveDate,
        shift: Shift,
        today: NaiveDate,
    ) -> AppResult<AttendanceRecord> {
        actor.require_monitor()?;
        let monitor_id = actor.id;

        let slot = find_slot(&pool.conn, monitor_id, date.weekday(), shift)?.ok_or_else(|| {
            AppError::NoScheduleForSlot(format!(
                "{} {} ({})",
                weekday_name(date.weekday()),
                shift.label(),
                date
            ))
        })?;

        if date > today {
            return Err(AppError::FutureDateNotAllowed(date.to_string()));
        }

        insert_record_if_absent(&pool.conn, monitor_id, slot.id, &date)?;
        let mut rec = find_record(&pool.conn, monitor_id, &date, slot.id)?.ok_or_else(|| {
            AppError::Other(format!("attendance for slot {} on {} vanished", slot.id, date))
        })?;

        if !rec.state().is_creditable() {
            return Err(AppError::NotAuthorized(format!(
                "{} {} is '{}'",
                rec.date_str(),
                shift.label(),
                rec.state().to_db_str()
            )));
        }
        if rec.present() {
            return Err(AppError::AlreadyMarked(format!(
                "{} {}",
                rec.date_str(),
                shift.label()
            )));
        }

        rec.set_present();
        Self::store(pool, actor, &mut rec, "mark")?;
        Ok(rec)
    }

    /// Director view of one day: generates the missing rows for every
    /// monitor scheduled that weekday, then lists them.
    pub fn list_for_date(
        pool: &mut DbPool,
        actor: &Actor,
        date: NaiveDate,
        filter: &SlotFilter,
        state: Option<AuthorizationState>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        actor.require_director()?;

        let filter = SlotFilter::shift_site(filter.shift, filter.site);
        ensure_records_for(&pool.conn, &filter, &date)?;

        let filter = SlotFilter {
            weekday: Some(date.weekday()),
            ..filter
        };
        load_records_for_date(&pool.conn, &date, &filter, state)
    }

    /// One monitor's blocks for `date`, generated on demand.
    pub fn monitor_day(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if actor.require_director().is_err() && actor.id != monitor_id {
            return Err(AppError::Forbidden(format!(
                "user {} cannot view attendance of user {}",
                actor.id, monitor_id
            )));
        }
        UserLogic::require_monitor(pool, monitor_id)?;

        let filter = SlotFilter {
            user_id: Some(monitor_id),
            ..Default::default()
        };
        ensure_records_for(&pool.conn, &filter, &date)?;
        load_records_for_date(&pool.conn, &date, &filter, None)
    }

    pub fn get(pool: &DbPool, actor: &Actor, record_id: i64) -> AppResult<AttendanceRecord> {
        let rec = Self::load(pool, record_id)?;
        if actor.require_director().is_err() && rec.user_id != actor.id {
            return Err(AppError::RecordNotFound(record_id));
        }
        Ok(rec)
    }

    /// Admin override.
    pub fn delete(pool: &mut DbPool, actor: &Actor, record_id: i64) -> AppResult<()> {
        actor.require_director()?;
        let rec = Self::load(pool, record_id)?;

        delete_record(&pool.conn, record_id)?;

        audit(
            &pool.conn,
            actor.id,
            "attendance_del",
            &format!("record {}", record_id),
            &format!("Deleted attendance of monitor {} on {}", rec.user_id, rec.date_str()),
        )?;
        Ok(())
    }
}
