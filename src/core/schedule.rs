use crate::core::users::UserLogic;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    SlotFilter, delete_slot, delete_slots_for_user, insert_slot, load_fleet_slots, load_slot,
    load_slots, update_slot,
};
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::shift::Shift;
use crate::models::site::Site;
use crate::models::slot::{ScheduleSlot, SlotInput};
use chrono::Weekday;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

/// Upper bound on items accepted by one bulk request.
pub const MAX_BULK_SLOTS: usize = 50;

/// Outcome of a best-effort batch: what was created and what was refused.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub requested: usize,
    pub deleted: Option<usize>,
    pub created: Vec<ScheduleSlot>,
    pub errors: Vec<BatchItemError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItemError {
    /// 1-based position in the request.
    pub item: usize,
    pub message: String,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSlot {
    pub monitor_name: String,
    #[serde(flatten)]
    pub slot: ScheduleSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSchedule {
    pub total_slots: usize,
    pub total_monitors: usize,
    pub slots: Vec<FleetSlot>,
}

/// Validate raw slot values against the weekday, shift and site domains.
pub fn validate_slot(input: &SlotInput) -> AppResult<(Weekday, Shift, Site)> {
    let weekday = u8::try_from(input.weekday)
        .ok()
        .filter(|d| *d <= 6)
        .and_then(|d| Weekday::try_from(d).ok())
        .ok_or_else(|| {
            AppError::InvalidSlotData(format!("weekday must be 0-6 (got {})", input.weekday))
        })?;

    let shift = Shift::from_code(&input.shift).ok_or_else(|| {
        AppError::InvalidSlotData(format!("shift must be M or T (got '{}')", input.shift))
    })?;

    let site = Site::from_code(&input.site).ok_or_else(|| {
        AppError::InvalidSlotData(format!("site must be SA or BA (got '{}')", input.site))
    })?;

    Ok((weekday, shift, site))
}

fn check_batch_size(inputs: &[SlotInput]) -> AppResult<()> {
    if inputs.is_empty() || inputs.len() > MAX_BULK_SLOTS {
        return Err(AppError::InvalidInput(format!(
            "a batch must contain between 1 and {} slots (got {})",
            MAX_BULK_SLOTS,
            inputs.len()
        )));
    }
    Ok(())
}

/// Insert every candidate, collecting per-item failures.
fn create_each(conn: &Connection, monitor_id: i64, inputs: &[SlotInput]) -> BatchReport {
    let mut report = BatchReport {
        requested: inputs.len(),
        ..Default::default()
    };

    for (i, input) in inputs.iter().enumerate() {
        let outcome = validate_slot(input)
            .and_then(|(day, shift, site)| insert_slot(conn, monitor_id, day, shift, site));

        match outcome {
            Ok(slot) => report.created.push(slot),
            Err(e) => report.errors.push(BatchItemError {
                item: i + 1,
                message: e.to_string(),
            }),
        }
    }

    report
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Monitors manage their own schedule; directors may manage anyone's.
    fn authorize_owner(pool: &DbPool, actor: &Actor, monitor_id: i64) -> AppResult<()> {
        if actor.require_director().is_err() && actor.id != monitor_id {
            return Err(AppError::Forbidden(format!(
                "user {} cannot manage the schedule of user {}",
                actor.id, monitor_id
            )));
        }
        UserLogic::require_monitor(pool, monitor_id)?;
        Ok(())
    }

    pub fn create_slot(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        input: &SlotInput,
    ) -> AppResult<ScheduleSlot> {
        Self::authorize_owner(pool, actor, monitor_id)?;
        let (day, shift, site) = validate_slot(input)?;

        let slot = insert_slot(&pool.conn, monitor_id, day, shift, site)?;

        audit(
            &pool.conn,
            actor.id,
            "slot_add",
            &format!("monitor {}", monitor_id),
            &format!("Created slot #{} {}", slot.id, slot.describe()),
        )?;
        Ok(slot)
    }

    /// Best-effort batch: duplicates and invalid items are reported, the
    /// rest are created. Not transactional.
    pub fn bulk_create(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        inputs: &[SlotInput],
    ) -> AppResult<BatchReport> {
        Self::authorize_owner(pool, actor, monitor_id)?;
        check_batch_size(inputs)?;

        let report = create_each(&pool.conn, monitor_id, inputs);

        audit(
            &pool.conn,
            actor.id,
            "slot_bulk_add",
            &format!("monitor {}", monitor_id),
            &format!(
                "Created {} of {} slots ({} errors)",
                report.created.len(),
                report.requested,
                report.errors.len()
            ),
        )?;
        Ok(report)
    }

    /// Replace the whole schedule of a monitor.
    ///
    /// Delete and re-create run in one transaction, so other connections see
    /// either the old schedule or the new one. Items that fail are reported;
    /// the valid ones are committed. Attendance rows of removed slots go
    /// with them.
    pub fn bulk_replace(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        inputs: &[SlotInput],
    ) -> AppResult<BatchReport> {
        Self::authorize_owner(pool, actor, monitor_id)?;
        check_batch_size(inputs)?;

        let tx = pool.conn.transaction()?;

        let deleted = delete_slots_for_user(&tx, monitor_id)?;
        let mut report = create_each(&tx, monitor_id, inputs);
        report.deleted = Some(deleted);

        audit(
            &tx,
            actor.id,
            "slot_replace",
            &format!("monitor {}", monitor_id),
            &format!(
                "Replaced {} slots with {} of {} ({} errors)",
                deleted,
                report.created.len(),
                report.requested,
                report.errors.len()
            ),
        )?;

        tx.commit()?;
        Ok(report)
    }

    pub fn update_slot(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        slot_id: i64,
        input: &SlotInput,
    ) -> AppResult<ScheduleSlot> {
        Self::authorize_owner(pool, actor, monitor_id)?;
        let (day, shift, site) = validate_slot(input)?;

        let mut slot = load_slot(&pool.conn, slot_id)?
            .filter(|s| s.user_id == monitor_id)
            .ok_or(AppError::SlotNotFound(slot_id))?;

        slot.weekday = day;
        slot.shift = shift;
        slot.site = site;
        update_slot(&pool.conn, &slot)?;

        audit(
            &pool.conn,
            actor.id,
            "slot_edit",
            &format!("monitor {}", monitor_id),
            &format!("Updated slot #{} to {}", slot.id, slot.describe()),
        )?;
        Ok(slot)
    }

    pub fn delete_slot(
        pool: &mut DbPool,
        actor: &Actor,
        monitor_id: i64,
        slot_id: i64,
    ) -> AppResult<()> {
        Self::authorize_owner(pool, actor, monitor_id)?;

        if delete_slot(&pool.conn, monitor_id, slot_id)? == 0 {
            return Err(AppError::SlotNotFound(slot_id));
        }

        audit(
            &pool.conn,
            actor.id,
            "slot_del",
            &format!("monitor {}", monitor_id),
            &format!("Deleted slot #{}", slot_id),
        )?;
        Ok(())
    }

    pub fn list_slots(
        pool: &DbPool,
        actor: &Actor,
        monitor_id: i64,
    ) -> AppResult<Vec<ScheduleSlot>> {
        Self::authorize_owner(pool, actor, monitor_id)?;
        load_slots(
            &pool.conn,
            &SlotFilter {
                user_id: Some(monitor_id),
                ..Default::default()
            },
        )
    }

    /// Director view over every monitor's schedule.
    pub fn list_fleet_slots(
        pool: &DbPool,
        actor: &Actor,
        filter: &SlotFilter,
    ) -> AppResult<FleetSchedule> {
        actor.require_director()?;

        let rows = load_fleet_slots(&pool.conn, filter)?;
        let monitors: HashSet<i64> = rows.iter().map(|(s, _)| s.user_id).collect();

        Ok(FleetSchedule {
            total_slots: rows.len(),
            total_monitors: monitors.len(),
            slots: rows
                .into_iter()
                .map(|(slot, monitor_name)| FleetSlot { monitor_name, slot })
                .collect(),
        })
    }
}
