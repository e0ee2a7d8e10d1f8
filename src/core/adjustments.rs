use crate::core::calculator::hours::round2;
use crate::core::users::UserLogic;
use crate::db::adjustments::{
    delete_adjustment, insert_adjustment, load_adjustment, load_adjustments,
};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::load_record;
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::adjustment::{HourAdjustment, NewAdjustment};
use chrono::NaiveDate;

pub const MAX_ADJUSTMENT_HOURS: f64 = 24.0;

/// Append/delete-only log of manual hour corrections.
pub struct AdjustmentLogic;

impl AdjustmentLogic {
    pub fn create(
        pool: &mut DbPool,
        actor: &Actor,
        adj: &NewAdjustment,
    ) -> AppResult<HourAdjustment> {
        actor.require_director()?;
        UserLogic::require_monitor(pool, adj.user_id)?;

        // Stored in hundredths so range totals stay additive.
        let delta = round2(adj.delta_hours);
        if !delta.is_finite() || delta == 0.0 || delta.abs() > MAX_ADJUSTMENT_HOURS {
            return Err(AppError::InvalidRange(format!(
                "delta must be non-zero and within ±{} hours (got {})",
                MAX_ADJUSTMENT_HOURS, adj.delta_hours
            )));
        }

        if adj.reason.trim().is_empty() {
            return Err(AppError::InvalidInput("a reason is required".into()));
        }

        if let Some(record_id) = adj.attendance_id {
            let rec = load_record(&pool.conn, record_id)?
                .ok_or(AppError::RecordNotFound(record_id))?;
            if rec.user_id != adj.user_id {
                return Err(AppError::MismatchedAttendance {
                    record: record_id,
                    monitor: adj.user_id,
                });
            }
        }

        let normalized = NewAdjustment {
            delta_hours: delta,
            reason: adj.reason.trim().to_string(),
            ..adj.clone()
        };
        let created = insert_adjustment(&pool.conn, &normalized, actor.id)?;

        audit(
            &pool.conn,
            actor.id,
            "adjust",
            &format!("monitor {}", created.user_id),
            &format!(
                "#{} {:+.2}h on {}: {}",
                created.id, created.delta_hours, created.date, created.reason
            ),
        )?;
        Ok(created)
    }

    pub fn get(pool: &DbPool, actor: &Actor, id: i64) -> AppResult<HourAdjustment> {
        actor.require_director()?;
        load_adjustment(&pool.conn, id)?.ok_or(AppError::AdjustmentNotFound(id))
    }

    /// Newest first; every bound is optional.
    pub fn list(
        pool: &DbPool,
        actor: &Actor,
        monitor_id: Option<i64>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<HourAdjustment>> {
        actor.require_director()?;
        load_adjustments(&pool.conn, monitor_id, from.as_ref(), to.as_ref())
    }

    /// Hard delete. The audit line keeps what was removed.
    pub fn delete(pool: &mut DbPool, actor: &Actor, id: i64) -> AppResult<()> {
        let adj = Self::get(pool, actor, id)?;
        delete_adjustment(&pool.conn, id)?;

        audit(
            &pool.conn,
            actor.id,
            "adjust_del",
            &format!("monitor {}", adj.user_id),
            &format!(
                "Deleted #{} ({:+.2}h on {}, by director {})",
                adj.id, adj.delta_hours, adj.date, adj.director_id
            ),
        )?;
        Ok(())
    }
}
