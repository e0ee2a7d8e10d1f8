//! Hours & finance aggregation over the ledger and the adjustment log.

use crate::core::calculator::hours::{round2, weekly_hours_for_slots};
use crate::core::calculator::projection::{Projection, project};
use crate::core::settings::SettingsLogic;
use crate::db::adjustments::load_adjustments;
use crate::db::pool::DbPool;
use crate::db::queries::{SlotFilter, count_slots, load_records_in_range};
use crate::errors::AppResult;
use crate::models::authorization::AuthorizationState;
use crate::utils::date::check_range;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HoursTotals {
    pub attendance_hours: f64,
    pub adjustment_hours: f64,
    pub total_hours: f64,
    pub attendance_count: i64,
    pub adjustment_count: i64,
}

impl HoursTotals {
    pub fn add(&mut self, other: &HoursTotals) {
        self.attendance_hours = round2(self.attendance_hours + other.attendance_hours);
        self.adjustment_hours = round2(self.adjustment_hours + other.adjustment_hours);
        self.total_hours = round2(self.total_hours + other.total_hours);
        self.attendance_count += other.attendance_count;
        self.adjustment_count += other.adjustment_count;
    }
}

/// Records per authorization state, plus how many were marked present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub pending: i64,
    pub authorized: i64,
    pub rejected: i64,
    pub recovered: i64,
    pub present: i64,
}

pub struct FinanceLogic;

impl FinanceLogic {
    /// Ledger hours (filtered by slot shift/site) plus every adjustment of the
    /// monitor in `[from, to]`. Adjustments ignore the shift/site filter.
    pub fn total_hours(
        pool: &DbPool,
        monitor_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        filter: &SlotFilter,
    ) -> AppResult<HoursTotals> {
        Ok(Self::hours_and_states(pool, monitor_id, from, to, filter)?.0)
    }

    pub fn hours_and_states(
        pool: &DbPool,
        monitor_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        filter: &SlotFilter,
    ) -> AppResult<(HoursTotals, StateCounts)> {
        check_range(from, to)?;

        let filter = SlotFilter::shift_site(filter.shift, filter.site);
        let records = load_records_in_range(&pool.conn, monitor_id, &from, &to, &filter)?;
        let adjustments = load_adjustments(&pool.conn, Some(monitor_id), Some(&from), Some(&to))?;

        let mut states = StateCounts::default();
        for r in &records {
            match r.state() {
                AuthorizationState::Pending => states.pending += 1,
                AuthorizationState::Authorized => states.authorized += 1,
                AuthorizationState::Rejected => states.rejected += 1,
                AuthorizationState::Recovered => states.recovered += 1,
            }
            if r.present() {
                states.present += 1;
            }
        }

        let attendance_hours = round2(records.iter().map(|r| r.hours()).sum());
        let adjustment_hours = round2(adjustments.iter().map(|a| a.delta_hours).sum());

        let totals = HoursTotals {
            attendance_hours,
            adjustment_hours,
            total_hours: round2(attendance_hours + adjustment_hours),
            attendance_count: records.len() as i64,
            adjustment_count: adjustments.len() as i64,
        };

        Ok((totals, states))
    }

    pub fn slot_count(pool: &DbPool, monitor_id: i64) -> AppResult<i64> {
        count_slots(&pool.conn, monitor_id)
    }

    pub fn weekly_scheduled_hours(pool: &DbPool, monitor_id: i64) -> AppResult<f64> {
        Ok(weekly_hours_for_slots(Self::slot_count(pool, monitor_id)?))
    }

    /// Semester projection for one monitor. `total_weeks` defaults to the
    /// configured semester length; the rate always comes from configuration.
    pub fn projected_cost(
        pool: &DbPool,
        monitor_id: i64,
        weeks_worked: i64,
        total_weeks: Option<i64>,
    ) -> AppResult<Projection> {
        let total_weeks = match total_weeks {
            Some(w) => w,
            None => SettingsLogic::get_semester_weeks(pool)?,
        };
        let rate = SettingsLogic::get_hourly_rate(pool)?;
        let weekly = Self::weekly_scheduled_hours(pool, monitor_id)?;

        project(weekly, weeks_worked, total_weeks, rate)
    }
}
