//! Per-monitor and fleet-wide reports composed from the ledger, the
//! adjustment log and the configuration store.

use crate::core::calculator::hours::{HOURS_PER_SHIFT, round2, weekly_hours_for_slots};
use crate::core::calculator::projection::{Projection, percent_change, project, safe_average};
use crate::core::finance::{FinanceLogic, HoursTotals, StateCounts};
use crate::core::settings::SettingsLogic;
use crate::core::users::UserLogic;
use crate::db::pool::DbPool;
use crate::db::queries::{SlotFilter, load_fleet_slots};
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::shift::Shift;
use crate::models::site::Site;
use crate::models::user::User;
use crate::utils::date::{check_range, span_days, split_into_weeks};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// One monitor's hours over a range, flat so it can be written as CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursRow {
    pub monitor_id: i64,
    pub monitor_name: String,
    pub attendance_hours: f64,
    pub adjustment_hours: f64,
    pub total_hours: f64,
    pub attendance_count: i64,
    pub adjustment_count: i64,
    pub cost: f64,
}

impl HoursRow {
    fn new(user: &User, totals: &HoursTotals, rate: f64) -> Self {
        Self {
            monitor_id: user.id,
            monitor_name: user.name.clone(),
            attendance_hours: totals.attendance_hours,
            adjustment_hours: totals.adjustment_hours,
            total_hours: totals.total_hours,
            attendance_count: totals.attendance_count,
            adjustment_count: totals.adjustment_count,
            cost: round2(totals.total_hours * rate),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorHoursReport {
    pub monitor_id: i64,
    pub monitor_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: HoursTotals,
    pub states: StateCounts,
    pub hourly_rate: f64,
    pub cost: f64,
}

impl MonitorHoursReport {
    pub fn row(&self) -> HoursRow {
        HoursRow {
            monitor_id: self.monitor_id,
            monitor_name: self.monitor_name.clone(),
            attendance_hours: self.totals.attendance_hours,
            adjustment_hours: self.totals.adjustment_hours,
            total_hours: self.totals.total_hours,
            attendance_count: self.totals.attendance_count,
            adjustment_count: self.totals.adjustment_count,
            cost: self.cost,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetHoursReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub monitor_count: usize,
    pub hourly_rate: f64,
    pub totals: HoursTotals,
    pub total_cost: f64,
    pub average_hours_per_monitor: f64,
    pub rows: Vec<HoursRow>,
}

/// Actual hours booked in a range, attached to a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActualHours {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorFinance {
    pub monitor_id: i64,
    pub monitor_name: String,
    pub slot_count: i64,
    pub projection: Projection,
    pub actual: Option<ActualHours>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceRow {
    pub monitor_id: i64,
    pub monitor_name: String,
    pub slot_count: i64,
    pub weekly_hours: f64,
    pub projected_total_hours: f64,
    pub projected_total_cost: f64,
    pub worked_cost: f64,
    pub remaining_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetFinance {
    pub weeks_worked: i64,
    pub total_weeks: i64,
    pub hourly_rate: f64,
    pub monitor_count: usize,
    pub weekly_hours: f64,
    pub projected_total_hours: f64,
    pub projected_total_cost: f64,
    pub worked_cost: f64,
    pub remaining_cost: f64,
    pub average_cost_per_monitor: f64,
    pub rows: Vec<FinanceRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
    pub monitor_count: usize,
    pub weekly_scheduled_hours: f64,
    pub actual: HoursTotals,
    pub actual_cost: f64,
    pub projection: Projection,
    pub average_hours_per_monitor: f64,
    pub average_hours_per_day: f64,
    pub average_cost_per_monitor: f64,
    pub top_monitors: Vec<HoursRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub attendance_hours: f64,
    pub adjustment_hours: f64,
    pub total_hours: f64,
    pub cost: f64,
    pub change_hours: Option<f64>,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyComparison {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub hourly_rate: f64,
    pub weeks: Vec<WeekRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub group: String,
    pub code: String,
    pub label: String,
    pub slots: i64,
    pub weekly_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledOverview {
    pub slot_count: i64,
    pub monitor_count: usize,
    pub weekly_hours: f64,
    pub by_site: Vec<BreakdownRow>,
    pub by_shift: Vec<BreakdownRow>,
}

impl ScheduledOverview {
    pub fn rows(&self) -> Vec<BreakdownRow> {
        self.by_site.iter().chain(&self.by_shift).cloned().collect()
    }
}

fn by_total_desc(rows: &mut [HoursRow]) {
    rows.sort_by(|a, b| {
        b.total_hours
            .total_cmp(&a.total_hours)
            .then_with(|| a.monitor_name.cmp(&b.monitor_name))
    });
}

pub struct ReportLogic;

impl ReportLogic {
    /// Directors see anyone; monitors only themselves.
    pub fn monitor_hours_report(
        pool: &DbPool,
        actor: &Actor,
        monitor_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        filter: &SlotFilter,
    ) -> AppResult<MonitorHoursReport> {
        if actor.require_director().is_err() && actor.id != monitor_id {
            return Err(AppError::Forbidden(format!(
                "user {} cannot view hours of user {}",
                actor.id, monitor_id
            )));
        }
        let user = UserLogic::require_monitor(pool, monitor_id)?;

        let (totals, states) = FinanceLogic::hours_and_states(pool, user.id, from, to, filter)?;
        let rate = SettingsLogic::get_hourly_rate(pool)?;

        Ok(MonitorHoursReport {
            monitor_id: user.id,
            monitor_name: user.name,
            from,
            to,
            totals,
            states,
            hourly_rate: rate,
            cost: round2(totals.total_hours * rate),
        })
    }

    pub fn fleet_hours_report(
        pool: &DbPool,
        actor: &Actor,
        from: NaiveDate,
        to: NaiveDate,
        filter: &SlotFilter,
    ) -> AppResult<FleetHoursReport> {
        actor.require_director()?;
        check_range(from, to)?;

        let rate = SettingsLogic::get_hourly_rate(pool)?;
        let monitors = UserLogic::monitors(pool)?;

        let mut totals = HoursTotals::default();
        let mut rows = Vec::with_capacity(monitors.len());
        for user in &monitors {
            let t = FinanceLogic::total_hours(pool, user.id, from, to, filter)?;
            totals.add(&t);
            rows.push(HoursRow::new(user, &t, rate));
        }
        by_total_desc(&mut rows);

        Ok(FleetHoursReport {
            from,
            to,
            monitor_count: monitors.len(),
            hourly_rate: rate,
            totals,
            total_cost: round2(totals.total_hours * rate),
            average_hours_per_monitor: round2(safe_average(
                totals.total_hours,
                monitors.len() as i64,
            )),
            rows,
        })
    }

    /// Semester projection for one monitor, with the actual hours booked in
    /// `range` when one is given.
    pub fn monitor_finance(
        pool: &DbPool,
        actor: &Actor,
        monitor_id: i64,
        weeks_worked: i64,
        total_weeks: Option<i64>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<MonitorFinance> {
        actor.require_director()?;
        let user = UserLogic::require_monitor(pool, monitor_id)?;

        let projection = FinanceLogic::projected_cost(pool, user.id, weeks_worked, total_weeks)?;
        let slot_count = FinanceLogic::slot_count(pool, user.id)?;

        let actual = match range {
            Some((from, to)) => {
                let t = FinanceLogic::total_hours(pool, user.id, from, to, &SlotFilter::default())?;
                Some(ActualHours {
                    from,
                    to,
                    total_hours: t.total_hours,
                    cost: round2(t.total_hours * projection.hourly_rate),
                })
            }
            None => None,
        };

        Ok(MonitorFinance {
            monitor_id: user.id,
            monitor_name: user.name,
            slot_count,
            projection,
            actual,
        })
    }

    pub fn fleet_finance(
        pool: &DbPool,
        actor: &Actor,
        weeks_worked: i64,
        total_weeks: Option<i64>,
    ) -> AppResult<FleetFinance> {
        actor.require_director()?;

        let total_weeks = match total_weeks {
            Some(w) => w,
            None => SettingsLogic::get_semester_weeks(pool)?,
        };
        let rate = SettingsLogic::get_hourly_rate(pool)?;
        let monitors = UserLogic::monitors(pool)?;

        let mut rows = Vec::with_capacity(monitors.len());
        let mut fleet_weekly = 0.0;
        let (mut total_hours, mut total_cost, mut worked, mut remaining) = (0.0, 0.0, 0.0, 0.0);

        for user in &monitors {
            let slot_count = FinanceLogic::slot_count(pool, user.id)?;
            let p = project(
                weekly_hours_for_slots(slot_count),
                weeks_worked,
                total_weeks,
                rate,
            )?;

            fleet_weekly += p.weekly_hours;
            total_hours += p.projected_total_hours;
            total_cost += p.projected_total_cost;
            worked += p.worked_cost;
            remaining += p.remaining_cost;

            rows.push(FinanceRow {
                monitor_id: user.id,
                monitor_name: user.name.clone(),
                slot_count,
                weekly_hours: p.weekly_hours,
                projected_total_hours: round2(p.projected_total_hours),
                projected_total_cost: round2(p.projected_total_cost),
                worked_cost: round2(p.worked_cost),
                remaining_cost: round2(p.remaining_cost),
            });
        }

        // Validates the weeks even when there is no monitor yet.
        project(0.0, weeks_worked, total_weeks, rate)?;

        rows.sort_by(|a, b| {
            b.projected_total_cost
                .total_cmp(&a.projected_total_cost)
                .then_with(|| a.monitor_name.cmp(&b.monitor_name))
        });

        Ok(FleetFinance {
            weeks_worked,
            total_weeks,
            hourly_rate: rate,
            monitor_count: monitors.len(),
            weekly_hours: round2(fleet_weekly),
            projected_total_hours: round2(total_hours),
            projected_total_cost: round2(total_cost),
            worked_cost: round2(worked),
            remaining_cost: round2(remaining),
            average_cost_per_monitor: round2(safe_average(total_cost, monitors.len() as i64)),
            rows,
        })
    }

    pub fn executive_summary(
        pool: &DbPool,
        actor: &Actor,
        from: NaiveDate,
        to: NaiveDate,
        weeks_worked: i64,
        limit: usize,
    ) -> AppResult<ExecutiveSummary> {
        let fleet = Self::fleet_hours_report(pool, actor, from, to, &SlotFilter::default())?;

        let mut weekly = 0.0;
        for row in &fleet.rows {
            weekly += FinanceLogic::weekly_scheduled_hours(pool, row.monitor_id)?;
        }

        let total_weeks = SettingsLogic::get_semester_weeks(pool)?;
        let projection = project(weekly, weeks_worked, total_weeks, fleet.hourly_rate)?;
        let days = span_days(from, to);

        Ok(ExecutiveSummary {
            from,
            to,
            days,
            monitor_count: fleet.monitor_count,
            weekly_scheduled_hours: round2(weekly),
            actual: fleet.totals,
            actual_cost: fleet.total_cost,
            projection,
            average_hours_per_monitor: fleet.average_hours_per_monitor,
            average_hours_per_day: round2(safe_average(fleet.totals.total_hours, days)),
            average_cost_per_monitor: round2(safe_average(
                fleet.total_cost,
                fleet.monitor_count as i64,
            )),
            top_monitors: fleet.rows.into_iter().take(limit).collect(),
        })
    }

    /// Fleet hours per ISO week of `[from, to]`, each compared with the week
    /// before it.
    pub fn weekly_comparison(
        pool: &DbPool,
        actor: &Actor,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<WeeklyComparison> {
        actor.require_director()?;
        check_range(from, to)?;

        let rate = SettingsLogic::get_hourly_rate(pool)?;
        let monitors = UserLogic::monitors(pool)?;

        let mut weeks: Vec<WeekRow> = Vec::new();
        for (start, end) in split_into_weeks(from, to) {
            let mut totals = HoursTotals::default();
            for user in &monitors {
                totals.add(&FinanceLogic::total_hours(
                    pool,
                    user.id,
                    start,
                    end,
                    &SlotFilter::default(),
                )?);
            }

            let (change_hours, change_percent) = match weeks.last() {
                Some(prev) => (
                    Some(round2(totals.total_hours - prev.total_hours)),
                    percent_change(prev.total_hours, totals.total_hours).map(round2),
                ),
                None => (None, None),
            };

            weeks.push(WeekRow {
                week_start: start,
                week_end: end,
                attendance_hours: totals.attendance_hours,
                adjustment_hours: totals.adjustment_hours,
                total_hours: totals.total_hours,
                cost: round2(totals.total_hours * rate),
                change_hours,
                change_percent,
            });
        }

        Ok(WeeklyComparison {
            from,
            to,
            hourly_rate: rate,
            weeks,
        })
    }

    pub fn scheduled_hours_overview(pool: &DbPool, actor: &Actor) -> AppResult<ScheduledOverview> {
        actor.require_director()?;

        let slots = load_fleet_slots(&pool.conn, &SlotFilter::default())?;
        let monitors: HashSet<i64> = slots.iter().map(|(s, _)| s.user_id).collect();

        let by_site = Site::all()
            .into_iter()
            .map(|site| {
                let n = slots.iter().filter(|(s, _)| s.site == site).count() as i64;
                BreakdownRow {
                    group: "site".into(),
                    code: site.code().into(),
                    label: site.label().into(),
                    slots: n,
                    weekly_hours: n as f64 * HOURS_PER_SHIFT,
                }
            })
            .collect();

        let by_shift = Shift::all()
            .into_iter()
            .map(|shift| {
                let n = slots.iter().filter(|(s, _)| s.shift == shift).count() as i64;
                BreakdownRow {
                    group: "shift".into(),
                    code: shift.code().into(),
                    label: shift.label().into(),
                    slots: n,
                    weekly_hours: n as f64 * HOURS_PER_SHIFT,
                }
            })
            .collect();

        Ok(ScheduledOverview {
            slot_count: slots.len() as i64,
            monitor_count: monitors.len(),
            weekly_hours: weekly_hours_for_slots(slots.len() as i64),
            by_site,
            by_shift,
        })
    }
}
