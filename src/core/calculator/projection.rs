use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Semester projection of scheduled hours and their cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub weekly_hours: f64,
    pub hourly_rate: f64,
    pub total_weeks: i64,
    pub weeks_worked: i64,
    pub weeks_remaining: i64,
    pub projected_total_hours: f64,
    pub projected_total_cost: f64,
    pub worked_hours: f64,
    pub worked_cost: f64,
    pub remaining_hours: f64,
    pub remaining_cost: f64,
}

pub fn project(
    weekly_hours: f64,
    weeks_worked: i64,
    total_weeks: i64,
    hourly_rate: f64,
) -> AppResult<Projection> {
    if total_weeks < 0 || weeks_worked < 0 || weeks_worked > total_weeks {
        return Err(AppError::InvalidWeeks(format!(
            "weeks worked must be between 0 and {} (got {})",
            total_weeks.max(0),
            weeks_worked
        )));
    }

    let weeks_remaining = total_weeks - weeks_worked;
    let projected_total_hours = weekly_hours * total_weeks as f64;
    let worked_hours = weekly_hours * weeks_worked as f64;
    let remaining_hours = weekly_hours * weeks_remaining as f64;

    Ok(Projection {
        weekly_hours,
        hourly_rate,
        total_weeks,
        weeks_worked,
        weeks_remaining,
        projected_total_hours,
        projected_total_cost: projected_total_hours * hourly_rate,
        worked_hours,
        worked_cost: worked_hours * hourly_rate,
        remaining_hours,
        remaining_cost: remaining_hours * hourly_rate,
    })
}

/// Average with the denominator floored at 1.
pub fn safe_average(total: f64, count: i64) -> f64 {
    total / count.max(1) as f64
}

/// Percent change from `previous` to `current`; None when there is no base.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous.abs() * 100.0)
    }
}
