use chrono::NaiveDate;
use serde::Serialize;

/// Manual correction of a monitor's hours, authored by a director.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourAdjustment {
    pub id: i64,
    pub user_id: i64,
    pub director_id: i64,
    pub date: NaiveDate,
    pub delta_hours: f64,
    pub reason: String,
    pub attendance_id: Option<i64>,
    pub created_at: String,
}

/// Request payload for a new adjustment.
#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub user_id: i64,
    pub date: NaiveDate,
    pub delta_hours: f64,
    pub reason: String,
    pub attendance_id: Option<i64>,
}
