use super::{shift::Shift, site::Site};
use chrono::Weekday;
use serde::{Serialize, Serializer};

/// A recurring weekly assignment of one monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSlot {
    pub id: i64,
    pub user_id: i64,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday, // ⇔ schedule_slots.weekday (INT 0=Mon..6=Sun)
    pub shift: Shift,     // ⇔ schedule_slots.shift ('M' | 'T')
    pub site: Site,       // ⇔ schedule_slots.site ('SA' | 'BA')
}

impl ScheduleSlot {
    pub fn weekday_index(&self) -> u8 {
        self.weekday.num_days_from_monday() as u8
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {} ({})",
            weekday_name(self.weekday),
            self.shift.label(),
            self.site.label()
        )
    }
}

/// Candidate slot as supplied by a caller, before validation.
///
/// Raw values are kept so that a bulk request can report every bad item
/// instead of failing at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInput {
    pub weekday: i64,
    pub shift: String,
    pub site: String,
}

impl SlotInput {
    pub fn new(weekday: i64, shift: &str, site: &str) -> Self {
        Self {
            weekday,
            shift: shift.to_string(),
            site: site.to_string(),
        }
    }

    /// Parse the compact CLI form `WEEKDAY:SHIFT:SITE`, e.g. `0:M:SA`.
    pub fn parse_compact(s: &str) -> Option<Self> {
        let mut it = s.split(':');
        let weekday = it.next()?.trim().parse::<i64>().ok()?;
        let shift = it.next()?.trim();
        let site = it.next()?.trim();
        if it.next().is_some() {
            return None;
        }
        Some(Self::new(weekday, shift, site))
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn serialize_weekday<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(day.num_days_from_monday() as u8)
}
