use super::{authorization::AuthorizationState, shift::Shift, site::Site};
use crate::core::calculator::hours::hours_for;
use chrono::NaiveDate;
use serde::Serialize;

/// One day's attendance block for a (monitor, date, slot).
///
/// `present` and `state` are private: every change goes through a method
/// that recomputes `hours`, so the stored hours always match the rule in
/// [`hours_for`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub date: NaiveDate, // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub shift: Shift,    // joined from schedule_slots
    pub site: Site,      // joined from schedule_slots
    present: bool,
    state: AuthorizationState,
    hours: f64,
    pub updated_at: String,
}

impl AttendanceRecord {
    /// Rebuild a record loaded from storage. Hours are derived, never read.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        user_id: i64,
        slot_id: i64,
        date: NaiveDate,
        shift: Shift,
        site: Site,
        present: bool,
        state: AuthorizationState,
        updated_at: String,
    ) -> Self {
        Self {
            id,
            user_id,
            slot_id,
            date,
            shift,
            site,
            present,
            state,
            hours: hours_for(present, state),
            updated_at,
        }
    }

    pub fn present(&self) -> bool {
        self.present
    }

    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn set_state(&mut self, state: AuthorizationState) {
        self.state = state;
        self.hours = hours_for(self.present, self.state);
    }

    pub fn set_present(&mut self) {
        self.present = true;
        self.hours = hours_for(self.present, self.state);
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
