//! Pure hour rules. Every attendance hour value in the system comes from here.

use crate::models::authorization::AuthorizationState;

/// Credit for one fully attended shift block.
pub const HOURS_PER_SHIFT: f64 = 4.0;

/// Hours credited to a record: a full shift when the monitor was present and
/// the block is authorized or recovered, nothing otherwise.
pub fn hours_for(present: bool, state: AuthorizationState) -> f64 {
    if present && state.is_creditable() {
        HOURS_PER_SHIFT
    } else {
        0.0
    }
}

/// Scheduled hours per week for a monitor owning `slot_count` slots.
pub fn weekly_hours_for_slots(slot_count: i64) -> f64 {
    slot_count.max(0) as f64 * HOURS_PER_SHIFT
}

/// Round to cents / hundredths for presentation and summing.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
