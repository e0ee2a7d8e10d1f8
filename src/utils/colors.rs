/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::authorization::AuthorizationState;

/// Colour of an authorization state in listings.
pub fn color_for_state(state: AuthorizationState) -> &'static str {
    match state {
        AuthorizationState::Pending => YELLOW,
        AuthorizationState::Authorized => GREEN,
        AuthorizationState::Rejected => RED,
        AuthorizationState::Recovered => CYAN,
    }
}

/// Signed value colour: positive green, negative red, zero plain.
pub fn color_for_delta(value: f64) -> &'static str {
    if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        RESET
    }
}

/// Grey out empty or zero cells.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "-" || v == "0.00h" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
