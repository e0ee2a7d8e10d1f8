pub mod adjustments;
pub mod attendance;
pub mod backup;
pub mod calculator;
pub mod finance;
pub mod log;
pub mod reports;
pub mod schedule;
pub mod settings;
pub mod users;
