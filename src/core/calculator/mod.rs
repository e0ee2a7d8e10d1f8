pub mod hours;
pub mod projection;
