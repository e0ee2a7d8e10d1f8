pub mod adjust;
pub mod attendance;
pub mod backup;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod report;
pub mod schedule;
pub mod setting;
pub mod user;
