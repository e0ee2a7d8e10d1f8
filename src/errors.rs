//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Broad classification of an [`AppError`], used by callers that only care
/// about which rule family was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    StateViolation,
    Forbidden,
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Missing entities
    // ---------------------------
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Schedule slot not found: {0}")]
    SlotNotFound(i64),

    #[error("Attendance record not found: {0}")]
    RecordNotFound(i64),

    #[error("Hour adjustment not found: {0}")]
    AdjustmentNotFound(i64),

    #[error("Configuration key not found: {0}")]
    SettingNotFound(String),

    // ---------------------------
    // Conflicts
    // ---------------------------
    #[error("A slot already exists for {0}")]
    DuplicateSlot(String),

    #[error("Configuration key already exists: {0}")]
    DuplicateKey(String),

    #[error("Username already in use: {0}")]
    DuplicateUsername(String),

    #[error("User {user} authored {count} adjustment(s); delete those first")]
    HasAuthoredAdjustments { user: i64, count: i64 },

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid slot data: {0}")]
    InvalidSlotData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Hour delta out of range: {0}")]
    InvalidRange(String),

    #[error("Invalid weeks: {0}")]
    InvalidWeeks(String),

    #[error("Invalid configuration key '{0}': use lowercase letters, digits and underscores")]
    InvalidSettingKey(String),

    #[error("Invalid configuration value: {0}")]
    InvalidSettingValue(String),

    #[error("User {0} is not a monitor")]
    InvalidMonitor(i64),

    #[error("Attendance record {record} does not belong to monitor {monitor}")]
    MismatchedAttendance { record: i64, monitor: i64 },

    // ---------------------------
    // State machine
    // ---------------------------
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No schedule for {0}")]
    NoScheduleForSlot(String),

    #[error("Cannot mark attendance for a future date: {0}")]
    FutureDateNotAllowed(String),

    #[error("Attendance block not authorized by a director: {0}")]
    NotAuthorized(String),

    #[error("Attendance already marked: {0}")]
    AlreadyMarked(String),

    // ---------------------------
    // Roles
    // ---------------------------
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        use AppError::*;

        match self {
            UserNotFound(_) | SlotNotFound(_) | RecordNotFound(_) | AdjustmentNotFound(_)
            | SettingNotFound(_) => ErrorKind::NotFound,

            DuplicateSlot(_)
            | DuplicateKey(_)
            | DuplicateUsername(_)
            | HasAuthoredAdjustments { .. } => ErrorKind::Conflict,

            InvalidSlotData(_)
            | InvalidInput(_)
            | InvalidRange(_)
            | InvalidWeeks(_)
            | InvalidSettingKey(_)
            | InvalidSettingValue(_)
            | InvalidMonitor(_)
            | MismatchedAttendance { .. } => ErrorKind::InvalidInput,

            // Dates only reach the core already parsed, so a date rejection
            // here is always a rule about the record's timeline.
            InvalidDate(_)
            | InvalidState(_)
            | NoScheduleForSlot(_)
            | FutureDateNotAllowed(_)
            | NotAuthorized(_)
            | AlreadyMarked(_) => ErrorKind::StateViolation,

            Forbidden(_) => ErrorKind::Forbidden,

            Io(_) | Yaml(_) | Json(_) | Csv(_) | PasswordHash(_) | Db(_) | Migration(_) | Config(_) | Export(_)
            | Other(_) => ErrorKind::Internal,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
