//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Only `PolicyBlocked`, `InvalidTransition` and `ValidationFailed` are
//! domain failures. Balance warnings, team overlaps and missing clock-outs
//! travel as data next to successful results.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid punch kind: {0}")]
    InvalidPunchKind(String),

    #[error("Invalid stored value: {0}")]
    InvalidStoredValue(String),

    // ---------------------------
    // Domain failures
    // ---------------------------
    /// Punch refused by the site's outside-geofence policy.
    #[error("Punch blocked by geofence policy: {0}")]
    PolicyBlocked(String),

    /// A state-machine contract was violated (punch or review).
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Field-level validation failure (missing note, bad range, ...).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Unknown leave type: {0}")]
    UnknownLeaveType(String),

    #[error("Leave request not found: {0}")]
    LeaveRequestNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
