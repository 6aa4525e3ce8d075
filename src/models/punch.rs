use super::geofence::GeofenceClassification;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PunchKind {
    ClockIn,
    ClockOut,
    BreakStart,
    BreakEnd,
}

impl PunchKind {
    /// Parse user input ("in", "clock-in", "break-start", ...).
    pub fn pk_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "in" | "clock-in" => Some(Self::ClockIn),
            "out" | "clock-out" => Some(Self::ClockOut),
            "break" | "break-start" => Some(Self::BreakStart),
            "resume" | "break-end" => Some(Self::BreakEnd),
            _ => None,
        }
    }

    pub fn pk_as_str(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "clock-in",
            PunchKind::ClockOut => "clock-out",
            PunchKind::BreakStart => "break-start",
            PunchKind::BreakEnd => "break-end",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "in",
            PunchKind::ClockOut => "out",
            PunchKind::BreakStart => "break_start",
            PunchKind::BreakEnd => "break_end",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(PunchKind::ClockIn),
            "out" => Some(PunchKind::ClockOut),
            "break_start" => Some(PunchKind::BreakStart),
            "break_end" => Some(PunchKind::BreakEnd),
            _ => None,
        }
    }

    /// Entry and exit punches sample the location; breaks do not.
    pub fn is_geofenced(&self) -> bool {
        matches!(self, PunchKind::ClockIn | PunchKind::ClockOut)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PunchSource {
    Device,
    Manual,
}

impl PunchSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchSource::Device => "device",
            PunchSource::Manual => "manual",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "device" => Some(PunchSource::Device),
            "manual" => Some(PunchSource::Manual),
            _ => None,
        }
    }
}

/// A recorded punch. Immutable once stored; the log is append-only.
#[derive(Debug, Clone, Serialize)]
pub struct PunchEvent {
    pub id: i64,
    pub employee_id: String,
    /// Date of the ClockIn that opened the session (overnight punches keep it).
    pub work_date: NaiveDate,
    pub kind: PunchKind,
    pub timestamp: NaiveDateTime,
    pub site_id: Option<String>,
    pub classification: Option<GeofenceClassification>,
    pub flagged: bool,
    pub flag_reason: String,
    pub note: Option<String>,
    pub source: PunchSource,
    pub created_at: String,
}

impl PunchEvent {
    /// Builds a not-yet-stored event (`id = 0`).
    pub fn new(
        employee_id: &str,
        work_date: NaiveDate,
        kind: PunchKind,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            employee_id: employee_id.to_string(),
            work_date,
            kind,
            timestamp,
            site_id: None,
            classification: None,
            flagged: false,
            flag_reason: String::new(),
            note: None,
            source: PunchSource::Device,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn get_date_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Current state of an employee's session, derived by folding punches.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum PunchState {
    #[default]
    ClockedOut,
    ClockedIn,
    OnBreak,
}

impl PunchState {
    pub fn label(&self) -> &'static str {
        match self {
            PunchState::ClockedOut => "clocked out",
            PunchState::ClockedIn => "clocked in",
            PunchState::OnBreak => "on break",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, PunchState::ClockedOut)
    }
}
