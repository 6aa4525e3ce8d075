use super::review::{ReviewStamp, ReviewStatus};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Break,
    Overtime,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Regular => "regular",
            EntryKind::Break => "break",
            EntryKind::Overtime => "overtime",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeEntry {
    pub kind: EntryKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub minutes: i64,
    pub hours: f64,
    pub comment: String,
}

/// Data-quality flags raised while aggregating a day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum DayFlag {
    /// A ClockIn with no ClockOut; the session counts zero hours.
    MissingClockOut { clock_in: NaiveDateTime },
    ExcessiveOvertime { overtime_minutes: i64 },
    /// A geofence-flagged punch contributed to the day.
    FlaggedPunch { at: NaiveDateTime, reason: String },
    /// Stored punches that do not fold; the broken tail is excluded.
    InvalidSequence { at: NaiveDateTime },
}

impl DayFlag {
    pub fn describe(&self) -> String {
        match self {
            DayFlag::MissingClockOut { clock_in } => {
                format!("missing clock-out (clock-in at {})", clock_in.format("%H:%M"))
            }
            DayFlag::ExcessiveOvertime { overtime_minutes } => {
                format!("excessive overtime ({overtime_minutes} min)")
            }
            DayFlag::FlaggedPunch { at, reason } => {
                format!("flagged punch at {}: {}", at.format("%H:%M"), reason)
            }
            DayFlag::InvalidSequence { at } => {
                format!("invalid punch sequence at {}", at.format("%H:%M"))
            }
        }
    }
}

/// Non-punch work record entered by hand.
#[derive(Debug, Clone, Serialize)]
pub struct ManualEntry {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_minutes: i64,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTimesheet {
    pub date: NaiveDate,
    pub employee_id: String,
    pub entries: Vec<TimeEntry>,
    pub flags: Vec<DayFlag>,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub break_minutes: i64,
    pub status: ReviewStatus,
    pub review: ReviewStamp,
}

impl DayTimesheet {
    pub fn empty(employee_id: &str, date: NaiveDate) -> Self {
        Self {
            date,
            employee_id: employee_id.to_string(),
            entries: Vec::new(),
            flags: Vec::new(),
            regular_minutes: 0,
            overtime_minutes: 0,
            break_minutes: 0,
            status: ReviewStatus::Pending,
            review: ReviewStamp::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.flags.is_empty()
    }

    pub fn worked_minutes(&self) -> i64 {
        self.regular_minutes + self.overtime_minutes
    }

    pub fn has_missing_clock_out(&self) -> bool {
        self.flags
            .iter()
            .any(|f| matches!(f, DayFlag::MissingClockOut { .. }))
    }

}

#[derive(Debug, Clone, Serialize)]
pub struct WeekTimesheet {
    pub employee_id: String,
    pub week_start: NaiveDate,
    pub days: Vec<DayTimesheet>,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub break_minutes: i64,
}

impl WeekTimesheet {
    pub fn regular_hours(&self) -> f64 {
        crate::utils::time::minutes_to_hours(self.regular_minutes)
    }

    pub fn overtime_hours(&self) -> f64 {
        crate::utils::time::minutes_to_hours(self.overtime_minutes)
    }

    /// Approved only when every day with entries is Approved; any rejected
    /// or info-requested day wins over pending ones.
    pub fn status(&self) -> ReviewStatus {
        let worked: Vec<&DayTimesheet> = self.days.iter().filter(|d| !d.is_empty()).collect();

        if worked.iter().any(|d| d.status == ReviewStatus::Rejected) {
            return ReviewStatus::Rejected;
        }
        if worked.iter().any(|d| d.status == ReviewStatus::NeedsInfo) {
            return ReviewStatus::NeedsInfo;
        }
        if !worked.is_empty() && worked.iter().all(|d| d.status == ReviewStatus::Approved) {
            return ReviewStatus::Approved;
        }
        ReviewStatus::Pending
    }
}
