use super::review::{ReviewStamp, ReviewStatus};
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Leave type settings (read from configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: String,
    pub name: String,
    /// Days accrued per month.
    #[serde(default)]
    pub accrual_rate: f64,
    /// Maximum available days carried into the next year.
    #[serde(default)]
    pub carry_over_limit: f64,
    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,
}

/// Per employee, per leave type running totals.
///
/// `used + pending` may exceed `total`; the excess is reported as a warning
/// at submission time, never rejected at write time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaveBalance {
    pub employee_id: String,
    pub leave_type_id: String,
    pub total: f64,
    pub used: f64,
    pub pending: f64,
}

impl LeaveBalance {
    pub fn new(employee_id: &str, leave_type_id: &str, total: f64) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            leave_type_id: leave_type_id.to_string(),
            total,
            used: 0.0,
            pending: 0.0,
        }
    }

    pub fn available(&self) -> f64 {
        crate::utils::formatting::round2(self.total - self.used - self.pending)
    }

    /// Positive amount by which `used + pending` overshoots `total`.
    pub fn exceeded_by(&self) -> f64 {
        crate::utils::formatting::round2((self.used + self.pending - self.total).max(0.0))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DurationType {
    FullDay,
    HalfDayAm,
    HalfDayPm,
    Hours,
}

impl DurationType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DurationType::FullDay => "full_day",
            DurationType::HalfDayAm => "half_day_am",
            DurationType::HalfDayPm => "half_day_pm",
            DurationType::Hours => "hours",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "full_day" => Some(DurationType::FullDay),
            "half_day_am" => Some(DurationType::HalfDayAm),
            "half_day_pm" => Some(DurationType::HalfDayPm),
            "hours" => Some(DurationType::Hours),
            _ => None,
        }
    }

    pub fn is_half_day(&self) -> bool {
        matches!(self, DurationType::HalfDayAm | DurationType::HalfDayPm)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: String,
    pub leave_type_id: String,
    pub duration_type: DurationType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub day_equivalent: f64,
    pub reason: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Local>,
    pub review: ReviewStamp,
}

impl LeaveRequest {
    /// A full-day request over an inclusive date range.
    pub fn full_days(
        employee_id: &str,
        leave_type_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            employee_id: employee_id.to_string(),
            leave_type_id: leave_type_id.to_string(),
            duration_type: DurationType::FullDay,
            start_date,
            end_date,
            start_time: None,
            end_time: None,
            day_equivalent: 0.0,
            reason: String::new(),
            status: ReviewStatus::Pending,
            submitted_at: Local::now(),
            review: ReviewStamp::default(),
        }
    }

    pub fn half_day(employee_id: &str, leave_type_id: &str, date: NaiveDate, am: bool) -> Self {
        let mut req = Self::full_days(employee_id, leave_type_id, date, date);
        req.duration_type = if am {
            DurationType::HalfDayAm
        } else {
            DurationType::HalfDayPm
        };
        req
    }

    pub fn hours(
        employee_id: &str,
        leave_type_id: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        let mut req = Self::full_days(employee_id, leave_type_id, date, date);
        req.duration_type = DurationType::Hours;
        req.start_time = Some(start);
        req.end_time = Some(end);
        req
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    /// Statuses that hold days and therefore count for team overlap.
    pub fn blocks_calendar(&self) -> bool {
        matches!(self.status, ReviewStatus::Pending | ReviewStatus::Approved)
    }
}

/// Advisory results of leave validation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum LeaveWarning {
    StartsOnWeekend,
    StartsOnHoliday,
    /// The only warning callers treat as blocking by convention.
    ExceedsAvailableBalance { requested: f64, available: f64 },
    BlackoutViolation { dates: Vec<NaiveDate> },
    TeamOverlap {
        other_employee_id: String,
        overlap_dates: Vec<NaiveDate>,
    },
    NoWorkingDays,
}

impl LeaveWarning {
    pub fn is_blocking(&self) -> bool {
        matches!(self, LeaveWarning::ExceedsAvailableBalance { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            LeaveWarning::StartsOnWeekend => "starts_on_weekend",
            LeaveWarning::StartsOnHoliday => "starts_on_holiday",
            LeaveWarning::ExceedsAvailableBalance { .. } => "exceeds_available_balance",
            LeaveWarning::BlackoutViolation { .. } => "blackout_violation",
            LeaveWarning::TeamOverlap { .. } => "team_overlap",
            LeaveWarning::NoWorkingDays => "no_working_days",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LeaveWarning::StartsOnWeekend => "Request starts on a weekend".into(),
            LeaveWarning::StartsOnHoliday => "Request starts on a holiday".into(),
            LeaveWarning::ExceedsAvailableBalance {
                requested,
                available,
            } => format!("Requested {requested} day(s) but only {available} available"),
            LeaveWarning::BlackoutViolation { dates } => {
                format!("Blackout dates requested: {}", join_dates(dates))
            }
            LeaveWarning::TeamOverlap {
                other_employee_id,
                overlap_dates,
            } => format!(
                "Overlaps with {} on {}",
                other_employee_id,
                join_dates(overlap_dates)
            ),
            LeaveWarning::NoWorkingDays => "Range contains no working days".into(),
        }
    }
}

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Derived overlap between a request and a teammate's leave.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConflictRecord {
    pub request_id: i64,
    pub other_employee_id: String,
    pub overlap_dates: Vec<NaiveDate>,
}

/// Outcome of validating a request.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveAssessment {
    pub day_equivalent: f64,
    pub warnings: Vec<LeaveWarning>,
}

impl LeaveAssessment {
    pub fn is_blocking(&self) -> bool {
        self.warnings.iter().any(LeaveWarning::is_blocking)
    }
}
