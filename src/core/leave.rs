//! Leave request validation: day-equivalent computation, advisory warnings
//! and conflict detection against teammates' leave.

use crate::errors::{AppError, AppResult};
use crate::models::leave::{
    ConflictRecord, DurationType, LeaveAssessment, LeaveBalance, LeaveRequest, LeaveType,
    LeaveWarning,
};
use crate::utils::date::{
    business_days_between, dates_in_range, is_holiday, is_weekend, overlap_dates,
};
use crate::utils::formatting::round2;
use crate::utils::time::minutes_between;
use chrono::NaiveDate;
use std::collections::BTreeMap;

const EPSILON: f64 = 1e-9;

/// Organisation calendar settings the validator needs.
#[derive(Debug, Clone, Copy)]
pub struct LeaveCalendar<'a> {
    pub holidays: &'a [NaiveDate],
    pub standard_workday_hours: f64,
}

fn check_shape(request: &LeaveRequest) -> AppResult<()> {
    if request.end_date < request.start_date {
        return Err(AppError::ValidationFailed(format!(
            "end date {} is before start date {}",
            request.end_date, request.start_date
        )));
    }

    match request.duration_type {
        DurationType::FullDay => Ok(()),
        DurationType::HalfDayAm | DurationType::HalfDayPm => {
            if request.start_date != request.end_date {
                return Err(AppError::ValidationFailed(
                    "a half-day request covers a single date".into(),
                ));
            }
            Ok(())
        }
        DurationType::Hours => {
            if request.start_date != request.end_date {
                return Err(AppError::ValidationFailed(
                    "an hour-based request covers a single date".into(),
                ));
            }
            match (request.start_time, request.end_time) {
                (Some(s), Some(e)) if e > s => Ok(()),
                (Some(_), Some(_)) => Err(AppError::ValidationFailed(
                    "end time must be later than start time".into(),
                )),
                _ => Err(AppError::ValidationFailed(
                    "an hour-based request needs a start and end time".into(),
                )),
            }
        }
    }
}

/// Days a request consumes from its balance.
pub fn day_equivalent(request: &LeaveRequest, calendar: &LeaveCalendar<'_>) -> AppResult<f64> {
    check_shape(request)?;

    let days = match request.duration_type {
        DurationType::HalfDayAm | DurationType::HalfDayPm => 0.5,
        DurationType::Hours => {
            let (Some(s), Some(e)) = (request.start_time, request.end_time) else {
                return Err(AppError::ValidationFailed(
                    "an hour-based request needs a start and end time".into(),
                ));
            };
            if calendar.standard_workday_hours <= 0.0 {
                return Err(AppError::Config(
                    "standard_workday_hours must be positive".into(),
                ));
            }
            round2(minutes_between(s, e) as f64 / 60.0 / calendar.standard_workday_hours)
        }
        DurationType::FullDay => {
            business_days_between(request.start_date, request.end_date, calendar.holidays) as f64
        }
    };

    Ok(days)
}

/// One record per teammate whose Pending/Approved leave intersects the
/// request, with the shared dates merged across their requests.
pub fn detect_conflicts(request: &LeaveRequest, team_leave: &[LeaveRequest]) -> Vec<ConflictRecord> {
    let mut by_employee: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();

    for other in team_leave {
        if other.employee_id == request.employee_id
            || (request.id != 0 && other.id == request.id)
            || !other.blocks_calendar()
        {
            continue;
        }

        let shared = overlap_dates(
            request.start_date,
            request.end_date,
            other.start_date,
            other.end_date,
        );
        if !shared.is_empty() {
            by_employee
                .entry(other.employee_id.clone())
                .or_default()
                .extend(shared);
        }
    }

    by_employee
        .into_iter()
        .map(|(other_employee_id, mut dates)| {
            dates.sort();
            dates.dedup();
            ConflictRecord {
                request_id: request.id,
                other_employee_id,
                overlap_dates: dates,
            }
        })
        .collect()
}

pub fn validate(
    request: &LeaveRequest,
    balance: &LeaveBalance,
    leave_type: &LeaveType,
    calendar: &LeaveCalendar<'_>,
    team_leave: &[LeaveRequest],
) -> AppResult<LeaveAssessment> {
    if request.leave_type_id != leave_type.id {
        return Err(AppError::ValidationFailed(format!(
            "request is for leave type '{}' but '{}' was supplied",
            request.leave_type_id, leave_type.id
        )));
    }
    if balance.employee_id != request.employee_id || balance.leave_type_id != request.leave_type_id
    {
        return Err(AppError::ValidationFailed(format!(
            "balance {}/{} does not belong to request {}/{}",
            balance.employee_id, balance.leave_type_id, request.employee_id, request.leave_type_id
        )));
    }

    let days = day_equivalent(request, calendar)?;
    let mut warnings = Vec::new();

    if is_weekend(request.start_date) {
        warnings.push(LeaveWarning::StartsOnWeekend);
    }
    if is_holiday(request.start_date, calendar.holidays) {
        warnings.push(LeaveWarning::StartsOnHoliday);
    }
    if request.duration_type == DurationType::FullDay && days == 0.0 {
        warnings.push(LeaveWarning::NoWorkingDays);
    }

    let available = balance.available();
    if days > available + EPSILON {
        warnings.push(LeaveWarning::ExceedsAvailableBalance {
            requested: days,
            available,
        });
    }

    let blackout: Vec<NaiveDate> = dates_in_range(request.start_date, request.end_date)
        .into_iter()
        .filter(|d| leave_type.blackout_dates.contains(d))
        .collect();
    if !blackout.is_empty() {
        warnings.push(LeaveWarning::BlackoutViolation { dates: blackout });
    }

    for conflict in detect_conflicts(request, team_leave) {
        warnings.push(LeaveWarning::TeamOverlap {
            other_employee_id: conflict.other_employee_id,
            overlap_dates: conflict.overlap_dates,
        });
    }

    Ok(LeaveAssessment {
        day_equivalent: days,
        warnings,
    })
}
