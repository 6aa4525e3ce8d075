// src/export/model.rs

use crate::models::timesheet::DayTimesheet;
use serde::Serialize;

/// Flat row per worked day, shared by CSV and JSON.
#[derive(Serialize, Clone, Debug)]
pub struct DayExport {
    pub employee_id: String,
    pub date: String,
    pub first_start: String,
    pub last_end: String,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub break_minutes: i64,
    pub status: String,
    pub reviewer: String,
    pub flags: String,
}

impl From<&DayTimesheet> for DayExport {
    fn from(day: &DayTimesheet) -> Self {
        let fmt = |t: Option<chrono::NaiveDateTime>| {
            t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
        };

        Self {
            employee_id: day.employee_id.clone(),
            date: day.date.format("%Y-%m-%d").to_string(),
            first_start: fmt(day.entries.iter().map(|e| e.start).min()),
            last_end: fmt(day.entries.iter().map(|e| e.end).max()),
            regular_hours: crate::utils::time::minutes_to_hours(day.regular_minutes),
            overtime_hours: crate::utils::time::minutes_to_hours(day.overtime_minutes),
            break_minutes: day.break_minutes,
            status: day.status.to_db_str().to_string(),
            reviewer: day.review.reviewer.clone().unwrap_or_default(),
            flags: day
                .flags
                .iter()
                .map(|f| f.describe())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}
