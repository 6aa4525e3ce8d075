//! Time utilities: parsing HH:MM, duration computations, rounding, formatting minutes, etc.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse "YYYY-MM-DD HH:MM" (or the ISO "T" separator).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Parse a "HH:MM-HH:MM" span.
pub fn parse_time_range(s: &str) -> AppResult<(NaiveTime, NaiveTime)> {
    let re = Regex::new(r"^\s*(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})\s*$")
        .map_err(|e| AppError::InvalidTime(e.to_string()))?;

    let caps = re
        .captures(s)
        .ok_or_else(|| AppError::InvalidTime(format!("expected HH:MM-HH:MM, got '{s}'")))?;

    let start = parse_time(&caps[1]).ok_or_else(|| AppError::InvalidTime(caps[1].to_string()))?;
    let end = parse_time(&caps[2]).ok_or_else(|| AppError::InvalidTime(caps[2].to_string()))?;
    Ok((start, end))
}

pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let duration = end - start;
    duration.num_minutes()
}

/// Minutes from `start` to `end` on a wall clock; an `end` at or before
/// `start` is read as the next day (overnight shift).
pub fn elapsed_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let m = minutes_between(start, end);
    if m > 0 { m } else { m + 24 * 60 }
}

/// Anchor a wall-clock span on `date`, rolling `end` over midnight when needed.
pub fn span_on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
    let s = date.and_time(start);
    (s, s + Duration::minutes(elapsed_minutes(start, end)))
}

pub fn minutes_to_hours(mins: i64) -> f64 {
    crate::utils::formatting::round2(mins as f64 / 60.0)
}

/// Site-level rounding applied to both ends of a span before subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundingRule {
    #[default]
    Exact,
    Nearest5,
    Nearest10,
    Nearest15,
}

impl RoundingRule {
    pub fn step_minutes(&self) -> i64 {
        match self {
            RoundingRule::Exact => 0,
            RoundingRule::Nearest5 => 5,
            RoundingRule::Nearest10 => 10,
            RoundingRule::Nearest15 => 15,
        }
    }

    /// Round an instant to the nearest step (halves round up).
    /// `Exact` only drops seconds.
    pub fn round(&self, at: NaiveDateTime) -> NaiveDateTime {
        let midnight = at.date().and_time(NaiveTime::MIN);
        let secs = i64::from(at.time().num_seconds_from_midnight());

        let step = self.step_minutes() * 60;
        let rounded = if step == 0 {
            secs - secs % 60
        } else {
            ((secs + step / 2) / step) * step
        };

        midnight + Duration::seconds(rounded)
    }
}
