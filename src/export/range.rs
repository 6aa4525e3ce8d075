// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};

fn invalid(what: &str) -> AppError {
    AppError::InvalidDate(what.to_string())
}

/// First and last day of one range bound.
fn bounds(s: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match s.len() {
        // YYYY
        4 => {
            let y: i32 = s.parse().map_err(|_| invalid(s))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(s))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(s))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let d1 = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(s))?;
            let next = if d1.month() == 12 {
                NaiveDate::from_ymd_opt(d1.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(d1.year(), d1.month() + 1, 1)
            }
            .ok_or_else(|| invalid(s))?;
            Ok((d1, next - Duration::days(1)))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid(s))?;
            Ok((d, d))
        }
        _ => Err(invalid(s)),
    }
}

/// Parse --range.
///
/// Accepts YYYY, YYYY-MM, YYYY-MM-DD, or two of the same shape joined by
/// ':' (YYYY:YYYY, YYYY-MM:YYYY-MM, YYYY-MM-DD:YYYY-MM-DD).
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start, end) = match r.split_once(':') {
        Some((a, b)) => {
            let (a, b) = (a.trim(), b.trim());
            if a.len() != b.len() {
                return Err(invalid("start and end must have the same format"));
            }
            (bounds(a)?.0, bounds(b)?.1)
        }
        None => bounds(r.trim())?,
    };

    if end < start {
        return Err(invalid(&format!("{r} (end before start)")));
    }
    Ok((start, end))
}
