pub mod close;
pub mod config;
pub mod day;
pub mod employee;
pub mod entry;
pub mod export;
pub mod init;
pub mod leave;
pub mod log;
pub mod punch;
pub mod review;
pub mod status;
pub mod week;

use crate::errors::{AppError, AppResult};
use crate::utils::date::{parse_date, today};
use crate::utils::time::parse_datetime;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

pub(crate) fn date_arg(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub(crate) fn date_or_today(s: &Option<String>) -> AppResult<NaiveDate> {
    match s {
        Some(d) => date_arg(d),
        None => Ok(today()),
    }
}

pub(crate) fn instant_arg(s: &str) -> AppResult<NaiveDateTime> {
    parse_datetime(s).ok_or_else(|| AppError::InvalidDate(format!("{s} (expected YYYY-MM-DD HH:MM)")))
}

/// `--at` value, or the current minute.
pub(crate) fn instant_or_now(s: &Option<String>) -> AppResult<NaiveDateTime> {
    match s {
        Some(v) => instant_arg(v),
        None => {
            let now = Local::now().naive_local();
            Ok(now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now))
        }
    }
}
