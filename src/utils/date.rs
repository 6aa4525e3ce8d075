use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// All dates from `start` to `end`, both inclusive. Empty if `end < start`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    holidays.contains(&date)
}

pub fn is_working_day(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    !is_weekend(date) && !is_holiday(date, holidays)
}

/// Working days in the inclusive range, skipping weekends and holidays.
pub fn business_days_between(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> i64 {
    dates_in_range(start, end)
        .into_iter()
        .filter(|d| is_working_day(*d, holidays))
        .count() as i64
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn week_dates(monday: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| monday + Duration::days(i)).collect()
}

/// Dates shared by two inclusive ranges.
pub fn overlap_dates(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> Vec<NaiveDate> {
    dates_in_range(a_start.max(b_start), a_end.min(b_end))
}

