use crate::config::Config;
use crate::core::calculator::timesheet::{AggregationSettings, aggregate, aggregate_week};
use crate::core::punch::fold_session;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    insert_manual_entry, insert_punch, load_employee, load_manual_entries,
    load_punches_by_work_date, load_review, reset_review,
};
use crate::errors::{AppError, AppResult};
use crate::models::punch::{PunchEvent, PunchKind, PunchSource, PunchState};
use crate::models::timesheet::{DayTimesheet, ManualEntry, WeekTimesheet};
use crate::utils::date::{dates_in_range, week_dates, week_start};
use crate::utils::time::elapsed_minutes;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

/// Day timesheet as stored: aggregated from punches and manual entries,
/// with the persisted review decision overlaid.
pub(crate) fn load_day(
    conn: &Connection,
    cfg: &Config,
    employee_id: &str,
    date: NaiveDate,
) -> AppResult<DayTimesheet> {
    let events = load_punches_by_work_date(conn, employee_id, &date)?;
    let manual = load_manual_entries(conn, employee_id, &date)?;

    let mut day = aggregate(
        employee_id,
        date,
        &events,
        &manual,
        &AggregationSettings::from(cfg),
    );

    if let Some((status, stamp)) = load_review(conn, employee_id, &date)? {
        day.status = status;
        day.review = stamp;
    }
    Ok(day)
}

pub(crate) fn load_week(
    conn: &Connection,
    cfg: &Config,
    employee_id: &str,
    any_date: NaiveDate,
) -> AppResult<WeekTimesheet> {
    let monday = week_start(any_date);
    let days = week_dates(monday)
        .into_iter()
        .map(|d| load_day(conn, cfg, employee_id, d))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(aggregate_week(employee_id, monday, days))
}

pub struct TimesheetLogic;

impl TimesheetLogic {
    pub fn day(
        pool: &DbPool,
        cfg: &Config,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<DayTimesheet> {
        load_employee(&pool.conn, employee_id)?;
        load_day(&pool.conn, cfg, employee_id, date)
    }

    /// The Monday-based week containing `date`.
    pub fn week(
        pool: &DbPool,
        cfg: &Config,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<WeekTimesheet> {
        load_employee(&pool.conn, employee_id)?;
        load_week(&pool.conn, cfg, employee_id, date)
    }

    /// Days in `[from, to]`, including the empty ones.
    pub fn range(
        pool: &DbPool,
        cfg: &Config,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DayTimesheet>> {
        load_employee(&pool.conn, employee_id)?;
        dates_in_range(from, to)
            .into_iter()
            .map(|d| load_day(&pool.conn, cfg, employee_id, d))
            .collect()
    }

    /// Record work done without punches. The day goes back to Pending.
    pub fn add_manual_entry(
        pool: &mut DbPool,
        cfg: &Config,
        entry: &ManualEntry,
    ) -> AppResult<DayTimesheet> {
        if entry.start == entry.end {
            return Err(AppError::ValidationFailed(
                "entry start and end are the same instant".into(),
            ));
        }
        let span = elapsed_minutes(entry.start, entry.end);
        if entry.break_minutes < 0 || entry.break_minutes >= span {
            return Err(AppError::ValidationFailed(format!(
                "break of {} min does not fit in a {} min entry",
                entry.break_minutes, span
            )));
        }

        let tx = pool.writer()?;
        load_employee(&tx, &entry.employee_id)?;

        insert_manual_entry(&tx, entry)?;
        reset_review(&tx, &entry.employee_id, &entry.date)?;
        ttlog(
            &tx,
            "entry",
            &entry.employee_id,
            &format!(
                "{} {}-{} (break {} min)",
                entry.date,
                entry.start.format("%H:%M"),
                entry.end.format("%H:%M"),
                entry.break_minutes
            ),
        )?;

        let day = load_day(&tx, cfg, &entry.employee_id, entry.date)?;
        tx.commit()?;
        Ok(day)
    }

    /// Close an open session on `work_date` by hand, ending a running break
    /// first. Returns the appended punches.
    pub fn close_session(
        pool: &mut DbPool,
        employee_id: &str,
        work_date: NaiveDate,
        at: NaiveDateTime,
        note: Option<String>,
    ) -> AppResult<Vec<PunchEvent>> {
        let tx = pool.writer()?;
        load_employee(&tx, employee_id)?;

        let events = load_punches_by_work_date(&tx, employee_id, &work_date)?;
        let state = fold_session(&events)?;

        if !state.is_open() {
            return Err(AppError::InvalidTransition(format!(
                "no open session for {employee_id} on {work_date}"
            )));
        }
        if let Some(last) = events.iter().map(|e| e.timestamp).max()
            && at < last
        {
            return Err(AppError::ValidationFailed(format!(
                "clock-out {} is earlier than the last punch ({})",
                at.format("%Y-%m-%d %H:%M"),
                last.format("%Y-%m-%d %H:%M")
            )));
        }

        let mut kinds = Vec::new();
        if state == PunchState::OnBreak {
            kinds.push(PunchKind::BreakEnd);
        }
        kinds.push(PunchKind::ClockOut);

        let mut appended = Vec::new();
        for kind in kinds {
            let mut ev = PunchEvent::new(employee_id, work_date, kind, at);
            ev.source = PunchSource::Manual;
            if kind == PunchKind::ClockOut {
                ev.note = note.clone();
            }
            ev.id = insert_punch(&tx, &ev)?;
            appended.push(ev);
        }

        reset_review(&tx, employee_id, &work_date)?;
        ttlog(
            &tx,
            "close",
            employee_id,
            &format!("session of {} closed at {}", work_date, at.format("%Y-%m-%d %H:%M")),
        )?;
        tx.commit()?;

        Ok(appended)
    }
}
