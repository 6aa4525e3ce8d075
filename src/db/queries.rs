use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::geofence::GeofenceClassification;
use crate::models::punch::{PunchEvent, PunchKind, PunchSource};
use crate::models::review::{ReviewStamp, ReviewStatus};
use crate::models::timesheet::ManualEntry;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn conversion_err(value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidStoredValue(value)),
    )
}

pub(crate) fn date_str(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| conversion_err(format!("date {s}")))
}

pub(crate) fn parse_stored_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| conversion_err(format!("time {s}")))
}

pub(crate) fn parse_stored_instant(s: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_err(format!("timestamp {s}")))
}

pub(crate) fn map_stamp(
    reviewer: Option<String>,
    note: Option<String>,
    reviewed_at: Option<String>,
) -> Result<ReviewStamp> {
    let reviewed_at = match reviewed_at {
        Some(s) => Some(parse_stored_instant(&s)?),
        None => None,
    };
    Ok(ReviewStamp {
        reviewer,
        note,
        reviewed_at,
    })
}

// ---------------------------------------------------------------------------
// Punches
// ---------------------------------------------------------------------------

pub fn map_punch_row(row: &Row) -> Result<PunchEvent> {
    let work_date: String = row.get("work_date")?;
    let ts: String = row.get("ts")?;
    let kind_str: String = row.get("kind")?;
    let class_str: Option<String> = row.get("classification")?;
    let source_str: String = row.get("source")?;

    let timestamp = NaiveDateTime::parse_from_str(&ts, TS_FORMAT)
        .map_err(|_| conversion_err(format!("timestamp {ts}")))?;

    let kind = PunchKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_err(format!("punch kind {kind_str}")))?;

    let classification = match class_str {
        Some(c) => Some(
            GeofenceClassification::from_db_str(&c)
                .ok_or_else(|| conversion_err(format!("classification {c}")))?,
        ),
        None => None,
    };

    let source = PunchSource::from_db_str(&source_str)
        .ok_or_else(|| conversion_err(format!("source {source_str}")))?;

    Ok(PunchEvent {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        work_date: parse_stored_date(&work_date)?,
        kind,
        timestamp,
        site_id: row.get("site_id")?,
        classification,
        flagged: row.get::<_, i32>("flagged")? == 1,
        flag_reason: row.get("flag_reason")?,
        note: row.get("note")?,
        source,
        created_at: row.get("created_at")?,
    })
}

/// Append a punch; returns its id.
pub fn insert_punch(conn: &Connection, ev: &PunchEvent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO punches (employee_id, work_date, kind, ts, site_id, classification,
                              flagged, flag_reason, note, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            ev.employee_id,
            date_str(&ev.work_date),
            ev.kind.to_db_str(),
            ev.timestamp.format(TS_FORMAT).to_string(),
            ev.site_id,
            ev.classification.map(|c| c.to_db_str()),
            if ev.flagged { 1 } else { 0 },
            ev.flag_reason,
            ev.note,
            ev.source.to_db_str(),
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn collect_punches(conn: &Connection, sql: &str, p: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<PunchEvent>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, map_punch_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_punches_by_work_date(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Vec<PunchEvent>> {
    collect_punches(
        conn,
        "SELECT * FROM punches
         WHERE employee_id = ?1 AND work_date = ?2
         ORDER BY ts ASC, id ASC",
        &[&employee_id, &date_str(date)],
    )
}

/// Most recent work date with punches for the employee, if any.
pub fn load_last_work_date(conn: &Connection, employee_id: &str) -> AppResult<Option<NaiveDate>> {
    let last: Option<String> = conn
        .query_row(
            "SELECT work_date FROM punches
             WHERE employee_id = ?1
             ORDER BY ts DESC, id DESC
             LIMIT 1",
            [employee_id],
            |row| row.get(0),
        )
        .optional()?;

    match last {
        Some(s) => Ok(Some(parse_stored_date(&s)?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Manual entries
// ---------------------------------------------------------------------------

fn map_manual_row(row: &Row) -> Result<ManualEntry> {
    let date: String = row.get("date")?;
    let start: String = row.get("start_time")?;
    let end: String = row.get("end_time")?;

    Ok(ManualEntry {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date: parse_stored_date(&date)?,
        start: parse_stored_time(&start)?,
        end: parse_stored_time(&end)?,
        break_minutes: row.get("break_minutes")?,
        comment: row.get("comment")?,
    })
}

pub fn insert_manual_entry(conn: &Connection, entry: &ManualEntry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO manual_entries (employee_id, date, start_time, end_time, break_minutes, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.employee_id,
            date_str(&entry.date),
            entry.start.format("%H:%M").to_string(),
            entry.end.format("%H:%M").to_string(),
            entry.break_minutes,
            entry.comment,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_manual_entries(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Vec<ManualEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM manual_entries
         WHERE employee_id = ?1 AND date = ?2
         ORDER BY start_time ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![employee_id, date_str(date)], map_manual_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Timesheet reviews
// ---------------------------------------------------------------------------

pub fn load_review(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<(ReviewStatus, ReviewStamp)>> {
    let row = conn
        .query_row(
            "SELECT status, reviewer, note, reviewed_at FROM timesheet_reviews
             WHERE employee_id = ?1 AND date = ?2",
            params![employee_id, date_str(date)],
            |row| {
                let status: String = row.get(0)?;
                let status = ReviewStatus::from_db_str(&status)
                    .ok_or_else(|| conversion_err(format!("status {status}")))?;
                let stamp = map_stamp(row.get(1)?, row.get(2)?, row.get(3)?)?;
                Ok((status, stamp))
            },
        )
        .optional()?;
    Ok(row)
}

pub fn save_review(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
    status: ReviewStatus,
    stamp: &ReviewStamp,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO timesheet_reviews (employee_id, date, status, reviewer, note, reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(employee_id, date) DO UPDATE SET
             status = excluded.status,
             reviewer = excluded.reviewer,
             note = excluded.note,
             reviewed_at = excluded.reviewed_at",
        params![
            employee_id,
            date_str(date),
            status.to_db_str(),
            stamp.reviewer,
            stamp.note,
            stamp.reviewed_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

/// An edited day goes back to Pending.
pub fn reset_review(conn: &Connection, employee_id: &str, date: &NaiveDate) -> AppResult<()> {
    conn.execute(
        "UPDATE timesheet_reviews
         SET status = 'pending', reviewer = NULL, note = NULL, reviewed_at = NULL
         WHERE employee_id = ?1 AND date = ?2",
        params![employee_id, date_str(date)],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

fn map_employee_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        team: row.get("team")?,
        site_id: row.get("site_id")?,
    })
}

pub fn upsert_employee(conn: &Connection, emp: &Employee) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (id, name, team, site_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             team = excluded.team,
             site_id = excluded.site_id",
        params![
            emp.id,
            emp.name,
            emp.team,
            emp.site_id,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn load_employee(conn: &Connection, id: &str) -> AppResult<Employee> {
    conn.query_row(
        "SELECT * FROM employees WHERE id = ?1",
        [id],
        map_employee_row,
    )
    .optional()?
    .ok_or_else(|| AppError::UnknownEmployee(id.to_string()))
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare("SELECT * FROM employees ORDER BY team ASC, id ASC")?;
    let rows = stmt.query_map([], map_employee_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
