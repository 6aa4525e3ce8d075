use crate::db::queries::{conversion_err, date_str, map_stamp, parse_stored_date, parse_stored_instant, parse_stored_time};
use crate::errors::{AppError, AppResult};
use crate::models::leave::{DurationType, LeaveBalance, LeaveRequest, LeaveWarning};
use crate::models::review::ReviewStatus;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// Stored balance, or an empty one when the employee never had this type.
pub fn load_balance(conn: &Connection, employee_id: &str, leave_type_id: &str) -> AppResult<LeaveBalance> {
    let row = conn
        .query_row(
            "SELECT total, used, pending FROM leave_balances
             WHERE employee_id = ?1 AND leave_type_id = ?2",
            params![employee_id, leave_type_id],
            |row| {
                Ok(LeaveBalance {
                    employee_id: employee_id.to_string(),
                    leave_type_id: leave_type_id.to_string(),
                    total: row.get(0)?,
                    used: row.get(1)?,
                    pending: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(row.unwrap_or_else(|| LeaveBalance::new(employee_id, leave_type_id, 0.0)))
}

pub fn save_balance(conn: &Connection, b: &LeaveBalance) -> AppResult<()> {
    conn.execute(
        "INSERT INTO leave_balances (employee_id, leave_type_id, total, used, pending, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(employee_id, leave_type_id) DO UPDATE SET
             total = excluded.total,
             used = excluded.used,
             pending = excluded.pending,
             updated_at = excluded.updated_at",
        params![
            b.employee_id,
            b.leave_type_id,
            b.total,
            b.used,
            b.pending,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn list_balances(conn: &Connection, employee_id: &str) -> AppResult<Vec<LeaveBalance>> {
    let mut stmt = conn.prepare(
        "SELECT leave_type_id, total, used, pending FROM leave_balances
         WHERE employee_id = ?1
         ORDER BY leave_type_id ASC",
    )?;
    let rows = stmt.query_map([employee_id], |row| {
        Ok(LeaveBalance {
            employee_id: employee_id.to_string(),
            leave_type_id: row.get(0)?,
            total: row.get(1)?,
            used: row.get(2)?,
            pending: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn map_request_row(row: &Row) -> Result<LeaveRequest> {
    let duration: String = row.get("duration_type")?;
    let status: String = row.get("status")?;
    let start_date: String = row.get("start_date")?;
    let end_date: String = row.get("end_date")?;
    let start_time: Option<String> = row.get("start_time")?;
    let end_time: Option<String> = row.get("end_time")?;
    let submitted_at: String = row.get("submitted_at")?;

    let duration_type = DurationType::from_db_str(&duration)
        .ok_or_else(|| conversion_err(format!("duration type {duration}")))?;
    let status = ReviewStatus::from_db_str(&status)
        .ok_or_else(|| conversion_err(format!("status {status}")))?;

    Ok(LeaveRequest {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        leave_type_id: row.get("leave_type_id")?,
        duration_type,
        start_date: parse_stored_date(&start_date)?,
        end_date: parse_stored_date(&end_date)?,
        start_time: start_time.as_deref().map(parse_stored_time).transpose()?,
        end_time: end_time.as_deref().map(parse_stored_time).transpose()?,
        day_equivalent: row.get("day_equivalent")?,
        reason: row.get("reason")?,
        status,
        submitted_at: parse_stored_instant(&submitted_at)?,
        review: map_stamp(
            row.get("reviewer")?,
            row.get("reviewer_note")?,
            row.get("reviewed_at")?,
        )?,
    })
}

/// Store a new request with the warning codes it was submitted with.
pub fn insert_request(conn: &Connection, req: &LeaveRequest, warnings: &[LeaveWarning]) -> AppResult<i64> {
    let codes: Vec<&str> = warnings.iter().map(LeaveWarning::code).collect();

    conn.execute(
        "INSERT INTO leave_requests (employee_id, leave_type_id, duration_type, start_date, end_date,
                                     start_time, end_time, day_equivalent, reason, status,
                                     submitted_at, warnings)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            req.employee_id,
            req.leave_type_id,
            req.duration_type.to_db_str(),
            date_str(&req.start_date),
            date_str(&req.end_date),
            req.start_time.map(|t| t.format("%H:%M").to_string()),
            req.end_time.map(|t| t.format("%H:%M").to_string()),
            req.day_equivalent,
            req.reason,
            req.status.to_db_str(),
            req.submitted_at.to_rfc3339(),
            serde_json::to_string(&codes)?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Persist status and reviewer fields after a review action.
pub fn update_request_review(conn: &Connection, req: &LeaveRequest) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE leave_requests
         SET status = ?1, reviewer = ?2, reviewer_note = ?3, reviewed_at = ?4
         WHERE id = ?5",
        params![
            req.status.to_db_str(),
            req.review.reviewer,
            req.review.note,
            req.review.reviewed_at.map(|t| t.to_rfc3339()),
            req.id,
        ],
    )?;

    if n == 0 {
        return Err(AppError::LeaveRequestNotFound(req.id));
    }
    Ok(())
}

pub fn load_request(conn: &Connection, id: i64) -> AppResult<LeaveRequest> {
    conn.query_row(
        "SELECT * FROM leave_requests WHERE id = ?1",
        [id],
        map_request_row,
    )
    .optional()?
    .ok_or(AppError::LeaveRequestNotFound(id))
}

/// Warning codes recorded at submission.
pub fn load_request_warnings(conn: &Connection, id: i64) -> AppResult<Vec<String>> {
    let raw: String = conn
        .query_row(
            "SELECT warnings FROM leave_requests WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(AppError::LeaveRequestNotFound(id))?;

    Ok(serde_json::from_str(&raw)?)
}

fn collect_requests(conn: &Connection, sql: &str, p: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<LeaveRequest>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, map_request_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_requests(
    conn: &Connection,
    employee_id: Option<&str>,
    status: Option<ReviewStatus>,
) -> AppResult<Vec<LeaveRequest>> {
    let status = status.map(|s| s.to_db_str());
    collect_requests(
        conn,
        "SELECT * FROM leave_requests
         WHERE (?1 IS NULL OR employee_id = ?1)
           AND (?2 IS NULL OR status = ?2)
         ORDER BY start_date ASC, id ASC",
        &[&employee_id, &status],
    )
}

/// Pending and approved requests of the employee's teammates touching the
/// range. Employees without a team have no teammates.
pub fn load_team_leave(
    conn: &Connection,
    employee_id: &str,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<LeaveRequest>> {
    collect_requests(
        conn,
        "SELECT r.* FROM leave_requests r
         JOIN employees e ON e.id = r.employee_id
         WHERE e.team = (SELECT team FROM employees WHERE id = ?1)
           AND e.team <> ''
           AND r.employee_id <> ?1
           AND r.status IN ('pending', 'approved')
           AND r.start_date <= ?3
           AND r.end_date >= ?2
         ORDER BY r.start_date ASC, r.id ASC",
        &[&employee_id, &date_str(from), &date_str(to)],
    )
}
