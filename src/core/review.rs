use crate::config::Config;
use crate::core::approval::{BulkOutcome, LeaveReview, ReviewAction, Reviewable};
use crate::core::timesheet::{load_day, load_week};
use crate::db::leave::{load_balance, load_request, save_balance, update_request_review};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{load_employee, save_review};
use crate::errors::AppResult;
use crate::models::review::ReviewStatus;
use crate::models::timesheet::DayTimesheet;
use chrono::NaiveDate;
use rusqlite::Connection;

/// What a review action is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewTarget {
    Leave(i64),
    Day { employee_id: String, date: NaiveDate },
    /// The Monday-based week containing `date`.
    Week { employee_id: String, date: NaiveDate },
}

impl ReviewTarget {
    pub fn label(&self) -> String {
        match self {
            ReviewTarget::Leave(id) => format!("leave #{id}"),
            ReviewTarget::Day { employee_id, date } => format!("day {employee_id} {date}"),
            ReviewTarget::Week { employee_id, date } => format!("week {employee_id} {date}"),
        }
    }
}

fn save_day_review(conn: &Connection, day: &DayTimesheet) -> AppResult<()> {
    save_review(conn, &day.employee_id, &day.date, day.status, &day.review)
}

/// Review decisions on leave requests and timesheets. Each target is
/// decided in its own transaction.
pub struct ReviewLogic;

impl ReviewLogic {
    pub fn apply(
        pool: &mut DbPool,
        cfg: &Config,
        reviewer: &str,
        target: &ReviewTarget,
        action: &ReviewAction,
    ) -> AppResult<ReviewStatus> {
        let tx = pool.writer()?;

        let status = match target {
            ReviewTarget::Leave(id) => {
                let mut request = load_request(&tx, *id)?;
                let mut balance =
                    load_balance(&tx, &request.employee_id, &request.leave_type_id)?;

                let status = LeaveReview {
                    request: &mut request,
                    balance: &mut balance,
                }
                .apply_action(reviewer, action)?;

                update_request_review(&tx, &request)?;
                save_balance(&tx, &balance)?;
                status
            }
            ReviewTarget::Day { employee_id, date } => {
                load_employee(&tx, employee_id)?;
                let mut day = load_day(&tx, cfg, employee_id, *date)?;
                let status = day.apply_action(reviewer, action)?;
                save_day_review(&tx, &day)?;
                status
            }
            ReviewTarget::Week { employee_id, date } => {
                load_employee(&tx, employee_id)?;
                let mut week = load_week(&tx, cfg, employee_id, *date)?;
                let status = week.apply_action(reviewer, action)?;
                for day in week.days.iter().filter(|d| !d.is_empty()) {
                    save_day_review(&tx, day)?;
                }
                status
            }
        };

        ttlog(
            &tx,
            "review",
            &target.label(),
            &format!("{} by {} -> {}", action.label(), reviewer, status.to_db_str()),
        )?;
        tx.commit()?;

        Ok(status)
    }

    pub fn approve(
        pool: &mut DbPool,
        cfg: &Config,
        reviewer: &str,
        target: &ReviewTarget,
        note: Option<String>,
    ) -> AppResult<ReviewStatus> {
        Self::apply(pool, cfg, reviewer, target, &ReviewAction::Approve(note))
    }

    pub fn reject(
        pool: &mut DbPool,
        cfg: &Config,
        reviewer: &str,
        target: &ReviewTarget,
        note: &str,
    ) -> AppResult<ReviewStatus> {
        Self::apply(
            pool,
            cfg,
            reviewer,
            target,
            &ReviewAction::Reject(note.to_string()),
        )
    }

    pub fn request_info(
        pool: &mut DbPool,
        cfg: &Config,
        reviewer: &str,
        target: &ReviewTarget,
        note: &str,
    ) -> AppResult<ReviewStatus> {
        Self::apply(
            pool,
            cfg,
            reviewer,
            target,
            &ReviewAction::RequestInfo(note.to_string()),
        )
    }

    /// Same action on many targets; one failure never stops the others.
    pub fn bulk(
        pool: &mut DbPool,
        cfg: &Config,
        reviewer: &str,
        targets: &[ReviewTarget],
        action: &ReviewAction,
    ) -> Vec<BulkOutcome> {
        targets
            .iter()
            .map(|t| {
                let result = Self::apply(pool, cfg, reviewer, t, action);
                BulkOutcome::from_result(t.label(), result)
            })
            .collect()
    }

    /// Send a rejected or info-requested timesheet day back to Pending.
    pub fn resubmit_day(
        pool: &mut DbPool,
        cfg: &Config,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<ReviewStatus> {
        let tx = pool.writer()?;
        load_employee(&tx, employee_id)?;

        let mut day = load_day(&tx, cfg, employee_id, date)?;
        let status = day.resubmit()?;
        save_day_review(&tx, &day)?;

        ttlog(
            &tx,
            "review",
            &format!("day {employee_id} {date}"),
            "resubmitted -> pending",
        )?;
        tx.commit()?;

        Ok(status)
    }
}
