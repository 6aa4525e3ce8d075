use crate::config::Config;
use crate::core::approval::{LeaveReview, Reviewable};
use crate::core::leave::{LeaveCalendar, detect_conflicts, validate};
use crate::core::ledger;
use crate::db::leave::{
    insert_request, list_balances, list_requests, load_balance, load_request, load_team_leave,
    save_balance, update_request_review,
};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::load_employee;
use crate::errors::{AppError, AppResult};
use crate::models::leave::{ConflictRecord, LeaveBalance, LeaveRequest, LeaveWarning};
use crate::models::review::ReviewStatus;
use crate::utils::formatting::round2;
use serde::Serialize;

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveSubmission {
    pub id: i64,
    pub day_equivalent: f64,
    pub warnings: Vec<LeaveWarning>,
    pub balance: LeaveBalance,
}

fn calendar(cfg: &Config) -> LeaveCalendar<'_> {
    LeaveCalendar {
        holidays: &cfg.holidays,
        standard_workday_hours: cfg.standard_workday_hours,
    }
}

pub struct LeaveLogic;

impl LeaveLogic {
    /// Validate, reserve and store a request as Pending.
    ///
    /// Warnings are returned as data. `ExceedsAvailableBalance` refuses the
    /// request unless `allow_overdraw` is set.
    pub fn submit(
        pool: &mut DbPool,
        cfg: &Config,
        mut request: LeaveRequest,
        allow_overdraw: bool,
    ) -> AppResult<LeaveSubmission> {
        let leave_type = cfg.find_leave_type(&request.leave_type_id)?;
        request.leave_type_id = leave_type.id.clone();

        let tx = pool.writer()?;
        load_employee(&tx, &request.employee_id)?;

        let balance = load_balance(&tx, &request.employee_id, &leave_type.id)?;
        let team_leave = load_team_leave(
            &tx,
            &request.employee_id,
            &request.start_date,
            &request.end_date,
        )?;

        let assessment = validate(&request, &balance, leave_type, &calendar(cfg), &team_leave)?;

        if assessment.is_blocking() && !allow_overdraw {
            let reasons: Vec<String> = assessment
                .warnings
                .iter()
                .filter(|w| w.is_blocking())
                .map(LeaveWarning::describe)
                .collect();
            return Err(AppError::ValidationFailed(reasons.join("; ")));
        }

        request.day_equivalent = assessment.day_equivalent;
        request.status = ReviewStatus::Pending;

        let balance = ledger::reserve(&balance, assessment.day_equivalent)?;
        save_balance(&tx, &balance)?;

        let id = insert_request(&tx, &request, &assessment.warnings)?;

        let codes: Vec<&str> = assessment.warnings.iter().map(LeaveWarning::code).collect();
        ttlog(
            &tx,
            "leave_submit",
            &request.employee_id,
            &format!(
                "#{} {} {}..{} = {} day(s){}",
                id,
                leave_type.id,
                request.start_date,
                request.end_date,
                assessment.day_equivalent,
                if codes.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", codes.join(", "))
                }
            ),
        )?;
        tx.commit()?;

        Ok(LeaveSubmission {
            id,
            day_equivalent: assessment.day_equivalent,
            warnings: assessment.warnings,
            balance,
        })
    }

    /// Send a NeedsInfo request back to Pending. The reservation was never
    /// released, so the ledger is untouched.
    pub fn resubmit(pool: &mut DbPool, id: i64) -> AppResult<LeaveRequest> {
        let tx = pool.writer()?;

        let mut request = load_request(&tx, id)?;
        let mut balance = load_balance(&tx, &request.employee_id, &request.leave_type_id)?;

        LeaveReview {
            request: &mut request,
            balance: &mut balance,
        }
        .resubmit()?;

        update_request_review(&tx, &request)?;
        ttlog(
            &tx,
            "leave_resubmit",
            &request.employee_id,
            &format!("#{id} back to pending"),
        )?;
        tx.commit()?;

        Ok(request)
    }

    /// Set the entitlement for one leave type, keeping used and pending.
    pub fn set_balance(
        pool: &mut DbPool,
        cfg: &Config,
        employee_id: &str,
        leave_type_id: &str,
        total: f64,
    ) -> AppResult<LeaveBalance> {
        if !total.is_finite() || total < 0.0 {
            return Err(AppError::ValidationFailed(format!(
                "invalid entitlement: {total}"
            )));
        }
        let leave_type = cfg.find_leave_type(leave_type_id)?;

        let tx = pool.writer()?;
        load_employee(&tx, employee_id)?;

        let mut balance = load_balance(&tx, employee_id, &leave_type.id)?;
        balance.total = total;
        save_balance(&tx, &balance)?;
        ttlog(
            &tx,
            "leave_balance",
            employee_id,
            &format!("{} total set to {}", leave_type.id, total),
        )?;
        tx.commit()?;

        Ok(balance)
    }

    pub fn accrue(
        pool: &mut DbPool,
        cfg: &Config,
        employee_id: &str,
        leave_type_id: &str,
        months: u32,
    ) -> AppResult<LeaveBalance> {
        let leave_type = cfg.find_leave_type(leave_type_id)?;

        let tx = pool.writer()?;
        load_employee(&tx, employee_id)?;

        let balance = load_balance(&tx, employee_id, &leave_type.id)?;
        let balance = ledger::accrue(&balance, leave_type, months);
        save_balance(&tx, &balance)?;
        ttlog(
            &tx,
            "leave_accrue",
            employee_id,
            &format!(
                "{} +{} month(s), total {}",
                leave_type.id, months, balance.total
            ),
        )?;
        tx.commit()?;

        Ok(balance)
    }

    /// Year-end rollover onto a fresh `allowance`.
    pub fn rollover(
        pool: &mut DbPool,
        cfg: &Config,
        employee_id: &str,
        leave_type_id: &str,
        allowance: f64,
    ) -> AppResult<LeaveBalance> {
        if !allowance.is_finite() || allowance < 0.0 {
            return Err(AppError::ValidationFailed(format!(
                "invalid allowance: {allowance}"
            )));
        }
        let leave_type = cfg.find_leave_type(leave_type_id)?;

        let tx = pool.writer()?;
        load_employee(&tx, employee_id)?;

        let before = load_balance(&tx, employee_id, &leave_type.id)?;
        let after = ledger::carry_over(&before, leave_type, allowance);
        save_balance(&tx, &after)?;
        ttlog(
            &tx,
            "leave_rollover",
            employee_id,
            &format!(
                "{} carried {} day(s), new total {}",
                leave_type.id,
                round2(after.total - allowance),
                after.total
            ),
        )?;
        tx.commit()?;

        Ok(after)
    }

    pub fn balances(pool: &DbPool, employee_id: &str) -> AppResult<Vec<LeaveBalance>> {
        load_employee(&pool.conn, employee_id)?;
        list_balances(&pool.conn, employee_id)
    }

    pub fn list(
        pool: &DbPool,
        employee_id: Option<&str>,
        status: Option<ReviewStatus>,
    ) -> AppResult<Vec<LeaveRequest>> {
        list_requests(&pool.conn, employee_id, status)
    }

    /// Teammates' pending or approved leave overlapping a stored request.
    pub fn conflicts(pool: &DbPool, id: i64) -> AppResult<Vec<ConflictRecord>> {
        let request = load_request(&pool.conn, id)?;
        let team_leave = load_team_leave(
            &pool.conn,
            &request.employee_id,
            &request.start_date,
            &request.end_date,
        )?;
        Ok(detect_conflicts(&request, &team_leave))
    }
}
