//! Approval workflow shared by timesheets and leave requests.
//!
//! `Pending → Approved | Rejected | NeedsInfo`; NeedsInfo (and, for
//! timesheets, Rejected) go back to Pending when the requester responds.

use crate::core::ledger;
use crate::errors::{AppError, AppResult};
use crate::models::leave::{LeaveBalance, LeaveRequest};
use crate::models::review::{ReviewStamp, ReviewStatus};
use crate::models::timesheet::{DayTimesheet, WeekTimesheet};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve(Option<String>),
    Reject(String),
    RequestInfo(String),
}

impl ReviewAction {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Approve(_) => "approve",
            ReviewAction::Reject(_) => "reject",
            ReviewAction::RequestInfo(_) => "request_info",
        }
    }
}

/// Per-item result of a bulk review.
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub id: String,
    pub status: Option<ReviewStatus>,
    pub error: Option<String>,
}

impl BulkOutcome {
    pub fn from_result(id: String, result: AppResult<ReviewStatus>) -> Self {
        match result {
            Ok(status) => Self {
                id,
                status: Some(status),
                error: None,
            },
            Err(e) => Self {
                id,
                status: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn required_note(note: &str, action: &str) -> AppResult<String> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationFailed(format!(
            "a note is required to {action}"
        )));
    }
    Ok(trimmed.to_string())
}

pub trait Reviewable {
    fn review_id(&self) -> String;

    fn review_status(&self) -> ReviewStatus;

    /// Record the decision. Must not fail: all checks run before it.
    fn apply_review(&mut self, status: ReviewStatus, stamp: ReviewStamp);

    /// Extra preconditions for approval.
    fn check_approvable(&self) -> AppResult<()> {
        Ok(())
    }

    /// Side effects of approval, run before the status flips.
    fn on_approve(&mut self) -> AppResult<()> {
        Ok(())
    }

    /// Side effects of rejection, run before the status flips.
    fn on_reject(&mut self) -> AppResult<()> {
        Ok(())
    }

    /// Statuses from which the requester may send the item back to review.
    fn can_resubmit_from(&self, status: ReviewStatus) -> bool {
        status == ReviewStatus::NeedsInfo
    }

    fn ensure_pending(&self) -> AppResult<()> {
        let status = self.review_status();
        if status != ReviewStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "{} is {}, only pending items can be reviewed",
                self.review_id(),
                status.to_db_str()
            )));
        }
        Ok(())
    }

    fn approve(&mut self, reviewer: &str, note: Option<&str>) -> AppResult<ReviewStatus> {
        self.ensure_pending()?;
        self.check_approvable()?;
        self.on_approve()?;

        let note = note.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        self.apply_review(ReviewStatus::Approved, ReviewStamp::now(reviewer, note));
        Ok(ReviewStatus::Approved)
    }

    fn reject(&mut self, reviewer: &str, note: &str) -> AppResult<ReviewStatus> {
        let note = required_note(note, "reject")?;
        self.ensure_pending()?;
        self.on_reject()?;

        self.apply_review(ReviewStatus::Rejected, ReviewStamp::now(reviewer, Some(note)));
        Ok(ReviewStatus::Rejected)
    }

    fn request_info(&mut self, reviewer: &str, note: &str) -> AppResult<ReviewStatus> {
        let note = required_note(note, "request information")?;
        self.ensure_pending()?;

        self.apply_review(ReviewStatus::NeedsInfo, ReviewStamp::now(reviewer, Some(note)));
        Ok(ReviewStatus::NeedsInfo)
    }

    fn resubmit(&mut self) -> AppResult<ReviewStatus> {
        let status = self.review_status();
        if !self.can_resubmit_from(status) {
            return Err(AppError::InvalidTransition(format!(
                "{} is {}, it cannot be resubmitted",
                self.review_id(),
                status.to_db_str()
            )));
        }
        self.apply_review(ReviewStatus::Pending, ReviewStamp::default());
        Ok(ReviewStatus::Pending)
    }

    fn apply_action(&mut self, reviewer: &str, action: &ReviewAction) -> AppResult<ReviewStatus> {
        match action {
            ReviewAction::Approve(note) => self.approve(reviewer, note.as_deref()),
            ReviewAction::Reject(note) => self.reject(reviewer, note),
            ReviewAction::RequestInfo(note) => self.request_info(reviewer, note),
        }
    }
}

/// Apply each action independently; failures are reported, never skipped.
pub fn bulk<'a, R, I>(items: I, reviewer: &str) -> Vec<BulkOutcome>
where
    R: Reviewable + 'a,
    I: IntoIterator<Item = (&'a mut R, ReviewAction)>,
{
    items
        .into_iter()
        .map(|(item, action)| {
            let result = item.apply_action(reviewer, &action);
            BulkOutcome::from_result(item.review_id(), result)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Timesheets
// ---------------------------------------------------------------------------

impl Reviewable for DayTimesheet {
    fn review_id(&self) -> String {
        format!("day {} {}", self.employee_id, self.date)
    }

    fn review_status(&self) -> ReviewStatus {
        self.status
    }

    fn apply_review(&mut self, status: ReviewStatus, stamp: ReviewStamp) {
        self.status = status;
        self.review = stamp;
    }

    fn check_approvable(&self) -> AppResult<()> {
        if self.entries.is_empty() {
            return Err(AppError::ValidationFailed(format!(
                "{} has no entries to approve",
                self.review_id()
            )));
        }
        if self.has_missing_clock_out() {
            return Err(AppError::ValidationFailed(format!(
                "{} has a missing clock-out to resolve first",
                self.review_id()
            )));
        }
        Ok(())
    }

    fn can_resubmit_from(&self, status: ReviewStatus) -> bool {
        matches!(status, ReviewStatus::NeedsInfo | ReviewStatus::Rejected)
    }
}

impl Reviewable for WeekTimesheet {
    fn review_id(&self) -> String {
        format!("week {} {}", self.employee_id, self.week_start)
    }

    fn review_status(&self) -> ReviewStatus {
        self.status()
    }

    /// Decides every worked day still awaiting the target transition.
    fn apply_review(&mut self, status: ReviewStatus, stamp: ReviewStamp) {
        for day in self.days.iter_mut().filter(|d| !d.is_empty()) {
            let eligible = if status == ReviewStatus::Pending {
                day.can_resubmit_from(day.status)
            } else {
                day.status == ReviewStatus::Pending
            };
            if eligible {
                day.apply_review(status, stamp.clone());
            }
        }
    }

    fn check_approvable(&self) -> AppResult<()> {
        let pending: Vec<&DayTimesheet> = self
            .days
            .iter()
            .filter(|d| !d.is_empty() && d.status == ReviewStatus::Pending)
            .collect();
        if pending.is_empty() {
            return Err(AppError::ValidationFailed(format!(
                "{} has no pending days to approve",
                self.review_id()
            )));
        }
        pending.iter().try_for_each(|d| d.check_approvable())
    }

    fn can_resubmit_from(&self, status: ReviewStatus) -> bool {
        matches!(status, ReviewStatus::NeedsInfo | ReviewStatus::Rejected)
    }

    /// A week is reviewable while any worked day is still pending, even
    /// when another day was already rejected or sent back.
    fn ensure_pending(&self) -> AppResult<()> {
        if self
            .days
            .iter()
            .any(|d| !d.is_empty() && d.status == ReviewStatus::Pending)
        {
            return Ok(());
        }
        Err(AppError::InvalidTransition(format!(
            "{} is {}, it has no pending days",
            self.review_id(),
            self.status().to_db_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Leave
// ---------------------------------------------------------------------------

/// A leave request bound to the balance it draws on, so approval and
/// rejection settle the ledger together with the status change.
pub struct LeaveReview<'a> {
    pub request: &'a mut LeaveRequest,
    pub balance: &'a mut LeaveBalance,
}

impl Reviewable for LeaveReview<'_> {
    fn review_id(&self) -> String {
        format!("leave #{}", self.request.id)
    }

    fn review_status(&self) -> ReviewStatus {
        self.request.status
    }

    fn apply_review(&mut self, status: ReviewStatus, stamp: ReviewStamp) {
        self.request.status = status;
        self.request.review = stamp;
    }

    fn on_approve(&mut self) -> AppResult<()> {
        *self.balance = ledger::commit(self.balance, self.request.day_equivalent)?;
        Ok(())
    }

    fn on_reject(&mut self) -> AppResult<()> {
        *self.balance = ledger::release(self.balance, self.request.day_equivalent)?;
        Ok(())
    }
}
