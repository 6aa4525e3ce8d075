mod common;

use common::{date, ev};
use rtimeledger::core::approval::{LeaveReview, ReviewAction, Reviewable, bulk};
use rtimeledger::core::calculator::timesheet::{AggregationSettings, aggregate, aggregate_week};
use rtimeledger::errors::AppError;
use rtimeledger::models::leave::{LeaveBalance, LeaveRequest};
use rtimeledger::models::punch::PunchKind;
use rtimeledger::models::review::ReviewStatus;
use rtimeledger::models::timesheet::DayTimesheet;

fn pending_request() -> (LeaveRequest, LeaveBalance) {
    let mut req =
        LeaveRequest::full_days("emp1", "vacation", date("2025-03-03"), date("2025-03-07"));
    req.id = 1;
    req.day_equivalent = 5.0;
    let bal = LeaveBalance {
        used: 8.0,
        pending: 10.0,
        ..LeaveBalance::new("emp1", "vacation", 20.0)
    };
    (req, bal)
}

fn worked_day(d: &str) -> DayTimesheet {
    let events = vec![
        ev(1, d, PunchKind::ClockIn, &format!("{d} 09:00")),
        ev(2, d, PunchKind::ClockOut, &format!("{d} 17:00")),
    ];
    aggregate(
        "emp1",
        date(d),
        &events,
        &[],
        &AggregationSettings::default(),
    )
}

#[test]
fn test_leave_approve_commits_balance() {
    let (mut req, mut bal) = pending_request();

    let status = LeaveReview {
        request: &mut req,
        balance: &mut bal,
    }
    .approve("boss", None)
    .expect("approve");

    assert_eq!(status, ReviewStatus::Approved);
    assert_eq!(req.status, ReviewStatus::Approved);
    assert_eq!(req.review.reviewer.as_deref(), Some("boss"));
    assert!(req.review.reviewed_at.is_some());
    assert_eq!((bal.used, bal.pending), (13.0, 5.0));
}

#[test]
fn test_leave_reject_releases_balance() {
    let (mut req, mut bal) = pending_request();

    LeaveReview {
        request: &mut req,
        balance: &mut bal,
    }
    .reject("boss", "team is short that week")
    .expect("reject");

    assert_eq!(req.status, ReviewStatus::Rejected);
    assert_eq!(
        req.review.note.as_deref(),
        Some("team is short that week")
    );
    assert_eq!((bal.used, bal.pending), (8.0, 5.0));
}

#[test]
fn test_reject_without_note_changes_nothing() {
    let (mut req, mut bal) = pending_request();

    let err = LeaveReview {
        request: &mut req,
        balance: &mut bal,
    }
    .reject("boss", "   ")
    .unwrap_err();

    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(req.status, ReviewStatus::Pending);
    assert_eq!((bal.used, bal.pending), (8.0, 10.0));
}

#[test]
fn test_request_info_keeps_hold_and_resubmit() {
    let (mut req, mut bal) = pending_request();
    let mut review = LeaveReview {
        request: &mut req,
        balance: &mut bal,
    };

    assert_eq!(
        review.request_info("boss", "which project?").expect("info"),
        ReviewStatus::NeedsInfo
    );
    assert_eq!(review.balance.pending, 10.0);

    assert_eq!(review.resubmit().expect("resubmit"), ReviewStatus::Pending);
    assert!(review.request.review.reviewer.is_none());
    assert_eq!(review.balance.pending, 10.0);
}

#[test]
fn test_decided_items_cannot_be_reviewed_again() {
    let (mut req, mut bal) = pending_request();
    let mut review = LeaveReview {
        request: &mut req,
        balance: &mut bal,
    };
    review.approve("boss", Some("ok")).expect("approve");

    assert!(matches!(
        review.approve("boss", None),
        Err(AppError::InvalidTransition(_))
    ));
    assert!(matches!(
        review.reject("boss", "changed my mind"),
        Err(AppError::InvalidTransition(_))
    ));
    // an approved leave request is final
    assert!(matches!(
        review.resubmit(),
        Err(AppError::InvalidTransition(_))
    ));
}

#[test]
fn test_day_with_missing_clock_out_is_not_approvable() {
    let events = vec![ev(1, "2025-03-03", PunchKind::ClockIn, "2025-03-03 09:00")];
    let mut day = aggregate(
        "emp1",
        date("2025-03-03"),
        &events,
        &[],
        &AggregationSettings::default(),
    );

    assert!(matches!(
        day.approve("boss", None),
        Err(AppError::ValidationFailed(_))
    ));
    assert_eq!(day.status, ReviewStatus::Pending);

    // it can still be sent back with a note
    assert_eq!(
        day.request_info("boss", "when did you leave?")
            .expect("info"),
        ReviewStatus::NeedsInfo
    );
}

#[test]
fn test_rejected_day_can_be_resubmitted() {
    let mut day = worked_day("2025-03-03");
    day.reject("boss", "wrong site").expect("reject");
    assert_eq!(day.resubmit().expect("resubmit"), ReviewStatus::Pending);
    assert!(day.review.note.is_none());
}

#[test]
fn test_bulk_outcomes_are_independent() {
    let mut ok_day = worked_day("2025-03-03");
    let mut empty_day = DayTimesheet::empty("emp1", date("2025-03-04"));
    let mut other_day = worked_day("2025-03-05");

    let outcomes = bulk(
        vec![
            (&mut ok_day, ReviewAction::Approve(None)),
            (&mut empty_day, ReviewAction::Approve(None)),
            (&mut other_day, ReviewAction::Reject(String::new())),
        ],
        "boss",
    );

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert_eq!(outcomes[0].status, Some(ReviewStatus::Approved));
    assert!(!outcomes[1].is_ok());
    assert!(!outcomes[2].is_ok());
    assert_eq!(ok_day.status, ReviewStatus::Approved);
    assert_eq!(other_day.status, ReviewStatus::Pending);
}

#[test]
fn test_week_review_decides_pending_days() {
    let monday = date("2025-03-03");
    let mut days: Vec<DayTimesheet> = (0..7)
        .map(|i| DayTimesheet::empty("emp1", monday + chrono::Duration::days(i)))
        .collect();
    days[0] = worked_day("2025-03-03");
    days[1] = worked_day("2025-03-04");
    days[1].status = ReviewStatus::Approved;
    days[2] = worked_day("2025-03-05");

    let mut week = aggregate_week("emp1", monday, days);
    assert_eq!(week.review_status(), ReviewStatus::Pending);

    week.approve("boss", None).expect("approve week");
    assert_eq!(week.status(), ReviewStatus::Approved);
    assert!(week.days[3..].iter().all(|d| d.status == ReviewStatus::Pending));

    // nothing left to approve
    let mut again = week.clone();
    assert!(again.approve("boss", None).is_err());
}

#[test]
fn test_week_with_rejected_day_still_approves_pending_days() {
    let monday = date("2025-03-03");
    let mut days: Vec<DayTimesheet> = (0..7)
        .map(|i| DayTimesheet::empty("emp1", monday + chrono::Duration::days(i)))
        .collect();
    days[0] = worked_day("2025-03-03");
    days[1] = worked_day("2025-03-04");
    days[1].status = ReviewStatus::Rejected;
    days[2] = worked_day("2025-03-05");

    let mut week = aggregate_week("emp1", monday, days);
    assert_eq!(week.review_status(), ReviewStatus::Rejected);

    week.approve("boss", None).expect("approve pending days");
    assert_eq!(week.days[0].status, ReviewStatus::Approved);
    assert_eq!(week.days[1].status, ReviewStatus::Rejected);
    assert_eq!(week.days[2].status, ReviewStatus::Approved);
    assert_eq!(week.status(), ReviewStatus::Rejected);

    // only the rejected day is left, and it needs a resubmit first
    assert!(matches!(
        week.reject("boss", "again"),
        Err(AppError::InvalidTransition(_))
    ));
}
