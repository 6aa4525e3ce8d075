mod common;

use chrono::NaiveTime;
use common::{at, date, memory_pool, test_config};
use rtimeledger::core::approval::ReviewAction;
use rtimeledger::core::clock::{ClockLogic, PunchAttempt, PunchStatus};
use rtimeledger::core::leave_logic::LeaveLogic;
use rtimeledger::core::review::{ReviewLogic, ReviewTarget};
use rtimeledger::core::timesheet::TimesheetLogic;
use rtimeledger::db::leave::load_request;
use rtimeledger::db::log::load_log_by_operation;
use rtimeledger::db::pool::DbPool;
use rtimeledger::db::queries::load_punches_by_work_date;
use rtimeledger::errors::AppError;
use rtimeledger::models::geofence::{GeofenceClassification, LocationReading};
use rtimeledger::models::leave::{LeaveRequest, LeaveWarning};
use rtimeledger::models::punch::{PunchKind, PunchSource, PunchState};
use rtimeledger::models::review::ReviewStatus;
use rtimeledger::models::timesheet::ManualEntry;

fn punch(pool: &mut DbPool, emp: &str, kind: PunchKind, when: &str) -> PunchStatus {
    let attempt = PunchAttempt::new(emp, kind, at(when)).with_reading(LocationReading::at(
        45.0, 9.0, 5.0,
    ));
    ClockLogic::submit_punch(pool, &test_config(), &attempt)
        .expect("punch")
        .status
}

fn day_target(emp: &str, d: &str) -> ReviewTarget {
    ReviewTarget::Day {
        employee_id: emp.into(),
        date: date(d),
    }
}

fn manual(emp: &str, d: &str, start: &str, end: &str) -> ManualEntry {
    ManualEntry {
        id: 0,
        employee_id: emp.into(),
        date: date(d),
        start: NaiveTime::parse_from_str(start, "%H:%M").expect("start"),
        end: NaiveTime::parse_from_str(end, "%H:%M").expect("end"),
        break_minutes: 0,
        comment: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Punches
// ---------------------------------------------------------------------------

#[test]
fn test_full_day_of_punches() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);
    let cfg = test_config();

    assert_eq!(punch(&mut pool, "alice", PunchKind::ClockIn, "2025-03-03 09:00"), PunchStatus::Accepted);
    assert_eq!(punch(&mut pool, "alice", PunchKind::BreakStart, "2025-03-03 12:00"), PunchStatus::Accepted);
    assert_eq!(punch(&mut pool, "alice", PunchKind::BreakEnd, "2025-03-03 12:30"), PunchStatus::Accepted);
    assert_eq!(punch(&mut pool, "alice", PunchKind::ClockOut, "2025-03-03 17:00"), PunchStatus::Accepted);

    let day = TimesheetLogic::day(&pool, &cfg, "alice", date("2025-03-03")).expect("day");
    assert_eq!(day.regular_minutes, 450);
    assert_eq!(day.break_minutes, 30);
    assert!(day.flags.is_empty());

    let stored = load_punches_by_work_date(&pool.conn, "alice", &date("2025-03-03")).expect("load");
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].classification, Some(GeofenceClassification::Inside));
    assert_eq!(stored[0].site_id.as_deref(), Some("hq"));
    assert_eq!(load_log_by_operation(&pool.conn, "punch").expect("log").len(), 4);
}

#[test]
fn test_blocked_clock_in_records_nothing() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);
    let attempt = PunchAttempt::new("alice", PunchKind::ClockIn, at("2025-03-03 09:00"))
        .with_reading(LocationReading::at(45.0027, 9.0, 10.0));

    let receipt = ClockLogic::submit_punch(&mut pool, &test_config(), &attempt).expect("submit");

    assert_eq!(receipt.status, PunchStatus::Blocked);
    assert_eq!(receipt.session, PunchState::ClockedOut);
    assert_eq!(receipt.classification, Some(GeofenceClassification::OutsideBlock));
    assert!(receipt.event.is_none());
    assert!(
        load_punches_by_work_date(&pool.conn, "alice", &date("2025-03-03"))
            .expect("load")
            .is_empty()
    );

    let blocked = load_log_by_operation(&pool.conn, "punch_blocked").expect("log");
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].0, "alice");
}

#[test]
fn test_outside_warn_site_records_flagged_punch() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);
    let mut attempt = PunchAttempt::new("alice", PunchKind::ClockIn, at("2025-03-03 09:00"))
        .with_reading(LocationReading::at(45.0027, 9.0, 10.0));
    attempt.site_id = Some("depot".into());

    let receipt = ClockLogic::submit_punch(&mut pool, &test_config(), &attempt).expect("submit");
    assert_eq!(receipt.status, PunchStatus::Flagged);

    let ev = receipt.event.expect("event");
    assert!(ev.flagged);
    assert!(ev.flag_reason.contains("outside geofence"));
    assert_eq!(ev.site_id.as_deref(), Some("depot"));
}

#[test]
fn test_invalid_transition_is_logged() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);

    let status = punch(&mut pool, "alice", PunchKind::ClockOut, "2025-03-03 17:00");
    assert_eq!(status, PunchStatus::InvalidTransition);

    let invalid = load_log_by_operation(&pool.conn, "punch_invalid").expect("log");
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].1.contains("clock-out while clocked out"));
    assert!(load_log_by_operation(&pool.conn, "punch").expect("log").is_empty());
}

#[test]
fn test_missing_location_asks_for_confirmation() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);
    let cfg = test_config();
    let mut attempt = PunchAttempt::new("alice", PunchKind::ClockIn, at("2025-03-03 09:00"))
        .with_reading(LocationReading::denied());

    let receipt = ClockLogic::submit_punch(&mut pool, &cfg, &attempt).expect("submit");
    assert_eq!(receipt.status, PunchStatus::ConfirmationRequired);
    assert_eq!(receipt.classification, Some(GeofenceClassification::NoPermission));
    assert!(load_log_by_operation(&pool.conn, "punch").expect("log").is_empty());

    attempt.force = true;
    let forced = ClockLogic::submit_punch(&mut pool, &cfg, &attempt).expect("submit");
    assert_eq!(forced.status, PunchStatus::Flagged);
    assert_eq!(forced.session, PunchState::ClockedIn);
}

#[test]
fn test_absent_reading_counts_as_no_permission() {
    let mut pool = memory_pool(&[("alice", "ops", Some("hq"))]);
    let mut cfg = test_config();

    let bare = PunchAttempt::new("alice", PunchKind::ClockIn, at("2025-03-03 09:00"));
    let strict = ClockLogic::submit_punch(&mut pool, &cfg, &bare).expect("submit");
    assert_eq!(strict.status, PunchStatus::ConfirmationRequired);
    assert_eq!(strict.classification, Some(GeofenceClassification::NoPermission));

    for site in cfg.sites.iter_mut() {
        site.require_gps = false;
    }
    let relaxed = ClockLogic::submit_punch(&mut pool, &cfg, &bare).expect("submit");
    assert_eq!(relaxed.status, PunchStatus::Flagged);
    assert_eq!(relaxed.classification, Some(GeofenceClassification::NoPermission));
    assert_eq!(relaxed.session, PunchState::ClockedIn);
}

#[test]
fn test_employee_without_site_is_not_geofenced() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let attempt = PunchAttempt::new("bob", PunchKind::ClockIn, at("2025-03-03 09:00"));

    let receipt = ClockLogic::submit_punch(&mut pool, &test_config(), &attempt).expect("submit");
    assert_eq!(receipt.status, PunchStatus::Accepted);
    assert!(receipt.classification.is_none());
}

#[test]
fn test_unknown_employee_and_site() {
    let mut pool = memory_pool(&[("alice", "ops", Some("nowhere"))]);
    let cfg = test_config();

    let ghost = PunchAttempt::new("ghost", PunchKind::ClockIn, at("2025-03-03 09:00"));
    assert!(matches!(
        ClockLogic::submit_punch(&mut pool, &cfg, &ghost),
        Err(AppError::UnknownEmployee(_))
    ));

    let alice = PunchAttempt::new("alice", PunchKind::ClockIn, at("2025-03-03 09:00"));
    assert!(matches!(
        ClockLogic::submit_punch(&mut pool, &cfg, &alice),
        Err(AppError::UnknownSite(_))
    ));
}

#[test]
fn test_punch_before_last_punch_is_rejected() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-03 09:00");

    let late = PunchAttempt::new("bob", PunchKind::BreakStart, at("2025-03-03 08:00"));
    assert!(matches!(
        ClockLogic::submit_punch(&mut pool, &test_config(), &late),
        Err(AppError::ValidationFailed(_))
    ));
}

#[test]
fn test_overnight_session_keeps_clock_in_date() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-03 22:00");

    let status = ClockLogic::status(&pool, &cfg, "bob", at("2025-03-04 05:00")).expect("status");
    assert_eq!(status.state, PunchState::ClockedIn);
    assert_eq!(status.work_date, date("2025-03-03"));
    assert_eq!(status.opened_at, Some(at("2025-03-03 22:00")));

    let out = PunchAttempt::new("bob", PunchKind::ClockOut, at("2025-03-04 06:00"));
    let receipt = ClockLogic::submit_punch(&mut pool, &cfg, &out).expect("submit");
    assert_eq!(receipt.work_date, date("2025-03-03"));

    let day = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert_eq!(day.regular_minutes, 480);
    let next = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-04")).expect("day");
    assert!(next.is_empty());
}

#[test]
fn test_stale_session_is_left_open() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-03 09:00");
    // 24 h later: past max_shift_hours, a new session starts
    let status = punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-04 09:00");
    assert_eq!(status, PunchStatus::Accepted);

    let stale = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert!(stale.has_missing_clock_out());
    assert_eq!(stale.worked_minutes(), 0);
}

#[test]
fn test_close_session_ends_running_break() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-03 09:00");
    punch(&mut pool, "bob", PunchKind::BreakStart, "2025-03-03 13:00");

    let appended = TimesheetLogic::close_session(
        &mut pool,
        "bob",
        date("2025-03-03"),
        at("2025-03-03 13:30"),
        Some("forgot to clock out".into()),
    )
    .expect("close");

    let kinds: Vec<PunchKind> = appended.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![PunchKind::BreakEnd, PunchKind::ClockOut]);
    assert!(appended.iter().all(|e| e.source == PunchSource::Manual));

    let day = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert_eq!(day.regular_minutes, 240);
    assert_eq!(day.break_minutes, 30);
    assert!(!day.has_missing_clock_out());

    assert!(matches!(
        TimesheetLogic::close_session(&mut pool, "bob", date("2025-03-03"), at("2025-03-03 18:00"), None),
        Err(AppError::InvalidTransition(_))
    ));
}

#[test]
fn test_manual_entry() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    let mut entry = manual("bob", "2025-03-03", "08:00", "17:00");
    entry.break_minutes = 60;
    let day = TimesheetLogic::add_manual_entry(&mut pool, &cfg, &entry).expect("entry");
    assert_eq!(day.regular_minutes, 480);
    assert_eq!(day.break_minutes, 60);

    let same = manual("bob", "2025-03-03", "08:00", "08:00");
    assert!(matches!(
        TimesheetLogic::add_manual_entry(&mut pool, &cfg, &same),
        Err(AppError::ValidationFailed(_))
    ));

    let mut too_long_break = manual("bob", "2025-03-04", "08:00", "09:00");
    too_long_break.break_minutes = 60;
    assert!(matches!(
        TimesheetLogic::add_manual_entry(&mut pool, &cfg, &too_long_break),
        Err(AppError::ValidationFailed(_))
    ));
}

// ---------------------------------------------------------------------------
// Leave
// ---------------------------------------------------------------------------

#[test]
fn test_leave_submit_and_approve_persist_balance() {
    let mut pool = memory_pool(&[("alice", "ops", None)]);
    let cfg = test_config();

    LeaveLogic::set_balance(&mut pool, &cfg, "alice", "vacation", 20.0).expect("balance");

    let req = LeaveRequest::full_days("alice", "Vacation", date("2025-03-03"), date("2025-03-07"));
    let sub = LeaveLogic::submit(&mut pool, &cfg, req, false).expect("submit");
    assert_eq!(sub.day_equivalent, 5.0);
    assert!(sub.warnings.is_empty());
    assert_eq!(sub.balance.pending, 5.0);

    let stored = load_request(&pool.conn, sub.id).expect("request");
    assert_eq!(stored.leave_type_id, "vacation");
    assert_eq!(stored.status, ReviewStatus::Pending);

    let status = ReviewLogic::approve(&mut pool, &cfg, "boss", &ReviewTarget::Leave(sub.id), None)
        .expect("approve");
    assert_eq!(status, ReviewStatus::Approved);

    let balances = LeaveLogic::balances(&pool, "alice").expect("balances");
    assert_eq!(balances.len(), 1);
    assert_eq!((balances[0].used, balances[0].pending), (5.0, 0.0));
    assert_eq!(balances[0].available(), 15.0);

    let approved = load_request(&pool.conn, sub.id).expect("request");
    assert_eq!(approved.status, ReviewStatus::Approved);
    assert_eq!(approved.review.reviewer.as_deref(), Some("boss"));
}

#[test]
fn test_leave_over_balance_needs_overdraw() {
    let mut pool = memory_pool(&[("alice", "ops", None)]);
    let cfg = test_config();
    LeaveLogic::set_balance(&mut pool, &cfg, "alice", "vacation", 2.0).expect("balance");

    let req = LeaveRequest::full_days("alice", "vacation", date("2025-03-03"), date("2025-03-07"));
    assert!(matches!(
        LeaveLogic::submit(&mut pool, &cfg, req.clone(), false),
        Err(AppError::ValidationFailed(_))
    ));
    assert!(LeaveLogic::list(&pool, Some("alice"), None).expect("list").is_empty());

    let sub = LeaveLogic::submit(&mut pool, &cfg, req, true).expect("submit");
    assert!(sub.warnings.iter().any(LeaveWarning::is_blocking));
    assert_eq!(sub.balance.exceeded_by(), 3.0);
}

#[test]
fn test_leave_list_filters_by_employee_and_status() {
    let mut pool = memory_pool(&[("alice", "ops", None), ("bob", "ops", None)]);
    let cfg = test_config();
    LeaveLogic::set_balance(&mut pool, &cfg, "alice", "vacation", 20.0).expect("balance");
    LeaveLogic::set_balance(&mut pool, &cfg, "bob", "vacation", 20.0).expect("balance");

    let first = LeaveRequest::full_days("alice", "vacation", date("2025-03-03"), date("2025-03-04"));
    let second = LeaveRequest::full_days("alice", "vacation", date("2025-05-05"), date("2025-05-06"));
    let bobs = LeaveRequest::full_days("bob", "vacation", date("2025-06-02"), date("2025-06-03"));
    let approved = LeaveLogic::submit(&mut pool, &cfg, first, false).expect("submit").id;
    LeaveLogic::submit(&mut pool, &cfg, second, false).expect("submit");
    LeaveLogic::submit(&mut pool, &cfg, bobs, false).expect("submit");
    ReviewLogic::approve(&mut pool, &cfg, "boss", &ReviewTarget::Leave(approved), None)
        .expect("approve");

    assert_eq!(LeaveLogic::list(&pool, None, None).expect("list").len(), 3);
    assert_eq!(LeaveLogic::list(&pool, Some("alice"), None).expect("list").len(), 2);
    assert_eq!(LeaveLogic::list(&pool, None, Some(ReviewStatus::Pending)).expect("list").len(), 2);

    let done = LeaveLogic::list(&pool, Some("alice"), Some(ReviewStatus::Approved)).expect("list");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, approved);
    assert!(LeaveLogic::list(&pool, Some("carol"), None).expect("list").is_empty());
}

#[test]
fn test_leave_reject_without_note_keeps_request_pending() {
    let mut pool = memory_pool(&[("alice", "ops", None)]);
    let cfg = test_config();
    LeaveLogic::set_balance(&mut pool, &cfg, "alice", "vacation", 20.0).expect("balance");

    let req = LeaveRequest::full_days("alice", "vacation", date("2025-03-03"), date("2025-03-04"));
    let id = LeaveLogic::submit(&mut pool, &cfg, req, false).expect("submit").id;
    let target = ReviewTarget::Leave(id);

    assert!(matches!(
        ReviewLogic::reject(&mut pool, &cfg, "boss", &target, ""),
        Err(AppError::ValidationFailed(_))
    ));
    assert_eq!(load_request(&pool.conn, id).expect("request").status, ReviewStatus::Pending);

    ReviewLogic::reject(&mut pool, &cfg, "boss", &target, "audit week").expect("reject");
    let balances = LeaveLogic::balances(&pool, "alice").expect("balances");
    assert_eq!((balances[0].used, balances[0].pending), (0.0, 0.0));
}

#[test]
fn test_leave_info_request_and_resubmit() {
    let mut pool = memory_pool(&[("alice", "ops", None)]);
    let cfg = test_config();
    LeaveLogic::set_balance(&mut pool, &cfg, "alice", "vacation", 20.0).expect("balance");

    let req = LeaveRequest::full_days("alice", "vacation", date("2025-03-10"), date("2025-03-10"));
    let id = LeaveLogic::submit(&mut pool, &cfg, req, false).expect("submit").id;

    ReviewLogic::request_info(&mut pool, &cfg, "boss", &ReviewTarget::Leave(id), "cover?")
        .expect("info");
    let held = LeaveLogic::balances(&pool, "alice").expect("balances");
    assert_eq!(held[0].pending, 1.0);

    let back = LeaveLogic::resubmit(&mut pool, id).expect("resubmit");
    assert_eq!(back.status, ReviewStatus::Pending);
    assert!(matches!(
        LeaveLogic::resubmit(&mut pool, id),
        Err(AppError::InvalidTransition(_))
    ));
}

#[test]
fn test_team_conflicts() {
    let mut pool = memory_pool(&[
        ("alice", "ops", None),
        ("bob", "ops", None),
        ("dave", "sales", None),
    ]);
    let cfg = test_config();
    for emp in ["alice", "bob", "dave"] {
        LeaveLogic::set_balance(&mut pool, &cfg, emp, "vacation", 20.0).expect("balance");
    }

    let alice = LeaveRequest::full_days("alice", "vacation", date("2025-03-03"), date("2025-03-07"));
    LeaveLogic::submit(&mut pool, &cfg, alice, false).expect("alice");
    let dave = LeaveRequest::full_days("dave", "vacation", date("2025-03-03"), date("2025-03-07"));
    LeaveLogic::submit(&mut pool, &cfg, dave, false).expect("dave");

    let bob = LeaveRequest::full_days("bob", "vacation", date("2025-03-06"), date("2025-03-11"));
    let sub = LeaveLogic::submit(&mut pool, &cfg, bob, false).expect("bob");
    assert_eq!(
        sub.warnings,
        vec![LeaveWarning::TeamOverlap {
            other_employee_id: "alice".into(),
            overlap_dates: vec![date("2025-03-06"), date("2025-03-07")],
        }]
    );

    let conflicts = LeaveLogic::conflicts(&pool, sub.id).expect("conflicts");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].request_id, sub.id);
    assert_eq!(conflicts[0].other_employee_id, "alice");
}

#[test]
fn test_accrue_and_rollover() {
    let mut pool = memory_pool(&[("alice", "ops", None)]);
    let cfg = test_config();

    let b = LeaveLogic::accrue(&mut pool, &cfg, "alice", "vacation", 12).expect("accrue");
    assert_eq!(b.total, 20.04);

    let b = LeaveLogic::rollover(&mut pool, &cfg, "alice", "vacation", 22.0).expect("rollover");
    assert_eq!(b.total, 27.0);

    assert!(matches!(
        LeaveLogic::accrue(&mut pool, &cfg, "alice", "sabbatical", 1),
        Err(AppError::UnknownLeaveType(_))
    ));
}

// ---------------------------------------------------------------------------
// Timesheet review
// ---------------------------------------------------------------------------

#[test]
fn test_day_review_is_reset_by_edits() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    let entry = manual("bob", "2025-03-03", "09:00", "17:00");
    TimesheetLogic::add_manual_entry(&mut pool, &cfg, &entry).expect("entry");

    let target = day_target("bob", "2025-03-03");
    ReviewLogic::approve(&mut pool, &cfg, "boss", &target, Some("fine".into())).expect("approve");
    let day = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert_eq!(day.status, ReviewStatus::Approved);
    assert_eq!(day.review.note.as_deref(), Some("fine"));

    let extra = manual("bob", "2025-03-03", "18:00", "19:00");
    TimesheetLogic::add_manual_entry(&mut pool, &cfg, &extra).expect("entry");
    let day = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert_eq!(day.status, ReviewStatus::Pending);
    assert!(day.review.reviewer.is_none());
}

#[test]
fn test_day_resubmit_after_reject() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();
    let entry = manual("bob", "2025-03-03", "09:00", "17:00");
    TimesheetLogic::add_manual_entry(&mut pool, &cfg, &entry).expect("entry");

    let target = day_target("bob", "2025-03-03");
    ReviewLogic::reject(&mut pool, &cfg, "boss", &target, "wrong day").expect("reject");

    let status =
        ReviewLogic::resubmit_day(&mut pool, &cfg, "bob", date("2025-03-03")).expect("resubmit");
    assert_eq!(status, ReviewStatus::Pending);
}

#[test]
fn test_bulk_review_applies_each_target_independently() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();

    let entry = manual("bob", "2025-03-03", "09:00", "17:00");
    TimesheetLogic::add_manual_entry(&mut pool, &cfg, &entry).expect("entry");
    punch(&mut pool, "bob", PunchKind::ClockIn, "2025-03-04 09:00");

    let targets = vec![
        day_target("bob", "2025-03-03"),
        day_target("bob", "2025-03-04"),
        ReviewTarget::Leave(999),
    ];
    let outcomes = ReviewLogic::bulk(&mut pool, &cfg, "boss", &targets, &ReviewAction::Approve(None));

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(outcomes[1].error.as_deref().is_some_and(|e| e.contains("missing clock-out")));
    assert!(!outcomes[2].is_ok());

    let day = TimesheetLogic::day(&pool, &cfg, "bob", date("2025-03-03")).expect("day");
    assert_eq!(day.status, ReviewStatus::Approved);
    assert_eq!(load_log_by_operation(&pool.conn, "review").expect("log").len(), 1);
}

#[test]
fn test_week_review() {
    let mut pool = memory_pool(&[("bob", "ops", None)]);
    let cfg = test_config();
    for d in ["2025-03-03", "2025-03-04", "2025-03-05"] {
        TimesheetLogic::add_manual_entry(&mut pool, &cfg, &manual("bob", d, "09:00", "17:00"))
            .expect("entry");
    }

    let target = ReviewTarget::Week {
        employee_id: "bob".into(),
        date: date("2025-03-05"),
    };
    let status = ReviewLogic::approve(&mut pool, &cfg, "boss", &target, None).expect("approve");
    assert_eq!(status, ReviewStatus::Approved);

    let week = TimesheetLogic::week(&pool, &cfg, "bob", date("2025-03-07")).expect("week");
    assert_eq!(week.week_start, date("2025-03-03"));
    assert_eq!(week.regular_minutes, 3 * 480);
    assert_eq!(week.status(), ReviewStatus::Approved);
}
