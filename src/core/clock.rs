use crate::config::Config;
use crate::core::geofence::evaluate;
use crate::core::punch::{PunchDecision, PunchOptions, decide, fold_session, next_state};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    insert_punch, load_employee, load_last_work_date, load_punches_by_work_date, reset_review,
};
use crate::errors::{AppError, AppResult};
use crate::models::geofence::{FlagReason, GeofenceClassification, LocationReading};
use crate::models::punch::{PunchEvent, PunchKind, PunchState};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;

/// One punch as submitted by a device (or the CLI on its behalf).
#[derive(Debug, Clone)]
pub struct PunchAttempt {
    pub employee_id: String,
    pub kind: PunchKind,
    pub at: NaiveDateTime,
    /// `None` when the device sent no location at all.
    pub reading: Option<LocationReading>,
    /// Overrides the employee's home site.
    pub site_id: Option<String>,
    pub note: Option<String>,
    pub force: bool,
}

impl PunchAttempt {
    pub fn new(employee_id: &str, kind: PunchKind, at: NaiveDateTime) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            kind,
            at,
            reading: None,
            site_id: None,
            note: None,
            force: false,
        }
    }

    pub fn with_reading(mut self, reading: LocationReading) -> Self {
        self.reading = Some(reading);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PunchStatus {
    Accepted,
    Flagged,
    Blocked,
    InvalidTransition,
    ConfirmationRequired,
}

#[derive(Debug, Clone, Serialize)]
pub struct PunchReceipt {
    pub status: PunchStatus,
    /// Session state after the attempt.
    pub session: PunchState,
    pub work_date: NaiveDate,
    pub classification: Option<GeofenceClassification>,
    pub reasons: Vec<FlagReason>,
    /// The stored event, when one was recorded.
    pub event: Option<PunchEvent>,
}

/// Where an employee currently stands.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub employee_id: String,
    pub state: PunchState,
    pub work_date: NaiveDate,
    pub opened_at: Option<NaiveDateTime>,
    pub last_punch_at: Option<NaiveDateTime>,
}

struct Session {
    work_date: NaiveDate,
    state: PunchState,
    opened_at: Option<NaiveDateTime>,
    last_ts: Option<NaiveDateTime>,
}

/// The session a punch at `at` belongs to. An open session continues past
/// midnight while within `max_shift_hours` of its clock-in; past that it is
/// left open (missing clock-out) and a fresh session starts on `at`'s date.
fn resolve_session(
    conn: &Connection,
    employee_id: &str,
    at: NaiveDateTime,
    max_shift_hours: i64,
) -> AppResult<Session> {
    let fresh = |last_ts| Session {
        work_date: at.date(),
        state: PunchState::ClockedOut,
        opened_at: None,
        last_ts,
    };

    let Some(last_date) = load_last_work_date(conn, employee_id)? else {
        return Ok(fresh(None));
    };

    let events = load_punches_by_work_date(conn, employee_id, &last_date)?;
    let state = fold_session(&events)?;
    let last_ts = events.iter().map(|e| e.timestamp).max();

    if !state.is_open() {
        return Ok(fresh(last_ts));
    }

    let opened_at = events
        .iter()
        .filter(|e| e.kind == PunchKind::ClockIn)
        .map(|e| e.timestamp)
        .max();

    let within_shift = opened_at.is_some_and(|t| at - t <= Duration::hours(max_shift_hours));

    if last_date >= at.date() || within_shift {
        Ok(Session {
            work_date: last_date,
            state,
            opened_at,
            last_ts,
        })
    } else {
        Ok(fresh(last_ts))
    }
}

/// Transition without a geofence check (employee has no site).
fn ungated(state: PunchState, kind: PunchKind) -> PunchDecision {
    match next_state(state, kind) {
        Some(next) => PunchDecision::Accept {
            next,
            flagged: false,
            reasons: Vec::new(),
        },
        None => PunchDecision::InvalidTransition { from: state, kind },
    }
}

fn describe_reasons(reasons: &[FlagReason]) -> String {
    reasons
        .iter()
        .map(FlagReason::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Punch intake: session fold, geofence, decision and append in one
/// immediate transaction.
pub struct ClockLogic;

impl ClockLogic {
    pub fn submit_punch(
        pool: &mut DbPool,
        cfg: &Config,
        attempt: &PunchAttempt,
    ) -> AppResult<PunchReceipt> {
        let now = Local::now();
        let tx = pool.writer()?;

        let employee = load_employee(&tx, &attempt.employee_id)?;
        let session = resolve_session(&tx, &employee.id, attempt.at, cfg.max_shift_hours)?;

        if let Some(last) = session.last_ts
            && attempt.at < last
        {
            return Err(AppError::ValidationFailed(format!(
                "punch at {} is earlier than the last recorded punch ({})",
                attempt.at.format("%Y-%m-%d %H:%M"),
                last.format("%Y-%m-%d %H:%M")
            )));
        }

        let site = match attempt.site_id.as_deref().or(employee.site_id.as_deref()) {
            Some(id) => Some(cfg.find_site(id)?),
            None => None,
        };

        // an absent reading is treated as denied permission
        let verdict = match site {
            Some(site) if attempt.kind.is_geofenced() => {
                let denied = LocationReading::denied();
                let reading = attempt.reading.as_ref().unwrap_or(&denied);
                Some(evaluate(reading, site, now))
            }
            _ => None,
        };
        let classification = verdict.as_ref().map(|v| v.classification);

        let decision = match site {
            Some(site) => decide(
                session.state,
                attempt.kind,
                verdict.as_ref(),
                PunchOptions {
                    force: attempt.force,
                    gps_optional: !site.require_gps,
                },
            ),
            None => ungated(session.state, attempt.kind),
        };

        match decision {
            PunchDecision::Accept {
                next,
                flagged,
                reasons,
            } => {
                let mut ev = PunchEvent::new(
                    &employee.id,
                    session.work_date,
                    attempt.kind,
                    attempt.at,
                );
                ev.site_id = site.map(|s| s.id.clone());
                ev.classification = classification;
                ev.flagged = flagged;
                ev.flag_reason = describe_reasons(&reasons);
                ev.note = attempt.note.clone();
                ev.id = insert_punch(&tx, &ev)?;

                reset_review(&tx, &employee.id, &session.work_date)?;

                let mut msg = format!("{} at {}", ev.kind.pk_as_str(), ev.get_date_time());
                if flagged {
                    msg.push_str(&format!(" [flagged: {}]", ev.flag_reason));
                }
                ttlog(&tx, "punch", &employee.id, &msg)?;
                tx.commit()?;

                Ok(PunchReceipt {
                    status: if flagged {
                        PunchStatus::Flagged
                    } else {
                        PunchStatus::Accepted
                    },
                    session: next,
                    work_date: session.work_date,
                    classification,
                    reasons,
                    event: Some(ev),
                })
            }
            PunchDecision::Blocked { reasons } => {
                ttlog(
                    &tx,
                    "punch_blocked",
                    &employee.id,
                    &format!(
                        "{} at {} refused: {}",
                        attempt.kind.pk_as_str(),
                        attempt.at.format("%Y-%m-%d %H:%M"),
                        describe_reasons(&reasons)
                    ),
                )?;
                tx.commit()?;

                Ok(PunchReceipt {
                    status: PunchStatus::Blocked,
                    session: session.state,
                    work_date: session.work_date,
                    classification,
                    reasons,
                    event: None,
                })
            }
            PunchDecision::ConfirmationRequired { classification } => Ok(PunchReceipt {
                status: PunchStatus::ConfirmationRequired,
                session: session.state,
                work_date: session.work_date,
                classification,
                reasons: verdict.map(|v| v.reasons).unwrap_or_default(),
                event: None,
            }),
            PunchDecision::InvalidTransition { from, kind } => {
                ttlog(
                    &tx,
                    "punch_invalid",
                    &employee.id,
                    &format!(
                        "{} while {} at {}",
                        kind.pk_as_str(),
                        from.label(),
                        attempt.at.format("%Y-%m-%d %H:%M")
                    ),
                )?;
                tx.commit()?;

                Ok(PunchReceipt {
                    status: PunchStatus::InvalidTransition,
                    session: from,
                    work_date: session.work_date,
                    classification,
                    reasons: Vec::new(),
                    event: None,
                })
            }
        }
    }

    /// Session state as seen by a punch submitted at `at`.
    pub fn status(
        pool: &DbPool,
        cfg: &Config,
        employee_id: &str,
        at: NaiveDateTime,
    ) -> AppResult<SessionStatus> {
        let employee = load_employee(&pool.conn, employee_id)?;
        let session = resolve_session(&pool.conn, &employee.id, at, cfg.max_shift_hours)?;

        Ok(SessionStatus {
            employee_id: employee.id,
            state: session.state,
            work_date: session.work_date,
            opened_at: session.opened_at,
            last_punch_at: session.last_ts,
        })
    }
}
