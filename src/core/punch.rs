//! Punch state machine.
//!
//! ```text
//! ClockedOut --ClockIn-->    ClockedIn   (geofence-gated)
//! ClockedIn  --BreakStart--> OnBreak
//! OnBreak    --BreakEnd-->   ClockedIn
//! ClockedIn  --ClockOut-->   ClockedOut  (never blocked, may be flagged)
//! ```

use crate::errors::{AppError, AppResult};
use crate::models::geofence::{FlagReason, GeofenceClassification, GeofenceVerdict};
use crate::models::punch::{PunchEvent, PunchKind, PunchState};

/// What the machine decided for one punch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PunchDecision {
    Accept {
        next: PunchState,
        flagged: bool,
        reasons: Vec<FlagReason>,
    },
    /// Refused by the site's Block policy. Nothing is recorded.
    Blocked { reasons: Vec<FlagReason> },
    /// No usable location; the caller must retry or force-flag.
    ConfirmationRequired {
        classification: Option<GeofenceClassification>,
    },
    InvalidTransition { from: PunchState, kind: PunchKind },
}

/// Options the caller attaches to a punch attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunchOptions {
    /// Record a punch without a usable location, flagged.
    pub force: bool,
    /// Site does not insist on GPS: missing/poor fixes proceed flagged.
    pub gps_optional: bool,
}

pub fn next_state(state: PunchState, kind: PunchKind) -> Option<PunchState> {
    match (state, kind) {
        (PunchState::ClockedOut, PunchKind::ClockIn) => Some(PunchState::ClockedIn),
        (PunchState::ClockedIn, PunchKind::BreakStart) => Some(PunchState::OnBreak),
        (PunchState::OnBreak, PunchKind::BreakEnd) => Some(PunchState::ClockedIn),
        (PunchState::ClockedIn, PunchKind::ClockOut) => Some(PunchState::ClockedOut),
        _ => None,
    }
}

/// Current state after replaying a session's punches in order.
pub fn fold_session(events: &[PunchEvent]) -> AppResult<PunchState> {
    let mut sorted: Vec<&PunchEvent> = events.iter().collect();
    sorted.sort_by_key(|e| (e.timestamp, e.id));

    sorted.iter().try_fold(PunchState::ClockedOut, |state, ev| {
        next_state(state, ev.kind).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "{} while {} at {}",
                ev.kind.pk_as_str(),
                state.label(),
                ev.get_date_time()
            ))
        })
    })
}

pub fn decide(
    state: PunchState,
    kind: PunchKind,
    verdict: Option<&GeofenceVerdict>,
    options: PunchOptions,
) -> PunchDecision {
    let Some(next) = next_state(state, kind) else {
        return PunchDecision::InvalidTransition { from: state, kind };
    };

    if !kind.is_geofenced() {
        return PunchDecision::Accept {
            next,
            flagged: false,
            reasons: Vec::new(),
        };
    }

    let Some(verdict) = verdict else {
        if kind == PunchKind::ClockIn && !options.force && !options.gps_optional {
            return PunchDecision::ConfirmationRequired {
                classification: Some(GeofenceClassification::NoPermission),
            };
        }
        return PunchDecision::Accept {
            next,
            flagged: true,
            reasons: vec![FlagReason::NoGps],
        };
    };

    match verdict.classification {
        GeofenceClassification::Inside => PunchDecision::Accept {
            next,
            flagged: false,
            reasons: Vec::new(),
        },
        GeofenceClassification::OutsideBlock if kind == PunchKind::ClockIn => {
            PunchDecision::Blocked {
                reasons: verdict.reasons.clone(),
            }
        }
        c if c.needs_confirmation()
            && kind == PunchKind::ClockIn
            && !options.force
            && !options.gps_optional =>
        {
            PunchDecision::ConfirmationRequired {
                classification: Some(c),
            }
        }
        _ => PunchDecision::Accept {
            next,
            flagged: true,
            reasons: verdict.reasons.clone(),
        },
    }
}
