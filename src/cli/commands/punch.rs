use crate::cli::commands::{instant_arg, instant_or_now};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{ClockLogic, PunchAttempt, PunchStatus};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::geofence::{FlagReason, LocationReading};
use crate::models::punch::PunchKind;
use crate::ui::messages::{success, warning};
use chrono::{Local, TimeZone};

fn describe(reasons: &[FlagReason]) -> String {
    reasons
        .iter()
        .map(FlagReason::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Punch {
        employee,
        kind,
        at,
        lat,
        lon,
        accuracy,
        no_gps,
        offline,
        captured_at,
        site,
        note,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let kind = PunchKind::pk_from_str(kind).ok_or_else(|| AppError::InvalidPunchKind(kind.clone()))?;
    let at = instant_or_now(at)?;

    let mut reading = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(LocationReading::at(*lat, *lon, *accuracy)),
        _ if *no_gps || *offline => Some(LocationReading::denied()),
        _ => None,
    };

    if let Some(r) = reading.take() {
        let mut r = if *offline { r.offline() } else { r };
        if let Some(c) = captured_at {
            let naive = instant_arg(c)?;
            let local = Local
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| AppError::InvalidDate(c.clone()))?;
            r = r.captured(local);
        }
        reading = Some(r);
    }

    let attempt = PunchAttempt {
        employee_id: employee.clone(),
        kind,
        at,
        reading,
        site_id: site.clone(),
        note: note.clone(),
        force: *force,
    };

    let mut pool = DbPool::open(&cfg.database)?;
    let receipt = ClockLogic::submit_punch(&mut pool, cfg, &attempt)?;

    let stamp = at.format("%Y-%m-%d %H:%M");
    match receipt.status {
        PunchStatus::Accepted => {
            success(format!(
                "{} {} at {} → {}",
                employee,
                kind.pk_as_str(),
                stamp,
                receipt.session.label()
            ));
            Ok(())
        }
        PunchStatus::Flagged => {
            warning(format!(
                "{} {} at {} recorded FLAGGED ({}) → {}",
                employee,
                kind.pk_as_str(),
                stamp,
                describe(&receipt.reasons),
                receipt.session.label()
            ));
            Ok(())
        }
        PunchStatus::Blocked => Err(AppError::PolicyBlocked(describe(&receipt.reasons))),
        PunchStatus::ConfirmationRequired => Err(AppError::ValidationFailed(format!(
            "no usable location ({}); retry with a GPS fix or use --force",
            receipt
                .classification
                .map(|c| c.to_db_str())
                .unwrap_or("no reading")
        ))),
        PunchStatus::InvalidTransition => Err(AppError::InvalidTransition(format!(
            "{} while {}",
            kind.pk_as_str(),
            receipt.session.label()
        ))),
    }
}
