use crate::cli::commands::date_arg;
use crate::cli::parser::{Commands, ReviewKind};
use crate::config::Config;
use crate::core::approval::ReviewAction;
use crate::core::review::{ReviewLogic, ReviewTarget};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, success};

fn resubmit_days(
    pool: &mut DbPool,
    cfg: &Config,
    employee: Option<&str>,
    days: &[String],
) -> AppResult<()> {
    let employee =
        employee.ok_or_else(|| AppError::ValidationFailed("--employee is required".into()))?;
    if days.is_empty() {
        return Err(AppError::ValidationFailed(
            "resubmit takes --day (leave requests use `leave resubmit`)".into(),
        ));
    }
    for d in days {
        let date = date_arg(d)?;
        let status = ReviewLogic::resubmit_day(pool, cfg, employee, date)?;
        success(format!("day {employee} {date} → {}", status.to_db_str()));
    }
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Review {
        action,
        leave,
        employee,
        day,
        week,
        note,
        reviewer,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::open(&cfg.database)?;

    let note_text = note.clone().unwrap_or_default();
    let review_action = match action {
        ReviewKind::Approve => ReviewAction::Approve(note.clone()),
        ReviewKind::Reject => ReviewAction::Reject(note_text),
        ReviewKind::Info => ReviewAction::RequestInfo(note_text),
        ReviewKind::Resubmit => return resubmit_days(&mut pool, cfg, employee.as_deref(), day),
    };

    let mut targets: Vec<ReviewTarget> = leave.iter().map(|id| ReviewTarget::Leave(*id)).collect();
    if let Some(emp) = employee {
        for d in day {
            targets.push(ReviewTarget::Day {
                employee_id: emp.clone(),
                date: date_arg(d)?,
            });
        }
        for d in week {
            targets.push(ReviewTarget::Week {
                employee_id: emp.clone(),
                date: date_arg(d)?,
            });
        }
    }

    if targets.is_empty() {
        return Err(AppError::ValidationFailed(
            "nothing to review: use --leave, or --employee with --day/--week".into(),
        ));
    }

    let outcomes = ReviewLogic::bulk(&mut pool, cfg, reviewer, &targets, &review_action);

    let mut failed = 0;
    for o in &outcomes {
        match (&o.status, &o.error) {
            (Some(status), None) => success(format!("{} → {}", o.id, status.to_db_str())),
            (_, err) => {
                failed += 1;
                error(format!(
                    "{}: {}",
                    o.id,
                    err.as_deref().unwrap_or("unknown error")
                ));
            }
        }
    }

    if failed > 0 {
        return Err(AppError::ValidationFailed(format!(
            "{failed} of {} review(s) failed",
            outcomes.len()
        )));
    }
    Ok(())
}
