use crate::cli::commands::date_arg;
use crate::cli::parser::{Commands, HalfDay, LeaveAction};
use crate::config::Config;
use crate::core::leave_logic::LeaveLogic;
use crate::db::leave::load_request_warnings;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::leave::{LeaveBalance, LeaveRequest};
use crate::models::review::ReviewStatus;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_status;
use crate::utils::formatting::days2readable;
use crate::utils::table::Table;
use crate::utils::time::parse_time_range;

fn print_balances(balances: &[LeaveBalance]) {
    let mut table = Table::new(&["TYPE", "TOTAL", "USED", "PENDING", "AVAILABLE"]);
    for b in balances {
        table.add_row(vec![
            b.leave_type_id.clone(),
            days2readable(b.total),
            days2readable(b.used),
            days2readable(b.pending),
            days2readable(b.available()),
        ]);
    }
    print!("{}", table.render());
}

fn describe_span(r: &LeaveRequest) -> String {
    match (r.start_time, r.end_time) {
        (Some(s), Some(e)) => format!("{} {}-{}", r.start_date, s.format("%H:%M"), e.format("%H:%M")),
        _ if r.duration_type.is_half_day() => {
            format!("{} ({})", r.start_date, r.duration_type.to_db_str())
        }
        _ if r.start_date == r.end_date => r.start_date.to_string(),
        _ => format!("{}..{}", r.start_date, r.end_date),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Leave { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::open(&cfg.database)?;

    match action {
        LeaveAction::Submit {
            employee,
            leave_type,
            from,
            to,
            half,
            hours,
            reason,
            allow_overdraw,
        } => {
            let start = date_arg(from)?;

            let request = match (half, hours) {
                (Some(h), _) => LeaveRequest::half_day(employee, leave_type, start, *h == HalfDay::Am),
                (None, Some(span)) => {
                    let (s, e) = parse_time_range(span)?;
                    LeaveRequest::hours(employee, leave_type, start, s, e)
                }
                (None, None) => {
                    let end = match to {
                        Some(t) => date_arg(t)?,
                        None => start,
                    };
                    LeaveRequest::full_days(employee, leave_type, start, end)
                }
            }
            .with_reason(reason);

            let outcome = LeaveLogic::submit(&mut pool, cfg, request, *allow_overdraw)?;

            success(format!(
                "Leave request #{} submitted: {} day(s), pending review.",
                outcome.id,
                days2readable(outcome.day_equivalent)
            ));
            for w in &outcome.warnings {
                warning(w.describe());
            }
            print_balances(std::slice::from_ref(&outcome.balance));
        }

        LeaveAction::List { employee, status } => {
            let status = match status {
                Some(s) => Some(
                    ReviewStatus::from_db_str(s)
                        .ok_or_else(|| AppError::ValidationFailed(format!("unknown status '{s}'")))?,
                ),
                None => None,
            };

            let requests = LeaveLogic::list(&pool, employee.as_deref(), status)?;
            if requests.is_empty() {
                info("No leave requests found.");
                return Ok(());
            }

            let mut table = Table::new(&[
                "ID", "EMPLOYEE", "TYPE", "WHEN", "DAYS", "STATUS", "REASON", "WARNINGS",
            ]);
            for r in &requests {
                let warnings = load_request_warnings(&pool.conn, r.id)?;
                table.add_row(vec![
                    r.id.to_string(),
                    r.employee_id.clone(),
                    r.leave_type_id.clone(),
                    describe_span(r),
                    days2readable(r.day_equivalent),
                    colorize_status(r.status),
                    r.reason.clone(),
                    warnings.join(","),
                ]);
            }
            print!("{}", table.render());
        }

        LeaveAction::Balance {
            employee,
            leave_type,
            set,
        } => {
            if let (Some(t), Some(total)) = (leave_type, set) {
                let b = LeaveLogic::set_balance(&mut pool, cfg, employee, t, *total)?;
                success(format!(
                    "{} entitlement for {} set to {}.",
                    b.leave_type_id,
                    employee,
                    days2readable(b.total)
                ));
            }

            let balances = LeaveLogic::balances(&pool, employee)?;
            if balances.is_empty() {
                info(format!("No balances recorded for {employee}."));
            } else {
                print_balances(&balances);
            }
        }

        LeaveAction::Accrue {
            employee,
            leave_type,
            months,
        } => {
            let b = LeaveLogic::accrue(&mut pool, cfg, employee, leave_type, *months)?;
            success(format!(
                "Accrued {} month(s) of {} for {}.",
                months, b.leave_type_id, employee
            ));
            print_balances(&[b]);
        }

        LeaveAction::Rollover {
            employee,
            leave_type,
            allowance,
        } => {
            let b = LeaveLogic::rollover(&mut pool, cfg, employee, leave_type, *allowance)?;
            success(format!(
                "{} rolled over for {}: new total {}.",
                b.leave_type_id,
                employee,
                days2readable(b.total)
            ));
            print_balances(&[b]);
        }

        LeaveAction::Resubmit { id } => {
            let r = LeaveLogic::resubmit(&mut pool, *id)?;
            success(format!("Leave request #{} is {} again.", r.id, r.status.to_db_str()));
        }

        LeaveAction::Conflicts { id } => {
            let conflicts = LeaveLogic::conflicts(&pool, *id)?;
            if conflicts.is_empty() {
                info(format!("No team overlap for leave request #{id}."));
            }
            for c in conflicts {
                warning(format!(
                    "#{} overlaps with {} on {}",
                    c.request_id,
                    c.other_employee_id,
                    c.overlap_dates
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
    }

    Ok(())
}
