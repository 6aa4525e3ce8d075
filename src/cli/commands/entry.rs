use crate::cli::commands::date_arg;
use crate::cli::commands::day::print_day;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::timesheet::ManualEntry;
use crate::ui::messages::success;
use crate::utils::time::parse_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Entry {
        employee,
        date,
        start,
        end,
        break_minutes,
        comment,
    } = cmd
    {
        let entry = ManualEntry {
            id: 0,
            employee_id: employee.clone(),
            date: date_arg(date)?,
            start: parse_time(start).ok_or_else(|| AppError::InvalidTime(start.clone()))?,
            end: parse_time(end).ok_or_else(|| AppError::InvalidTime(end.clone()))?,
            break_minutes: *break_minutes,
            comment: comment.clone(),
        };

        let mut pool = DbPool::open(&cfg.database)?;
        let day = TimesheetLogic::add_manual_entry(&mut pool, cfg, &entry)?;

        success(format!(
            "Manual entry added for {} on {}.",
            entry.employee_id, entry.date
        ));
        print_day(&day);
    }
    Ok(())
}
