use crate::cli::commands::{date_arg, instant_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Close {
        employee,
        date,
        at,
        note,
    } = cmd
    {
        let work_date = date_arg(date)?;
        let at = instant_arg(at)?;

        let mut pool = DbPool::open(&cfg.database)?;
        let appended = TimesheetLogic::close_session(&mut pool, employee, work_date, at, note.clone())?;

        for ev in &appended {
            success(format!(
                "{} {} at {} (manual)",
                employee,
                ev.kind.pk_as_str(),
                ev.get_date_time()
            ));
        }
    }
    Ok(())
}
