use crate::cli::commands::date_or_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::colorize_status;
use crate::utils::mins2readable;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Week {
        employee,
        date,
        json,
    } = cmd
    {
        let date = date_or_today(date)?;
        let pool = DbPool::open(&cfg.database)?;
        let week = TimesheetLogic::week(&pool, cfg, employee, date)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&week)?);
            return Ok(());
        }

        header(format!("{} · week of {}", week.employee_id, week.week_start));

        let mut table = Table::new(&["DAY", "REGULAR", "OVERTIME", "BREAKS", "FLAGS", "STATUS"]);
        for d in &week.days {
            let status = if d.is_empty() {
                "-".to_string()
            } else {
                d.status.to_db_str().to_string()
            };
            table.add_row(vec![
                d.date.format("%a %m-%d").to_string(),
                mins2readable(d.regular_minutes, false, true),
                mins2readable(d.overtime_minutes, false, true),
                mins2readable(d.break_minutes, false, true),
                d.flags.len().to_string(),
                status,
            ]);
        }
        print!("{}", table.render());

        println!(
            "\nTotal regular: {:.2} h  overtime: {:.2} h  breaks: {}",
            week.regular_hours(),
            week.overtime_hours(),
            mins2readable(week.break_minutes, false, false)
        );
        println!("Week status: {}", colorize_status(week.status()));
    }
    Ok(())
}
