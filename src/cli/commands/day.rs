use crate::cli::commands::date_or_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::timesheet::DayTimesheet;
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{RESET, color_for_overtime, colorize_status};
use crate::utils::mins2readable;
use crate::utils::table::Table;

/// Entries, totals, flags and review status of one day.
pub(crate) fn print_day(day: &DayTimesheet) {
    header(format!("{} · {}", day.employee_id, day.date.format("%a %Y-%m-%d")));

    if day.entries.is_empty() {
        info("No entries.");
    } else {
        let mut table = Table::new(&["KIND", "START", "END", "HOURS", "COMMENT"]);
        for e in &day.entries {
            table.add_row(vec![
                e.kind.as_str().to_string(),
                e.start.format("%H:%M").to_string(),
                e.end.format("%H:%M").to_string(),
                format!("{:.2}", e.hours),
                e.comment.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    println!(
        "\nRegular: {}  Overtime: {}{}{}  Breaks: {}",
        mins2readable(day.regular_minutes, false, false),
        color_for_overtime(day.overtime_minutes),
        mins2readable(day.overtime_minutes, false, false),
        RESET,
        mins2readable(day.break_minutes, false, false),
    );
    println!("Status: {}", colorize_status(day.status));
    if let Some(reviewer) = &day.review.reviewer {
        println!(
            "Reviewed by {}{}",
            reviewer,
            day.review
                .note
                .as_ref()
                .map(|n| format!(": {n}"))
                .unwrap_or_default()
        );
    }

    for flag in &day.flags {
        warning(flag.describe());
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Day {
        employee,
        date,
        json,
    } = cmd
    {
        let date = date_or_today(date)?;
        let pool = DbPool::open(&cfg.database)?;
        let day = TimesheetLogic::day(&pool, cfg, employee, date)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&day)?);
        } else {
            print_day(&day);
        }
    }
    Ok(())
}
