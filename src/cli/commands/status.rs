use crate::cli::commands::instant_or_now;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { employee, at } = cmd {
        let at = instant_or_now(at)?;
        let pool = DbPool::open(&cfg.database)?;
        let s = ClockLogic::status(&pool, cfg, employee, at)?;

        println!("👤 {} is {}", s.employee_id, s.state.label());
        println!("   work date : {}", s.work_date);
        if let Some(opened) = s.opened_at {
            println!("   since     : {}", opened.format("%Y-%m-%d %H:%M"));
        }
        if let Some(last) = s.last_punch_at {
            println!("   last punch: {}", last.format("%Y-%m-%d %H:%M"));
        }
    }
    Ok(())
}
