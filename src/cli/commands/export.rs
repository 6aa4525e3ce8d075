use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportLogic, parse_range};
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        employee,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let bounds = parse_range(range)?;
        let pool = DbPool::open(&cfg.database)?;
        let n = ExportLogic::export(&pool, cfg, employee, *format, file, bounds, *force)?;
        info(format!("{n} day(s) exported as {}.", format.as_str()));
    }
    Ok(())
}
