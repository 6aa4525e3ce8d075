// src/export/logic.rs

use crate::config::Config;
use crate::core::timesheet::TimesheetLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::DayExport;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export an employee's day timesheets for `[from, to]`.
    ///
    /// Days with nothing recorded are skipped. `file` must be absolute.
    pub fn export(
        pool: &DbPool,
        cfg: &Config,
        employee_id: &str,
        format: ExportFormat,
        file: &str,
        (from, to): (NaiveDate, NaiveDate),
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let rows: Vec<DayExport> = TimesheetLogic::range(pool, cfg, employee_id, from, to)?
            .iter()
            .filter(|d| !d.is_empty())
            .map(DayExport::from)
            .collect();

        if rows.is_empty() {
            warning("No timesheet days found for the selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
