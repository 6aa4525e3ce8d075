/// ANSI color helper utilities for terminal output.
use crate::models::review::ReviewStatus;

pub const RESET: &str = "\x1b[0m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Overtime color:
/// \>0 → yellow
/// 0 → reset
pub fn color_for_overtime(value: i64) -> &'static str {
    if value > 0 { YELLOW } else { RESET }
}

pub fn color_for_status(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => CYAN,
        ReviewStatus::Approved => GREEN,
        ReviewStatus::Rejected => RED,
        ReviewStatus::NeedsInfo => MAGENTA,
    }
}

pub fn colorize_status(status: ReviewStatus) -> String {
    format!(
        "{}{}{}",
        color_for_status(status),
        status.to_db_str(),
        RESET
    )
}
