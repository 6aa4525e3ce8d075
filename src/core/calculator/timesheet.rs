use crate::config::Config;
use crate::core::calculator::timeline::{Block, build_timeline};
use crate::models::punch::PunchEvent;
use crate::models::timesheet::{
    DayFlag, DayTimesheet, EntryKind, ManualEntry, TimeEntry, WeekTimesheet,
};
use crate::utils::time::{RoundingRule, minutes_to_hours};
use chrono::{NaiveDate, NaiveDateTime};

/// Knobs the aggregator reads from site configuration.
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    pub rounding: RoundingRule,
    /// Daily Regular cap; everything beyond is Overtime.
    pub threshold_minutes: i64,
    pub excessive_overtime_minutes: i64,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            rounding: RoundingRule::Exact,
            threshold_minutes: 8 * 60,
            excessive_overtime_minutes: 4 * 60,
        }
    }
}

impl From<&Config> for AggregationSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            rounding: cfg.rounding,
            threshold_minutes: cfg.workday_minutes(),
            excessive_overtime_minutes: cfg.excessive_overtime_minutes(),
        }
    }
}

fn entry(
    kind: EntryKind,
    start: NaiveDateTime,
    end: NaiveDateTime,
    minutes: i64,
    comment: &str,
) -> TimeEntry {
    TimeEntry {
        kind,
        start,
        end,
        minutes,
        hours: minutes_to_hours(minutes),
        comment: comment.to_string(),
    }
}

/// Emit the entries of one block, consuming from the remaining Regular budget.
fn split_block(block: &Block, remaining_regular: &mut i64, out: &mut Vec<TimeEntry>) {
    let worked = block.worked_minutes();
    let regular = worked.min(*remaining_regular).max(0);
    let overtime = worked - regular;
    *remaining_regular -= regular;

    let split_at = block.instant_after(regular);

    if regular > 0 || overtime == 0 {
        let end = if overtime > 0 { split_at } else { block.end };
        out.push(entry(
            EntryKind::Regular,
            block.start,
            end,
            regular,
            &block.comment,
        ));
    }
    if overtime > 0 {
        out.push(entry(EntryKind::Overtime, split_at, block.end, overtime, ""));
    }
    for (bs, be) in &block.breaks {
        out.push(entry(
            EntryKind::Break,
            *bs,
            *be,
            (*be - *bs).num_minutes(),
            "",
        ));
    }
}

/// Fold a work date's punches (and manual entries) into a day timesheet.
/// The returned status is Pending; stored review decisions are overlaid by
/// the caller.
pub fn aggregate(
    employee_id: &str,
    date: NaiveDate,
    events: &[PunchEvent],
    manual: &[ManualEntry],
    settings: &AggregationSettings,
) -> DayTimesheet {
    let timeline = build_timeline(events, manual, settings.rounding);

    let mut day = DayTimesheet::empty(employee_id, date);
    day.flags = timeline.flags;

    let mut remaining = settings.threshold_minutes;
    for block in &timeline.blocks {
        split_block(block, &mut remaining, &mut day.entries);
    }
    day.entries.sort_by_key(|e| e.start);

    for e in &day.entries {
        match e.kind {
            EntryKind::Regular => day.regular_minutes += e.minutes,
            EntryKind::Overtime => day.overtime_minutes += e.minutes,
            EntryKind::Break => day.break_minutes += e.minutes,
        }
    }

    if day.overtime_minutes > settings.excessive_overtime_minutes {
        day.flags.push(DayFlag::ExcessiveOvertime {
            overtime_minutes: day.overtime_minutes,
        });
    }

    day
}

/// Seven consecutive days starting at `week_start`.
pub fn aggregate_week(employee_id: &str, week_start: NaiveDate, days: Vec<DayTimesheet>) -> WeekTimesheet {
    WeekTimesheet {
        employee_id: employee_id.to_string(),
        week_start,
        regular_minutes: days.iter().map(|d| d.regular_minutes).sum(),
        overtime_minutes: days.iter().map(|d| d.overtime_minutes).sum(),
        break_minutes: days.iter().map(|d| d.break_minutes).sum(),
        days,
    }
}
