//! Pairs a day's punches into work blocks (ClockIn→ClockOut with the
//! breaks taken inside) and collects the data-quality flags found on the way.

use crate::core::punch::next_state;
use crate::models::punch::{PunchEvent, PunchKind, PunchState};
use crate::models::timesheet::{DayFlag, ManualEntry};
use crate::utils::time::{RoundingRule, span_on};
use chrono::{Duration, NaiveDateTime};

pub type Span = (NaiveDateTime, NaiveDateTime);

/// A closed stretch of work, already rounded.
#[derive(Debug, Clone)]
pub struct Block {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Worked intervals (the block minus its breaks).
    pub intervals: Vec<Span>,
    pub breaks: Vec<Span>,
    pub comment: String,
}

impl Block {
    pub fn worked_minutes(&self) -> i64 {
        self.intervals
            .iter()
            .map(|(s, e)| (*e - *s).num_minutes())
            .sum()
    }

    /// Instant at which `minutes` of work have been done inside the block.
    pub fn instant_after(&self, minutes: i64) -> NaiveDateTime {
        let mut left = minutes;
        for (s, e) in &self.intervals {
            let len = (*e - *s).num_minutes();
            if left <= len {
                return *s + Duration::minutes(left);
            }
            left -= len;
        }
        self.intervals.last().map(|(_, e)| *e).unwrap_or(self.start)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Timeline {
    pub blocks: Vec<Block>,
    pub flags: Vec<DayFlag>,
}

struct OpenSession {
    clock_in: NaiveDateTime,
    note: String,
    breaks: Vec<Span>,
    break_start: Option<NaiveDateTime>,
}

fn build_block(
    rounding: RoundingRule,
    start: NaiveDateTime,
    end: NaiveDateTime,
    breaks: &[Span],
    comment: String,
) -> Block {
    let start = rounding.round(start);
    let end = rounding.round(end).max(start);

    let mut rounded_breaks: Vec<Span> = breaks
        .iter()
        .map(|(bs, be)| {
            let bs = rounding.round(*bs).clamp(start, end);
            let be = rounding.round(*be).clamp(bs, end);
            (bs, be)
        })
        .filter(|(bs, be)| be > bs)
        .collect();
    rounded_breaks.sort();

    let mut intervals = Vec::new();
    let mut cursor = start;
    for (bs, be) in &rounded_breaks {
        if *bs > cursor {
            intervals.push((cursor, *bs));
        }
        cursor = cursor.max(*be);
    }
    if end > cursor {
        intervals.push((cursor, end));
    }

    Block {
        start,
        end,
        intervals,
        breaks: rounded_breaks,
        comment,
    }
}

pub fn build_timeline(
    events: &[PunchEvent],
    manual: &[ManualEntry],
    rounding: RoundingRule,
) -> Timeline {
    // -----------------------------
    // Sort events chronologically
    // -----------------------------
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| (e.timestamp, e.id));

    let mut timeline = Timeline::default();
    let mut state = PunchState::ClockedOut;
    let mut open: Option<OpenSession> = None;

    for ev in &sorted {
        let Some(next) = next_state(state, ev.kind) else {
            timeline
                .flags
                .push(DayFlag::InvalidSequence { at: ev.timestamp });
            break;
        };

        if ev.flagged {
            timeline.flags.push(DayFlag::FlaggedPunch {
                at: ev.timestamp,
                reason: ev.flag_reason.clone(),
            });
        }

        match ev.kind {
            PunchKind::ClockIn => {
                open = Some(OpenSession {
                    clock_in: ev.timestamp,
                    note: ev.note.clone().unwrap_or_default(),
                    breaks: Vec::new(),
                    break_start: None,
                });
            }
            PunchKind::BreakStart => {
                if let Some(s) = open.as_mut() {
                    s.break_start = Some(ev.timestamp);
                }
            }
            PunchKind::BreakEnd => {
                if let Some(s) = open.as_mut()
                    && let Some(bs) = s.break_start.take()
                {
                    s.breaks.push((bs, ev.timestamp));
                }
            }
            PunchKind::ClockOut => {
                if let Some(s) = open.take() {
                    let mut comment = s.note;
                    if let Some(out_note) = &ev.note {
                        if !comment.is_empty() {
                            comment.push_str("; ");
                        }
                        comment.push_str(out_note);
                    }
                    timeline.blocks.push(build_block(
                        rounding,
                        s.clock_in,
                        ev.timestamp,
                        &s.breaks,
                        comment,
                    ));
                }
            }
        }

        state = next;
    }

    // Unterminated session: flagged, counts zero until resolved.
    if let Some(s) = open {
        timeline.flags.push(DayFlag::MissingClockOut {
            clock_in: s.clock_in,
        });
    }

    // -----------------------------
    // Manual entries (no geofence)
    // -----------------------------
    for m in manual {
        let (start, end) = span_on(m.date, m.start, m.end);
        let breaks = if m.break_minutes > 0 {
            let bs = (end - Duration::minutes(m.break_minutes)).max(start);
            vec![(bs, end)]
        } else {
            Vec::new()
        };
        timeline
            .blocks
            .push(build_block(rounding, start, end, &breaks, m.comment.clone()));
    }

    timeline.blocks.sort_by_key(|b| b.start);
    timeline
}
