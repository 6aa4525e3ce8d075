use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    Regex::new(r"\x1B\[[0-9;]*[mK]")
        .map(|re| re.replace_all(s, "").into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "punch" | "entry" | "close" => Colour::Green,
        "punch_blocked" | "punch_invalid" => Colour::Red,
        "review" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "employee" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("leave_") => Colour::Cyan,
        _ => Colour::White,
    }
}

pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Audit rows, oldest first, optionally narrowed to one operation
    /// and/or one target.
    pub fn load(
        pool: &DbPool,
        operation: Option<&str>,
        target: Option<&str>,
    ) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log
             WHERE (?1 IS NULL OR operation = ?1)
               AND (?2 IS NULL OR target = ?2)
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(rusqlite::params![operation, target], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        Ok(entries)
    }

    pub fn print_log(
        pool: &DbPool,
        operation: Option<&str>,
        target: Option<&str>,
    ) -> AppResult<()> {
        let entries = Self::load(pool, operation, target)?;

        println!("📜 Internal log:\n");

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH);

        for e in entries {
            let color = color_for_operation(&e.operation);

            let op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };

            // truncate on the visible text, then colour only the operation
            let visible = if op_target.chars().count() > OP_WIDTH {
                let mut s: String = op_target.chars().take(OP_WIDTH - 3).collect();
                s.push_str("...");
                s
            } else {
                op_target
            };
            let colored = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
