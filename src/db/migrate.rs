use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also stores migration markers.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

const CORE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        team        TEXT NOT NULL DEFAULT '',
        site_id     TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS punches (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id     TEXT NOT NULL,
        work_date       TEXT NOT NULL,
        kind            TEXT NOT NULL CHECK(kind IN ('in','out','break_start','break_end')),
        ts              TEXT NOT NULL,
        site_id         TEXT,
        classification  TEXT,
        flagged         INTEGER NOT NULL DEFAULT 0,
        flag_reason     TEXT NOT NULL DEFAULT '',
        note            TEXT,
        source          TEXT NOT NULL DEFAULT 'device' CHECK(source IN ('device','manual')),
        created_at      TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_punches_emp_date ON punches(employee_id, work_date);
    CREATE INDEX IF NOT EXISTS idx_punches_emp_ts ON punches(employee_id, ts);

    CREATE TABLE IF NOT EXISTS manual_entries (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id     TEXT NOT NULL,
        date            TEXT NOT NULL,
        start_time      TEXT NOT NULL,
        end_time        TEXT NOT NULL,
        break_minutes   INTEGER NOT NULL DEFAULT 0,
        comment         TEXT NOT NULL DEFAULT '',
        created_at      TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_manual_emp_date ON manual_entries(employee_id, date);
"#;

const REVIEW_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS timesheet_reviews (
        employee_id  TEXT NOT NULL,
        date         TEXT NOT NULL,
        status       TEXT NOT NULL DEFAULT 'pending'
                     CHECK(status IN ('pending','approved','rejected','needs_info')),
        reviewer     TEXT,
        note         TEXT,
        reviewed_at  TEXT,
        PRIMARY KEY (employee_id, date)
    );
"#;

const LEAVE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS leave_balances (
        employee_id    TEXT NOT NULL,
        leave_type_id  TEXT NOT NULL,
        total          REAL NOT NULL DEFAULT 0,
        used           REAL NOT NULL DEFAULT 0,
        pending        REAL NOT NULL DEFAULT 0,
        updated_at     TEXT NOT NULL,
        PRIMARY KEY (employee_id, leave_type_id)
    );

    CREATE TABLE IF NOT EXISTS leave_requests (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id     TEXT NOT NULL,
        leave_type_id   TEXT NOT NULL,
        duration_type   TEXT NOT NULL
                        CHECK(duration_type IN ('full_day','half_day_am','half_day_pm','hours')),
        start_date      TEXT NOT NULL,
        end_date        TEXT NOT NULL,
        start_time      TEXT,
        end_time        TEXT,
        day_equivalent  REAL NOT NULL,
        reason          TEXT NOT NULL DEFAULT '',
        status          TEXT NOT NULL DEFAULT 'pending'
                        CHECK(status IN ('pending','approved','rejected','needs_info')),
        submitted_at    TEXT NOT NULL,
        reviewer        TEXT,
        reviewer_note   TEXT,
        reviewed_at     TEXT,
        warnings        TEXT NOT NULL DEFAULT '[]'
    );

    CREATE INDEX IF NOT EXISTS idx_leave_emp ON leave_requests(employee_id, status);
    CREATE INDEX IF NOT EXISTS idx_leave_dates ON leave_requests(start_date, end_date);
"#;

/// Ordered schema migrations: (version, description, sql).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_core_schema",
        "Created employees, punches and manual_entries tables",
        CORE_SCHEMA,
    ),
    (
        "20250301_0002_review_schema",
        "Created timesheet_reviews table",
        REVIEW_SCHEMA,
    ),
    (
        "20250315_0003_leave_schema",
        "Created leave_balances and leave_requests tables",
        LEAVE_SCHEMA,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", version, description));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, description, sql) in MIGRATIONS {
        if !is_applied(conn, version)? {
            apply(conn, version, description, sql)?;
        }
    }

    Ok(())
}
