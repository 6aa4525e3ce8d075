mod common;

use common::{init_test_env, rtl, setup_test_db, temp_out};
use predicates::str::contains;
use serde_json::Value;
use std::fs;

/// Fresh DB + config with employees alice (hq, ops) and bob (no site, ops).
fn setup(name: &str) -> (String, String) {
    let db_path = setup_test_db(name);
    let cfg = init_test_env(name, &db_path);

    for args in [
        ["alice", "--name", "Alice", "--team", "ops", "--site", "hq"].as_slice(),
        ["bob", "--name", "Bob", "--team", "ops"].as_slice(),
    ] {
        rtl()
            .args(["--db", &db_path, "--config", &cfg, "employee", "add"])
            .args(args)
            .assert()
            .success()
            .stdout(contains("saved"));
    }

    (db_path, cfg)
}

fn punch(db: &str, cfg: &str, emp: &str, kind: &str, at: &str) -> assert_cmd::assert::Assert {
    rtl()
        .args([
            "--db", db, "--config", cfg, "punch", emp, kind, "--at", at, "--lat", "45.0", "--lon",
            "9.0",
        ])
        .assert()
}

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");
    init_test_env("cli_init", &db_path);
    assert!(fs::metadata(&db_path).is_ok());
}

#[test]
fn test_employee_list() {
    let (db, cfg) = setup("cli_employee_list");

    rtl()
        .args(["--db", &db, "--config", &cfg, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("alice"))
        .stdout(contains("Bob"))
        .stdout(contains("hq"));
}

#[test]
fn test_employee_with_unknown_site_fails() {
    let (db, cfg) = setup("cli_employee_bad_site");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "employee", "add", "carol", "--name", "Carol", "--site",
            "mars",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown site"));
}

#[test]
fn test_punch_day_and_json() {
    let (db, cfg) = setup("cli_punch_day");

    punch(&db, &cfg, "alice", "in", "2025-03-03 09:00")
        .success()
        .stdout(contains("clocked in"));
    punch(&db, &cfg, "alice", "break", "2025-03-03 12:00").success();
    punch(&db, &cfg, "alice", "resume", "2025-03-03 12:30").success();
    punch(&db, &cfg, "alice", "out", "2025-03-03 17:00")
        .success()
        .stdout(contains("clocked out"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "day", "alice", "2025-03-03"])
        .assert()
        .success()
        .stdout(contains("regular"))
        .stdout(contains("7.50"));

    let out = rtl()
        .args(["--db", &db, "--config", &cfg, "day", "alice", "2025-03-03", "--json"])
        .output()
        .expect("run day --json");
    assert!(out.status.success());

    let json: Value = serde_json::from_slice(&out.stdout[first_brace(&out.stdout)..])
        .expect("valid JSON");
    assert_eq!(json["regular_minutes"], 450);
    assert_eq!(json["break_minutes"], 30);
    assert_eq!(json["status"], "Pending");
}

/// main prints a blank line before the command output.
fn first_brace(bytes: &[u8]) -> usize {
    bytes.iter().position(|b| *b == b'{').unwrap_or(0)
}

#[test]
fn test_blocked_punch_exits_with_error() {
    let (db, cfg) = setup("cli_punch_blocked");

    rtl()
        .args([
            "--db",
            &db,
            "--config",
            &cfg,
            "punch",
            "alice",
            "in",
            "--at",
            "2025-03-03 09:00",
            "--lat",
            "45.0027",
            "--lon",
            "9.0",
        ])
        .assert()
        .failure()
        .stderr(contains("blocked by geofence policy"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "status", "alice", "--at", "2025-03-03 09:05"])
        .assert()
        .success()
        .stdout(contains("clocked out"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "log", "--print", "--op", "punch_blocked"])
        .assert()
        .success()
        .stdout(contains("alice"));
}

#[test]
fn test_punch_without_location_needs_force() {
    let (db, cfg) = setup("cli_punch_force");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "punch", "alice", "in", "--at", "2025-03-03 09:00",
            "--no-gps",
        ])
        .assert()
        .failure()
        .stderr(contains("--force"));

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "punch", "alice", "in", "--at", "2025-03-03 09:00",
            "--no-gps", "--force",
        ])
        .assert()
        .success()
        .stdout(contains("FLAGGED"));
}

#[test]
fn test_double_clock_in_is_invalid() {
    let (db, cfg) = setup("cli_double_in");

    punch(&db, &cfg, "bob", "in", "2025-03-03 09:00").success();
    punch(&db, &cfg, "bob", "in", "2025-03-03 10:00")
        .failure()
        .stderr(contains("Invalid transition"));
}

#[test]
fn test_manual_entry_close_and_week() {
    let (db, cfg) = setup("cli_entry_close");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "entry", "bob", "2025-03-03", "--in", "08:00", "--out",
            "17:00", "--break", "60",
        ])
        .assert()
        .success();

    punch(&db, &cfg, "bob", "in", "2025-03-04 09:00").success();
    rtl()
        .args(["--db", &db, "--config", &cfg, "day", "bob", "2025-03-04"])
        .assert()
        .success()
        .stdout(contains("missing clock-out"));

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "close", "bob", "2025-03-04", "--at", "2025-03-04 13:00",
        ])
        .assert()
        .success();

    let out = rtl()
        .args(["--db", &db, "--config", &cfg, "week", "bob", "2025-03-05", "--json"])
        .output()
        .expect("run week --json");
    assert!(out.status.success());
    let json: Value = serde_json::from_slice(&out.stdout[first_brace(&out.stdout)..])
        .expect("valid JSON");
    assert_eq!(json["week_start"], "2025-03-03");
    assert_eq!(json["regular_minutes"], 480 + 240);
}

#[test]
fn test_leave_submit_list_and_review() {
    let (db, cfg) = setup("cli_leave");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "leave", "balance", "alice", "--type", "vacation",
            "--set", "20",
        ])
        .assert()
        .success();

    rtl()
        .args([
            "--db",
            &db,
            "--config",
            &cfg,
            "leave",
            "submit",
            "alice",
            "vacation",
            "--from",
            "2025-03-03",
            "--to",
            "2025-03-07",
            "--reason",
            "ski trip",
        ])
        .assert()
        .success()
        .stdout(contains("#1 submitted"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "leave", "list", "--status", "pending"])
        .assert()
        .success()
        .stdout(contains("ski trip"))
        .stdout(contains("2025-03-03..2025-03-07"));

    // rejection needs a note
    rtl()
        .args(["--db", &db, "--config", &cfg, "review", "reject", "--leave", "1"])
        .assert()
        .failure()
        .stderr(contains("note is required"));

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "review", "approve", "--leave", "1", "--reviewer",
            "maria",
        ])
        .assert()
        .success()
        .stdout(contains("approved"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "leave", "list", "--employee", "alice", "--status", "approved"])
        .assert()
        .success()
        .stdout(contains("ski trip"));
}

#[test]
fn test_leave_overlap_warning_and_overdraw() {
    let (db, cfg) = setup("cli_leave_overlap");

    for emp in ["alice", "bob"] {
        rtl()
            .args([
                "--db", &db, "--config", &cfg, "leave", "balance", emp, "--type", "vacation",
                "--set", "3",
            ])
            .assert()
            .success();
    }

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "leave", "submit", "alice", "vacation", "--from",
            "2025-03-03", "--to", "2025-03-04",
        ])
        .assert()
        .success();

    // 5 days on a 3-day balance
    rtl()
        .args([
            "--db", &db, "--config", &cfg, "leave", "submit", "bob", "vacation", "--from",
            "2025-03-03", "--to", "2025-03-07",
        ])
        .assert()
        .failure()
        .stderr(contains("only 3 available"));

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "leave", "submit", "bob", "vacation", "--from",
            "2025-03-03", "--to", "2025-03-07", "--allow-overdraw",
        ])
        .assert()
        .success()
        .stdout(contains("Overlaps with alice"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "leave", "conflicts", "2"])
        .assert()
        .success()
        .stdout(contains("overlaps with alice on 2025-03-03, 2025-03-04"));

    rtl()
        .args(["--db", &db, "--config", &cfg, "leave", "list", "--employee", "bob"])
        .assert()
        .success()
        .stdout(contains("exceeds_available_balance,team_overlap"));
}

#[test]
fn test_half_day_leave() {
    let (db, cfg) = setup("cli_leave_half");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "leave", "submit", "bob", "sick", "--from", "2025-03-05",
            "--half", "am", "--allow-overdraw",
        ])
        .assert()
        .success()
        .stdout(contains("0.5 day(s)"));
}

#[test]
fn test_day_review_and_export_csv() {
    let (db, cfg) = setup("cli_export_csv");

    for d in ["2025-03-03", "2025-03-04"] {
        rtl()
            .args([
                "--db", &db, "--config", &cfg, "entry", "bob", d, "--in", "09:00", "--out", "17:30",
                "--break", "30",
            ])
            .assert()
            .success();
    }

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "review", "approve", "--employee", "bob", "--day",
            "2025-03-03",
        ])
        .assert()
        .success();

    let out = temp_out("cli_export_csv", "csv");
    fs::write(&out, "stale").expect("pre-existing file");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "export", "bob", "--format", "csv", "--file", &out,
            "--range", "2025-03", "--force",
        ])
        .assert()
        .success()
        .stdout(contains("2 day(s) exported"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    assert!(lines.next().expect("header").starts_with("employee_id,date"));
    let first = lines.next().expect("first row");
    assert!(first.contains("2025-03-03"));
    assert!(first.contains("approved"));
    assert!(lines.next().expect("second row").contains("pending"));
}

#[test]
fn test_export_json_relative_path_fails() {
    let (db, cfg) = setup("cli_export_relative");

    rtl()
        .args([
            "--db", &db, "--config", &cfg, "export", "bob", "--format", "json", "--file",
            "out.json", "--range", "2025",
        ])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_log_print() {
    let (db, cfg) = setup("cli_log");

    rtl()
        .args(["--db", &db, "--config", &cfg, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("Internal log"))
        .stdout(contains("init"))
        .stdout(contains("employee"));
}

#[test]
fn test_config_check() {
    let (db, cfg) = setup("cli_config_check");

    rtl()
        .args(["--db", &db, "--config", &cfg, "config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration OK"));
}
