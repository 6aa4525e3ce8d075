#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rtimeledger::config::Config;
use rtimeledger::db::pool::DbPool;
use rtimeledger::db::queries::upsert_employee;
use rtimeledger::models::employee::Employee;
use rtimeledger::models::geofence::{GeofenceSite, OutsidePolicy};
use rtimeledger::models::punch::{PunchEvent, PunchKind};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rtl() -> Command {
    cargo_bin_cmd!("rtimeledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Config file with one Block site ("hq", 200 m) and one warn site
/// ("depot", 200 m), plus a holiday on 2025-04-25.
pub fn write_test_config(name: &str, db_path: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeledger.conf", name));
    let yaml = format!(
        r#"database: {db_path}
rounding: exact
standard_workday_hours: 8
excessive_overtime_hours: 4
max_shift_hours: 16
holidays:
  - 2025-04-25
sites:
  - id: hq
    name: Head office
    latitude: 45.0
    longitude: 9.0
    radius_meters: 200
    outside_policy: block
  - id: depot
    name: Depot
    latitude: 45.0
    longitude: 9.0
    radius_meters: 200
    outside_policy: warn_and_flag
leave_types:
  - id: vacation
    name: Vacation
    accrual_rate: 1.67
    carry_over_limit: 5
    blackout_dates:
      - 2025-12-24
  - id: sick
    name: Sick leave
    accrual_rate: 1.0
    carry_over_limit: 0
"#
    );
    fs::write(&path, yaml).expect("write config");
    path.to_string_lossy().to_string()
}

/// `init` a test database against a test config; returns the config path.
pub fn init_test_env(name: &str, db_path: &str) -> String {
    let cfg = write_test_config(name, db_path);
    rtl()
        .args(["--db", db_path, "--config", &cfg, "--test", "init"])
        .assert()
        .success();
    cfg
}

pub fn site(id: &str, policy: OutsidePolicy) -> GeofenceSite {
    GeofenceSite {
        id: id.to_string(),
        name: id.to_string(),
        address: String::new(),
        latitude: 45.0,
        longitude: 9.0,
        radius_meters: 200.0,
        outside_policy: policy,
        require_gps: true,
        flag_distance_meters: 500.0,
        flag_accuracy_meters: 100.0,
        offline_review_hours: 24,
    }
}

/// Latitude that lies `meters` north of the test sites.
pub fn lat_north(meters: f64) -> f64 {
    45.0 + (meters / 6_371_000.0).to_degrees()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime")
}

/// Stored-looking punch with a given id, for pure aggregation tests.
pub fn ev(id: i64, work_date: &str, kind: PunchKind, ts: &str) -> PunchEvent {
    let mut e = PunchEvent::new("emp1", date(work_date), kind, at(ts));
    e.id = id;
    e
}

/// Test config with two sites and default leave types.
pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.database = ":memory:".into();
    cfg.holidays = vec![date("2025-04-25")];
    cfg.sites = vec![
        site("hq", OutsidePolicy::Block),
        site("depot", OutsidePolicy::WarnAndFlag),
    ];
    cfg
}

/// In-memory database with employees on one team.
pub fn memory_pool(employees: &[(&str, &str, Option<&str>)]) -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    for (id, team, site) in employees {
        upsert_employee(
            &pool.conn,
            &Employee {
                id: id.to_string(),
                name: id.to_uppercase(),
                team: team.to_string(),
                site_id: site.map(str::to_string),
            },
        )
        .expect("employee");
    }
    pool
}
