use crate::errors::{AppError, AppResult};
use crate::models::geofence::GeofenceSite;
use crate::models::leave::LeaveType;
use crate::utils::path::expand_tilde;
use crate::utils::time::RoundingRule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level keys every configuration file is expected to carry.
const KNOWN_FIELDS: &[&str] = &[
    "database",
    "rounding",
    "standard_workday_hours",
    "excessive_overtime_hours",
    "max_shift_hours",
    "holidays",
    "sites",
    "leave_types",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub rounding: RoundingRule,
    /// One value for both the overtime threshold and hour-based leave.
    #[serde(default = "default_workday_hours")]
    pub standard_workday_hours: f64,
    #[serde(default = "default_excessive_overtime")]
    pub excessive_overtime_hours: f64,
    /// How long an open session may continue past midnight.
    #[serde(default = "default_max_shift")]
    pub max_shift_hours: i64,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub sites: Vec<GeofenceSite>,
    #[serde(default = "default_leave_types")]
    pub leave_types: Vec<LeaveType>,
}

fn default_workday_hours() -> f64 {
    8.0
}
fn default_excessive_overtime() -> f64 {
    4.0
}
fn default_max_shift() -> i64 {
    16
}
fn default_leave_types() -> Vec<LeaveType> {
    vec![
        LeaveType {
            id: "vacation".into(),
            name: "Vacation".into(),
            accrual_rate: 1.67,
            carry_over_limit: 5.0,
            blackout_dates: Vec::new(),
        },
        LeaveType {
            id: "sick".into(),
            name: "Sick leave".into(),
            accrual_rate: 1.0,
            carry_over_limit: 0.0,
            blackout_dates: Vec::new(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            rounding: RoundingRule::default(),
            standard_workday_hours: default_workday_hours(),
            excessive_overtime_hours: default_excessive_overtime(),
            max_shift_hours: default_max_shift(),
            holidays: Vec::new(),
            sites: Vec::new(),
            leave_types: default_leave_types(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimeledger")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rtimeledger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimeledger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimeledger.sqlite")
    }

    /// Load configuration from `path` (or the standard location), falling
    /// back to defaults when the file does not exist.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the engine cannot compute with.
    pub fn validate(&self) -> AppResult<()> {
        if self.standard_workday_hours <= 0.0 {
            return Err(AppError::Config(
                "standard_workday_hours must be positive".into(),
            ));
        }
        if self.max_shift_hours <= 0 {
            return Err(AppError::Config("max_shift_hours must be positive".into()));
        }
        for site in &self.sites {
            if site.radius_meters < 0.0 {
                return Err(AppError::Config(format!(
                    "site '{}' has a negative radius",
                    site.id
                )));
            }
        }
        Ok(())
    }

    /// Write a default configuration file (unless in test mode) and make
    /// sure the database file exists. Returns the database path.
    pub fn init_all(
        custom_db: Option<String>,
        config_path: Option<&Path>,
        is_test: bool,
    ) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("rtimeledger.sqlite"),
        };

        if !is_test {
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let target = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Self::config_file);
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(&target)?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    /// Top-level keys absent from the file at `path` (defaults apply to them).
    pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
        let content = fs::read_to_string(path)?;
        let yaml: Value = serde_yaml::from_str(&content)?;
        let map = yaml
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration root is not a mapping".into()))?;

        Ok(KNOWN_FIELDS
            .iter()
            .filter(|k| !map.contains_key(Value::String((**k).to_string())))
            .map(|k| k.to_string())
            .collect())
    }

    pub fn find_site(&self, id: &str) -> AppResult<&GeofenceSite> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::UnknownSite(id.to_string()))
    }

    pub fn find_leave_type(&self, id: &str) -> AppResult<&LeaveType> {
        self.leave_types
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| AppError::UnknownLeaveType(id.to_string()))
    }

    pub fn workday_minutes(&self) -> i64 {
        (self.standard_workday_hours * 60.0).round() as i64
    }

    pub fn excessive_overtime_minutes(&self) -> i64 {
        (self.excessive_overtime_hours * 60.0).round() as i64
    }
}
