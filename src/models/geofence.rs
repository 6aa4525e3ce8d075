use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// What happens to a punch captured outside the site radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutsidePolicy {
    AllowAndFlag,
    #[default]
    WarnAndFlag,
    Block,
}

/// A work site with its geofence settings (read from configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceSite {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    #[serde(default)]
    pub outside_policy: OutsidePolicy,
    #[serde(default = "default_require_gps")]
    pub require_gps: bool,
    #[serde(default = "default_flag_distance")]
    pub flag_distance_meters: f64,
    #[serde(default = "default_flag_accuracy")]
    pub flag_accuracy_meters: f64,
    #[serde(default = "default_offline_review_hours")]
    pub offline_review_hours: i64,
}

fn default_require_gps() -> bool {
    true
}
fn default_flag_distance() -> f64 {
    500.0
}
fn default_flag_accuracy() -> f64 {
    100.0
}
fn default_offline_review_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location sampled at the instant of a punch. Never stored as a trail:
/// only the resulting classification is persisted with the punch.
#[derive(Debug, Clone)]
pub struct LocationReading {
    /// `None` when the device refused location permission.
    pub coordinates: Option<Coordinates>,
    pub accuracy_meters: f64,
    pub captured_at: DateTime<Local>,
    pub online: bool,
}

impl LocationReading {
    pub fn at(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            coordinates: Some(Coordinates {
                latitude,
                longitude,
            }),
            accuracy_meters,
            captured_at: Local::now(),
            online: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            coordinates: None,
            accuracy_meters: 0.0,
            captured_at: Local::now(),
            online: true,
        }
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub fn captured(mut self, at: DateTime<Local>) -> Self {
        self.captured_at = at;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeofenceClassification {
    Inside,
    OutsideWarn,
    OutsideBlock,
    NoPermission,
    GpsError,
    Offline,
}

impl GeofenceClassification {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::OutsideWarn => "outside_warn",
            Self::OutsideBlock => "outside_block",
            Self::NoPermission => "no_permission",
            Self::GpsError => "gps_error",
            Self::Offline => "offline",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "inside" => Some(Self::Inside),
            "outside_warn" => Some(Self::OutsideWarn),
            "outside_block" => Some(Self::OutsideBlock),
            "no_permission" => Some(Self::NoPermission),
            "gps_error" => Some(Self::GpsError),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }

    /// Classifications that need an explicit retry or force-flag.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::NoPermission | Self::GpsError)
    }
}

/// Why a recorded punch carries `flagged = true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FlagReason {
    OutsideGeofence { distance_meters: f64 },
    FarOutside { distance_meters: f64 },
    Offline,
    LateSync { hours_old: i64 },
    NoGps,
    LowAccuracy { accuracy_meters: f64 },
}

impl FlagReason {
    pub fn describe(&self) -> String {
        match self {
            FlagReason::OutsideGeofence { distance_meters } => {
                format!("outside geofence ({distance_meters:.0} m)")
            }
            FlagReason::FarOutside { distance_meters } => {
                format!("far outside geofence ({distance_meters:.0} m)")
            }
            FlagReason::Offline => "captured offline".into(),
            FlagReason::LateSync { hours_old } => format!("offline punch synced {hours_old}h late"),
            FlagReason::NoGps => "no location permission".into(),
            FlagReason::LowAccuracy { accuracy_meters } => {
                format!("low GPS accuracy ({accuracy_meters:.0} m)")
            }
        }
    }
}

/// Classification plus the detail that annotates a stored punch.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceVerdict {
    pub classification: GeofenceClassification,
    pub distance_meters: Option<f64>,
    pub reasons: Vec<FlagReason>,
}
