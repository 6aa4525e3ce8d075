use chrono::{DateTime, Local};
use serde::Serialize;

/// Approval status shared by timesheets and leave requests.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    NeedsInfo,
}

impl ReviewStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::NeedsInfo => "needs_info",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            "needs_info" => Some(ReviewStatus::NeedsInfo),
            _ => None,
        }
    }
}

/// Who reviewed an item, when, and what they said.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ReviewStamp {
    pub reviewer: Option<String>,
    pub note: Option<String>,
    pub reviewed_at: Option<DateTime<Local>>,
}

impl ReviewStamp {
    pub fn now(reviewer: &str, note: Option<String>) -> Self {
        Self {
            reviewer: Some(reviewer.to_string()),
            note,
            reviewed_at: Some(Local::now()),
        }
    }
}
