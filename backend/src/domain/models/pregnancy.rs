use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BabyGender {
    Girl,
    Boy,
    Unknown,
}

impl BabyGender {
    /// Convert to string for YAML storage
    pub fn as_str(&self) -> &'static str {
        match self {
            BabyGender::Girl => "girl",
            BabyGender::Boy => "boy",
            BabyGender::Unknown => "unknown",
        }
    }

    /// Parse from string for YAML loading
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "girl" => Ok(BabyGender::Girl),
            "boy" => Ok(BabyGender::Boy),
            "unknown" => Ok(BabyGender::Unknown),
            _ => Err(format!("Invalid baby gender: {}", s)),
        }
    }
}

/// Domain model for the single pregnancy record a user keeps.
///
/// Invariants:
/// - `due_date` is derived: conception date + 266 days when the conception
///   date is known, otherwise last period date + 280 days.
/// - `last_period_date` is never later than `conception_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyRecord {
    pub user_id: String,
    pub last_period_date: NaiveDate,
    pub conception_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub baby_name: Option<String>,
    pub baby_gender: BabyGender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
