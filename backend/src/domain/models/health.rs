//! Models backing the health record screens: weight, kicks, contractions
//! and blood pressure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// A counted kick session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickSession {
    pub id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub kick_count: u32,
}

/// A timed contraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionEntry {
    pub id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u32,
    /// Minutes since the previous contraction, if one was recorded
    pub interval_minutes: Option<f64>,
}

/// A blood pressure reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub id: String,
    pub user_id: String,
    pub measured_at: DateTime<Utc>,
    pub systolic: u32,
    pub diastolic: u32,
    pub pulse: Option<u32>,
}
