use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a user profile in the pregnancy tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub birth_date: Option<String>, // ISO 8601 date format (YYYY-MM-DD)
    pub height_cm: Option<f64>,
    pub weight_before_pregnancy_kg: Option<f64>,
    pub previous_pregnancies: u32,
    pub cycle_length_days: u32,
    pub updated_at: String, // RFC 3339 timestamp
}

/// Represents a pregnancy record for display purposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyRecord {
    pub user_id: String,
    pub last_period_date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub conception_date: Option<String>, // ISO 8601 date format (YYYY-MM-DD)
    pub due_date: String, // ISO 8601 date format (YYYY-MM-DD), derived
    pub baby_name: Option<String>,
    pub baby_gender: Option<String>, // "girl" | "boy" | "unknown"
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// Current pregnancy status derived from the record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyStatus {
    /// Gestational week clamped to [1, 42]; None when no pregnancy is recorded
    pub current_week: Option<u32>,
    /// 1, 2 or 3; None when no pregnancy is recorded
    pub trimester: Option<u8>,
    pub days_left: Option<i64>,
    pub due_date: Option<String>, // ISO 8601 date format (YYYY-MM-DD)
}

/// Reminder ID in format: "reminder::<epoch_millis>::<sequence>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub reminder_date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub reminder_time: String, // 24h clock, "HH:MM"
    pub kind: String,          // "appointment" | "medication" | "checkup" | "custom"
    pub is_active: bool,
    pub is_completed: bool,
}

/// Request for creating a new reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub title: String,
    pub description: String,
    pub reminder_date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub reminder_time: String, // "HH:MM"
    pub kind: String,
}

/// Response containing a list of reminders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderListResponse {
    pub reminders: Vec<Reminder>,
}

/// A single weight measurement for the weight screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub date: String, // ISO 8601 date format (YYYY-MM-DD)
    pub weight_kg: f64,
    pub note: String,
}

/// A counted kick session for the kicks screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickSession {
    pub id: String,
    pub started_at: String, // RFC 3339 timestamp
    pub duration_minutes: u32,
    pub kick_count: u32,
}

/// A timed contraction for the contractions screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionEntry {
    pub id: String,
    pub started_at: String, // RFC 3339 timestamp
    pub duration_seconds: u32,
    pub interval_minutes: Option<f64>,
}

/// A blood pressure reading for the blood pressure screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub id: String,
    pub measured_at: String, // RFC 3339 timestamp
    pub systolic: u32,
    pub diastolic: u32,
    pub pulse: Option<u32>,
}

/// One entry of the medical checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub is_done: bool,
    pub position: u32,
}

/// One entry of the baby wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub title: String,
    pub note: String,
    pub is_purchased: bool,
    pub position: u32,
}

impl Reminder {
    /// Generate a reminder ID from a timestamp and a sequence number
    pub fn generate_id(epoch_millis: u64, sequence: u64) -> String {
        format!("reminder::{}::{}", epoch_millis, sequence)
    }

    /// Parse a reminder ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, IdError> {
        parse_prefixed_id(id, "reminder")
    }
}

impl UserProfile {
    /// Generate a user ID from a timestamp and a sequence number
    pub fn generate_user_id(epoch_millis: u64, sequence: u64) -> String {
        format!("user::{}::{}", epoch_millis, sequence)
    }

    /// Parse a user ID to extract the timestamp
    pub fn parse_user_id(id: &str) -> Result<u64, IdError> {
        parse_prefixed_id(id, "user")
    }
}

/// Parse an ID of the form "<prefix>::<epoch_millis>::<sequence>"
fn parse_prefixed_id(id: &str, prefix: &str) -> Result<u64, IdError> {
    let parts: Vec<&str> = id.split("::").collect();
    if parts.len() != 3 || parts[0] != prefix {
        return Err(IdError::InvalidFormat);
    }
    parts[2]
        .parse::<u64>()
        .map_err(|_| IdError::InvalidTimestamp)?;
    parts[1].parse::<u64>().map_err(|_| IdError::InvalidTimestamp)
}

/// Errors raised when parsing structured record IDs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdError {
    #[error("Invalid ID format")]
    InvalidFormat,
    #[error("Invalid timestamp in ID")]
    InvalidTimestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reminder_id() {
        let id = Reminder::generate_id(1702516122000, 7);
        assert_eq!(id, "reminder::1702516122000::7");
    }

    #[test]
    fn test_parse_reminder_id() {
        let timestamp = Reminder::parse_id("reminder::1702516122000::7").unwrap();
        assert_eq!(timestamp, 1702516122000);

        assert!(Reminder::parse_id("reminder").is_err());
        assert!(Reminder::parse_id("reminder::1702516122000").is_err());
        assert!(Reminder::parse_id("user::1702516122000::0").is_err());
        assert!(Reminder::parse_id("reminder::not_a_number::0").is_err());
        assert!(Reminder::parse_id("reminder::1702516122000::x").is_err());
    }

    #[test]
    fn test_generate_user_id() {
        let id = UserProfile::generate_user_id(1702516122000, 0);
        assert_eq!(id, "user::1702516122000::0");
    }

    #[test]
    fn test_parse_user_id() {
        let timestamp = UserProfile::parse_user_id("user::1702516122000::0").unwrap();
        assert_eq!(timestamp, 1702516122000);

        assert!(UserProfile::parse_user_id("user").is_err());
        assert!(UserProfile::parse_user_id("child::123::0").is_err());
        assert!(UserProfile::parse_user_id("user::abc::0").is_err());
    }

    #[test]
    fn test_id_error_display() {
        assert_eq!(IdError::InvalidFormat.to_string(), "Invalid ID format");
        assert_eq!(
            IdError::InvalidTimestamp.to_string(),
            "Invalid timestamp in ID"
        );
    }
}
