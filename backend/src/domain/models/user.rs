use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Domain model representing an authenticated account.
/// The plaintext password is never stored; only a salted SHA-256 hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    /// Hex-encoded SHA-256 of salt bytes followed by the password bytes
    pub password_hash: String,
    /// Hex-encoded random salt
    pub salt: String,
    /// Contact address for reminder emails, if the user provided one
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Explicit session value returned by a successful login.
///
/// Components that need user context take this (or the user id) as a
/// parameter instead of consulting process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub username: String,
}

/// Domain model for the profile a user fills in about themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_before_pregnancy_kg: Option<f64>,
    pub previous_pregnancies: u32,
    pub cycle_length_days: u32,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile for a freshly registered user
    pub fn empty(user_id: &str, name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            birth_date: None,
            height_cm: None,
            weight_before_pregnancy_kg: None,
            previous_pregnancies: 0,
            cycle_length_days: 28,
            updated_at: Utc::now(),
        }
    }
}
