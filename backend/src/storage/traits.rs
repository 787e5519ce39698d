//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! All operations are synchronous; the app is a desktop tracker and every
//! operation is a local disk read/write.

use anyhow::Result;

use crate::domain::models::checklist::{ChecklistItem, WishlistItem};
use crate::domain::models::health::{
    BloodPressureReading, ContractionEntry, KickSession, WeightEntry,
};
use crate::domain::models::pregnancy::PregnancyRecord;
use crate::domain::models::reminder::Reminder;
use crate::domain::models::user::{UserAccount, UserProfile};

/// Trait defining the interface for account and profile storage operations
pub trait UserStorage: Send + Sync {
    /// Store a new account
    fn store_account(&self, account: &UserAccount) -> Result<()>;

    /// Retrieve a specific account by ID
    fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Find an account by username (usernames are unique)
    fn find_account_by_username(&self, username: &str) -> Result<Option<UserAccount>>;

    /// List all accounts ordered by username
    fn list_accounts(&self) -> Result<Vec<UserAccount>>;

    /// Update an existing account
    fn update_account(&self, account: &UserAccount) -> Result<()>;

    /// Get the currently active (logged in) user ID
    fn get_active_user(&self) -> Result<Option<String>>;

    /// Set the currently active user
    fn set_active_user(&self, user_id: &str) -> Result<()>;

    /// Clear the active user on logout
    fn clear_active_user(&self) -> Result<()>;

    /// Store or replace the profile owned by a user
    fn store_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Retrieve the profile owned by a user
    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}

/// Trait defining the interface for pregnancy record storage operations
pub trait PregnancyStorage: Send + Sync {
    /// Store or replace the pregnancy record for a user
    fn store_pregnancy(&self, record: &PregnancyRecord) -> Result<()>;

    /// Retrieve the pregnancy record for a user
    fn get_pregnancy(&self, user_id: &str) -> Result<Option<PregnancyRecord>>;

    /// Delete the pregnancy record for a user.
    /// Returns true if a record was found and deleted.
    fn delete_pregnancy(&self, user_id: &str) -> Result<bool>;
}

/// Trait defining the interface for reminder storage operations
pub trait ReminderStorage: Send + Sync {
    /// Store a new reminder
    fn store_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Retrieve a specific reminder by ID
    fn get_reminder(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>>;

    /// List all reminders for a user ordered by scheduled time
    fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>>;

    /// Update an existing reminder
    fn update_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Delete a reminder.
    /// Returns true if the reminder was found and deleted.
    fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the append-heavy health logs
pub trait HealthLogStorage: Send + Sync {
    fn append_weight(&self, entry: &WeightEntry) -> Result<()>;
    fn list_weights(&self, user_id: &str) -> Result<Vec<WeightEntry>>;
    fn delete_weight(&self, user_id: &str, entry_id: &str) -> Result<bool>;

    fn append_kick_session(&self, session: &KickSession) -> Result<()>;
    fn list_kick_sessions(&self, user_id: &str) -> Result<Vec<KickSession>>;
    fn delete_kick_session(&self, user_id: &str, session_id: &str) -> Result<bool>;

    fn append_contraction(&self, entry: &ContractionEntry) -> Result<()>;
    fn list_contractions(&self, user_id: &str) -> Result<Vec<ContractionEntry>>;
    fn delete_contraction(&self, user_id: &str, entry_id: &str) -> Result<bool>;

    fn append_blood_pressure(&self, reading: &BloodPressureReading) -> Result<()>;
    fn list_blood_pressure(&self, user_id: &str) -> Result<Vec<BloodPressureReading>>;
    fn delete_blood_pressure(&self, user_id: &str, reading_id: &str) -> Result<bool>;
}

/// Trait defining the interface for medical checklist storage
pub trait ChecklistStorage: Send + Sync {
    /// Load the full checklist for a user
    fn load_checklist(&self, user_id: &str) -> Result<Vec<ChecklistItem>>;

    /// Replace the full checklist for a user
    fn save_checklist(&self, user_id: &str, items: &[ChecklistItem]) -> Result<()>;
}

/// Trait defining the interface for wishlist storage
pub trait WishlistStorage: Send + Sync {
    /// Load the full wishlist for a user
    fn load_wishlist(&self, user_id: &str) -> Result<Vec<WishlistItem>>;

    /// Replace the full wishlist for a user
    fn save_wishlist(&self, user_id: &str, items: &[WishlistItem]) -> Result<()>;
}
