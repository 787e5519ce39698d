//! # File-backed Storage
//!
//! CSV/YAML storage implementation. Every user owns a directory under the
//! base data directory:
//!
//! ```text
//! data/
//! ├── global_config.yaml          (active user directory)
//! └── {username}/
//!     ├── account.yaml
//!     ├── profile.yaml
//!     ├── pregnancy.yaml
//!     ├── reminders.csv
//!     ├── weight.csv
//!     ├── kicks.csv
//!     ├── contractions.csv
//!     ├── blood_pressure.csv
//!     ├── checklist.yaml
//!     └── wishlist.yaml
//! ```
//!
//! YAML for single documents, CSV for the append-heavy logs. All writes are
//! atomic (temp file + rename).

pub mod checklist_repository;
pub mod connection;
pub mod health_log_repository;
pub mod pregnancy_repository;
pub mod reminder_repository;
pub mod user_repository;
pub mod wishlist_repository;

#[cfg(test)]
pub mod test_utils;

pub use checklist_repository::ChecklistRepository;
pub use connection::CsvConnection;
pub use health_log_repository::HealthLogRepository;
pub use pregnancy_repository::PregnancyRepository;
pub use reminder_repository::ReminderRepository;
pub use user_repository::UserRepository;
pub use wishlist_repository::WishlistRepository;

use anyhow::Result;
use log::debug;

/// Find the directory that holds the account with the given user ID.
/// Shared by every repository that is keyed by user ID.
pub(crate) fn find_user_directory(
    connection: &CsvConnection,
    user_id: &str,
) -> Result<Option<String>> {
    let base_dir = connection.base_directory();

    if !base_dir.exists() {
        return Ok(None);
    }

    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let dir_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        let account_path = path.join("account.yaml");
        if !account_path.exists() {
            continue;
        }

        if let Ok(content) = std::fs::read_to_string(&account_path) {
            if let Ok(account) = serde_yaml::from_str::<user_repository::YamlAccount>(&content) {
                if account.id == user_id {
                    return Ok(Some(dir_name.to_string()));
                }
            }
        }
    }

    debug!("No user directory found for user ID '{}'", user_id);
    Ok(None)
}
