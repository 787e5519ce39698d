//! User profile management: the "about me" screen of the app.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;

use crate::domain::commands::profile::{UpdateProfileCommand, UpdateProfileResult};
use crate::domain::models::user::UserProfile;
use crate::storage::csv::{CsvConnection, UserRepository};
use crate::storage::traits::UserStorage;

/// Service for managing the user profile
#[derive(Clone)]
pub struct ProfileService {
    user_repository: UserRepository,
}

impl ProfileService {
    /// Create a new ProfileService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let user_repository = UserRepository::new(csv_conn);
        Self { user_repository }
    }

    /// Get the profile for a user, falling back to an empty one
    pub fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        match self.user_repository.get_profile(user_id)? {
            Some(profile) => Ok(profile),
            None => {
                let account = self
                    .user_repository
                    .get_account(user_id)?
                    .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))?;
                Ok(UserProfile::empty(user_id, &account.username))
            }
        }
    }

    /// Update profile fields; `None` fields are left unchanged
    pub fn update_profile(
        &self,
        user_id: &str,
        command: UpdateProfileCommand,
    ) -> Result<UpdateProfileResult> {
        info!("Updating profile for user: {}", user_id);

        let mut profile = self.get_profile(user_id)?;

        if let Some(name) = command.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(anyhow::anyhow!("Name cannot be empty"));
            }
            profile.name = name;
        }
        if let Some(birth_date_str) = command.birth_date {
            profile.birth_date = Some(
                NaiveDate::parse_from_str(&birth_date_str, "%Y-%m-%d")
                    .context("Invalid birth date format in update_profile command")?,
            );
        }
        if let Some(height_cm) = command.height_cm {
            if !(100.0..=250.0).contains(&height_cm) {
                return Err(anyhow::anyhow!("Height must be between 100 and 250 cm"));
            }
            profile.height_cm = Some(height_cm);
        }
        if let Some(weight_kg) = command.weight_before_pregnancy_kg {
            if !(30.0..=300.0).contains(&weight_kg) {
                return Err(anyhow::anyhow!("Weight must be between 30 and 300 kg"));
            }
            profile.weight_before_pregnancy_kg = Some(weight_kg);
        }
        if let Some(previous_pregnancies) = command.previous_pregnancies {
            profile.previous_pregnancies = previous_pregnancies;
        }
        if let Some(cycle_length_days) = command.cycle_length_days {
            if !(20..=45).contains(&cycle_length_days) {
                return Err(anyhow::anyhow!("Cycle length must be between 20 and 45 days"));
            }
            profile.cycle_length_days = cycle_length_days;
        }

        profile.updated_at = Utc::now();
        self.user_repository.store_profile(&profile)?;

        info!("Updated profile for user: {}", user_id);

        Ok(UpdateProfileResult {
            profile,
            success_message: "Profile updated successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{seed_user, test_connection};

    fn setup_test() -> (ProfileService, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        (ProfileService::new(connection), temp_dir)
    }

    #[test]
    fn test_get_profile_falls_back_to_empty() {
        let (service, _temp_dir) = setup_test();
        let profile = service.get_profile("user::1::0").unwrap();
        assert_eq!(profile.name, "anna");
        assert_eq!(profile.cycle_length_days, 28);
        assert!(profile.birth_date.is_none());
    }

    #[test]
    fn test_update_profile_partial_fields() {
        let (service, _temp_dir) = setup_test();

        let result = service
            .update_profile(
                "user::1::0",
                UpdateProfileCommand {
                    name: Some("Anna Lena".to_string()),
                    height_cm: Some(168.0),
                    cycle_length_days: Some(30),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(result.profile.name, "Anna Lena");

        let profile = service.get_profile("user::1::0").unwrap();
        assert_eq!(profile.height_cm, Some(168.0));
        assert_eq!(profile.cycle_length_days, 30);
        // Untouched field keeps its value
        assert_eq!(profile.previous_pregnancies, 0);
    }

    #[test]
    fn test_update_profile_rejects_out_of_range_values() {
        let (service, _temp_dir) = setup_test();

        let too_tall = UpdateProfileCommand {
            height_cm: Some(300.0),
            ..Default::default()
        };
        assert!(service.update_profile("user::1::0", too_tall).is_err());

        let bad_cycle = UpdateProfileCommand {
            cycle_length_days: Some(10),
            ..Default::default()
        };
        assert!(service.update_profile("user::1::0", bad_cycle).is_err());
    }

    #[test]
    fn test_update_profile_unknown_user() {
        let (service, _temp_dir) = setup_test();
        let result = service.update_profile("user::404::0", UpdateProfileCommand::default());
        assert!(result.is_err());
    }
}
