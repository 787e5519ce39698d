//! # User Repository
//!
//! Accounts and profiles as per-user YAML documents (`account.yaml`,
//! `profile.yaml`), discovered by scanning the base directory. The active
//! (logged in) user is tracked in `global_config.yaml`, keyed by directory
//! name.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::user::{UserAccount, UserProfile};
use crate::storage::traits::UserStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct YamlAccount {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub email: Option<String>,
    pub created_at: String, // RFC 3339
    pub updated_at: String, // RFC 3339
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlProfile {
    user_id: String,
    name: String,
    birth_date: Option<String>, // YYYY-MM-DD
    height_cm: Option<f64>,
    weight_before_pregnancy_kg: Option<f64>,
    previous_pregnancies: u32,
    cycle_length_days: u32,
    updated_at: String, // RFC 3339
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct GlobalConfig {
    active_user_directory: Option<String>,
    data_format_version: String,
}

impl From<&UserAccount> for YamlAccount {
    fn from(account: &UserAccount) -> Self {
        YamlAccount {
            id: account.id.clone(),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            salt: account.salt.clone(),
            email: account.email.clone(),
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<YamlAccount> for UserAccount {
    type Error = anyhow::Error;

    fn try_from(yaml: YamlAccount) -> Result<Self> {
        Ok(UserAccount {
            id: yaml.id,
            username: yaml.username,
            password_hash: yaml.password_hash,
            salt: yaml.salt,
            email: yaml.email,
            created_at: parse_rfc3339(&yaml.created_at)?,
            updated_at: parse_rfc3339(&yaml.updated_at)?,
        })
    }
}

impl From<&UserProfile> for YamlProfile {
    fn from(profile: &UserProfile) -> Self {
        YamlProfile {
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            birth_date: profile.birth_date.map(|d| d.to_string()),
            height_cm: profile.height_cm,
            weight_before_pregnancy_kg: profile.weight_before_pregnancy_kg,
            previous_pregnancies: profile.previous_pregnancies,
            cycle_length_days: profile.cycle_length_days,
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<YamlProfile> for UserProfile {
    type Error = anyhow::Error;

    fn try_from(yaml: YamlProfile) -> Result<Self> {
        let birth_date = match yaml.birth_date {
            Some(ref s) => Some(
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid birth_date in profile: {}", s))?,
            ),
            None => None,
        };
        Ok(UserProfile {
            user_id: yaml.user_id,
            name: yaml.name,
            birth_date,
            height_cm: yaml.height_cm,
            weight_before_pregnancy_kg: yaml.weight_before_pregnancy_kg,
            previous_pregnancies: yaml.previous_pregnancies,
            cycle_length_days: yaml.cycle_length_days,
            updated_at: parse_rfc3339(&yaml.updated_at)?,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", s))
}

/// YAML-backed user repository using filesystem discovery
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn account_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("account.yaml")
    }

    fn profile_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("profile.yaml")
    }

    /// Load an account from a specific directory
    fn load_account_from_directory(&self, directory_name: &str) -> Result<Option<UserAccount>> {
        let path = self.account_path(directory_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let yaml: YamlAccount = serde_yaml::from_str(&content)?;
        Ok(Some(UserAccount::try_from(yaml)?))
    }

    /// Discover all accounts by scanning directories
    fn discover_accounts(&self) -> Result<Vec<UserAccount>> {
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            debug!("Base directory doesn't exist, returning empty account list");
            return Ok(Vec::new());
        }

        let mut accounts = Vec::new();
        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping directory with invalid name: {:?}", path);
                    continue;
                }
            };
            match self.load_account_from_directory(dir_name) {
                Ok(Some(account)) => accounts.push(account),
                Ok(None) => debug!("Directory {} doesn't contain an account", dir_name),
                Err(e) => warn!("Error loading account from directory {}: {}", dir_name, e),
            }
        }

        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    fn load_global_config(&self) -> Result<GlobalConfig> {
        let path = self.connection.global_config_path();
        if !path.exists() {
            return Ok(GlobalConfig {
                active_user_directory: None,
                data_format_version: "1.0".to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        let config: GlobalConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    fn save_global_config(&self, config: &GlobalConfig) -> Result<()> {
        let path = self.connection.global_config_path();
        let content = serde_yaml::to_string(config)?;
        atomic_write(&path, content.as_bytes())
    }
}

impl UserStorage for UserRepository {
    fn store_account(&self, account: &UserAccount) -> Result<()> {
        let dir_name = CsvConnection::safe_directory_name(&account.username);
        if dir_name.is_empty() {
            return Err(anyhow::anyhow!(
                "Username '{}' does not map to a valid directory name",
                account.username
            ));
        }
        if self.account_path(&dir_name).exists() {
            return Err(anyhow::anyhow!(
                "An account already exists for directory '{}'",
                dir_name
            ));
        }

        self.connection.ensure_user_directory(&dir_name)?;
        let yaml = serde_yaml::to_string(&YamlAccount::from(account))?;
        atomic_write(&self.account_path(&dir_name), yaml.as_bytes())?;
        info!("Stored account {} in directory '{}'", account.id, dir_name);
        Ok(())
    }

    fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };
        self.load_account_from_directory(&directory)
    }

    fn find_account_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let dir_name = CsvConnection::safe_directory_name(username);
        match self.load_account_from_directory(&dir_name)? {
            Some(account) if account.username == username => Ok(Some(account)),
            // Directory name collisions (e.g. "Anna" vs "anna") resolve by
            // exact username match over the full scan
            _ => Ok(self
                .discover_accounts()?
                .into_iter()
                .find(|a| a.username == username)),
        }
    }

    fn list_accounts(&self) -> Result<Vec<UserAccount>> {
        self.discover_accounts()
    }

    fn update_account(&self, account: &UserAccount) -> Result<()> {
        let directory = find_user_directory(&self.connection, &account.id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", account.id))?;
        let yaml = serde_yaml::to_string(&YamlAccount::from(account))?;
        atomic_write(&self.account_path(&directory), yaml.as_bytes())?;
        debug!("Updated account {}", account.id);
        Ok(())
    }

    fn get_active_user(&self) -> Result<Option<String>> {
        let config = self.load_global_config()?;
        let directory = match config.active_user_directory {
            Some(dir) => dir,
            None => return Ok(None),
        };
        match self.load_account_from_directory(&directory)? {
            Some(account) => Ok(Some(account.id)),
            None => {
                warn!(
                    "Active user directory '{}' doesn't contain an account",
                    directory
                );
                Ok(None)
            }
        }
    }

    fn set_active_user(&self, user_id: &str) -> Result<()> {
        let directory = find_user_directory(&self.connection, user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))?;
        let mut config = self.load_global_config()?;
        config.active_user_directory = Some(directory.clone());
        self.save_global_config(&config)?;
        info!("Set active user directory to '{}'", directory);
        Ok(())
    }

    fn clear_active_user(&self) -> Result<()> {
        let mut config = self.load_global_config()?;
        config.active_user_directory = None;
        self.save_global_config(&config)?;
        info!("Cleared active user");
        Ok(())
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<()> {
        let directory = find_user_directory(&self.connection, &profile.user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", profile.user_id))?;
        let yaml = serde_yaml::to_string(&YamlProfile::from(profile))?;
        atomic_write(&self.profile_path(&directory), yaml.as_bytes())?;
        debug!("Stored profile for user {}", profile.user_id);
        Ok(())
    }

    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };
        let path = self.profile_path(&directory);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let yaml: YamlProfile = serde_yaml::from_str(&content)?;
        Ok(Some(UserProfile::try_from(yaml)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{test_account, test_connection};

    fn setup() -> (UserRepository, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        (UserRepository::new(connection), temp_dir)
    }

    #[test]
    fn test_store_and_get_account() {
        let (repo, _temp_dir) = setup();
        let account = test_account("user::1::0", "anna");
        repo.store_account(&account).unwrap();

        let loaded = repo.get_account("user::1::0").unwrap().unwrap();
        assert_eq!(loaded.username, "anna");
        assert_eq!(loaded.password_hash, account.password_hash);
        assert_eq!(loaded.email, account.email);
    }

    #[test]
    fn test_store_duplicate_directory_fails() {
        let (repo, _temp_dir) = setup();
        repo.store_account(&test_account("user::1::0", "anna")).unwrap();
        let result = repo.store_account(&test_account("user::2::0", "anna"));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_account_by_username() {
        let (repo, _temp_dir) = setup();
        repo.store_account(&test_account("user::1::0", "anna")).unwrap();

        assert!(repo.find_account_by_username("anna").unwrap().is_some());
        assert!(repo.find_account_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_list_accounts_sorted_by_username() {
        let (repo, _temp_dir) = setup();
        repo.store_account(&test_account("user::2::0", "zoe")).unwrap();
        repo.store_account(&test_account("user::1::0", "anna")).unwrap();

        let accounts = repo.list_accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "anna");
        assert_eq!(accounts[1].username, "zoe");
    }

    #[test]
    fn test_update_account() {
        let (repo, _temp_dir) = setup();
        let mut account = test_account("user::1::0", "anna");
        repo.store_account(&account).unwrap();

        account.email = Some("anna@example.com".to_string());
        repo.update_account(&account).unwrap();

        let loaded = repo.get_account("user::1::0").unwrap().unwrap();
        assert_eq!(loaded.email, Some("anna@example.com".to_string()));
    }

    #[test]
    fn test_active_user_lifecycle() {
        let (repo, _temp_dir) = setup();
        assert!(repo.get_active_user().unwrap().is_none());

        repo.store_account(&test_account("user::1::0", "anna")).unwrap();
        repo.set_active_user("user::1::0").unwrap();
        assert_eq!(repo.get_active_user().unwrap(), Some("user::1::0".to_string()));

        repo.clear_active_user().unwrap();
        assert!(repo.get_active_user().unwrap().is_none());
    }

    #[test]
    fn test_set_active_user_unknown_account_fails() {
        let (repo, _temp_dir) = setup();
        assert!(repo.set_active_user("user::404::0").is_err());
    }

    #[test]
    fn test_profile_round_trip() {
        let (repo, _temp_dir) = setup();
        repo.store_account(&test_account("user::1::0", "anna")).unwrap();

        assert!(repo.get_profile("user::1::0").unwrap().is_none());

        let mut profile = UserProfile::empty("user::1::0", "Anna");
        profile.birth_date = NaiveDate::from_ymd_opt(1992, 4, 12);
        profile.height_cm = Some(168.0);
        profile.previous_pregnancies = 1;
        repo.store_profile(&profile).unwrap();

        let loaded = repo.get_profile("user::1::0").unwrap().unwrap();
        assert_eq!(loaded.name, "Anna");
        assert_eq!(loaded.birth_date, NaiveDate::from_ymd_opt(1992, 4, 12));
        assert_eq!(loaded.height_cm, Some(168.0));
        assert_eq!(loaded.cycle_length_days, 28);
    }
}
