//! # Pregnancy Repository
//!
//! The single pregnancy record per user, stored as `pregnancy.yaml` in the
//! user's directory.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::pregnancy::{BabyGender, PregnancyRecord};
use crate::storage::traits::PregnancyStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlPregnancy {
    user_id: String,
    last_period_date: String, // YYYY-MM-DD
    conception_date: Option<String>, // YYYY-MM-DD
    due_date: String, // YYYY-MM-DD
    baby_name: Option<String>,
    baby_gender: String,
    created_at: String, // RFC 3339
    updated_at: String, // RFC 3339
}

impl From<&PregnancyRecord> for YamlPregnancy {
    fn from(record: &PregnancyRecord) -> Self {
        YamlPregnancy {
            user_id: record.user_id.clone(),
            last_period_date: record.last_period_date.to_string(),
            conception_date: record.conception_date.map(|d| d.to_string()),
            due_date: record.due_date.to_string(),
            baby_name: record.baby_name.clone(),
            baby_gender: record.baby_gender.as_str().to_string(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<YamlPregnancy> for PregnancyRecord {
    type Error = anyhow::Error;

    fn try_from(yaml: YamlPregnancy) -> Result<Self> {
        let parse_date = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date in pregnancy record: {}", s))
        };
        let conception_date = match yaml.conception_date {
            Some(ref s) => Some(parse_date(s)?),
            None => None,
        };
        Ok(PregnancyRecord {
            user_id: yaml.user_id,
            last_period_date: parse_date(&yaml.last_period_date)?,
            conception_date,
            due_date: parse_date(&yaml.due_date)?,
            baby_name: yaml.baby_name,
            baby_gender: BabyGender::from_str_value(&yaml.baby_gender)
                .map_err(|e| anyhow::anyhow!(e))?,
            created_at: parse_rfc3339(&yaml.created_at)?,
            updated_at: parse_rfc3339(&yaml.updated_at)?,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", s))
}

/// YAML-backed pregnancy repository
#[derive(Clone)]
pub struct PregnancyRepository {
    connection: CsvConnection,
}

impl PregnancyRepository {
    /// Create a new pregnancy repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn pregnancy_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("pregnancy.yaml")
    }
}

impl PregnancyStorage for PregnancyRepository {
    fn store_pregnancy(&self, record: &PregnancyRecord) -> Result<()> {
        let directory = find_user_directory(&self.connection, &record.user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", record.user_id))?;
        let yaml = serde_yaml::to_string(&YamlPregnancy::from(record))?;
        atomic_write(&self.pregnancy_path(&directory), yaml.as_bytes())?;
        info!("Stored pregnancy record for user {}", record.user_id);
        Ok(())
    }

    fn get_pregnancy(&self, user_id: &str) -> Result<Option<PregnancyRecord>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };
        let path = self.pregnancy_path(&directory);
        if !path.exists() {
            debug!("No pregnancy record for user {}", user_id);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let yaml: YamlPregnancy = serde_yaml::from_str(&content)?;
        Ok(Some(PregnancyRecord::try_from(yaml)?))
    }

    fn delete_pregnancy(&self, user_id: &str) -> Result<bool> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(false),
        };
        let path = self.pregnancy_path(&directory);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted pregnancy record for user {}", user_id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{seed_user, test_connection};

    fn sample_record(user_id: &str) -> PregnancyRecord {
        let now = Utc::now();
        PregnancyRecord {
            user_id: user_id.to_string(),
            last_period_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            conception_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            due_date: NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(),
            baby_name: Some("Mia".to_string()),
            baby_gender: BabyGender::Girl,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_and_get_pregnancy() {
        let (connection, _temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        let repo = PregnancyRepository::new(connection);

        let record = sample_record("user::1::0");
        repo.store_pregnancy(&record).unwrap();

        let loaded = repo.get_pregnancy("user::1::0").unwrap().unwrap();
        assert_eq!(loaded.last_period_date, record.last_period_date);
        assert_eq!(loaded.conception_date, record.conception_date);
        assert_eq!(loaded.due_date, record.due_date);
        assert_eq!(loaded.baby_gender, BabyGender::Girl);
        assert_eq!(loaded.baby_name, Some("Mia".to_string()));
    }

    #[test]
    fn test_get_pregnancy_for_unknown_user() {
        let (connection, _temp_dir) = test_connection();
        let repo = PregnancyRepository::new(connection);
        assert!(repo.get_pregnancy("user::404::0").unwrap().is_none());
    }

    #[test]
    fn test_store_pregnancy_requires_account() {
        let (connection, _temp_dir) = test_connection();
        let repo = PregnancyRepository::new(connection);
        assert!(repo.store_pregnancy(&sample_record("user::404::0")).is_err());
    }

    #[test]
    fn test_delete_pregnancy() {
        let (connection, _temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        let repo = PregnancyRepository::new(connection);

        assert!(!repo.delete_pregnancy("user::1::0").unwrap());
        repo.store_pregnancy(&sample_record("user::1::0")).unwrap();
        assert!(repo.delete_pregnancy("user::1::0").unwrap());
        assert!(repo.get_pregnancy("user::1::0").unwrap().is_none());
    }
}
