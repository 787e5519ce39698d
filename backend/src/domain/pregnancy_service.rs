//! # Pregnancy Service
//!
//! The single pregnancy record per user: start, update, delete, and the
//! derived progress snapshot (week, trimester, days left) for a given day.
//!
//! The due date is always derived, never stored by the caller: conception
//! date + 266 days when the conception date is known, otherwise last
//! menstrual period + 280 days.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};

use crate::domain::commands::pregnancy::{
    PregnancyResult, PregnancyStatusResult, StartPregnancyCommand, UpdatePregnancyCommand,
};
use crate::domain::gestation;
use crate::domain::models::pregnancy::{BabyGender, PregnancyRecord};
use crate::storage::csv::{CsvConnection, PregnancyRepository};
use crate::storage::traits::PregnancyStorage;

/// Service for managing the pregnancy record
#[derive(Clone)]
pub struct PregnancyService {
    pregnancy_repository: PregnancyRepository,
}

impl PregnancyService {
    /// Create a new PregnancyService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let pregnancy_repository = PregnancyRepository::new(csv_conn);
        Self { pregnancy_repository }
    }

    /// Start tracking a pregnancy. Fails if one is already being tracked.
    pub fn start_pregnancy(
        &self,
        user_id: &str,
        command: StartPregnancyCommand,
    ) -> Result<PregnancyResult> {
        info!("Starting pregnancy record for user: {}", user_id);

        if self.pregnancy_repository.get_pregnancy(user_id)?.is_some() {
            warn!("Pregnancy already tracked for user: {}", user_id);
            return Err(anyhow::anyhow!(
                "A pregnancy is already being tracked; update or delete it first"
            ));
        }

        let last_period_date = parse_date(&command.last_period_date)
            .context("Invalid last period date in start_pregnancy command")?;
        let conception_date = command
            .conception_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid conception date in start_pregnancy command")?;
        validate_dates(last_period_date, conception_date)?;

        let baby_gender = match command.baby_gender.as_deref() {
            Some(value) => BabyGender::from_str_value(value).map_err(|e| anyhow::anyhow!(e))?,
            None => BabyGender::Unknown,
        };

        let now = Utc::now();
        let record = PregnancyRecord {
            user_id: user_id.to_string(),
            last_period_date,
            conception_date,
            due_date: derive_due_date(last_period_date, conception_date),
            baby_name: command.baby_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            baby_gender,
            created_at: now,
            updated_at: now,
        };

        self.pregnancy_repository.store_pregnancy(&record)?;

        info!(
            "Started pregnancy for user {} with due date {}",
            user_id, record.due_date
        );

        Ok(PregnancyResult {
            record,
            success_message: "Pregnancy tracking started".to_string(),
        })
    }

    /// Update the tracked pregnancy; `None` fields are left unchanged.
    /// The due date is re-derived whenever a date changes.
    pub fn update_pregnancy(
        &self,
        user_id: &str,
        command: UpdatePregnancyCommand,
    ) -> Result<PregnancyResult> {
        info!("Updating pregnancy record for user: {}", user_id);

        let mut record = self
            .pregnancy_repository
            .get_pregnancy(user_id)?
            .ok_or_else(|| anyhow::anyhow!("No pregnancy tracked for user: {}", user_id))?;

        if let Some(lmp_str) = command.last_period_date {
            record.last_period_date = parse_date(&lmp_str)
                .context("Invalid last period date in update_pregnancy command")?;
        }
        if let Some(conception_str) = command.conception_date {
            // An empty string clears the conception date
            record.conception_date = if conception_str.trim().is_empty() {
                None
            } else {
                Some(
                    parse_date(&conception_str)
                        .context("Invalid conception date in update_pregnancy command")?,
                )
            };
        }
        validate_dates(record.last_period_date, record.conception_date)?;
        record.due_date = derive_due_date(record.last_period_date, record.conception_date);

        if let Some(baby_name) = command.baby_name {
            let trimmed = baby_name.trim().to_string();
            record.baby_name = if trimmed.is_empty() { None } else { Some(trimmed) };
        }
        if let Some(gender_str) = command.baby_gender {
            record.baby_gender =
                BabyGender::from_str_value(&gender_str).map_err(|e| anyhow::anyhow!(e))?;
        }

        record.updated_at = Utc::now();
        self.pregnancy_repository.store_pregnancy(&record)?;

        info!(
            "Updated pregnancy for user {} with due date {}",
            user_id, record.due_date
        );

        Ok(PregnancyResult {
            record,
            success_message: "Pregnancy updated successfully".to_string(),
        })
    }

    /// Get the tracked pregnancy record, if any
    pub fn get_pregnancy(&self, user_id: &str) -> Result<Option<PregnancyRecord>> {
        self.pregnancy_repository.get_pregnancy(user_id)
    }

    /// Derived progress snapshot as of `today`. Returns `None` when no
    /// pregnancy is being tracked.
    pub fn status(&self, user_id: &str, today: NaiveDate) -> Result<Option<PregnancyStatusResult>> {
        let record = match self.pregnancy_repository.get_pregnancy(user_id)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let current_week = gestation::current_week(record.last_period_date, today);
        let trimester = gestation::trimester(current_week);
        let days_left = gestation::days_left(record.due_date, today);

        Ok(Some(PregnancyStatusResult {
            record,
            current_week,
            trimester,
            days_left,
        }))
    }

    /// Stop tracking the pregnancy.
    /// Returns true if a record was found and deleted.
    pub fn delete_pregnancy(&self, user_id: &str) -> Result<bool> {
        info!("Deleting pregnancy record for user: {}", user_id);
        self.pregnancy_repository.delete_pregnancy(user_id)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {}", s))
}

fn derive_due_date(last_period_date: NaiveDate, conception_date: Option<NaiveDate>) -> NaiveDate {
    match conception_date {
        Some(conception) => gestation::due_date_from_conception(conception),
        None => gestation::due_date_from_lmp(last_period_date),
    }
}

fn validate_dates(last_period_date: NaiveDate, conception_date: Option<NaiveDate>) -> Result<()> {
    if let Some(conception) = conception_date {
        if conception < last_period_date {
            return Err(anyhow::anyhow!(
                "Conception date cannot be before the last period date"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gestation::Trimester;
    use crate::storage::csv::test_utils::{seed_user, test_connection};

    fn setup_test() -> (PregnancyService, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        (PregnancyService::new(connection), temp_dir)
    }

    fn start_command() -> StartPregnancyCommand {
        StartPregnancyCommand {
            last_period_date: "2024-01-01".to_string(),
            conception_date: None,
            baby_name: None,
            baby_gender: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_start_pregnancy_derives_due_date_from_lmp() {
        let (service, _temp_dir) = setup_test();
        let result = service.start_pregnancy("user::1::0", start_command()).unwrap();
        assert_eq!(result.record.due_date, date("2024-10-07"));
        assert_eq!(result.record.baby_gender, BabyGender::Unknown);
    }

    #[test]
    fn test_start_pregnancy_prefers_conception_date() {
        let (service, _temp_dir) = setup_test();
        let command = StartPregnancyCommand {
            conception_date: Some("2024-01-15".to_string()),
            ..start_command()
        };
        let result = service.start_pregnancy("user::1::0", command).unwrap();
        assert_eq!(result.record.due_date, date("2024-01-15") + chrono::Duration::days(266));
    }

    #[test]
    fn test_start_pregnancy_rejects_second_record() {
        let (service, _temp_dir) = setup_test();
        service.start_pregnancy("user::1::0", start_command()).unwrap();
        assert!(service.start_pregnancy("user::1::0", start_command()).is_err());
    }

    #[test]
    fn test_start_pregnancy_rejects_conception_before_lmp() {
        let (service, _temp_dir) = setup_test();
        let command = StartPregnancyCommand {
            conception_date: Some("2023-12-01".to_string()),
            ..start_command()
        };
        assert!(service.start_pregnancy("user::1::0", command).is_err());
    }

    #[test]
    fn test_update_rederives_due_date() {
        let (service, _temp_dir) = setup_test();
        service.start_pregnancy("user::1::0", start_command()).unwrap();

        let result = service
            .update_pregnancy(
                "user::1::0",
                UpdatePregnancyCommand {
                    last_period_date: Some("2024-02-01".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(result.record.due_date, date("2024-02-01") + chrono::Duration::days(280));
    }

    #[test]
    fn test_update_clears_conception_date_with_empty_string() {
        let (service, _temp_dir) = setup_test();
        let command = StartPregnancyCommand {
            conception_date: Some("2024-01-15".to_string()),
            ..start_command()
        };
        service.start_pregnancy("user::1::0", command).unwrap();

        let result = service
            .update_pregnancy(
                "user::1::0",
                UpdatePregnancyCommand {
                    conception_date: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(result.record.conception_date, None);
        // Back to the LMP rule
        assert_eq!(result.record.due_date, date("2024-10-07"));
    }

    #[test]
    fn test_status_snapshot() {
        let (service, _temp_dir) = setup_test();
        service.start_pregnancy("user::1::0", start_command()).unwrap();

        let status = service
            .status("user::1::0", date("2024-03-25"))
            .unwrap()
            .unwrap();
        assert_eq!(status.current_week, 12);
        assert_eq!(status.trimester, Trimester::First);
        assert_eq!(status.days_left, 196);
    }

    #[test]
    fn test_status_none_without_record() {
        let (service, _temp_dir) = setup_test();
        assert!(service.status("user::1::0", date("2024-03-25")).unwrap().is_none());
    }

    #[test]
    fn test_delete_pregnancy() {
        let (service, _temp_dir) = setup_test();
        service.start_pregnancy("user::1::0", start_command()).unwrap();
        assert!(service.delete_pregnancy("user::1::0").unwrap());
        assert!(service.get_pregnancy("user::1::0").unwrap().is_none());
        // A new record can be started afterwards
        assert!(service.start_pregnancy("user::1::0", start_command()).is_ok());
    }
}
