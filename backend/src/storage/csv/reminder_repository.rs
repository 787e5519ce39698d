//! # Reminder Repository
//!
//! Reminders stored as `reminders.csv` in the user's directory.
//!
//! ## CSV Format
//!
//! ```csv
//! id,user_id,title,description,reminder_date,reminder_time,kind,is_active,is_completed,created_at,updated_at
//! reminder::1702516122000::0,user::1::0,"Checkup","Bring documents",2024-03-25,09:00,appointment,true,false,2024-03-01T10:00:00+00:00,2024-03-01T10:00:00+00:00
//! ```
//!
//! The whole file is rewritten atomically on every change; reminder lists
//! are small.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::{Reader, Writer};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::reminder::{Reminder, ReminderKind};
use crate::storage::traits::ReminderStorage;

/// CSV record structure for reminders
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    id: String,
    user_id: String,
    title: String,
    description: String,
    reminder_date: String, // YYYY-MM-DD
    reminder_time: String, // HH:MM
    kind: String,
    is_active: bool,
    is_completed: bool,
    created_at: String, // RFC 3339
    updated_at: String, // RFC 3339
}

impl From<&Reminder> for ReminderRecord {
    fn from(reminder: &Reminder) -> Self {
        ReminderRecord {
            id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            reminder_date: reminder.reminder_date.to_string(),
            reminder_time: reminder.reminder_time.format("%H:%M").to_string(),
            kind: reminder.kind.as_str().to_string(),
            is_active: reminder.is_active,
            is_completed: reminder.is_completed,
            created_at: reminder.created_at.to_rfc3339(),
            updated_at: reminder.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ReminderRecord> for Reminder {
    type Error = anyhow::Error;

    fn try_from(record: ReminderRecord) -> Result<Self> {
        Ok(Reminder {
            reminder_date: NaiveDate::parse_from_str(&record.reminder_date, "%Y-%m-%d")
                .with_context(|| format!("Invalid reminder date: {}", record.reminder_date))?,
            reminder_time: NaiveTime::parse_from_str(&record.reminder_time, "%H:%M")
                .with_context(|| format!("Invalid reminder time: {}", record.reminder_time))?,
            kind: ReminderKind::from_str_value(&record.kind).map_err(|e| anyhow::anyhow!(e))?,
            created_at: parse_rfc3339(&record.created_at)?,
            updated_at: parse_rfc3339(&record.updated_at)?,
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            is_active: record.is_active,
            is_completed: record.is_completed,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", s))
}

/// CSV-based reminder repository using per-user files
#[derive(Clone)]
pub struct ReminderRepository {
    connection: CsvConnection,
}

impl ReminderRepository {
    /// Create a new reminder repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn reminders_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("reminders.csv")
    }

    fn read_reminders(&self, directory_name: &str) -> Result<Vec<Reminder>> {
        let path = self.reminders_path(directory_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut reminders = Vec::new();
        for result in csv_reader.deserialize::<ReminderRecord>() {
            let record = result.with_context(|| format!("Malformed row in {:?}", path))?;
            reminders.push(Reminder::try_from(record)?);
        }
        Ok(reminders)
    }

    fn write_reminders(&self, directory_name: &str, reminders: &[Reminder]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        for reminder in reminders {
            csv_writer.serialize(ReminderRecord::from(reminder))?;
        }
        let buffer = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush reminders CSV: {}", e))?;
        atomic_write(&self.reminders_path(directory_name), &buffer)
    }

    fn resolve_directory(&self, user_id: &str) -> Result<String> {
        find_user_directory(&self.connection, user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))
    }
}

impl ReminderStorage for ReminderRepository {
    fn store_reminder(&self, reminder: &Reminder) -> Result<()> {
        let directory = self.resolve_directory(&reminder.user_id)?;
        let mut reminders = self.read_reminders(&directory)?;
        if reminders.iter().any(|r| r.id == reminder.id) {
            return Err(anyhow::anyhow!("Reminder already exists: {}", reminder.id));
        }
        reminders.push(reminder.clone());
        self.write_reminders(&directory, &reminders)?;
        info!("Stored reminder {} for user {}", reminder.id, reminder.user_id);
        Ok(())
    }

    fn get_reminder(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(None),
        };
        let reminders = self.read_reminders(&directory)?;
        Ok(reminders.into_iter().find(|r| r.id == reminder_id))
    }

    fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };
        let mut reminders = self.read_reminders(&directory)?;
        reminders.sort_by_key(|r| r.scheduled_at());
        debug!("Listed {} reminders for user {}", reminders.len(), user_id);
        Ok(reminders)
    }

    fn update_reminder(&self, reminder: &Reminder) -> Result<()> {
        let directory = self.resolve_directory(&reminder.user_id)?;
        let mut reminders = self.read_reminders(&directory)?;
        let slot = reminders
            .iter_mut()
            .find(|r| r.id == reminder.id)
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder.id))?;
        *slot = reminder.clone();
        self.write_reminders(&directory, &reminders)?;
        debug!("Updated reminder {}", reminder.id);
        Ok(())
    }

    fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(false),
        };
        let mut reminders = self.read_reminders(&directory)?;
        let before = reminders.len();
        reminders.retain(|r| r.id != reminder_id);
        if reminders.len() == before {
            return Ok(false);
        }
        self.write_reminders(&directory, &reminders)?;
        info!("Deleted reminder {} for user {}", reminder_id, user_id);
        Ok(true)
    }
}
