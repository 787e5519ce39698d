//! # Reminder Service
//!
//! CRUD for appointment/medication reminders plus the due-check used by the
//! polling scheduler. Completing a reminder is idempotent so the scheduler
//! and the UI can both mark it without racing.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::{debug, info, warn};

use crate::domain::commands::reminders::{
    CreateReminderCommand, ReminderListResult, ReminderResult, UpdateReminderCommand,
};
use crate::domain::ids;
use crate::domain::models::reminder::{Reminder, ReminderKind};
use crate::storage::csv::{CsvConnection, ReminderRepository};
use crate::storage::traits::ReminderStorage;

const MAX_TITLE_LENGTH: usize = 200;

/// Service for managing reminders
#[derive(Clone)]
pub struct ReminderService {
    reminder_repository: ReminderRepository,
}

impl ReminderService {
    /// Create a new ReminderService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let reminder_repository = ReminderRepository::new(csv_conn);
        Self { reminder_repository }
    }

    /// Create a new reminder
    pub fn create_reminder(
        &self,
        user_id: &str,
        command: CreateReminderCommand,
    ) -> Result<ReminderResult> {
        info!("Creating reminder for user {}: {}", user_id, command.title);

        let title = command.title.trim().to_string();
        validate_title(&title)?;

        let now = Utc::now();
        let reminder = Reminder {
            id: ids::generate_id("reminder"),
            user_id: user_id.to_string(),
            title,
            description: command.description.trim().to_string(),
            reminder_date: parse_date(&command.reminder_date)?,
            reminder_time: parse_time(&command.reminder_time)?,
            kind: ReminderKind::from_str_value(&command.kind).map_err(|e| anyhow::anyhow!(e))?,
            is_active: true,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };

        self.reminder_repository.store_reminder(&reminder)?;

        info!(
            "Created reminder {} scheduled at {}",
            reminder.id,
            reminder.scheduled_at()
        );

        Ok(ReminderResult {
            reminder,
            success_message: "Reminder created successfully".to_string(),
        })
    }

    /// Get a reminder by ID
    pub fn get_reminder(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>> {
        self.reminder_repository.get_reminder(user_id, reminder_id)
    }

    /// List all reminders for a user, ordered by scheduled time
    pub fn list_reminders(&self, user_id: &str) -> Result<ReminderListResult> {
        let reminders = self.reminder_repository.list_reminders(user_id)?;
        debug!("Found {} reminders for user {}", reminders.len(), user_id);
        Ok(ReminderListResult { reminders })
    }

    /// Update a reminder; `None` fields are left unchanged. `now` drives the
    /// re-arm rule: a completed reminder rescheduled past `now` fires again.
    pub fn update_reminder(
        &self,
        user_id: &str,
        command: UpdateReminderCommand,
        now: NaiveDateTime,
    ) -> Result<ReminderResult> {
        info!("Updating reminder: {}", command.reminder_id);

        let mut reminder = self
            .reminder_repository
            .get_reminder(user_id, &command.reminder_id)?
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", command.reminder_id))?;

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            validate_title(&title)?;
            reminder.title = title;
        }
        if let Some(description) = command.description {
            reminder.description = description.trim().to_string();
        }
        if let Some(date_str) = command.reminder_date {
            reminder.reminder_date = parse_date(&date_str)?;
        }
        if let Some(time_str) = command.reminder_time {
            reminder.reminder_time = parse_time(&time_str)?;
        }
        if let Some(kind_str) = command.kind {
            reminder.kind =
                ReminderKind::from_str_value(&kind_str).map_err(|e| anyhow::anyhow!(e))?;
        }
        if let Some(is_active) = command.is_active {
            reminder.is_active = is_active;
        }

        // Rescheduling re-arms a fired reminder
        if reminder.is_completed && reminder.scheduled_at() > now {
            reminder.is_completed = false;
        }

        reminder.updated_at = Utc::now();
        self.reminder_repository.update_reminder(&reminder)?;

        info!("Updated reminder: {}", reminder.id);

        Ok(ReminderResult {
            reminder,
            success_message: "Reminder updated successfully".to_string(),
        })
    }

    /// Delete a reminder.
    /// Returns true if the reminder was found and deleted.
    pub fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<bool> {
        info!("Deleting reminder: {}", reminder_id);
        self.reminder_repository.delete_reminder(user_id, reminder_id)
    }

    /// Mark a reminder completed. Idempotent: completing an already completed
    /// reminder is a no-op.
    pub fn mark_completed(&self, user_id: &str, reminder_id: &str) -> Result<Reminder> {
        let mut reminder = self
            .reminder_repository
            .get_reminder(user_id, reminder_id)?
            .ok_or_else(|| anyhow::anyhow!("Reminder not found: {}", reminder_id))?;

        if reminder.is_completed {
            debug!("Reminder already completed: {}", reminder_id);
            return Ok(reminder);
        }

        reminder.is_completed = true;
        reminder.updated_at = Utc::now();
        self.reminder_repository.update_reminder(&reminder)?;

        info!("Marked reminder completed: {}", reminder_id);
        Ok(reminder)
    }

    /// All reminders due at `now`, within `tolerance_secs` of their scheduled
    /// time. Completed and deactivated reminders never qualify.
    pub fn list_due(
        &self,
        user_id: &str,
        now: NaiveDateTime,
        tolerance_secs: i64,
    ) -> Result<Vec<Reminder>> {
        let due: Vec<Reminder> = self
            .reminder_repository
            .list_reminders(user_id)?
            .into_iter()
            .filter(|r| r.is_due(now, tolerance_secs))
            .collect();

        if !due.is_empty() {
            warn!("{} reminder(s) due for user {}", due.len(), user_id);
        }
        Ok(due)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(anyhow::anyhow!("Reminder title cannot be empty"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(anyhow::anyhow!(
            "Reminder title cannot be longer than {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid reminder date: {}", s))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("Invalid reminder time: {}", s))
}
