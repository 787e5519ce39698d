use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of reminder, a tagged variant instead of a loosely-typed dictionary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReminderKind {
    Appointment,
    Medication,
    Checkup,
    Custom,
}

impl ReminderKind {
    /// Convert to string for CSV storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Appointment => "appointment",
            ReminderKind::Medication => "medication",
            ReminderKind::Checkup => "checkup",
            ReminderKind::Custom => "custom",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "appointment" => Ok(ReminderKind::Appointment),
            "medication" => Ok(ReminderKind::Medication),
            "checkup" => Ok(ReminderKind::Checkup),
            "custom" => Ok(ReminderKind::Custom),
            _ => Err(format!("Invalid reminder kind: {}", s)),
        }
    }
}

/// Lifecycle of a reminder: Scheduled -> Fired -> Completed (terminal).
/// Fired exists only for the instant between dispatch and the completion
/// write; persisted reminders are either Scheduled or Completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderState {
    Scheduled,
    Fired,
    Completed,
}

/// Domain model for a user-scheduled one-time reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub reminder_date: NaiveDate,
    pub reminder_time: NaiveTime,
    pub kind: ReminderKind,
    /// Inactive reminders are kept but never polled
    pub is_active: bool,
    /// Set once the reminder has fired; a completed reminder never fires again
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// The wall-clock instant this reminder is scheduled for
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.reminder_date.and_time(self.reminder_time)
    }

    /// Whether this reminder should fire at `now`, given the scheduler's
    /// tolerance window in seconds.
    pub fn is_due(&self, now: NaiveDateTime, tolerance_secs: i64) -> bool {
        if !self.is_active || self.is_completed {
            return false;
        }
        let delta = now.signed_duration_since(self.scheduled_at());
        delta.num_seconds().abs() < tolerance_secs
    }

    /// Current lifecycle state as persisted
    pub fn state(&self) -> ReminderState {
        if self.is_completed {
            ReminderState::Completed
        } else {
            ReminderState::Scheduled
        }
    }
}
