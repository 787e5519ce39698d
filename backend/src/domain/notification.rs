//! # Notification Dispatch
//!
//! Fans a due reminder out to the configured channels: an in-app
//! notification sink plus an optional reminder email. Channel failures are
//! logged and swallowed so one broken channel never blocks the other, and
//! never stops the scheduler from marking the reminder completed.

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

use crate::domain::models::reminder::Reminder;

/// Channel for surfacing a due reminder to the user.
/// The desktop frontend installs its own sink; tests use mocks.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, reminder: &Reminder) -> Result<()>;
}

/// Outbound email channel for reminder mails.
/// `EmailServiceWrapper` is the SMTP implementation; tests use mocks.
pub trait EmailSender: Send + Sync {
    fn send_reminder(&self, reminder: &Reminder, to_email: &str) -> Result<()>;
}

/// Default sink: write the notification to the log.
/// Useful headless and as a fallback before the UI registers its sink.
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, reminder: &Reminder) -> Result<()> {
        info!(
            "🔔 Reminder due: {} ({} at {})",
            reminder.title,
            reminder.reminder_date,
            reminder.reminder_time.format("%H:%M")
        );
        Ok(())
    }
}

/// Which channels actually went out for one reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub notified: bool,
    pub emailed: bool,
}

/// Dispatches due reminders to the notification sink and, when configured,
/// to the user's email address.
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    email_sender: Option<Arc<dyn EmailSender>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with the default log sink
    pub fn new(email_sender: Option<Arc<dyn EmailSender>>) -> Self {
        Self {
            sink: Arc::new(LogNotificationSink),
            email_sender,
        }
    }

    /// Create a dispatcher with a custom sink
    pub fn with_sink(
        sink: Arc<dyn NotificationSink>,
        email_sender: Option<Arc<dyn EmailSender>>,
    ) -> Self {
        Self { sink, email_sender }
    }

    /// Deliver one due reminder. Never fails: each channel's error is logged
    /// and reflected in the outcome instead of propagated.
    pub fn dispatch(&self, reminder: &Reminder, email_address: Option<&str>) -> DispatchOutcome {
        let notified = match self.sink.notify(reminder) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to show notification for reminder {}: {}", reminder.id, e);
                false
            }
        };

        let emailed = match (&self.email_sender, email_address) {
            (Some(email_sender), Some(address)) => {
                match email_sender.send_reminder(reminder, address) {
                    Ok(()) => true,
                    Err(e) => {
                        error!("Failed to send email for reminder {}: {}", reminder.id, e);
                        false
                    }
                }
            }
            _ => false,
        };

        DispatchOutcome { notified, emailed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::domain::models::reminder::ReminderKind;

    struct CountingSink {
        calls: AtomicU32,
    }

    impl NotificationSink for CountingSink {
        fn notify(&self, _reminder: &Reminder) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn notify(&self, _reminder: &Reminder) -> Result<()> {
            Err(anyhow::anyhow!("display server gone"))
        }
    }

    struct FailingEmailSender;

    impl EmailSender for FailingEmailSender {
        fn send_reminder(&self, _reminder: &Reminder, _to_email: &str) -> Result<()> {
            Err(anyhow::anyhow!("smtp connection refused"))
        }
    }

    fn sample_reminder() -> Reminder {
        let now = Utc::now();
        Reminder {
            id: "reminder::1::0".to_string(),
            user_id: "user::1::0".to_string(),
            title: "Checkup".to_string(),
            description: String::new(),
            reminder_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            kind: ReminderKind::Checkup,
            is_active: true,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_dispatch_notifies_sink() {
        let sink = Arc::new(CountingSink {
            calls: AtomicU32::new(0),
        });
        let dispatcher = NotificationDispatcher::with_sink(sink.clone(), None);

        let outcome = dispatcher.dispatch(&sample_reminder(), None);
        assert_eq!(outcome, DispatchOutcome { notified: true, emailed: false });
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_swallows_sink_failure() {
        let dispatcher = NotificationDispatcher::with_sink(Arc::new(FailingSink), None);
        let outcome = dispatcher.dispatch(&sample_reminder(), None);
        assert!(!outcome.notified);
        assert!(!outcome.emailed);
    }

    #[test]
    fn test_dispatch_without_email_service_skips_email() {
        let dispatcher = NotificationDispatcher::new(None);
        let outcome = dispatcher.dispatch(&sample_reminder(), Some("anna@example.com"));
        assert!(outcome.notified);
        assert!(!outcome.emailed);
    }

    #[test]
    fn test_email_failure_does_not_block_notification() {
        let dispatcher = NotificationDispatcher::new(Some(Arc::new(FailingEmailSender)));
        let outcome = dispatcher.dispatch(&sample_reminder(), Some("anna@example.com"));
        assert!(outcome.notified);
        assert!(!outcome.emailed);
    }
}
