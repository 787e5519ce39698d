//! # Reminder Scheduler
//!
//! Background polling loop that checks the active user's reminders and
//! dispatches the due ones. A fired reminder is marked completed even when
//! dispatch fails, so it never fires twice.
//!
//! `poll_once` does one pass with an explicit clock; the loop just calls it
//! on a timer. Tests drive `poll_once` directly.

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, error, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::domain::auth_service::AuthService;
use crate::domain::notification::NotificationDispatcher;
use crate::domain::reminder_service::ReminderService;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often the loop wakes up
    pub poll_interval: Duration,
    /// How far a reminder's scheduled time may be from "now" to count as due
    pub tolerance: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            tolerance: Duration::from_secs(60),
        }
    }
}

/// One scheduler pass: dispatch every due reminder of the active user.
/// Returns the number of reminders fired. No active user is a quiet no-op.
pub fn poll_once(
    auth_service: &AuthService,
    reminder_service: &ReminderService,
    dispatcher: &NotificationDispatcher,
    now: NaiveDateTime,
    tolerance: Duration,
) -> Result<u32> {
    let session = match auth_service.current_session()? {
        Some(session) => session,
        None => {
            debug!("No active user, skipping reminder poll");
            return Ok(0);
        }
    };

    let email_address = auth_service
        .get_account(&session.user_id)?
        .and_then(|account| account.email);

    let due = reminder_service.list_due(&session.user_id, now, tolerance.as_secs() as i64)?;

    let mut fired = 0;
    for reminder in due {
        let outcome = dispatcher.dispatch(&reminder, email_address.as_deref());
        info!(
            "Fired reminder {} (notified: {}, emailed: {})",
            reminder.id, outcome.notified, outcome.emailed
        );

        // Completed regardless of the outcome so it cannot fire again
        reminder_service.mark_completed(&session.user_id, &reminder.id)?;
        fired += 1;
    }

    Ok(fired)
}

/// Handle of the running background loop
pub struct ReminderScheduler {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Spawn the polling loop on a background thread
    pub fn start(
        config: SchedulerConfig,
        auth_service: AuthService,
        reminder_service: ReminderService,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        info!(
            "Starting reminder scheduler (poll every {:?}, tolerance {:?})",
            config.poll_interval, config.tolerance
        );

        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            run_loop(config, auth_service, reminder_service, dispatcher, stop_rx);
        });

        Self { stop_tx, handle }
    }

    /// Signal the loop to stop and wait for it to exit
    pub fn stop(self) {
        info!("Stopping reminder scheduler");
        // A send error means the thread already exited
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            error!("Reminder scheduler thread panicked");
        }
    }
}

fn run_loop(
    config: SchedulerConfig,
    auth_service: AuthService,
    reminder_service: ReminderService,
    dispatcher: NotificationDispatcher,
    stop_rx: Receiver<()>,
) {
    loop {
        match stop_rx.recv_timeout(config.poll_interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let now = chrono::Local::now().naive_local();
                match poll_once(&auth_service, &reminder_service, &dispatcher, now, config.tolerance)
                {
                    Ok(0) => {}
                    Ok(fired) => debug!("Scheduler pass fired {} reminder(s)", fired),
                    Err(e) => error!("Reminder poll failed: {}", e),
                }
            }
        }
    }
    info!("Reminder scheduler stopped");
}
